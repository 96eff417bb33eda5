//! Route message body and rtnetlink constants.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::error::{Error, Result};

/// Route message body (mirrors struct rtmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtMsg {
    /// Address family (AF_INET, AF_INET6).
    pub rtm_family: u8,
    /// Destination prefix length in bits.
    pub rtm_dst_len: u8,
    /// Source prefix length in bits.
    pub rtm_src_len: u8,
    /// Type of service.
    pub rtm_tos: u8,
    /// Routing table ID.
    pub rtm_table: u8,
    /// Who installed the route (RTPROT_*).
    pub rtm_protocol: u8,
    /// Route reachability scope (RT_SCOPE_*).
    pub rtm_scope: u8,
    /// Route type (RTN_*).
    pub rtm_type: u8,
    /// Route flags.
    pub rtm_flags: u32,
}

impl RtMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new zeroed route message body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from the front of a buffer.
    ///
    /// Reads by value, so the buffer needs no particular alignment.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(v, _)| v)
            .map_err(|_| Error::Truncated {
                expected: Self::SIZE,
                actual: data.len(),
            })
    }
}

/// Routing table IDs (rt_class_t).
pub mod rt_table {
    /// The main routing table.
    pub const MAIN: u8 = 254;
}

/// Route reachability scopes (RT_SCOPE_*).
pub mod rt_scope {
    /// Reachable beyond the local link (gatewayed routes).
    pub const UNIVERSE: u8 = 0;
    /// Directly attached destinations.
    pub const LINK: u8 = 253;
}

/// Route origin protocols (RTPROT_*).
pub mod rt_protocol {
    /// Installed during boot or by administrative tooling.
    pub const BOOT: u8 = 3;
}

/// Route types (RTN_*).
pub mod rt_type {
    /// Ordinary unicast route.
    pub const UNICAST: u8 = 1;
}

/// Route attribute types (RTA_*).
pub mod rta {
    /// Destination address.
    pub const DST: u16 = 1;
    /// Output interface index.
    pub const OIF: u16 = 4;
    /// Gateway address.
    pub const GATEWAY: u16 = 5;
    /// Preferred source address.
    pub const PREFSRC: u16 = 7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtmsg_size() {
        // Wire layout of struct rtmsg: 8 bytes of u8 fields + u32 flags.
        assert_eq!(RtMsg::SIZE, 12);
    }

    #[test]
    fn test_rtmsg_roundtrip() {
        let mut body = RtMsg::new();
        body.rtm_family = libc::AF_INET as u8;
        body.rtm_dst_len = 32;
        body.rtm_table = rt_table::MAIN;
        body.rtm_scope = rt_scope::LINK;

        let parsed = RtMsg::from_bytes(body.as_bytes()).unwrap();
        assert_eq!(parsed.rtm_family, libc::AF_INET as u8);
        assert_eq!(parsed.rtm_dst_len, 32);
        assert_eq!(parsed.rtm_scope, rt_scope::LINK);
    }

    #[test]
    fn test_rtmsg_truncated() {
        let err = RtMsg::from_bytes(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }
}
