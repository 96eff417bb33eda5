//! Route records exchanged with the kernel.

use std::net::IpAddr;

use super::error::{Error, Result};

/// Address family of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl Family {
    /// The AF_* constant for this family.
    pub fn af(self) -> u8 {
        match self {
            Family::V4 => libc::AF_INET as u8,
            Family::V6 => libc::AF_INET6 as u8,
        }
    }

    /// Address length in bytes (4 or 16).
    pub fn addr_len(self) -> usize {
        match self {
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }

    /// Full-width prefix length in bits (32 or 128).
    pub fn prefix_bits(self) -> u8 {
        (self.addr_len() * 8) as u8
    }

    /// Map an AF_* constant back to a family.
    pub fn from_af(af: u8) -> Option<Self> {
        if af == libc::AF_INET as u8 {
            Some(Family::V4)
        } else if af == libc::AF_INET6 as u8 {
            Some(Family::V6)
        } else {
            None
        }
    }

    /// Family of an address.
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

/// One route to install, remove, or report.
///
/// `Option` fields are the presence flags: an absent field is never
/// encoded into a request and is only set by the parser when the
/// corresponding attribute was present in the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Address family; addresses on this record must match it.
    pub family: Family,
    /// Destination address (RTA_DST).
    pub destination: Option<IpAddr>,
    /// Preferred source address (RTA_PREFSRC).
    pub source: Option<IpAddr>,
    /// Gateway address (RTA_GATEWAY).
    pub gateway: Option<IpAddr>,
    /// Output interface index (RTA_OIF).
    pub oif_index: Option<u32>,
    /// Resolved output interface name, when the index could be resolved.
    pub oif_name: Option<String>,
    /// Raw first output line of the external tool. Only populated by
    /// the command fallback path.
    pub command_text: Option<String>,
}

impl RouteEntry {
    /// Create an empty route record for the given family.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            destination: None,
            source: None,
            gateway: None,
            oif_index: None,
            oif_name: None,
            command_text: None,
        }
    }

    /// Empty IPv4 record.
    pub fn v4() -> Self {
        Self::new(Family::V4)
    }

    /// Empty IPv6 record.
    pub fn v6() -> Self {
        Self::new(Family::V6)
    }

    /// Set the destination, keeping the record's family consistent.
    pub fn with_destination(mut self, addr: IpAddr) -> Self {
        self.family = Family::of(&addr);
        self.destination = Some(addr);
        self
    }

    /// Set the gateway.
    pub fn with_gateway(mut self, addr: IpAddr) -> Self {
        self.gateway = Some(addr);
        self
    }

    /// Set the preferred source address.
    pub fn with_source(mut self, addr: IpAddr) -> Self {
        self.source = Some(addr);
        self
    }

    /// Set the output interface index.
    pub fn with_oif(mut self, index: u32) -> Self {
        self.oif_index = Some(index);
        self
    }

    /// Raw address bytes of `addr`, checked against this record's family.
    pub(crate) fn addr_octets(&self, addr: &IpAddr) -> Result<Vec<u8>> {
        if Family::of(addr) != self.family {
            return Err(Error::InvalidMessage(format!(
                "address {} does not match route family {:?}",
                addr, self.family
            )));
        }
        Ok(octets(addr))
    }
}

/// Raw address bytes (4 or 16, per family).
pub(crate) fn octets(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Decode raw attribute payload bytes into an address of `family`.
pub(crate) fn addr_from_octets(family: Family, data: &[u8]) -> Result<IpAddr> {
    match family {
        Family::V4 => {
            let bytes: [u8; 4] = data.try_into().map_err(|_| {
                Error::InvalidAttribute(format!("IPv4 address of {} bytes", data.len()))
            })?;
            Ok(IpAddr::from(bytes))
        }
        Family::V6 => {
            let bytes: [u8; 16] = data.try_into().map_err(|_| {
                Error::InvalidAttribute(format!("IPv6 address of {} bytes", data.len()))
            })?;
            Ok(IpAddr::from(bytes))
        }
    }
}
