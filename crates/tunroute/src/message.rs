//! Netlink message header and framing.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::error::{Error, Result};

/// Netlink message header alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending socket port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Create a new message header.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            nlmsg_seq: 0,
            nlmsg_pid: 0,
        }
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nlmsg_len as usize).saturating_sub(NLMSG_HDRLEN)
    }

    /// Check if this is an error message (or ACK).
    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Check if this terminates a multi-part sequence.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Check if this message has the multi-part flag.
    pub fn is_multi(&self) -> bool {
        self.nlmsg_flags & NLM_F_MULTI != 0
    }

    /// Convert header to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse header from the front of a buffer.
    ///
    /// Reads by value, so the buffer needs no particular alignment.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(v, _)| v)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Netlink message types used by the route transaction protocol.
pub struct NlMsgType;

impl NlMsgType {
    /// Error message or ACK.
    pub const ERROR: u16 = 2;
    /// End of multi-part message.
    pub const DONE: u16 = 3;

    /// Install (or replace) a route.
    pub const RTM_NEWROUTE: u16 = 24;
    /// Remove a route.
    pub const RTM_DELROUTE: u16 = 25;
    /// Look up a route.
    pub const RTM_GETROUTE: u16 = 26;
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_MULTI: u16 = 0x02;
pub const NLM_F_ACK: u16 = 0x04;

// Modifiers to NEW request
pub const NLM_F_REPLACE: u16 = 0x100;
pub const NLM_F_CREATE: u16 = 0x400;

/// Netlink error message payload (mirrors struct nlmsgerr).
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
pub struct NlMsgErr {
    /// Error code (negative errno, or 0 for ACK).
    pub error: i32,
    /// Original message header that caused the error.
    pub msg: NlMsgHdr,
}

impl NlMsgErr {
    /// Parse error payload from the front of a buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(v, _)| v)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }

    /// Check if this is an ACK (no error).
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let mut hdr = NlMsgHdr::new(NlMsgType::RTM_GETROUTE, NLM_F_REQUEST);
        hdr.nlmsg_seq = 7;
        hdr.nlmsg_pid = 1234;

        let parsed = NlMsgHdr::from_bytes(hdr.as_bytes()).unwrap();
        assert_eq!(parsed.nlmsg_type, NlMsgType::RTM_GETROUTE);
        assert_eq!(parsed.nlmsg_flags, NLM_F_REQUEST);
        assert_eq!(parsed.nlmsg_seq, 7);
        assert_eq!(parsed.nlmsg_pid, 1234);
        assert_eq!(parsed.payload_len(), 0);
    }

    #[test]
    fn test_header_truncated() {
        let err = NlMsgHdr::from_bytes(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, Error::Truncated { actual: 8, .. }));
    }

    #[test]
    fn test_error_payload() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&(-libc::EEXIST).to_ne_bytes());
        raw.extend_from_slice(NlMsgHdr::new(NlMsgType::RTM_NEWROUTE, 0).as_bytes());

        let err = NlMsgErr::from_bytes(&raw).unwrap();
        assert!(!err.is_ack());
        assert_eq!(err.error, -libc::EEXIST);
        assert_eq!(err.msg.nlmsg_type, NlMsgType::RTM_NEWROUTE);
    }

    #[test]
    fn test_multi_and_done() {
        let mut hdr = NlMsgHdr::new(NlMsgType::DONE, NLM_F_MULTI);
        assert!(hdr.is_done());
        assert!(hdr.is_multi());
        hdr.nlmsg_flags = 0;
        assert!(!hdr.is_multi());
    }
}
