//! Route attribute (rtattr) handling.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::error::{Error, Result};

/// Attribute alignment.
pub const RTA_ALIGNTO: usize = 4;

/// Align a length to RTA_ALIGNTO boundary.
#[inline]
pub const fn rta_align(len: usize) -> usize {
    (len + RTA_ALIGNTO - 1) & !(RTA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const RTA_HDRLEN: usize = 4;

/// Attribute header (mirrors struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtAttr {
    /// Length including header.
    pub rta_len: u16,
    /// Attribute type.
    pub rta_type: u16,
}

impl RtAttr {
    /// Create a new attribute header for a payload of `data_len` bytes.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            rta_len: (RTA_HDRLEN + data_len) as u16,
            rta_type: attr_type,
        }
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.rta_len as usize).saturating_sub(RTA_HDRLEN)
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from the front of a buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(v, _)| v)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Bounded iterator over the attributes of a route message payload.
///
/// Yields `(type, payload)` pairs and never reads past the declared
/// buffer length; a malformed or truncated attribute ends iteration.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < RTA_HDRLEN {
            return None;
        }

        let attr = match RtAttr::from_bytes(self.data) {
            Ok(a) => a,
            Err(_) => return None,
        };

        let len = attr.rta_len as usize;
        if len < RTA_HDRLEN || len > self.data.len() {
            return None;
        }

        let payload = &self.data[RTA_HDRLEN..len];
        let aligned_len = rta_align(len);

        // Move to next attribute
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some((attr.rta_type, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_attr(buf: &mut Vec<u8>, attr_type: u16, payload: &[u8]) {
        buf.extend_from_slice(RtAttr::new(attr_type, payload.len()).as_bytes());
        buf.extend_from_slice(payload);
        buf.resize(rta_align(buf.len()), 0);
    }

    #[test]
    fn test_iter_two_attrs() {
        let mut buf = Vec::new();
        push_attr(&mut buf, 1, &[10, 0, 0, 1]);
        push_attr(&mut buf, 4, &2u32.to_ne_bytes());

        let attrs: Vec<_> = AttrIter::new(&buf).collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], (1, &[10, 0, 0, 1][..]));
        assert_eq!(attrs[1].0, 4);
    }

    #[test]
    fn test_iter_stops_at_truncated_attr() {
        let mut buf = Vec::new();
        push_attr(&mut buf, 1, &[10, 0, 0, 1]);
        // Attribute claims 12 bytes, only the header is present.
        buf.extend_from_slice(RtAttr::new(2, 8).as_bytes());

        let attrs: Vec<_> = AttrIter::new(&buf).collect();
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_iter_rejects_undersized_length() {
        // rta_len below the header size must not loop forever.
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u16.to_ne_bytes());
        buf.extend_from_slice(&1u16.to_ne_bytes());

        assert_eq!(AttrIter::new(&buf).count(), 0);
    }

    #[test]
    fn test_odd_payload_is_padded() {
        let mut buf = Vec::new();
        push_attr(&mut buf, 3, &[0xff; 6]);
        push_attr(&mut buf, 5, &[1, 2, 3, 4]);
        assert_eq!(buf.len() % RTA_ALIGNTO, 0);

        let attrs: Vec<_> = AttrIter::new(&buf).collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].1.len(), 6);
    }
}
