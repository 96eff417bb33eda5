//! Request construction into the context's fixed transaction buffer.

use std::net::IpAddr;

use super::attr::{RTA_HDRLEN, RtAttr, rta_align};
use super::error::{Error, Result};
use super::message::{NLM_F_ACK, NLM_F_REQUEST, NLMSG_HDRLEN, NlMsgHdr, NlMsgType, nlmsg_align};
use super::route::{Family, RouteEntry, octets};
use super::types::{RtMsg, rt_protocol, rt_scope, rt_table, rt_type, rta};

/// Builder that assembles one request into a borrowed byte buffer.
///
/// The buffer is zeroed up front, so alignment padding is already
/// zero; the cursor only ever advances and every write is checked
/// against the buffer capacity.
pub struct RequestBuilder<'a> {
    buf: &'a mut [u8],
    header: NlMsgHdr,
    len: usize,
}

impl<'a> RequestBuilder<'a> {
    /// Start a new request of the given type and flags.
    pub fn new(buf: &'a mut [u8], msg_type: u16, flags: u16) -> Self {
        buf.fill(0);
        Self {
            buf,
            header: NlMsgHdr::new(msg_type, flags),
            len: NLMSG_HDRLEN,
        }
    }

    /// Set the transaction sequence number.
    pub fn set_seq(&mut self, seq: u32) {
        self.header.nlmsg_seq = seq;
    }

    /// Set the sending socket port ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.header.nlmsg_pid = pid;
    }

    fn reserve(&self, extra: usize) -> Result<()> {
        let needed = self.len + extra;
        if needed > self.buf.len() {
            return Err(Error::Capacity {
                needed,
                capacity: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Append raw bytes, advancing the cursor to the next alignment
    /// boundary.
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<()> {
        let aligned = nlmsg_align(data.len());
        self.reserve(aligned)?;
        self.buf[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += aligned;
        Ok(())
    }

    /// Append one attribute with the given type and payload.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let aligned = rta_align(RTA_HDRLEN + data.len());
        self.reserve(aligned)?;
        let attr = RtAttr::new(attr_type, data.len());
        self.buf[self.len..self.len + RTA_HDRLEN].copy_from_slice(attr.as_bytes());
        self.buf[self.len + RTA_HDRLEN..self.len + RTA_HDRLEN + data.len()].copy_from_slice(data);
        self.len += aligned;
        Ok(())
    }

    /// Append a u32 attribute (native endian).
    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Finalize the header and return the encoded message length.
    pub fn finish(mut self) -> usize {
        self.header.nlmsg_len = self.len as u32;
        self.buf[..NLMSG_HDRLEN].copy_from_slice(self.header.as_bytes());
        self.len
    }
}

/// Encode a route install/remove request.
///
/// `msg_type` is RTM_NEWROUTE or RTM_DELROUTE; `extra_flags` carries
/// the create-or-replace modifiers for installs. Mutating requests
/// always ask for an ACK. Optional attributes are appended only for
/// fields the record actually carries.
pub(crate) fn encode_modify_request(
    buf: &mut [u8],
    seq: u32,
    pid: u32,
    msg_type: u16,
    extra_flags: u16,
    route: &RouteEntry,
) -> Result<usize> {
    let mut builder = RequestBuilder::new(buf, msg_type, NLM_F_REQUEST | NLM_F_ACK | extra_flags);
    builder.set_seq(seq);
    builder.set_pid(pid);

    let mut body = RtMsg::new();
    body.rtm_family = route.family.af();
    body.rtm_table = rt_table::MAIN;
    // Routes with a gateway are reachable beyond the local link.
    body.rtm_scope = if route.gateway.is_some() {
        rt_scope::UNIVERSE
    } else {
        rt_scope::LINK
    };
    if msg_type != NlMsgType::RTM_DELROUTE {
        body.rtm_protocol = rt_protocol::BOOT;
        body.rtm_type = rt_type::UNICAST;
    }
    if route.destination.is_some() {
        body.rtm_dst_len = route.family.prefix_bits();
    }
    if route.source.is_some() {
        body.rtm_src_len = route.family.prefix_bits();
    }
    builder.append_bytes(body.as_bytes())?;

    if let Some(ref dst) = route.destination {
        builder.append_attr(rta::DST, &route.addr_octets(dst)?)?;
    }
    if let Some(ref src) = route.source {
        builder.append_attr(rta::PREFSRC, &route.addr_octets(src)?)?;
    }
    if let Some(ref gw) = route.gateway {
        builder.append_attr(rta::GATEWAY, &route.addr_octets(gw)?)?;
    }
    if let Some(oif) = route.oif_index {
        builder.append_attr_u32(rta::OIF, oif)?;
    }

    Ok(builder.finish())
}

/// Encode an exact-match route lookup for one destination address.
///
/// Lookup requests carry no ACK flag; the reply itself is the answer.
/// The destination is always attached with a full-width prefix, so
/// this asks "which route would carry traffic to this host", not a
/// subnet query.
pub(crate) fn encode_lookup_request(
    buf: &mut [u8],
    seq: u32,
    pid: u32,
    dst: &IpAddr,
) -> Result<usize> {
    let family = Family::of(dst);

    let mut builder = RequestBuilder::new(buf, NlMsgType::RTM_GETROUTE, NLM_F_REQUEST);
    builder.set_seq(seq);
    builder.set_pid(pid);

    let mut body = RtMsg::new();
    body.rtm_family = family.af();
    body.rtm_table = rt_table::MAIN;
    body.rtm_dst_len = family.prefix_bits();
    builder.append_bytes(body.as_bytes())?;

    builder.append_attr(rta::DST, &octets(dst))?;

    Ok(builder.finish())
}
