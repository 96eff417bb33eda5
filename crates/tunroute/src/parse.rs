//! Decoding of route lookup replies.

use super::attr::AttrIter;
use super::error::{Error, Result};
use super::ifname;
use super::message::{NLMSG_HDRLEN, NlMsgHdr};
use super::route::{Family, RouteEntry, addr_from_octets};
use super::types::{RtMsg, rta};

/// Decode one accepted reply frame into a route record.
///
/// Only attributes present in the reply set fields on the record;
/// unknown attribute types are ignored. A family other than IPv4 or
/// IPv6 fails the lookup.
pub(crate) fn parse_route_reply(frame: &[u8]) -> Result<RouteEntry> {
    let header = NlMsgHdr::from_bytes(frame)?;
    let total = header.nlmsg_len as usize;
    if total < NLMSG_HDRLEN + RtMsg::SIZE || total > frame.len() {
        return Err(Error::InvalidMessage(format!(
            "reply length {} outside frame of {} bytes",
            total,
            frame.len()
        )));
    }

    let payload = &frame[NLMSG_HDRLEN..total];
    let body = RtMsg::from_bytes(payload)?;

    let family =
        Family::from_af(body.rtm_family).ok_or(Error::UnsupportedFamily(body.rtm_family))?;
    let mut route = RouteEntry::new(family);

    for (attr_type, data) in AttrIter::new(&payload[RtMsg::SIZE..]) {
        match attr_type {
            rta::OIF => {
                if let Ok(bytes) = <[u8; 4]>::try_from(&data[..data.len().min(4)]) {
                    let index = u32::from_ne_bytes(bytes);
                    route.oif_index = Some(index);
                    // Name resolution is best effort; a vanished
                    // interface still yields the index.
                    route.oif_name = ifname::index_to_name(index).ok();
                }
            }
            rta::GATEWAY => {
                route.gateway = Some(addr_from_octets(family, data)?);
            }
            rta::PREFSRC => {
                route.source = Some(addr_from_octets(family, data)?);
            }
            rta::DST => {
                route.destination = Some(addr_from_octets(family, data)?);
            }
            _ => {}
        }
    }

    Ok(route)
}
