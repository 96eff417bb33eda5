//! Route context: one socket, one sequence counter, one buffer.

use std::net::IpAddr;

use tracing::{debug, trace};

use super::builder::{encode_lookup_request, encode_modify_request};
use super::error::{Error, Result};
use super::message::{NLM_F_CREATE, NLM_F_REPLACE, NLMSG_HDRLEN, NlMsgErr, NlMsgHdr, NlMsgType};
use super::parse::parse_route_reply;
use super::route::RouteEntry;
use super::socket::RouteSocket;

/// Capacity of the per-context transaction buffer. Large enough for
/// the worst-case request and for single-route replies.
pub const BUF_LEN: usize = 1024;

/// What the receive loop should do with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Unrelated traffic; drop it and read again.
    Skip,
    /// This frame completes the transaction.
    Accept,
    /// Part of a multi-part reply with more bytes to come.
    More,
}

/// Synchronous route transaction endpoint.
///
/// Owns one kernel routing socket, a monotonically increasing
/// sequence counter, and a single reusable transaction buffer. The
/// buffer is overwritten on every call, so one context must never
/// carry two transactions at once; `&mut self` on every operation
/// enforces that at compile time.
pub struct RouteContext {
    /// The kernel routing socket.
    socket: RouteSocket,
    /// Transaction sequence number, incremented before each request.
    seq: u32,
    /// Shared request/response buffer.
    buf: [u8; BUF_LEN],
    /// Valid bytes currently held in `buf`.
    len: usize,
}

impl RouteContext {
    /// Open a routing socket and build a fresh context.
    ///
    /// On failure nothing escapes: the socket (if it was opened) is
    /// closed on unwind and no partial context is returned.
    pub fn new() -> Result<Self> {
        let socket = RouteSocket::new()?;
        debug!(pid = socket.pid(), "route context ready");
        Ok(Self {
            socket,
            seq: 0,
            buf: [0u8; BUF_LEN],
            len: 0,
        })
    }

    /// Install a route, replacing any existing route to the same
    /// destination.
    pub fn replace(&mut self, route: &RouteEntry) -> Result<()> {
        let seq = self.next_seq();
        let len = encode_modify_request(
            &mut self.buf,
            seq,
            self.socket.pid(),
            NlMsgType::RTM_NEWROUTE,
            NLM_F_CREATE | NLM_F_REPLACE,
            route,
        )?;
        debug!(seq, dst = ?route.destination, gw = ?route.gateway, "replace route");
        self.talk(len)?;
        Ok(())
    }

    /// Remove a route from the main table.
    pub fn delete(&mut self, route: &RouteEntry) -> Result<()> {
        let seq = self.next_seq();
        let len = encode_modify_request(
            &mut self.buf,
            seq,
            self.socket.pid(),
            NlMsgType::RTM_DELROUTE,
            0,
            route,
        )?;
        debug!(seq, dst = ?route.destination, "delete route");
        self.talk(len)?;
        Ok(())
    }

    /// Look up the route the kernel would use to reach `dst`.
    pub fn get(&mut self, dst: &IpAddr) -> Result<RouteEntry> {
        let seq = self.next_seq();
        let len = encode_lookup_request(&mut self.buf, seq, self.socket.pid(), dst)?;
        debug!(seq, %dst, "route lookup");
        self.talk(len)?;
        parse_route_reply(&self.buf[..self.len])
    }

    fn next_seq(&mut self) -> u32 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    /// Send `buf[..len]` and run the receive loop until a frame of
    /// this transaction is accepted.
    fn talk(&mut self, len: usize) -> Result<usize> {
        self.socket.send_all(&self.buf[..len])?;
        self.recv_reply()
    }

    fn recv_reply(&mut self) -> Result<usize> {
        self.len = 0;

        loop {
            let n = self
                .socket
                .recv_into(&mut &mut self.buf[self.len..])?;
            if n == 0 {
                return Err(Error::InvalidMessage(
                    "end of stream on route socket".into(),
                ));
            }
            self.len += n;

            match classify_frame(&self.buf[..self.len], BUF_LEN, self.seq, self.socket.pid())? {
                Disposition::Skip => {
                    trace!(seq = self.seq, "skipping unrelated frame");
                    self.len = 0;
                }
                Disposition::More => {
                    trace!(seq = self.seq, received = self.len, "multi-part continues");
                }
                Disposition::Accept => return Ok(self.len),
            }
        }
    }
}

/// Decide what to do with the frame currently at the front of the
/// buffer.
///
/// Order matches the transaction protocol: frame validation, then
/// embedded error decoding (an error reply aborts the transaction
/// before sequence filtering), then sequence/port filtering of
/// unrelated traffic, then multi-part termination. The "more bytes to
/// come" condition compares the declared frame length against bytes
/// received so far; a declared length that cannot ever fit the buffer
/// fails instead of looping.
fn classify_frame(filled: &[u8], capacity: usize, seq: u32, pid: u32) -> Result<Disposition> {
    let header = NlMsgHdr::from_bytes(filled)?;
    let declared = header.nlmsg_len as usize;

    if declared < NLMSG_HDRLEN {
        return Err(Error::InvalidMessage(format!(
            "declared frame length {} below header size",
            declared
        )));
    }
    if declared > capacity {
        return Err(Error::InvalidMessage(format!(
            "declared frame length {} exceeds transaction buffer of {} bytes",
            declared, capacity
        )));
    }

    if header.is_error() {
        let err = NlMsgErr::from_bytes(&filled[NLMSG_HDRLEN..])?;
        if !err.is_ack() {
            return Err(Error::from_errno(err.error));
        }
        // A zero status is a success acknowledgement; fall through to
        // the sequence filter like any other frame.
    }

    if header.nlmsg_seq != seq || header.nlmsg_pid != pid {
        return Ok(Disposition::Skip);
    }

    if header.is_done() || !header.is_multi() {
        return Ok(Disposition::Accept);
    }

    if declared > filled.len() {
        return Ok(Disposition::More);
    }

    Ok(Disposition::Accept)
}

impl crate::ops::RouteOps for RouteContext {
    fn replace(&mut self, route: &RouteEntry) -> Result<()> {
        RouteContext::replace(self, route)
    }

    fn delete(&mut self, route: &RouteEntry) -> Result<()> {
        RouteContext::delete(self, route)
    }

    fn get(&mut self, dst: &IpAddr) -> Result<RouteEntry> {
        RouteContext::get(self, dst)
    }
}
