//! Low-level blocking netlink socket operations.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use bytes::BufMut;
use netlink_sys::{Socket, SocketAddr, protocols};

use super::error::{Error, Result};

/// Blocking NETLINK_ROUTE socket.
///
/// Transactions are synchronous single-shot request/response
/// exchanges, so the socket stays in blocking mode and receive calls
/// park until the kernel answers.
pub struct RouteSocket {
    /// The underlying socket.
    socket: Socket,
    /// Local port ID (assigned by kernel).
    pid: u32,
}

impl RouteSocket {
    /// Open and bind a routing-protocol socket.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        Ok(Self { socket, pid })
    }

    /// Get the local port ID replies are addressed to.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send the whole request in one write; a short write is a failure.
    pub fn send_all(&self, msg: &[u8]) -> Result<()> {
        let sent = self.socket.send(msg, 0)?;
        if sent != msg.len() {
            return Err(Error::ShortSend {
                sent,
                expected: msg.len(),
            });
        }
        Ok(())
    }

    /// Receive one datagram into `buf`, retrying `EINTR`/`EAGAIN`.
    ///
    /// Returns the number of bytes written; `Ok(0)` means the kernel
    /// had data but `buf` had no room left, which the caller treats as
    /// end of stream.
    pub fn recv_into<B: BufMut>(&self, buf: &mut B) -> Result<usize> {
        loop {
            match self.socket.recv(buf, 0) {
                Ok(n) => return Ok(n),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl AsRawFd for RouteSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}
