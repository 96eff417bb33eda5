//! Kernel route management for Linux VPN tunnel clients.
//!
//! This crate installs, replaces, and removes entries in the kernel
//! routing table, the way a tunnel client needs to when it pins the
//! route to its peer and redirects traffic through the tunnel device.
//! The primary backend talks RTNetlink over a blocking netlink socket;
//! a fallback backend shells out to the `ip` command for systems where
//! the netlink path is compiled out.
//!
//! # Features
//!
//! - `netlink` (default) - RTNetlink backend over a kernel socket
//! - `integration` - integration tests that mutate the routing table
//!
//! # Example
//!
//! ```ignore
//! use tunroute::{default_route_ops, RouteEntry};
//!
//! fn main() -> tunroute::Result<()> {
//!     let mut ops = default_route_ops()?;
//!
//!     // Discover how the kernel currently reaches the peer.
//!     let found = ops.get(&"4.4.2.2".parse().unwrap())?;
//!
//!     // Pin a host route to the peer through the discovered next hop.
//!     let mut pin = RouteEntry::v4().with_destination("4.4.2.2".parse().unwrap());
//!     pin.gateway = found.gateway;
//!     pin.oif_index = found.oif_index;
//!     ops.replace(&pin)?;
//!
//!     ops.delete(&pin)?;
//!     Ok(())
//! }
//! ```

// Core modules (always available)
pub mod error;
pub mod fallback;
pub mod ifname;
pub mod ops;
pub mod route;

// Netlink backend
#[cfg(feature = "netlink")]
pub mod attr;
#[cfg(feature = "netlink")]
mod builder;
#[cfg(feature = "netlink")]
pub mod context;
#[cfg(feature = "netlink")]
pub mod message;
#[cfg(feature = "netlink")]
mod parse;
#[cfg(feature = "netlink")]
mod socket;
#[cfg(feature = "netlink")]
pub mod types;

pub use error::{Error, Result};
pub use fallback::IpCommandRoute;
pub use ops::{RouteOps, default_route_ops};
pub use route::{Family, RouteEntry};

#[cfg(feature = "netlink")]
pub use attr::{AttrIter, RtAttr};
#[cfg(feature = "netlink")]
pub use context::{BUF_LEN, RouteContext};
#[cfg(feature = "netlink")]
pub use message::{NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
#[cfg(feature = "netlink")]
pub use socket::RouteSocket;
