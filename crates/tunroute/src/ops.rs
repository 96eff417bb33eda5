//! Capability interface over the two route backends.

use std::net::IpAddr;

use super::error::Result;
use super::route::RouteEntry;

/// The route operations a tunnel client needs.
///
/// Implemented by the kernel transport ([`RouteContext`]) and by the
/// `ip` command fallback ([`IpCommandRoute`]); which one a build
/// carries is decided once by the `netlink` feature.
///
/// [`RouteContext`]: crate::RouteContext
/// [`IpCommandRoute`]: crate::IpCommandRoute
pub trait RouteOps {
    /// Install a route, replacing any existing route to the same
    /// destination.
    fn replace(&mut self, route: &RouteEntry) -> Result<()>;

    /// Remove a route.
    fn delete(&mut self, route: &RouteEntry) -> Result<()>;

    /// Look up the route used to reach `dst`.
    fn get(&mut self, dst: &IpAddr) -> Result<RouteEntry>;
}

/// Build the route backend selected for this build.
pub fn default_route_ops() -> Result<Box<dyn RouteOps>> {
    #[cfg(feature = "netlink")]
    {
        Ok(Box::new(super::context::RouteContext::new()?))
    }
    #[cfg(not(feature = "netlink"))]
    {
        Ok(Box::new(super::fallback::IpCommandRoute::new()))
    }
}
