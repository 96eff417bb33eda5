//! Fallback backend that shells out to the `ip` command.
//!
//! Used when the kernel netlink transport is not compiled in. The
//! operations mirror the kernel path but with a weaker guarantee:
//! `replace` and `delete` only detect failure to start the
//! subprocess, not a nonzero exit of the tool itself, so callers on
//! this path cannot rely on error reporting for mutating operations.

use std::io::{BufRead, BufReader};
use std::net::IpAddr;
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::{Error, Result};
use super::ops::RouteOps;
use super::route::{Family, RouteEntry};

/// Route backend driving the external `ip route` tool.
#[derive(Debug, Default)]
pub struct IpCommandRoute;

impl IpCommandRoute {
    /// Create the fallback backend. Holds no resources.
    pub fn new() -> Self {
        Self
    }

    fn run(&self, verb: &str, spec: &str) -> Result<()> {
        debug!(verb, spec, "ip route fallback");
        let mut child = Command::new("ip")
            .arg("route")
            .arg(verb)
            .args(spec.split_whitespace())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // Exit status of the tool is not inspected on this path.
        let _ = child.wait();
        Ok(())
    }
}

/// Render the textual route spec the `ip` tool expects.
///
/// A record obtained from a previous fallback `get` carries the
/// tool's own output line and is passed through verbatim; otherwise
/// the spec is rendered from the record's fields.
fn route_spec(route: &RouteEntry) -> Result<String> {
    if let Some(ref text) = route.command_text {
        return Ok(text.trim().to_string());
    }

    let dst = route.destination.ok_or_else(|| {
        Error::InvalidMessage("fallback route spec needs a destination".into())
    })?;

    let mut spec = format!("{}/{}", dst, route.family.prefix_bits());
    if let Some(ref gw) = route.gateway {
        spec.push_str(&format!(" via {}", gw));
    }
    if let Some(ref dev) = route.oif_name {
        spec.push_str(&format!(" dev {}", dev));
    }
    Ok(spec)
}

impl RouteOps for IpCommandRoute {
    fn replace(&mut self, route: &RouteEntry) -> Result<()> {
        self.run("replace", &route_spec(route)?)
    }

    fn delete(&mut self, route: &RouteEntry) -> Result<()> {
        self.run("delete", &route_spec(route)?)
    }

    fn get(&mut self, dst: &IpAddr) -> Result<RouteEntry> {
        debug!(%dst, "ip route get fallback");
        let mut child = Command::new("ip")
            .args(["route", "get"])
            .arg(dst.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Fallback("no stdout from ip route get".into()))?;
        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line)?;
        let _ = child.wait();

        let line = line.trim();
        if line.is_empty() {
            return Err(Error::Fallback(format!("no route output for {}", dst)));
        }

        let mut route = RouteEntry::new(Family::of(dst));
        route.command_text = Some(line.to_string());
        Ok(route)
    }
}
