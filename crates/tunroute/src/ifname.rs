//! Interface name and index utilities.
//!
//! Backed by the `/sys/class/net` tree, which is what a route record
//! needs to turn a kernel interface index into a human-readable name
//! and back.

use std::path::Path;

use super::error::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

const SYSFS_NET: &str = "/sys/class/net";

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidMessage("empty interface name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidMessage(format!(
            "interface name too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') || name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidMessage(format!(
            "interface name contains invalid characters: {:?}",
            name
        )));
    }

    Ok(())
}

/// Read the `ifindex` file of one interface's sysfs directory.
fn read_ifindex(dir: &Path) -> Option<u32> {
    let content = std::fs::read_to_string(dir.join("ifindex")).ok()?;
    content.trim().parse().ok()
}

/// Convert an interface index to name.
pub fn index_to_name(index: u32) -> Result<String> {
    if index == 0 {
        return Err(Error::InterfaceNotFound {
            name: "index 0".to_string(),
        });
    }

    for entry in std::fs::read_dir(SYSFS_NET)?.flatten() {
        if read_ifindex(&entry.path()) == Some(index) {
            return Ok(entry.file_name().to_string_lossy().to_string());
        }
    }

    Err(Error::InterfaceNotFound {
        name: format!("index {}", index),
    })
}

/// Convert an interface name to index.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;

    read_ifindex(&Path::new(SYSFS_NET).join(name)).ok_or_else(|| Error::InterfaceNotFound {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate("tun0").is_ok());
        assert!(validate("lo").is_ok());

        assert!(validate("").is_err());
        assert!(validate("this_name_is_way_too_long_for_an_interface").is_err());
        assert!(validate("eth/0").is_err());
        assert!(validate("eth 0").is_err());
    }

    #[test]
    fn test_index_zero_is_not_found() {
        assert!(index_to_name(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_loopback_roundtrip() {
        // Every Linux host has a loopback interface.
        let index = name_to_index("lo").unwrap();
        assert!(index > 0);
        assert_eq!(index_to_name(index).unwrap(), "lo");
    }
}
