//! Error types for route operations.

use std::io;

/// Result type for route operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing, removing, or looking up routes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket or subprocess operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel returned an error code inside an NLMSG_ERROR reply.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message or struct was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected length.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Request does not fit the fixed transaction buffer.
    #[error("request exceeds buffer capacity: need {needed}, have {capacity}")]
    Capacity {
        /// Bytes the request would need.
        needed: usize,
        /// Capacity of the transaction buffer.
        capacity: usize,
    },

    /// Kernel accepted fewer bytes than the request holds.
    #[error("short send: wrote {sent} of {expected} bytes")]
    ShortSend {
        /// Bytes actually written.
        sent: usize,
        /// Bytes in the request.
        expected: usize,
    },

    /// Reply carried an address family this crate does not handle.
    #[error("unsupported address family: {0}")]
    UnsupportedFamily(u8),

    /// Interface not found.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name or index that was not found.
        name: String,
    },

    /// The `ip` command fallback failed.
    #[error("fallback command failed: {0}")]
    Fallback(String),
}

impl Error {
    /// Create a kernel error from the (negative) errno embedded in an
    /// NLMSG_ERROR reply.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV, ENETUNREACH).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } => {
                matches!(*errno, libc::ENOENT | libc::ENODEV | libc::ENETUNREACH)
            }
            Self::InterfaceNotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } => matches!(*errno, libc::EPERM | libc::EACCES),
            _ => false,
        }
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_errno() {
        let err = Error::from_errno(-libc::EPERM);
        assert!(err.is_permission_denied());
        assert_eq!(err.errno(), Some(libc::EPERM));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::from_errno(-libc::ENOENT).is_not_found());
        assert!(Error::from_errno(-libc::ENETUNREACH).is_not_found());
        assert!(!Error::from_errno(-libc::EPERM).is_not_found());
        assert!(
            Error::InterfaceNotFound {
                name: "tun0".into()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = Error::ShortSend {
            sent: 12,
            expected: 44,
        };
        assert_eq!(err.to_string(), "short send: wrote 12 of 44 bytes");

        let err = Error::UnsupportedFamily(7);
        assert_eq!(err.to_string(), "unsupported address family: 7");
    }
}
