//! Configuration page error types
//!
//! Errors raised while validating a persisted configuration image or while
//! applying a tuning-protocol write to a page.

use core::fmt;

/// Configuration page errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The persisted signature byte does not match the firmware signature
    SignatureInvalid {
        /// Signature byte found in storage
        found: u8,
    },
    /// The persisted data structure version differs from the current layout
    VersionMismatch {
        /// Version byte found in storage
        found: u8,
        /// Version the firmware layout expects
        expected: u8,
    },
    /// A page record does not serialize to exactly one storage page.
    ///
    /// Layout tables are checked at compile time, so no runtime path returns
    /// this variant. It exists so diagnostics can name the class of fault.
    PageSizeViolation {
        /// Page index (1-based, as addressed by the tuning protocol)
        page: u8,
    },
    /// The tuning protocol addressed a page that does not exist
    InvalidPage {
        /// Requested page index
        page: u8,
    },
    /// A byte range does not fit inside the page
    OffsetOutOfRange {
        /// First byte of the requested range
        offset: u16,
        /// Length of the requested range
        len: u16,
    },
}

impl ConfigError {
    /// Returns true if the failure concerns the persisted guard bytes
    ///
    /// Guard failures are recovered by substituting compiled-in defaults.
    pub const fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            Self::SignatureInvalid { .. } | Self::VersionMismatch { .. }
        )
    }

    /// Returns true if this error is recoverable at runtime
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::PageSizeViolation { .. } => false,
            Self::SignatureInvalid { .. }
            | Self::VersionMismatch { .. }
            | Self::InvalidPage { .. }
            | Self::OffsetOutOfRange { .. } => true,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureInvalid { found } => {
                write!(f, "invalid config signature {found}")
            }
            Self::VersionMismatch { found, expected } => {
                write!(
                    f,
                    "config data structure version {found}, expected {expected}"
                )
            }
            Self::PageSizeViolation { page } => {
                write!(f, "config page {page} does not match the storage page size")
            }
            Self::InvalidPage { page } => write!(f, "no config page {page}"),
            Self::OffsetOutOfRange { offset, len } => {
                write!(f, "range {offset}+{len} is outside the page")
            }
        }
    }
}
