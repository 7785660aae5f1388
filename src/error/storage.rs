//! Persistent storage error types

use core::fmt;

/// Errors reported by a [`Storage`](crate::traits::Storage) backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The requested range lies outside the medium
    OutOfBounds {
        /// First address of the request
        address: u16,
        /// Length of the request
        len: u16,
    },
    /// The address does not start a page of the medium
    Misaligned {
        /// Offending address
        address: u16,
        /// Page size of the medium
        page_size: u16,
    },
    /// The medium rejected a read
    ReadFailed,
    /// The medium rejected a write
    WriteFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { address, len } => {
                write!(f, "storage range {address:#06x}+{len} out of bounds")
            }
            Self::Misaligned { address, page_size } => {
                write!(f, "storage address {address:#06x} not aligned to {page_size}-byte pages")
            }
            Self::ReadFailed => f.write_str("storage read failed"),
            Self::WriteFailed => f.write_str("storage write failed"),
        }
    }
}
