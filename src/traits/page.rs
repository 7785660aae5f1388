//! Configuration page codec trait definition

use crate::config::{PAGE_SIZE, PageId};

/// A 128-byte tunable configuration page
///
/// The wire form is produced from the page's offset table, never from the
/// struct's in-memory layout. `Default` yields the compiled-in defaults used
/// when stored configuration is missing or incompatible.
///
/// Decoding is total: every byte pattern decodes, and encoding the result
/// reproduces the input exactly, reserved bytes and spare bits included.
pub trait ConfigPage: Default + Copy {
    /// Which page this is on the tuning link and in the stored image
    const ID: PageId;

    /// Encodes the page in wire order
    fn to_bytes(&self) -> [u8; PAGE_SIZE];

    /// Decodes a page from wire order
    fn from_bytes(bytes: &[u8; PAGE_SIZE]) -> Self;

    /// Byte offset of this page inside the stored image
    fn image_offset() -> usize {
        Self::ID.image_offset()
    }
}
