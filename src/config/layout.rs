//! Explicit offset tables for the page wire format
//!
//! Every page module declares its slots with [`page_layout!`], which emits one
//! [`Field`] constant per slot plus a `FIELDS` table in wire order. A
//! `const` assertion in each page checks with [`tiles`] that the table covers
//! exactly [`PAGE_SIZE`] bytes with no gap or overlap, so a layout edit that
//! changes the page size fails to compile.

use super::PAGE_SIZE;

/// One named slot of a page's wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    /// Slot name as shown by the tuning tool
    pub name: &'static str,
    /// First byte of the slot
    pub offset: usize,
    /// Width of the slot in bytes
    pub len: usize,
}

impl Field {
    /// Declares a slot
    pub const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, offset, len }
    }

    /// One past the last byte of the slot
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Returns true if `offset` falls inside the slot
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.end()
    }

    /// The slot's bytes within `page`
    pub fn bytes<'a>(&self, page: &'a [u8; PAGE_SIZE]) -> &'a [u8] {
        &page[self.offset..self.end()]
    }

    /// Single-byte slot value
    pub fn byte(&self, page: &[u8; PAGE_SIZE]) -> u8 {
        page[self.offset]
    }

    /// Little-endian `u16` slot value
    pub fn u16_le(&self, page: &[u8; PAGE_SIZE]) -> u16 {
        u16::from_le_bytes([page[self.offset], page[self.offset + 1]])
    }

    /// Copies an `N`-byte slot out of `page`
    pub fn array<const N: usize>(&self, page: &[u8; PAGE_SIZE]) -> [u8; N] {
        debug_assert_eq!(N, self.len, "slot {} width", self.name);
        let mut out = [0u8; N];
        out.copy_from_slice(&page[self.offset..self.offset + N]);
        out
    }

    /// Stores a single-byte slot value
    pub fn put_byte(&self, page: &mut [u8; PAGE_SIZE], value: u8) {
        page[self.offset] = value;
    }

    /// Stores a little-endian `u16` slot value
    pub fn put_u16_le(&self, page: &mut [u8; PAGE_SIZE], value: u16) {
        page[self.offset..self.offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    /// Stores an `N`-byte slot
    pub fn put_array<const N: usize>(&self, page: &mut [u8; PAGE_SIZE], value: &[u8; N]) {
        debug_assert_eq!(N, self.len, "slot {} width", self.name);
        page[self.offset..self.offset + N].copy_from_slice(value);
    }
}

/// Returns true if `fields` cover `0..size` back to back with no empty slot
pub const fn tiles(fields: &[Field], size: usize) -> bool {
    let mut cursor = 0;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].offset != cursor || fields[i].len == 0 {
            return false;
        }
        cursor += fields[i].len;
        i += 1;
    }
    cursor == size
}

/// Finds the slot holding byte `offset`
pub fn field_at(fields: &'static [Field], offset: usize) -> Option<&'static Field> {
    fields.iter().find(|field| field.contains(offset))
}

/// Declares a page's slots in wire order
///
/// Each entry is `NAME @ offset: len`. Besides the constants, the macro emits
/// `FIELDS`, the complete table, and a compile-time check that it tiles
/// [`PAGE_SIZE`].
macro_rules! page_layout {
    ( $( $(#[$meta:meta])* $name:ident @ $offset:literal : $len:literal ),+ $(,)? ) => {
        $(
            $(#[$meta])*
            pub const $name: $crate::config::layout::Field =
                $crate::config::layout::Field::new(stringify!($name), $offset, $len);
        )+

        /// Every slot of the page in wire order
        pub const FIELDS: &[$crate::config::layout::Field] = &[$($name),+];

        const _: () = assert!(
            $crate::config::layout::tiles(FIELDS, $crate::config::PAGE_SIZE),
            "page layout must tile the page exactly",
        );
    };
}

pub(crate) use page_layout;
