//! Persistent storage trait definition

use crate::error::{EcuResult, StorageError};

/// Byte-addressable persistent storage, such as on-chip EEPROM
///
/// The crate never assumes erase semantics: any byte may be rewritten
/// directly. Backends report ranges beyond [`Storage::capacity`] as
/// [`StorageError::OutOfBounds`].
///
/// Calls are blocking and must only be made from the main loop.
pub trait Storage {
    /// Size of the medium in bytes
    fn capacity(&self) -> usize;

    /// Fills `buf` with the bytes starting at `address`
    fn read(&mut self, address: u16, buf: &mut [u8]) -> EcuResult<()>;

    /// Writes `data` starting at `address`
    fn write(&mut self, address: u16, data: &[u8]) -> EcuResult<()>;

    /// Writes only the bytes of `data` that differ from what is stored
    ///
    /// Returns the number of bytes written. EEPROM cells wear per write, so
    /// burns go through this.
    fn update(&mut self, address: u16, data: &[u8]) -> EcuResult<usize> {
        let out_of_bounds = StorageError::OutOfBounds {
            address,
            len: u16::try_from(data.len()).unwrap_or(u16::MAX),
        };
        let at = |offset: usize| {
            u16::try_from(offset)
                .ok()
                .and_then(|offset| address.checked_add(offset))
                .ok_or(out_of_bounds)
        };
        // nothing is written unless the whole range is addressable
        if let Some(last) = data.len().checked_sub(1) {
            at(last)?;
        }

        let mut written = 0;
        let mut current = [0u8; 1];
        for (offset, &byte) in data.iter().enumerate() {
            let target = at(offset)?;
            self.read(target, &mut current)?;
            if current[0] != byte {
                self.write(target, &[byte])?;
                written += 1;
            }
        }
        Ok(written)
    }
}
