//! Burning and loading the configuration image through a storage backend

use super::record::{ConfigRecordSet, LoadOutcome};
use super::{
    DATA_STRUCTURE_VERSION, DATA_STRUCTURE_VERSION_OFFSET, IMAGE_LEN, PAGE_SIZE, PageId,
    SIGNATURE, SIGNATURE_OFFSET,
};
use crate::error::{EcuResult, StorageError};
use crate::platform::constants::{STORAGE_CAPACITY, STORAGE_PAGE_SIZE};
use crate::traits::Storage;

const _: () = assert!(IMAGE_LEN <= STORAGE_CAPACITY);
const _: () = assert!(PAGE_SIZE == STORAGE_PAGE_SIZE);

const METADATA_LEN: usize = IMAGE_LEN - SIGNATURE_OFFSET;

/// Persists a [`ConfigRecordSet`] image at a fixed address of a [`Storage`]
/// backend
///
/// The image starts on a storage page boundary, so every configuration page
/// maps onto exactly one page of the medium. Burns rewrite only the bytes
/// that differ from what is stored. Page bytes are written before the
/// metadata, so an interrupted first burn leaves an image that is rejected on
/// the next boot rather than half-applied.
#[derive(Debug)]
pub struct ConfigStore<S: Storage> {
    storage: S,
    base: u16,
}

impl<S: Storage> ConfigStore<S> {
    /// Stores the image at address 0
    pub fn new(storage: S) -> Self {
        Self { storage, base: 0 }
    }

    /// Stores the image starting at `base`
    ///
    /// # Errors
    /// [`StorageError::Misaligned`] unless `base` is a multiple of the
    /// medium's page size.
    pub fn with_base(storage: S, base: u16) -> EcuResult<Self> {
        if usize::from(base) % STORAGE_PAGE_SIZE != 0 {
            return Err(StorageError::Misaligned {
                address: base,
                page_size: STORAGE_PAGE_SIZE as u16,
            }
            .into());
        }
        Ok(Self { storage, base })
    }

    /// Reads and validates the stored image
    ///
    /// A read failure is treated like a rejected image: defaults are
    /// returned with the failure as the diagnostic.
    pub fn load(&mut self) -> LoadOutcome {
        let mut image = [0u8; IMAGE_LEN];
        match self.storage.read(self.base, &mut image) {
            Ok(()) => ConfigRecordSet::load(&image),
            Err(error) => ConfigRecordSet::fallback(error),
        }
    }

    /// Persists one page and the metadata
    ///
    /// If the medium does not already hold an image with the current
    /// signature and data structure version, every page is written instead.
    /// Returns the number of bytes actually written.
    pub fn burn(&mut self, config: &ConfigRecordSet, page: PageId) -> EcuResult<usize> {
        if !self.holds_current_image()? {
            log::info!("no current image stored, burning all pages for page {}", page.index());
            return self.burn_all(config);
        }

        let image = config.to_image();
        let offset = page.image_offset();
        let mut written = self.update(offset, &image[offset..offset + PAGE_SIZE])?;
        written += self.burn_metadata(&image)?;
        log::info!("burned page {}, {} byte(s) changed", page.index(), written);
        Ok(written)
    }

    /// Persists every page and the metadata
    ///
    /// Returns the number of bytes actually written.
    pub fn burn_all(&mut self, config: &ConfigRecordSet) -> EcuResult<usize> {
        let image = config.to_image();
        let mut written = self.update(0, &image[..SIGNATURE_OFFSET])?;
        written += self.burn_metadata(&image)?;
        log::info!("burned all pages, {} byte(s) changed", written);
        Ok(written)
    }

    fn holds_current_image(&mut self) -> EcuResult<bool> {
        let mut metadata = [0u8; METADATA_LEN];
        let address = self.address(SIGNATURE_OFFSET)?;
        self.storage.read(address, &mut metadata)?;
        Ok(metadata[0] == SIGNATURE
            && metadata[DATA_STRUCTURE_VERSION_OFFSET - SIGNATURE_OFFSET] == DATA_STRUCTURE_VERSION)
    }

    fn burn_metadata(&mut self, image: &[u8; IMAGE_LEN]) -> EcuResult<usize> {
        self.update(
            SIGNATURE_OFFSET,
            &image[SIGNATURE_OFFSET..=DATA_STRUCTURE_VERSION_OFFSET],
        )
    }

    fn address(&self, offset: usize) -> EcuResult<u16> {
        u16::try_from(offset)
            .ok()
            .and_then(|offset| self.base.checked_add(offset))
            .ok_or_else(|| {
                StorageError::OutOfBounds {
                    address: self.base,
                    len: IMAGE_LEN as u16,
                }
                .into()
            })
    }

    fn update(&mut self, offset: usize, data: &[u8]) -> EcuResult<usize> {
        let address = self.address(offset)?;
        self.storage.update(address, data)
    }

    /// The backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the backend
    pub fn into_inner(self) -> S {
        self.storage
    }
}

/// RAM-backed [`Storage`] of `N` bytes
///
/// Starts blank (every byte 0xFF, as erased EEPROM reads) and counts the
/// bytes written, which makes it suitable for host tests and simulators.
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
    bytes_written: usize,
}

impl<const N: usize> MemoryStorage<N> {
    /// Creates a blank medium
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; N],
            bytes_written: 0,
        }
    }

    /// Creates a medium holding `bytes`
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self {
            bytes,
            bytes_written: 0,
        }
    }

    /// Current contents
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Mutable contents, for simulating corruption
    pub fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// Total bytes written since creation
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    fn range(&self, address: u16, len: usize) -> EcuResult<core::ops::Range<usize>> {
        let start = usize::from(address);
        match start.checked_add(len) {
            Some(end) if end <= N => Ok(start..end),
            _ => Err(StorageError::OutOfBounds {
                address,
                len: u16::try_from(len).unwrap_or(u16::MAX),
            }
            .into()),
        }
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> EcuResult<()> {
        let range = self.range(address, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, address: u16, data: &[u8]) -> EcuResult<()> {
        let range = self.range(address, data.len())?;
        self.bytes[range].copy_from_slice(data);
        self.bytes_written += data.len();
        Ok(())
    }
}
