//! The complete configuration record and its persisted image

use super::layout::field_at;
use super::{
    ConfigPage1, ConfigPage2, ConfigPage3, DATA_STRUCTURE_VERSION, DATA_STRUCTURE_VERSION_OFFSET,
    FIRMWARE_VERSION, FIRMWARE_VERSION_OFFSET, IMAGE_LEN, PAGE_SIZE, PageId, SIGNATURE,
    SIGNATURE_OFFSET,
};
use crate::error::{ConfigError, EcuError, EcuResult};
use crate::traits::ConfigPage;

/// All three configuration pages plus the image metadata
///
/// Loaded once at boot, changed only by tuning writes, and persisted only on
/// an explicit burn. Control code reads the pages directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigRecordSet {
    /// Fuel and engine setup
    pub page1: ConfigPage1,
    /// Ignition, trigger and calibration curves
    pub page2: ConfigPage2,
    /// AFR and closed-loop control
    pub page3: ConfigPage3,
    firmware_version: u8,
}

/// Result of loading a stored image
///
/// Loading never fails: an unusable image yields the compiled-in defaults
/// and the reason they were substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// The configuration to run with
    pub config: ConfigRecordSet,
    /// Why defaults were substituted, if they were
    pub diagnostic: Option<EcuError>,
}

impl LoadOutcome {
    /// Returns true if the stored image was rejected
    pub const fn used_defaults(&self) -> bool {
        self.diagnostic.is_some()
    }
}

impl ConfigRecordSet {
    /// Compiled-in defaults for every page
    pub const DEFAULT: Self = Self {
        page1: ConfigPage1::DEFAULT,
        page2: ConfigPage2::DEFAULT,
        page3: ConfigPage3::DEFAULT,
        firmware_version: FIRMWARE_VERSION,
    };

    /// Checks an image's metadata and decodes its pages
    ///
    /// The signature is checked first, then the data structure version. No
    /// page is decoded unless both match. The firmware version is carried
    /// through unchecked.
    ///
    /// # Errors
    /// [`ConfigError::SignatureInvalid`] or [`ConfigError::VersionMismatch`].
    pub fn validate(image: &[u8; IMAGE_LEN]) -> EcuResult<Self> {
        let signature = image[SIGNATURE_OFFSET];
        if signature != SIGNATURE {
            return Err(ConfigError::SignatureInvalid { found: signature }.into());
        }

        let version = image[DATA_STRUCTURE_VERSION_OFFSET];
        if version != DATA_STRUCTURE_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: version,
                expected: DATA_STRUCTURE_VERSION,
            }
            .into());
        }

        Ok(Self {
            page1: decode_page(image),
            page2: decode_page(image),
            page3: decode_page(image),
            firmware_version: image[FIRMWARE_VERSION_OFFSET],
        })
    }

    /// Validates an image, falling back to defaults
    ///
    /// A rejected image is logged at warn level and reported in
    /// [`LoadOutcome::diagnostic`].
    ///
    /// # Example
    /// ```rust
    /// use ecucore::config::{ConfigRecordSet, IMAGE_LEN};
    ///
    /// // Blank EEPROM reads as 0xFF
    /// let outcome = ConfigRecordSet::load(&[0xFF; IMAGE_LEN]);
    /// assert!(outcome.used_defaults());
    /// assert_eq!(outcome.config, ConfigRecordSet::default());
    /// ```
    pub fn load(image: &[u8; IMAGE_LEN]) -> LoadOutcome {
        match Self::validate(image) {
            Ok(config) => LoadOutcome {
                config,
                diagnostic: None,
            },
            Err(error) => Self::fallback(error),
        }
    }

    pub(crate) fn fallback(error: EcuError) -> LoadOutcome {
        log::warn!("stored configuration rejected ({}), using defaults", error);
        LoadOutcome {
            config: Self::DEFAULT,
            diagnostic: Some(error),
        }
    }

    /// Encodes the pages and metadata as a persisted image
    ///
    /// The image always carries the current signature and data structure
    /// version, so it passes [`ConfigRecordSet::validate`].
    pub fn to_image(&self) -> [u8; IMAGE_LEN] {
        let mut image = [0u8; IMAGE_LEN];
        for page in PageId::ALL {
            let offset = page.image_offset();
            image[offset..offset + PAGE_SIZE].copy_from_slice(&self.read_page(page));
        }
        image[SIGNATURE_OFFSET] = SIGNATURE;
        image[FIRMWARE_VERSION_OFFSET] = self.firmware_version;
        image[DATA_STRUCTURE_VERSION_OFFSET] = DATA_STRUCTURE_VERSION;
        image
    }

    /// Firmware version recorded in the loaded image
    pub const fn firmware_version(&self) -> u8 {
        self.firmware_version
    }

    /// Records the running firmware's version, as done before a burn
    pub fn stamp_firmware_version(&mut self) {
        self.firmware_version = FIRMWARE_VERSION;
    }

    /// Wire bytes of one page
    pub fn read_page(&self, page: PageId) -> [u8; PAGE_SIZE] {
        match page {
            PageId::Fuel => self.page1.to_bytes(),
            PageId::Ignition => self.page2.to_bytes(),
            PageId::Afr => self.page3.to_bytes(),
        }
    }

    /// Replaces one page with wire bytes from the tuning tool
    pub fn write_page(&mut self, page: PageId, bytes: &[u8; PAGE_SIZE]) {
        match page {
            PageId::Fuel => self.page1 = ConfigPage1::from_bytes(bytes),
            PageId::Ignition => self.page2 = ConfigPage2::from_bytes(bytes),
            PageId::Afr => self.page3 = ConfigPage3::from_bytes(bytes),
        }
    }

    /// Overwrites `data.len()` bytes of one page starting at `offset`
    ///
    /// # Errors
    /// [`ConfigError::OffsetOutOfRange`] if the range leaves the page; the
    /// page is unchanged.
    pub fn patch(&mut self, page: PageId, offset: u16, data: &[u8]) -> EcuResult<()> {
        let range = page_range(offset, data.len())?;
        let mut bytes = self.read_page(page);
        bytes[range].copy_from_slice(data);
        self.write_page(page, &bytes);

        if let Some(field) = slot_at(page, usize::from(offset)) {
            log::trace!(
                "page {} patched at {} ({}), {} byte(s)",
                page.index(),
                offset,
                field.name,
                data.len()
            );
        }
        Ok(())
    }

    /// Copies `buf.len()` bytes of one page starting at `offset` into `buf`
    ///
    /// # Errors
    /// [`ConfigError::OffsetOutOfRange`] if the range leaves the page.
    pub fn read_range(&self, page: PageId, offset: u16, buf: &mut [u8]) -> EcuResult<()> {
        let range = page_range(offset, buf.len())?;
        buf.copy_from_slice(&self.read_page(page)[range]);
        Ok(())
    }
}

impl Default for ConfigRecordSet {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn decode_page<P: ConfigPage>(image: &[u8; IMAGE_LEN]) -> P {
    let offset = P::image_offset();
    let mut bytes = [0u8; PAGE_SIZE];
    bytes.copy_from_slice(&image[offset..offset + PAGE_SIZE]);
    P::from_bytes(&bytes)
}

fn page_range(offset: u16, len: usize) -> EcuResult<core::ops::Range<usize>> {
    let start = usize::from(offset);
    match start.checked_add(len) {
        Some(end) if end <= PAGE_SIZE => Ok(start..end),
        _ => Err(ConfigError::OffsetOutOfRange {
            offset,
            len: u16::try_from(len).unwrap_or(u16::MAX),
        }
        .into()),
    }
}

fn slot_at(page: PageId, offset: usize) -> Option<&'static super::layout::Field> {
    let fields = match page {
        PageId::Fuel => super::page1::slots::FIELDS,
        PageId::Ignition => super::page2::slots::FIELDS,
        PageId::Afr => super::page3::slots::FIELDS,
    };
    field_at(fields, offset)
}
