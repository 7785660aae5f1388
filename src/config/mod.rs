//! Tunable configuration pages and their persisted record
//!
//! Three 128-byte pages hold every tunable engine parameter:
//!
//! | Page | Type | Contents |
//! |------|------|----------|
//! | 1 | [`ConfigPage1`] | fuel, enrichment, engine geometry, display |
//! | 2 | [`ConfigPage2`] | ignition, dwell, trigger wheel, sensor calibration curves |
//! | 3 | [`ConfigPage3`] | AFR and closed-loop oxygen control, voltage correction |
//!
//! Each page's wire form comes from an explicit offset table in its module.
//! The persisted image appends three metadata bytes to the pages:
//!
//! ```text
//! [page 1]        0..128
//! [page 2]      128..256
//! [page 3]      256..384
//! [signature]         384
//! [firmware version]  385
//! [data structure]    386
//! ```

pub mod bits;
pub mod layout;
pub mod page1;
pub mod page2;
pub mod page3;
pub mod record;
pub mod store;

#[cfg(feature = "serde")]
mod wire;

// Re-export main types
pub use page1::ConfigPage1;
pub use page2::ConfigPage2;
pub use page3::ConfigPage3;
pub use record::{ConfigRecordSet, LoadOutcome};
pub use store::{ConfigStore, MemoryStorage};

use crate::error::{ConfigError, EcuResult};

/// Marker byte identifying a compatible stored configuration
pub const SIGNATURE: u8 = 20;

/// Firmware version stamped into every burned image
pub const FIRMWARE_VERSION: u8 = 20;

/// Revision of the page layouts; a stored image with another revision is
/// discarded in favour of defaults
pub const DATA_STRUCTURE_VERSION: u8 = 2;

/// Size of every configuration page in bytes
pub const PAGE_SIZE: usize = 128;

/// Number of configuration pages
pub const PAGE_COUNT: usize = 3;

/// Image offset of the signature byte
pub const SIGNATURE_OFFSET: usize = PAGE_COUNT * PAGE_SIZE;

/// Image offset of the firmware version byte
pub const FIRMWARE_VERSION_OFFSET: usize = SIGNATURE_OFFSET + 1;

/// Image offset of the data structure version byte
pub const DATA_STRUCTURE_VERSION_OFFSET: usize = SIGNATURE_OFFSET + 2;

/// Total size of the persisted image in bytes
pub const IMAGE_LEN: usize = DATA_STRUCTURE_VERSION_OFFSET + 1;

/// Page numbers used by the tuning link and the stored image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PageId {
    /// Fuel and engine setup
    Fuel = 1,
    /// Ignition, trigger and calibration curves
    Ignition = 2,
    /// AFR and closed-loop control
    Afr = 3,
}

impl PageId {
    /// Every page, in image order
    pub const ALL: [Self; PAGE_COUNT] = [Self::Fuel, Self::Ignition, Self::Afr];

    /// Page number as sent on the tuning link (1-3)
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a page by its tuning-link number
    ///
    /// # Errors
    /// [`ConfigError::InvalidPage`] for any number outside 1-3.
    pub fn from_index(index: u8) -> EcuResult<Self> {
        match index {
            1 => Ok(Self::Fuel),
            2 => Ok(Self::Ignition),
            3 => Ok(Self::Afr),
            page => Err(ConfigError::InvalidPage { page }.into()),
        }
    }

    /// Offset of the page inside the persisted image
    pub const fn image_offset(self) -> usize {
        (self as usize - 1) * PAGE_SIZE
    }
}

impl TryFrom<u8> for PageId {
    type Error = crate::error::EcuError;

    fn try_from(index: u8) -> EcuResult<Self> {
        Self::from_index(index)
    }
}
