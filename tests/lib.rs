//! Common utilities and shared code for property-based testing of ecucore
//!
//! This module provides:
//! - Proptest configuration for different test scenarios
//! - Generators for page bytes, calibration points and tuning writes
//! - A plain byte model of the tuning surface to check the record set against

#![allow(dead_code)]
#![allow(special_module_name)]
#![allow(unused)]

use ecucore::calibration::{CURVE_POINTS, CalibrationPoint};
use ecucore::config::{IMAGE_LEN, PAGE_COUNT, PAGE_SIZE};
use ecucore::prelude::*;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

/// Standard proptest configuration for page and table properties
pub fn page_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 100,
        timeout: 2000,
        ..ProptestConfig::default()
    }
}

/// Configuration for tests that spawn threads (fewer cases, longer timeout)
pub fn concurrent_config() -> ProptestConfig {
    ProptestConfig {
        cases: 16,
        max_shrink_iters: 20,
        timeout: 5000,
        ..ProptestConfig::default()
    }
}

/// Configuration for storage round trips
pub fn storage_config() -> ProptestConfig {
    ProptestConfig {
        cases: 32,
        max_shrink_iters: 50,
        timeout: 5000,
        ..ProptestConfig::default()
    }
}

/// Arbitrary page wire bytes
pub fn page_bytes_strategy() -> impl Strategy<Value = [u8; PAGE_SIZE]> {
    prop::collection::vec(any::<u8>(), PAGE_SIZE).prop_map(|bytes| {
        let mut page = [0u8; PAGE_SIZE];
        page.copy_from_slice(&bytes);
        page
    })
}

/// Arbitrary pages for all three slots
pub fn pages_strategy() -> impl Strategy<Value = [[u8; PAGE_SIZE]; PAGE_COUNT]> {
    (page_bytes_strategy(), page_bytes_strategy(), page_bytes_strategy())
        .prop_map(|(a, b, c)| [a, b, c])
}

/// Raw ADC samples, including values beyond 10 bits
pub fn raw_sample_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![0u16..1024, any::<u16>()]
}

/// One to six calibration points in ascending raw order
pub fn calibration_points_strategy() -> impl Strategy<Value = Vec<CalibrationPoint>> {
    prop::collection::vec((0u16..1024, any::<u8>()), 1..=CURVE_POINTS).prop_map(|mut pairs| {
        pairs.sort_by_key(|&(raw, _)| raw);
        pairs
            .into_iter()
            .map(|(raw, value)| CalibrationPoint::new(raw, value))
            .collect()
    })
}

/// A write the tuning tool can issue
#[derive(Debug, Clone, Arbitrary)]
pub enum TuningWrite {
    /// Overwrite part of a page
    Patch {
        #[proptest(strategy = "1u8..=3")]
        page: u8,
        #[proptest(strategy = "0u16..140")]
        offset: u16,
        #[proptest(strategy = "prop::collection::vec(any::<u8>(), 0..12)")]
        data: Vec<u8>,
    },
    /// Replace a whole page with one repeated byte
    Fill {
        #[proptest(strategy = "1u8..=3")]
        page: u8,
        value: u8,
    },
}

/// Byte-for-byte model of the three pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    pub pages: [[u8; PAGE_SIZE]; PAGE_COUNT],
}

impl PageModel {
    pub fn from_config(config: &ConfigRecordSet) -> Self {
        Self {
            pages: PageId::ALL.map(|page| config.read_page(page)),
        }
    }

    /// Applies a write; returns false if the record set must reject it
    pub fn apply(&mut self, write: &TuningWrite) -> bool {
        match write {
            TuningWrite::Patch { page, offset, data } => {
                let start = usize::from(*offset);
                let end = start + data.len();
                if end > PAGE_SIZE {
                    return false;
                }
                self.pages[usize::from(*page) - 1][start..end].copy_from_slice(data);
                true
            }
            TuningWrite::Fill { page, value } => {
                self.pages[usize::from(*page) - 1] = [*value; PAGE_SIZE];
                true
            }
        }
    }
}

/// Applies a write to the record set
pub fn apply_write(config: &mut ConfigRecordSet, write: &TuningWrite) -> EcuResult<()> {
    match write {
        TuningWrite::Patch { page, offset, data } => {
            config.patch(PageId::from_index(*page)?, *offset, data)
        }
        TuningWrite::Fill { page, value } => {
            config.write_page(PageId::from_index(*page)?, &[*value; PAGE_SIZE]);
            Ok(())
        }
    }
}

/// A valid image carrying the given pages
pub fn image_with_pages(pages: &[[u8; PAGE_SIZE]; PAGE_COUNT]) -> [u8; IMAGE_LEN] {
    let mut config = ConfigRecordSet::default();
    for (page, bytes) in PageId::ALL.iter().zip(pages.iter()) {
        config.write_page(*page, bytes);
    }
    config.to_image()
}
