//! Property-based tests for configuration pages and the record set
//!
//! This module tests the wire-format properties the tuning tool relies on:
//! - Decoding then encoding any page reproduces its bytes exactly
//! - A valid image survives validate -> to_image unchanged
//! - Guard bytes are checked signature first, then version
//! - Tuning writes behave like plain byte writes on a 128-byte page

#![allow(special_module_name)]

use ecucore::config::{
    ConfigPage1, ConfigPage2, ConfigPage3, DATA_STRUCTURE_VERSION, DATA_STRUCTURE_VERSION_OFFSET,
    FIRMWARE_VERSION_OFFSET, IMAGE_LEN, PAGE_SIZE, SIGNATURE, SIGNATURE_OFFSET,
};
use ecucore::error::{ConfigError, EcuError};
use ecucore::prelude::*;
use proptest::prelude::*;

mod lib;
use lib::*;

proptest! {
    #![proptest_config(page_config())]

    /// Every byte pattern decodes, and re-encoding is lossless
    #[test]
    fn page_bytes_round_trip(bytes in page_bytes_strategy()) {
        prop_assert_eq!(ConfigPage1::from_bytes(&bytes).to_bytes(), bytes);
        prop_assert_eq!(ConfigPage2::from_bytes(&bytes).to_bytes(), bytes);
        prop_assert_eq!(ConfigPage3::from_bytes(&bytes).to_bytes(), bytes);
    }

    /// Pages written into an image come back field for field
    #[test]
    fn image_validates_to_same_pages(pages in pages_strategy()) {
        let image = image_with_pages(&pages);
        let config = ConfigRecordSet::validate(&image).unwrap();

        prop_assert_eq!(config.page1, ConfigPage1::from_bytes(&pages[0]));
        prop_assert_eq!(config.page2, ConfigPage2::from_bytes(&pages[1]));
        prop_assert_eq!(config.page3, ConfigPage3::from_bytes(&pages[2]));
        prop_assert_eq!(config.to_image(), image);
    }

    /// A wrong signature is rejected whatever the version byte says
    #[test]
    fn bad_signature_always_rejected(
        pages in pages_strategy(),
        signature in any::<u8>().prop_filter("not the signature", |s| *s != SIGNATURE),
        version in any::<u8>(),
    ) {
        let mut image = image_with_pages(&pages);
        image[SIGNATURE_OFFSET] = signature;
        image[DATA_STRUCTURE_VERSION_OFFSET] = version;

        prop_assert_eq!(
            ConfigRecordSet::validate(&image),
            Err(EcuError::Config(ConfigError::SignatureInvalid { found: signature }))
        );

        let outcome = ConfigRecordSet::load(&image);
        prop_assert!(outcome.used_defaults());
        prop_assert_eq!(outcome.config, ConfigRecordSet::default());
    }

    /// A right signature with any other layout version is rejected
    #[test]
    fn stale_version_rejected(
        version in any::<u8>().prop_filter("not current", |v| *v != DATA_STRUCTURE_VERSION),
    ) {
        let mut image = ConfigRecordSet::default().to_image();
        image[DATA_STRUCTURE_VERSION_OFFSET] = version;
        prop_assert_eq!(
            ConfigRecordSet::validate(&image),
            Err(EcuError::Config(ConfigError::VersionMismatch {
                found: version,
                expected: DATA_STRUCTURE_VERSION,
            }))
        );
    }

    /// Patches and whole-page writes match a plain byte model
    #[test]
    fn tuning_writes_match_byte_model(writes in prop::collection::vec(any::<TuningWrite>(), 0..24)) {
        let mut config = ConfigRecordSet::default();
        let mut model = PageModel::from_config(&config);

        for write in &writes {
            let accepted = model.apply(write);
            let result = apply_write(&mut config, write);
            prop_assert_eq!(result.is_ok(), accepted);
            if let Err(error) = result {
                let is_range_error = matches!(error, EcuError::Config(ConfigError::OffsetOutOfRange { .. }));
                prop_assert!(is_range_error);
            }
        }

        prop_assert_eq!(PageModel::from_config(&config), model);
    }

    /// read_range returns exactly the bytes patch wrote
    #[test]
    fn patch_then_read_range(
        page in 1u8..=3,
        offset in 0u16..128,
        data in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let page = PageId::from_index(page).unwrap();
        let mut config = ConfigRecordSet::default();
        let fits = usize::from(offset) + data.len() <= PAGE_SIZE;

        prop_assert_eq!(config.patch(page, offset, &data).is_ok(), fits);
        if fits {
            let mut out = vec![0u8; data.len()];
            config.read_range(page, offset, &mut out).unwrap();
            prop_assert_eq!(out, data);
        }
    }
}

#[test]
fn test_page_index_guard() {
    assert!(PageId::from_index(0).is_err());
    assert!(PageId::from_index(4).is_err());
    assert_eq!(PageId::from_index(2), Ok(PageId::Ignition));
}

#[test]
fn test_default_image_metadata() {
    let image = ConfigRecordSet::default().to_image();
    assert_eq!(image.len(), IMAGE_LEN);
    assert_eq!(image[SIGNATURE_OFFSET], 20);
    assert_eq!(image[FIRMWARE_VERSION_OFFSET], 20);
    assert_eq!(image[DATA_STRUCTURE_VERSION_OFFSET], 2);
}

#[test]
fn test_documented_offsets() {
    let mut config = ConfigRecordSet::default();
    config.page1.req_fuel = 0x11;
    config.page1.engine_a.set_n_cylinders(6);
    config.page1.engine_c.set_injection_timing(0b11);
    config.page2.hard_rev_lim = 0x22;
    config.page2.dwell_limit = 0x33;
    config.page3.ego_load_min = 0x44;

    let image = config.to_image();
    assert_eq!(image[26], 0x11);
    assert_eq!(image[36] >> 4, 6);
    assert_eq!((image[38] >> 4) & 0b11, 0b11);
    assert_eq!(image[128 + 22], 0x22);
    assert_eq!(image[128 + 41], 0x33);
    assert_eq!(image[256 + 14], 0x44);
}

#[test]
fn test_unused_bits_preserved_through_setters() {
    let mut bytes = ConfigPage1::default().to_bytes();
    bytes[38] = 0b1100_0000;
    let mut page = ConfigPage1::from_bytes(&bytes);
    page.engine_c.set_algorithm(1);
    page.engine_c.set_baro_corr(1);
    assert_eq!(page.to_bytes()[38], 0b1100_1100);
}
