//! Core traits module
//!
//! The seams between this crate and its collaborators: the page codec the
//! tuning link and the record set share, the persistent storage backend, and
//! calibrated lookups consumed by the live status.

pub mod calibration;
pub mod page;
pub mod storage;

// Re-export main traits
pub use calibration::CalibrationLookup;
pub use page::ConfigPage;
pub use storage::Storage;
