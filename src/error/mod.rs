//! Error handling module for ecucore
//!
//! This module provides the error taxonomy for configuration loading, calibration
//! table construction, persistent storage access and live-status bookkeeping.

pub mod calibration;
pub mod config;
pub mod storage;
pub mod types;

// Re-export main types
pub use calibration::CalibrationError;
pub use config::ConfigError;
pub use storage::StorageError;
pub use types::{EcuError, EcuResult};
