//! Core error types for ecucore
//!
//! This module defines the main error type used throughout the library.

use core::fmt;

use crate::error::{CalibrationError, ConfigError, StorageError};

/// Main error type for ecucore operations
///
/// No variant is ever produced on an interrupt-side path; every method that
/// interrupt handlers call is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcuError {
    /// Configuration page validation or addressing failure
    Config(ConfigError),
    /// Calibration table construction failure
    Calibration(CalibrationError),
    /// Persistent storage failure
    Storage(StorageError),
    /// A TPS sample carried a timestamp older than the current one
    TimestampRegression {
        /// Timestamp of the sample already recorded
        current: u32,
        /// Timestamp offered by the caller
        offered: u32,
    },
}

impl EcuError {
    /// Returns true if this is a recoverable error
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(error) => error.is_recoverable(),
            Self::Calibration(_) => true,
            Self::Storage(StorageError::OutOfBounds { .. } | StorageError::Misaligned { .. }) => {
                false
            }
            Self::Storage(_) => true,
            Self::TimestampRegression { .. } => true,
        }
    }

    /// Returns true if the error means defaults must replace persisted data
    pub const fn requires_defaults(&self) -> bool {
        match self {
            Self::Config(error) => error.is_guard_failure(),
            _ => false,
        }
    }

    /// Returns the error category as a string
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::Calibration(_) => "Calibration",
            Self::Storage(_) => "Storage",
            Self::TimestampRegression { .. } => "Status",
        }
    }
}

impl fmt::Display for EcuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config: {error}"),
            Self::Calibration(error) => write!(f, "calibration: {error}"),
            Self::Storage(error) => write!(f, "storage: {error}"),
            Self::TimestampRegression { current, offered } => {
                write!(f, "sample time {offered} precedes current sample at {current}")
            }
        }
    }
}

impl From<ConfigError> for EcuError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<CalibrationError> for EcuError {
    fn from(error: CalibrationError) -> Self {
        Self::Calibration(error)
    }
}

impl From<StorageError> for EcuError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

/// Result type for ecucore operations
pub type EcuResult<T> = Result<T, EcuError>;
