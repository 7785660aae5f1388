//! Calibration table error types

use core::fmt;

/// Errors raised while building a calibration table from its bins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// No calibration points were supplied
    Empty,
    /// Raw values are not in ascending order
    Unordered {
        /// Index of the first point that breaks the ordering
        index: usize,
    },
    /// More points than a calibration curve can hold
    TooManyPoints {
        /// Number of points supplied
        count: usize,
    },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("calibration curve has no points"),
            Self::Unordered { index } => {
                write!(f, "calibration point {index} is below its predecessor")
            }
            Self::TooManyPoints { count } => {
                write!(f, "calibration curve has {count} points")
            }
        }
    }
}
