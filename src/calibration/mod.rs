//! Sensor calibration tables
//!
//! Each analog channel owns a 512-entry table mapping a raw 10-bit ADC sample
//! (halved to the table index) to a calibrated byte. Tables are generated from
//! a short curve of calibration points carried in configuration page 2 and
//! are always regenerated whole.

pub mod set;
pub mod shared;
pub mod table;
pub mod temperature;

// Re-export main types
pub use set::{CalibrationChannel, CalibrationSet};
pub use shared::SharedCalibration;
pub use table::{
    CALIBRATION_TABLE_SIZE, CURVE_POINTS, CalibrationCurve, CalibrationPoint, CalibrationTable,
};
pub use temperature::TEMPERATURE_OFFSET;
