//! Calibrated lookup trait definition

/// A raw-ADC to calibrated-byte mapping
///
/// Implemented by plain and shared calibration tables so sensor updates can
/// accept either.
pub trait CalibrationLookup {
    /// Calibrated value for a raw ADC sample
    ///
    /// Must be total: every raw value maps to some byte.
    fn lookup(&self, raw: u16) -> u8;
}

impl<T: CalibrationLookup + ?Sized> CalibrationLookup for &T {
    fn lookup(&self, raw: u16) -> u8 {
        (**self).lookup(raw)
    }
}
