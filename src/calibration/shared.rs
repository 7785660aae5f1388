//! Calibration table shared with interrupt-context readers

use core::cell::RefCell;

use critical_section::Mutex;

use super::table::{CalibrationPoint, CalibrationTable};
use crate::error::EcuResult;
use crate::traits::CalibrationLookup;

/// A calibration table that may be read from any context and replaced from
/// the main loop
///
/// Replacement is a single swap inside a critical section. The new table is
/// built before the section opens, so a reader sees either the complete old
/// table or the complete new one.
pub struct SharedCalibration {
    table: Mutex<RefCell<CalibrationTable>>,
}

impl SharedCalibration {
    /// Creates a shared table with every entry set to `value`
    pub const fn filled(value: u8) -> Self {
        Self {
            table: Mutex::new(RefCell::new(CalibrationTable::filled(value))),
        }
    }

    /// Wraps an already-built table
    pub const fn new(table: CalibrationTable) -> Self {
        Self {
            table: Mutex::new(RefCell::new(table)),
        }
    }

    /// Calibrated value for a raw ADC sample
    pub fn lookup(&self, raw: u16) -> u8 {
        critical_section::with(|cs| self.table.borrow_ref(cs).lookup(raw))
    }

    /// Swaps in a complete table
    pub fn install(&self, table: CalibrationTable) {
        critical_section::with(|cs| {
            *self.table.borrow_ref_mut(cs) = table;
        });
    }

    /// Builds a table from `points` and swaps it in
    ///
    /// On error the current table stays in place.
    pub fn rebuild(&self, points: &[CalibrationPoint]) -> EcuResult<()> {
        let table = CalibrationTable::build(points)?;
        self.install(table);
        Ok(())
    }

    /// Copy of the current table
    pub fn snapshot(&self) -> CalibrationTable {
        critical_section::with(|cs| *self.table.borrow_ref(cs))
    }
}

impl Default for SharedCalibration {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl core::fmt::Debug for SharedCalibration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SharedCalibration")
            .field(&self.snapshot())
            .finish()
    }
}

impl CalibrationLookup for SharedCalibration {
    fn lookup(&self, raw: u16) -> u8 {
        SharedCalibration::lookup(self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COOLANT: SharedCalibration = SharedCalibration::filled(40);

    #[test]
    fn test_static_table() {
        assert_eq!(COOLANT.lookup(300), 40);
    }

    #[test]
    fn test_rebuild_swaps_whole_table() {
        let shared = SharedCalibration::default();
        shared
            .rebuild(&[CalibrationPoint::new(0, 0), CalibrationPoint::new(1023, 255)])
            .unwrap();
        assert_eq!(shared.lookup(512), 127);
        assert_eq!(shared.snapshot().entry(0), 0);
    }

    #[test]
    fn test_failed_rebuild_keeps_table() {
        let shared = SharedCalibration::filled(9);
        assert!(shared.rebuild(&[]).is_err());
        assert_eq!(shared.lookup(0), 9);
    }
}
