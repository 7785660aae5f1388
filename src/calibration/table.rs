//! Calibration table construction and lookup
//!
//! Tables are built by linear interpolation between ordered calibration
//! points. Outside the points' raw domain every entry holds the nearest end
//! point's value, so [`CalibrationTable::lookup`] never extrapolates.

use crate::error::{CalibrationError, EcuResult};
use crate::platform::ADC_MAX;
use crate::traits::CalibrationLookup;

/// Number of entries in every calibration table
pub const CALIBRATION_TABLE_SIZE: usize = 512;

const LAST_INDEX: u32 = CALIBRATION_TABLE_SIZE as u32 - 1;

const _: () = assert!(ADC_MAX as u32 >= LAST_INDEX);

/// Number of points in a stored calibration curve
pub const CURVE_POINTS: usize = 6;

/// One calibration bin: a raw ADC sample and the byte it calibrates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationPoint {
    /// Raw ADC sample (0-1023)
    pub raw: u16,
    /// Calibrated value at `raw`
    pub value: u8,
}

impl CalibrationPoint {
    /// Bytes a point occupies on the wire: `raw` little-endian, then `value`
    pub const WIRE_LEN: usize = 3;

    /// Creates a calibration point
    pub const fn new(raw: u16, value: u8) -> Self {
        Self { raw, value }
    }
}

/// Fixed-capacity calibration curve as carried in configuration page 2
///
/// Always holds [`CURVE_POINTS`] points. Shorter curves are padded by
/// repeating their last point, which adds no new segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationCurve {
    points: [CalibrationPoint; CURVE_POINTS],
}

impl CalibrationCurve {
    /// Bytes a curve occupies on the wire
    pub const WIRE_LEN: usize = CURVE_POINTS * CalibrationPoint::WIRE_LEN;

    /// Creates a curve from exactly [`CURVE_POINTS`] points
    pub const fn new(points: [CalibrationPoint; CURVE_POINTS]) -> Self {
        Self { points }
    }

    /// Creates a curve from up to [`CURVE_POINTS`] ordered points
    pub fn from_points(points: &[CalibrationPoint]) -> EcuResult<Self> {
        check_points(points)?;

        let last = points[points.len() - 1];
        let mut padded = [last; CURVE_POINTS];
        padded[..points.len()].copy_from_slice(points);
        Ok(Self { points: padded })
    }

    /// The curve's points
    pub fn points(&self) -> &[CalibrationPoint; CURVE_POINTS] {
        &self.points
    }

    /// Encodes the curve in wire order
    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        for (chunk, point) in out
            .chunks_exact_mut(CalibrationPoint::WIRE_LEN)
            .zip(self.points.iter())
        {
            chunk[..2].copy_from_slice(&point.raw.to_le_bytes());
            chunk[2] = point.value;
        }
        out
    }

    /// Decodes a curve from wire order
    ///
    /// Decoding is total; an unordered curve is reported when a table is
    /// built from it.
    pub fn from_wire(bytes: &[u8; Self::WIRE_LEN]) -> Self {
        let mut points = [CalibrationPoint::default(); CURVE_POINTS];
        for (point, chunk) in points
            .iter_mut()
            .zip(bytes.chunks_exact(CalibrationPoint::WIRE_LEN))
        {
            *point = CalibrationPoint::new(u16::from_le_bytes([chunk[0], chunk[1]]), chunk[2]);
        }
        Self { points }
    }

    /// Builds the lookup table for this curve
    pub fn build(&self) -> EcuResult<CalibrationTable> {
        CalibrationTable::build(&self.points)
    }
}

fn check_points(points: &[CalibrationPoint]) -> EcuResult<()> {
    if points.is_empty() {
        return Err(CalibrationError::Empty.into());
    }
    if points.len() > CURVE_POINTS {
        return Err(CalibrationError::TooManyPoints {
            count: points.len(),
        }
        .into());
    }
    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].raw < pair[0].raw {
            return Err(CalibrationError::Unordered { index: index + 1 }.into());
        }
    }
    Ok(())
}

/// A 512-entry raw-ADC to calibrated-byte lookup table
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CalibrationTable {
    entries: [u8; CALIBRATION_TABLE_SIZE],
}

impl CalibrationTable {
    /// Creates a table with every entry set to `value`
    pub const fn filled(value: u8) -> Self {
        Self {
            entries: [value; CALIBRATION_TABLE_SIZE],
        }
    }

    /// Builds a table from ascending calibration points
    ///
    /// Entries between two points are linearly interpolated; entries below the
    /// first point or above the last hold that point's value.
    ///
    /// # Errors
    /// [`CalibrationError::Empty`] for no points,
    /// [`CalibrationError::TooManyPoints`] for more than [`CURVE_POINTS`], and
    /// [`CalibrationError::Unordered`] if a point's raw value is below its
    /// predecessor's.
    ///
    /// # Example
    /// ```rust
    /// use ecucore::calibration::{CalibrationPoint, CalibrationTable};
    ///
    /// let table = CalibrationTable::build(&[
    ///     CalibrationPoint::new(0, 0),
    ///     CalibrationPoint::new(1023, 255),
    /// ])?;
    /// assert_eq!(table.lookup(512), 127);
    /// # Ok::<(), ecucore::error::EcuError>(())
    /// ```
    pub fn build(points: &[CalibrationPoint]) -> EcuResult<Self> {
        check_points(points)?;

        let mut entries = [0u8; CALIBRATION_TABLE_SIZE];
        for (index, entry) in entries.iter_mut().enumerate() {
            *entry = interpolate(points, Self::raw_at(index));
        }

        #[cfg(feature = "diagnostics")]
        log_clamped_regions(points);

        Ok(Self { entries })
    }

    /// Replaces this table with one built from `points`
    ///
    /// On error the table is left untouched.
    pub fn rebuild(&mut self, points: &[CalibrationPoint]) -> EcuResult<()> {
        *self = Self::build(points)?;
        Ok(())
    }

    /// Calibrated value for a raw ADC sample
    ///
    /// Samples above the table's domain read the last entry.
    pub fn lookup(&self, raw: u16) -> u8 {
        self.entry(Self::index_of(raw))
    }

    /// Raw ADC sample an entry was computed at
    ///
    /// The first entry stands for raw 0 and the last for [`ADC_MAX`], so
    /// both ends of the ADC range land exactly on an entry.
    pub const fn raw_at(index: usize) -> u16 {
        let index = if index > LAST_INDEX as usize {
            LAST_INDEX
        } else {
            index as u32
        };
        (index * ADC_MAX as u32 / LAST_INDEX) as u16
    }

    /// Entry nearest to a raw ADC sample, saturating to the last entry
    ///
    /// Inverse of [`Self::raw_at`]: `index_of(raw_at(i)) == i`.
    pub const fn index_of(raw: u16) -> usize {
        let index = (raw as u32 * LAST_INDEX + LAST_INDEX) / ADC_MAX as u32;
        if index > LAST_INDEX {
            LAST_INDEX as usize
        } else {
            index as usize
        }
    }

    /// Entry at `index`, saturating to the last entry
    pub fn entry(&self, index: usize) -> u8 {
        self.entries[index.min(CALIBRATION_TABLE_SIZE - 1)]
    }

    /// All entries
    pub fn entries(&self) -> &[u8; CALIBRATION_TABLE_SIZE] {
        &self.entries
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl core::fmt::Debug for CalibrationTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CalibrationTable")
            .field("first", &self.entries[0])
            .field("last", &self.entries[CALIBRATION_TABLE_SIZE - 1])
            .finish_non_exhaustive()
    }
}

impl CalibrationLookup for CalibrationTable {
    fn lookup(&self, raw: u16) -> u8 {
        CalibrationTable::lookup(self, raw)
    }
}

/// `points` must be non-empty and ascending by raw value
fn interpolate(points: &[CalibrationPoint], raw: u16) -> u8 {
    let first = points[0];
    let last = points[points.len() - 1];
    if raw <= first.raw {
        return first.value;
    }
    if raw >= last.raw {
        return last.value;
    }

    // Every window reached has lo.raw <= raw, so a matching window has a
    // non-zero span.
    for pair in points.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if raw < hi.raw {
            let span = i32::from(hi.raw - lo.raw);
            let offset = i32::from(raw - lo.raw);
            let rise = i32::from(hi.value) - i32::from(lo.value);
            return (i32::from(lo.value) + rise * offset / span) as u8;
        }
    }
    last.value
}

#[cfg(feature = "diagnostics")]
fn log_clamped_regions(points: &[CalibrationPoint]) {
    let first = points[0];
    let last = points[points.len() - 1];
    let below = (0..CALIBRATION_TABLE_SIZE)
        .filter(|&index| CalibrationTable::raw_at(index) < first.raw)
        .count();
    let above = (0..CALIBRATION_TABLE_SIZE)
        .filter(|&index| CalibrationTable::raw_at(index) > last.raw)
        .count();
    if below > 0 || above > 0 {
        log::debug!(
            "calibration clamped {} entries to {} below raw {} and {} entries to {} above raw {}",
            below,
            first.value,
            first.raw,
            above,
            last.value,
            last.raw
        );
    }
}
