//! The calibration tables carried by configuration page 2

use super::shared::SharedCalibration;
use super::table::{CalibrationCurve, CalibrationTable};
use crate::config::ConfigPage2;
use crate::error::EcuResult;

/// Sensor channels with a stored calibration curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationChannel {
    /// Coolant temperature, stored as °C + 40
    Coolant,
    /// Intake air temperature, stored as °C + 40
    IntakeAir,
    /// Exhaust oxygen sensor, stored as AFR × 10
    Oxygen,
}

impl CalibrationChannel {
    /// Every channel, in page order
    pub const ALL: [Self; 3] = [Self::Coolant, Self::IntakeAir, Self::Oxygen];

    /// The curve for this channel in `page`
    pub fn curve(self, page: &ConfigPage2) -> &CalibrationCurve {
        match self {
            Self::Coolant => &page.clt_calibration,
            Self::IntakeAir => &page.iat_calibration,
            Self::Oxygen => &page.o2_calibration,
        }
    }
}

/// Coolant, intake air and oxygen tables
#[derive(Debug, Default)]
pub struct CalibrationSet {
    /// Coolant temperature table
    pub coolant: SharedCalibration,
    /// Intake air temperature table
    pub intake_air: SharedCalibration,
    /// Oxygen sensor table
    pub oxygen: SharedCalibration,
}

impl CalibrationSet {
    /// Builds every table from the curves in `page`
    pub fn from_page(page: &ConfigPage2) -> EcuResult<Self> {
        Ok(Self {
            coolant: SharedCalibration::new(page.clt_calibration.build()?),
            intake_air: SharedCalibration::new(page.iat_calibration.build()?),
            oxygen: SharedCalibration::new(page.o2_calibration.build()?),
        })
    }

    /// The shared table for `channel`
    pub fn table(&self, channel: CalibrationChannel) -> &SharedCalibration {
        match channel {
            CalibrationChannel::Coolant => &self.coolant,
            CalibrationChannel::IntakeAir => &self.intake_air,
            CalibrationChannel::Oxygen => &self.oxygen,
        }
    }

    /// Rebuilds one channel from a freshly tuned page
    ///
    /// The other channels are not touched. On error the channel keeps its
    /// current table.
    pub fn reload(&self, channel: CalibrationChannel, page: &ConfigPage2) -> EcuResult<()> {
        let table: CalibrationTable = channel.curve(page).build()?;
        self.table(channel).install(table);
        Ok(())
    }

    /// Rebuilds every channel from `page`
    ///
    /// All curves are built before any table is replaced, so a malformed
    /// curve leaves the whole set unchanged.
    pub fn reload_all(&self, page: &ConfigPage2) -> EcuResult<()> {
        let coolant = page.clt_calibration.build()?;
        let intake_air = page.iat_calibration.build()?;
        let oxygen = page.o2_calibration.build()?;
        self.coolant.install(coolant);
        self.intake_air.install(intake_air);
        self.oxygen.install(oxygen);
        Ok(())
    }
}
