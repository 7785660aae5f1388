//! Configuration page 3: AFR targets and closed-loop oxygen control

use super::PAGE_SIZE;
use super::PageId;
use super::bits::bit_group;
use super::page2::VOLTAGE_POINTS;
use crate::traits::ConfigPage;

/// Wire slots of page 3
pub mod slots {
    use crate::config::layout::page_layout;

    page_layout! {
        /// Closed-loop algorithm and sensor type
        EGO @ 0: 1,
        /// Proportional gain
        EGO_KP @ 1: 1,
        /// Integral gain
        EGO_KI @ 2: 1,
        /// Derivative gain
        EGO_KD @ 3: 1,
        /// Coolant above which closed loop may run, °C + 40
        EGO_TEMP @ 4: 1,
        /// Ignition events between corrections
        EGO_COUNT @ 5: 1,
        /// Correction step percentage
        EGO_DELTA @ 6: 1,
        /// Maximum correction percentage
        EGO_LIMIT @ 7: 1,
        /// Lowest trusted AFR reading
        EGO_MIN @ 8: 1,
        /// Highest trusted AFR reading
        EGO_MAX @ 9: 1,
        /// Seconds after start before closed loop engages
        EGO_START_DELAY @ 10: 1,
        /// RPM above which closed loop may run, in hundreds
        EGO_RPM @ 11: 1,
        /// TPS above which closed loop is suspended
        EGO_TPS_MAX @ 12: 1,
        /// Load above which closed loop is suspended
        EGO_LOAD_MAX @ 13: 1,
        /// Load below which closed loop is suspended
        EGO_LOAD_MIN @ 14: 1,
        /// Battery voltage bins, volts × 10
        VOLTAGE_CORRECTION_BINS @ 15: 6,
        /// Injector dead-time correction per voltage bin
        INJ_VOLTAGE_CORRECTION_VALUES @ 21: 6,
        /// Reserved
        RESERVED_27 @ 27: 101,
    }
}

bit_group! {
    /// Closed-loop algorithm and oxygen sensor type
    ///
    /// The top four bits are spare.
    Ego, budget: 4, {
        /// 0 = simple, 1 = PID, 2 = off
        ego_algorithm / set_ego_algorithm: 0, 2;
        /// 0 = none, 1 = narrowband, 2 = wideband
        ego_type / set_ego_type: 2, 2;
    }
}

/// AFR and closed-loop control page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigPage3 {
    /// Closed-loop algorithm and sensor type
    pub ego: Ego,
    /// Proportional gain
    pub ego_kp: u8,
    /// Integral gain
    pub ego_ki: u8,
    /// Derivative gain
    pub ego_kd: u8,
    /// Coolant above which closed loop may run, °C + 40
    pub ego_temp: u8,
    /// Ignition events between corrections
    pub ego_count: u8,
    /// Correction step percentage
    pub ego_delta: u8,
    /// Maximum correction percentage
    pub ego_limit: u8,
    /// Lowest trusted AFR reading, AFR × 10
    pub ego_min: u8,
    /// Highest trusted AFR reading, AFR × 10
    pub ego_max: u8,
    /// Seconds after start before closed loop engages
    pub ego_start_delay: u8,
    /// RPM above which closed loop may run, in hundreds
    pub ego_rpm: u8,
    /// TPS above which closed loop is suspended
    pub ego_tps_max: u8,
    /// Load above which closed loop is suspended
    pub ego_load_max: u8,
    /// Load below which closed loop is suspended
    pub ego_load_min: u8,
    /// Battery voltage bins, volts × 10
    pub voltage_correction_bins: [u8; VOLTAGE_POINTS],
    /// Injector dead-time correction percentage per voltage bin
    pub inj_voltage_correction_values: [u8; VOLTAGE_POINTS],
    reserved_27: [u8; 101],
}

impl ConfigPage3 {
    /// Compiled-in defaults: simple closed loop on a narrowband sensor
    pub const DEFAULT: Self = Self {
        // simple algorithm, narrowband sensor
        ego: Ego::from_bits(0b0100),
        ego_kp: 100,
        ego_ki: 20,
        ego_kd: 0,
        ego_temp: 110,
        ego_count: 4,
        ego_delta: 1,
        ego_limit: 15,
        ego_min: 100,
        ego_max: 180,
        ego_start_delay: 30,
        ego_rpm: 15,
        ego_tps_max: 70,
        ego_load_max: 90,
        ego_load_min: 20,
        voltage_correction_bins: [60, 80, 100, 120, 140, 160],
        inj_voltage_correction_values: [147, 130, 113, 104, 100, 95],
        reserved_27: [0; 101],
    };
}

impl Default for ConfigPage3 {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ConfigPage for ConfigPage3 {
    const ID: PageId = PageId::Afr;

    fn to_bytes(&self) -> [u8; PAGE_SIZE] {
        let mut page = [0u8; PAGE_SIZE];
        slots::EGO.put_byte(&mut page, self.ego.bits());
        slots::EGO_KP.put_byte(&mut page, self.ego_kp);
        slots::EGO_KI.put_byte(&mut page, self.ego_ki);
        slots::EGO_KD.put_byte(&mut page, self.ego_kd);
        slots::EGO_TEMP.put_byte(&mut page, self.ego_temp);
        slots::EGO_COUNT.put_byte(&mut page, self.ego_count);
        slots::EGO_DELTA.put_byte(&mut page, self.ego_delta);
        slots::EGO_LIMIT.put_byte(&mut page, self.ego_limit);
        slots::EGO_MIN.put_byte(&mut page, self.ego_min);
        slots::EGO_MAX.put_byte(&mut page, self.ego_max);
        slots::EGO_START_DELAY.put_byte(&mut page, self.ego_start_delay);
        slots::EGO_RPM.put_byte(&mut page, self.ego_rpm);
        slots::EGO_TPS_MAX.put_byte(&mut page, self.ego_tps_max);
        slots::EGO_LOAD_MAX.put_byte(&mut page, self.ego_load_max);
        slots::EGO_LOAD_MIN.put_byte(&mut page, self.ego_load_min);
        slots::VOLTAGE_CORRECTION_BINS.put_array(&mut page, &self.voltage_correction_bins);
        slots::INJ_VOLTAGE_CORRECTION_VALUES
            .put_array(&mut page, &self.inj_voltage_correction_values);
        slots::RESERVED_27.put_array(&mut page, &self.reserved_27);
        page
    }

    fn from_bytes(page: &[u8; PAGE_SIZE]) -> Self {
        Self {
            ego: Ego::from_bits(slots::EGO.byte(page)),
            ego_kp: slots::EGO_KP.byte(page),
            ego_ki: slots::EGO_KI.byte(page),
            ego_kd: slots::EGO_KD.byte(page),
            ego_temp: slots::EGO_TEMP.byte(page),
            ego_count: slots::EGO_COUNT.byte(page),
            ego_delta: slots::EGO_DELTA.byte(page),
            ego_limit: slots::EGO_LIMIT.byte(page),
            ego_min: slots::EGO_MIN.byte(page),
            ego_max: slots::EGO_MAX.byte(page),
            ego_start_delay: slots::EGO_START_DELAY.byte(page),
            ego_rpm: slots::EGO_RPM.byte(page),
            ego_tps_max: slots::EGO_TPS_MAX.byte(page),
            ego_load_max: slots::EGO_LOAD_MAX.byte(page),
            ego_load_min: slots::EGO_LOAD_MIN.byte(page),
            voltage_correction_bins: slots::VOLTAGE_CORRECTION_BINS.array(page),
            inj_voltage_correction_values: slots::INJ_VOLTAGE_CORRECTION_VALUES.array(page),
            reserved_27: slots::RESERVED_27.array(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ego() {
        let page = ConfigPage3::default();
        assert_eq!(page.ego.ego_algorithm(), 0);
        assert_eq!(page.ego.ego_type(), 1);
        assert_eq!(page.to_bytes()[0], 0b0100);
    }

    #[test]
    fn test_spare_ego_bits_survive() {
        let mut bytes = ConfigPage3::default().to_bytes();
        bytes[0] = 0b1010_0110;
        let mut page = ConfigPage3::from_bytes(&bytes);
        assert_eq!(page.ego.ego_algorithm(), 0b10);
        assert_eq!(page.ego.ego_type(), 0b01);

        page.ego.set_ego_type(2);
        assert_eq!(page.to_bytes()[0], 0b1010_1010);
    }

    #[test]
    fn test_voltage_slots() {
        let bytes = ConfigPage3::default().to_bytes();
        assert_eq!(&bytes[15..21], &[60, 80, 100, 120, 140, 160]);
        assert_eq!(&bytes[21..27], &[147, 130, 113, 104, 100, 95]);
        assert!(bytes[27..].iter().all(|&b| b == 0));
    }
}
