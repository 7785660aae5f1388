//! Configuration page 2: ignition, trigger wheel and sensor calibration

use super::PAGE_SIZE;
use super::PageId;
use super::bits::bit_group;
use crate::calibration::{CalibrationCurve, CalibrationPoint, CURVE_POINTS};
use crate::traits::ConfigPage;

/// Wire slots of page 2
pub mod slots {
    use crate::config::layout::page_layout;

    page_layout! {
        /// Angle between the trigger tooth and TDC
        TRIGGER_ANGLE @ 0: 1,
        /// Fixed timing override, 0 = off
        FIX_ANGLE @ 1: 1,
        /// Timing trim
        TRIM @ 2: 1,
        /// Advance while cranking
        CRANK_ANGLE @ 3: 1,
        /// Ignition hold-off
        IGN_HOLD @ 4: 1,
        /// Trigger options
        TRIGGER @ 5: 1,
        /// Idle advance
        IDLE_ADV @ 6: 1,
        /// TPS below which idle advance applies
        IDLE_ADV_TPS @ 7: 1,
        /// RPM below which idle advance applies, in hundreds
        IDLE_ADV_RPM @ 8: 1,
        /// Coolant above which idle advance applies, °C + 40
        IDLE_ADV_CLT @ 9: 1,
        /// Delay before idle advance engages
        IDLE_DELAY_TIME @ 10: 1,
        /// Staging cycles
        STG_CYCLES @ 11: 1,
        /// Continuous dwell flag
        DWELL_CONT @ 12: 1,
        /// Dwell while cranking
        DWELL_CRANK @ 13: 1,
        /// Dwell while running
        DWELL_RUN @ 14: 1,
        /// Trigger wheel tooth count
        TRIGGER_TEETH @ 15: 1,
        /// Missing teeth on the trigger wheel
        TRIGGER_MISSING_TEETH @ 16: 1,
        /// RPM below which the engine is cranking, in hundreds
        CRANK_RPM @ 17: 1,
        /// TPS above which cranking fuel is cut
        FLOOD_CLEAR @ 18: 1,
        /// Soft rev limit, in hundreds
        SOFT_REV_LIM @ 19: 1,
        /// Timing at the soft rev limit
        SOFT_LIM_RETARD @ 20: 1,
        /// Seconds allowed at the soft rev limit
        SOFT_LIM_MAX @ 21: 1,
        /// Hard rev limit, in hundreds
        HARD_REV_LIM @ 22: 1,
        /// Acceleration enrichment TPS-rate bins
        TAE_BINS @ 23: 4,
        /// Acceleration enrichment amounts
        TAE_VALUES @ 27: 4,
        /// Warm-up enrichment temperature bins, °C + 40
        WUE_BINS @ 31: 10,
        /// Maximum dwell
        DWELL_LIMIT @ 41: 1,
        /// Dwell correction per battery voltage bin
        DWELL_CORRECTION_VALUES @ 42: 6,
        /// Coolant sensor calibration curve
        CLT_CALIBRATION @ 48: 18,
        /// Intake air sensor calibration curve
        IAT_CALIBRATION @ 66: 18,
        /// Oxygen sensor calibration curve
        O2_CALIBRATION @ 84: 18,
        /// Reserved
        RESERVED_102 @ 102: 26,
    }
}

/// Number of acceleration enrichment bins
pub const TAE_POINTS: usize = 4;

/// Number of warm-up enrichment temperature bins
pub const WUE_POINTS: usize = 10;

/// Number of battery-voltage correction bins
pub const VOLTAGE_POINTS: usize = 6;

const _: () = assert!(CalibrationCurve::WIRE_LEN == slots::CLT_CALIBRATION.len);
const _: () = assert!(WUE_POINTS == super::page1::WUE_POINTS);

bit_group! {
    /// Trigger edge and ignition output options
    Trigger, budget: 8, {
        /// Trigger offset in 22.5° steps
        trig_plus / set_trig_plus: 0, 2;
        /// Trigger on the crank rather than the cam
        trig_crank / set_trig_crank: 2, 1;
        /// Invert the ignition output
        ign_invert / set_ign_invert: 3, 1;
        /// Odd-fire angle offset
        oddfire / set_oddfire: 4, 4;
    }
}

/// Ignition, trigger and calibration page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigPage2 {
    /// Angle between the trigger tooth and TDC
    pub trigger_angle: u8,
    /// Fixed timing override, 0 = off
    pub fix_angle: u8,
    /// Timing trim
    pub trim: u8,
    /// Advance while cranking
    pub crank_angle: u8,
    /// Ignition hold-off
    pub ign_hold: u8,
    /// Trigger options
    pub trigger: Trigger,
    /// Idle advance
    pub idle_adv: u8,
    /// TPS below which idle advance applies
    pub idle_adv_tps: u8,
    /// RPM below which idle advance applies, in hundreds
    pub idle_adv_rpm: u8,
    /// Coolant above which idle advance applies, °C + 40
    pub idle_adv_clt: u8,
    /// Delay before idle advance engages
    pub idle_delay_time: u8,
    /// Staging cycles
    pub stg_cycles: u8,
    /// Continuous dwell flag
    pub dwell_cont: u8,
    /// Dwell while cranking, tenths of a millisecond
    pub dwell_crank: u8,
    /// Dwell while running, tenths of a millisecond
    pub dwell_run: u8,
    /// Trigger wheel tooth count, missing teeth included
    pub trigger_teeth: u8,
    /// Missing teeth on the trigger wheel
    pub trigger_missing_teeth: u8,
    /// RPM below which the engine is cranking, in hundreds
    pub crank_rpm: u8,
    /// TPS above which cranking fuel is cut
    pub flood_clear: u8,
    /// Soft rev limit, in hundreds
    pub soft_rev_lim: u8,
    /// Timing at the soft rev limit
    pub soft_lim_retard: u8,
    /// Seconds allowed at the soft rev limit
    pub soft_lim_max: u8,
    /// Hard rev limit, in hundreds
    pub hard_rev_lim: u8,
    /// Acceleration enrichment TPS-rate bins
    pub tae_bins: [u8; TAE_POINTS],
    /// Acceleration enrichment amounts
    pub tae_values: [u8; TAE_POINTS],
    /// Warm-up enrichment temperature bins, °C + 40
    pub wue_bins: [u8; WUE_POINTS],
    /// Maximum dwell, tenths of a millisecond
    pub dwell_limit: u8,
    /// Dwell correction percentage per battery voltage bin
    pub dwell_correction_values: [u8; VOLTAGE_POINTS],
    /// Coolant sensor calibration curve, values °C + 40
    pub clt_calibration: CalibrationCurve,
    /// Intake air sensor calibration curve, values °C + 40
    pub iat_calibration: CalibrationCurve,
    /// Oxygen sensor calibration curve, values AFR × 10
    pub o2_calibration: CalibrationCurve,
    reserved_102: [u8; 26],
}

const fn point(raw: u16, value: u8) -> CalibrationPoint {
    CalibrationPoint::new(raw, value)
}

// NTC thermistor with a 2.49 kΩ bias resistor; cold reads high.
const THERMISTOR_CURVE: CalibrationCurve = CalibrationCurve::new([
    point(60, 170),
    point(150, 130),
    point(300, 95),
    point(500, 70),
    point(750, 45),
    point(950, 10),
]);

// Wideband controller output, 0-5 V across 10.0-20.0 AFR.
const WIDEBAND_CURVE: CalibrationCurve = CalibrationCurve::new([
    point(0, 100),
    point(1023, 200),
    point(1023, 200),
    point(1023, 200),
    point(1023, 200),
    point(1023, 200),
]);

impl ConfigPage2 {
    /// Compiled-in defaults for a 36-1 crank wheel
    pub const DEFAULT: Self = Self {
        trigger_angle: 0,
        fix_angle: 0,
        trim: 0,
        crank_angle: 10,
        ign_hold: 0,
        trigger: Trigger::from_bits(0),
        idle_adv: 0,
        idle_adv_tps: 0,
        idle_adv_rpm: 0,
        idle_adv_clt: 0,
        idle_delay_time: 0,
        stg_cycles: 0,
        dwell_cont: 0,
        dwell_crank: 50,
        dwell_run: 30,
        trigger_teeth: 36,
        trigger_missing_teeth: 1,
        crank_rpm: 4,
        flood_clear: 90,
        soft_rev_lim: 58,
        soft_lim_retard: 10,
        soft_lim_max: 2,
        hard_rev_lim: 62,
        tae_bins: [10, 40, 80, 160],
        tae_values: [20, 40, 70, 100],
        wue_bins: [0, 14, 28, 41, 55, 69, 83, 96, 110, 124],
        dwell_limit: 80,
        dwell_correction_values: [147, 122, 100, 100, 100, 100],
        clt_calibration: THERMISTOR_CURVE,
        iat_calibration: THERMISTOR_CURVE,
        o2_calibration: WIDEBAND_CURVE,
        reserved_102: [0; 26],
    };
}

impl Default for ConfigPage2 {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ConfigPage for ConfigPage2 {
    const ID: PageId = PageId::Ignition;

    fn to_bytes(&self) -> [u8; PAGE_SIZE] {
        let mut page = [0u8; PAGE_SIZE];
        slots::TRIGGER_ANGLE.put_byte(&mut page, self.trigger_angle);
        slots::FIX_ANGLE.put_byte(&mut page, self.fix_angle);
        slots::TRIM.put_byte(&mut page, self.trim);
        slots::CRANK_ANGLE.put_byte(&mut page, self.crank_angle);
        slots::IGN_HOLD.put_byte(&mut page, self.ign_hold);
        slots::TRIGGER.put_byte(&mut page, self.trigger.bits());
        slots::IDLE_ADV.put_byte(&mut page, self.idle_adv);
        slots::IDLE_ADV_TPS.put_byte(&mut page, self.idle_adv_tps);
        slots::IDLE_ADV_RPM.put_byte(&mut page, self.idle_adv_rpm);
        slots::IDLE_ADV_CLT.put_byte(&mut page, self.idle_adv_clt);
        slots::IDLE_DELAY_TIME.put_byte(&mut page, self.idle_delay_time);
        slots::STG_CYCLES.put_byte(&mut page, self.stg_cycles);
        slots::DWELL_CONT.put_byte(&mut page, self.dwell_cont);
        slots::DWELL_CRANK.put_byte(&mut page, self.dwell_crank);
        slots::DWELL_RUN.put_byte(&mut page, self.dwell_run);
        slots::TRIGGER_TEETH.put_byte(&mut page, self.trigger_teeth);
        slots::TRIGGER_MISSING_TEETH.put_byte(&mut page, self.trigger_missing_teeth);
        slots::CRANK_RPM.put_byte(&mut page, self.crank_rpm);
        slots::FLOOD_CLEAR.put_byte(&mut page, self.flood_clear);
        slots::SOFT_REV_LIM.put_byte(&mut page, self.soft_rev_lim);
        slots::SOFT_LIM_RETARD.put_byte(&mut page, self.soft_lim_retard);
        slots::SOFT_LIM_MAX.put_byte(&mut page, self.soft_lim_max);
        slots::HARD_REV_LIM.put_byte(&mut page, self.hard_rev_lim);
        slots::TAE_BINS.put_array(&mut page, &self.tae_bins);
        slots::TAE_VALUES.put_array(&mut page, &self.tae_values);
        slots::WUE_BINS.put_array(&mut page, &self.wue_bins);
        slots::DWELL_LIMIT.put_byte(&mut page, self.dwell_limit);
        slots::DWELL_CORRECTION_VALUES.put_array(&mut page, &self.dwell_correction_values);
        slots::CLT_CALIBRATION.put_array(&mut page, &self.clt_calibration.to_wire());
        slots::IAT_CALIBRATION.put_array(&mut page, &self.iat_calibration.to_wire());
        slots::O2_CALIBRATION.put_array(&mut page, &self.o2_calibration.to_wire());
        slots::RESERVED_102.put_array(&mut page, &self.reserved_102);
        page
    }

    fn from_bytes(page: &[u8; PAGE_SIZE]) -> Self {
        Self {
            trigger_angle: slots::TRIGGER_ANGLE.byte(page),
            fix_angle: slots::FIX_ANGLE.byte(page),
            trim: slots::TRIM.byte(page),
            crank_angle: slots::CRANK_ANGLE.byte(page),
            ign_hold: slots::IGN_HOLD.byte(page),
            trigger: Trigger::from_bits(slots::TRIGGER.byte(page)),
            idle_adv: slots::IDLE_ADV.byte(page),
            idle_adv_tps: slots::IDLE_ADV_TPS.byte(page),
            idle_adv_rpm: slots::IDLE_ADV_RPM.byte(page),
            idle_adv_clt: slots::IDLE_ADV_CLT.byte(page),
            idle_delay_time: slots::IDLE_DELAY_TIME.byte(page),
            stg_cycles: slots::STG_CYCLES.byte(page),
            dwell_cont: slots::DWELL_CONT.byte(page),
            dwell_crank: slots::DWELL_CRANK.byte(page),
            dwell_run: slots::DWELL_RUN.byte(page),
            trigger_teeth: slots::TRIGGER_TEETH.byte(page),
            trigger_missing_teeth: slots::TRIGGER_MISSING_TEETH.byte(page),
            crank_rpm: slots::CRANK_RPM.byte(page),
            flood_clear: slots::FLOOD_CLEAR.byte(page),
            soft_rev_lim: slots::SOFT_REV_LIM.byte(page),
            soft_lim_retard: slots::SOFT_LIM_RETARD.byte(page),
            soft_lim_max: slots::SOFT_LIM_MAX.byte(page),
            hard_rev_lim: slots::HARD_REV_LIM.byte(page),
            tae_bins: slots::TAE_BINS.array(page),
            tae_values: slots::TAE_VALUES.array(page),
            wue_bins: slots::WUE_BINS.array(page),
            dwell_limit: slots::DWELL_LIMIT.byte(page),
            dwell_correction_values: slots::DWELL_CORRECTION_VALUES.array(page),
            clt_calibration: CalibrationCurve::from_wire(&slots::CLT_CALIBRATION.array(page)),
            iat_calibration: CalibrationCurve::from_wire(&slots::IAT_CALIBRATION.array(page)),
            o2_calibration: CalibrationCurve::from_wire(&slots::O2_CALIBRATION.array(page)),
            reserved_102: slots::RESERVED_102.array(page),
        }
    }
}
