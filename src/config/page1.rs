//! Configuration page 1: fuel, enrichment and engine setup

use super::PAGE_SIZE;
use super::PageId;
use super::bits::bit_group;
use crate::traits::ConfigPage;

/// Wire slots of page 1
pub mod slots {
    use crate::config::layout::page_layout;

    page_layout! {
        /// Cranking pulse width with a cold engine
        CRANK_COLD @ 0: 1,
        /// Cranking pulse width with a hot engine
        CRANK_HOT @ 1: 1,
        /// After-start enrichment percentage
        ASE_PCT @ 2: 1,
        /// After-start enrichment duration in engine cycles
        ASE_COUNT @ 3: 1,
        /// Warm-up enrichment curve values
        WUE_VALUES @ 4: 10,
        /// Cranking enrichment percentage
        CRANKING_PCT @ 14: 1,
        /// Board pin layout selector
        PIN_MAPPING @ 15: 1,
        /// Reserved
        RESERVED_16 @ 16: 2,
        /// Cold acceleration enrichment adder
        TAE_COLD_A @ 18: 1,
        /// TPS rate threshold for acceleration enrichment
        TPS_THRESH @ 19: 1,
        /// Acceleration enrichment duration
        TAE_TIME @ 20: 1,
        /// Deceleration fuel percentage
        TDE_PCT @ 21: 1,
        /// Display setup, first byte
        DISPLAY_A @ 22: 1,
        /// Display setup, second byte
        DISPLAY_B @ 23: 1,
        /// Display setup, bar graphs
        DISPLAY_C @ 24: 1,
        /// Reserved
        RESERVED_25 @ 25: 1,
        /// Required fuel at 100% VE
        REQ_FUEL @ 26: 1,
        /// Injection divider
        DIVIDER @ 27: 1,
        /// Alternate injection flag
        ALTERNATE @ 28: 1,
        /// Injector opening time
        INJ_OPEN @ 29: 1,
        /// Injector on-time fuel offset
        INJ_OC_FUEL @ 30: 1,
        /// Injector PWM period
        INJ_PWM_P @ 31: 1,
        /// Injector PWM time threshold
        INJ_PWM_T @ 32: 1,
        /// Reserved
        RESERVED_33 @ 33: 1,
        /// RPM constant, little-endian
        RPMK @ 34: 2,
        /// Engine setup, first byte
        ENGINE_A @ 36: 1,
        /// Engine setup, second byte
        ENGINE_B @ 37: 1,
        /// Engine setup, third byte
        ENGINE_C @ 38: 1,
        /// Priming pulse width
        PRIME_PULSE @ 39: 1,
        /// RPM above which closed loop may run, in hundreds
        EGO_RPM @ 40: 1,
        /// Fast idle temperature, °C + 40
        FAST_IDLE_TEMP @ 41: 1,
        /// Oxygen sensor switch point
        EGO_SWITCH @ 42: 1,
        /// Cold acceleration enrichment multiplier
        TAE_COLD_M @ 43: 1,
        /// TPS ADC reading at closed throttle
        TPS_MIN @ 44: 1,
        /// TPS ADC reading at wide-open throttle
        TPS_MAX @ 45: 1,
        /// Reserved
        RESERVED_46 @ 46: 82,
    }
}

/// Number of points in the warm-up enrichment curve
pub const WUE_POINTS: usize = 10;

bit_group! {
    /// Display type and first three display slots
    DisplayA, budget: 8, {
        /// Attached display type
        display_type / set_display_type: 0, 3;
        /// First display slot
        display1 / set_display1: 3, 3;
        /// Second display slot
        display2 / set_display2: 6, 2;
    }
}

bit_group! {
    /// Display slots three to five
    DisplayB, budget: 8, {
        /// Third display slot
        display3 / set_display3: 0, 3;
        /// Fourth display slot
        display4 / set_display4: 3, 2;
        /// Fifth display slot
        display5 / set_display5: 5, 3;
    }
}

bit_group! {
    /// Bar graph sources
    DisplayC, budget: 8, {
        /// First bar graph source
        display_b1 / set_display_b1: 0, 4;
        /// Second bar graph source
        display_b2 / set_display_b2: 4, 4;
    }
}

bit_group! {
    /// Load sensing, stroke count, injection type and cylinder count
    EngineA, budget: 8, {
        /// MAP sensor type
        map_type / set_map_type: 0, 2;
        /// 0 = four-stroke, 1 = two-stroke
        strokes / set_strokes: 2, 1;
        /// 0 = port injection, 1 = throttle body
        inj_type / set_inj_type: 3, 1;
        /// Number of cylinders
        n_cylinders / set_n_cylinders: 4, 4;
    }
}

bit_group! {
    /// Temperature sensor types and injector count
    EngineB, budget: 8, {
        /// Coolant sensor type
        clt_type / set_clt_type: 0, 2;
        /// Intake air sensor type
        mat_type / set_mat_type: 2, 2;
        /// Number of injectors
        n_injectors / set_n_injectors: 4, 4;
    }
}

bit_group! {
    /// Firing order, oxygen sensor, algorithm and injection timing
    ///
    /// The top two bits are spare.
    EngineC, budget: 6, {
        /// 0 = even fire, 1 = odd fire
        engine_type / set_engine_type: 0, 1;
        /// 0 = narrowband, 1 = wideband
        ego_type / set_ego_type: 1, 1;
        /// 0 = speed density, 1 = alpha-N
        algorithm / set_algorithm: 2, 1;
        /// Barometric correction enabled
        baro_corr / set_baro_corr: 3, 1;
        /// Injection timing mode
        injection_timing / set_injection_timing: 4, 2;
    }
}

/// Fuel, enrichment and engine setup page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigPage1 {
    /// Cranking pulse width with a cold engine
    pub crank_cold: u8,
    /// Cranking pulse width with a hot engine
    pub crank_hot: u8,
    /// After-start enrichment percentage
    pub ase_pct: u8,
    /// After-start enrichment duration in engine cycles
    pub ase_count: u8,
    /// Warm-up enrichment percentages, one per [`ConfigPage2::wue_bins`](super::ConfigPage2::wue_bins) entry
    pub wue_values: [u8; WUE_POINTS],
    /// Cranking enrichment percentage
    pub cranking_pct: u8,
    /// Board pin layout selector, see [`BoardLayout`](crate::pins::BoardLayout)
    pub pin_mapping: u8,
    reserved_16: [u8; 2],
    /// Cold acceleration enrichment adder
    pub tae_cold_a: u8,
    /// TPS rate threshold for acceleration enrichment
    pub tps_thresh: u8,
    /// Acceleration enrichment duration
    pub tae_time: u8,
    /// Deceleration fuel percentage
    pub tde_pct: u8,
    /// Display setup, first byte
    pub display_a: DisplayA,
    /// Display setup, second byte
    pub display_b: DisplayB,
    /// Display setup, bar graphs
    pub display_c: DisplayC,
    reserved_25: u8,
    /// Required fuel at 100% VE, tenths of a millisecond
    pub req_fuel: u8,
    /// Injection divider
    pub divider: u8,
    /// Alternate injection flag
    pub alternate: u8,
    /// Injector opening time, tenths of a millisecond
    pub inj_open: u8,
    /// Injector on-time fuel offset
    pub inj_oc_fuel: u8,
    /// Injector PWM period
    pub inj_pwm_p: u8,
    /// Injector PWM time threshold
    pub inj_pwm_t: u8,
    reserved_33: u8,
    /// RPM constant
    pub rpmk: u16,
    /// Engine setup, first byte
    pub engine_a: EngineA,
    /// Engine setup, second byte
    pub engine_b: EngineB,
    /// Engine setup, third byte
    pub engine_c: EngineC,
    /// Priming pulse width
    pub prime_pulse: u8,
    /// RPM above which closed loop may run, in hundreds
    pub ego_rpm: u8,
    /// Fast idle temperature, °C + 40
    pub fast_idle_temp: u8,
    /// Oxygen sensor switch point
    pub ego_switch: u8,
    /// Cold acceleration enrichment multiplier
    pub tae_cold_m: u8,
    /// TPS ADC reading at closed throttle
    pub tps_min: u8,
    /// TPS ADC reading at wide-open throttle
    pub tps_max: u8,
    reserved_46: [u8; 82],
}

impl ConfigPage1 {
    /// Compiled-in defaults for a four-cylinder, four-stroke engine
    pub const DEFAULT: Self = Self {
        crank_cold: 12,
        crank_hot: 6,
        ase_pct: 25,
        ase_count: 20,
        wue_values: [180, 175, 168, 154, 134, 121, 112, 104, 100, 100],
        cranking_pct: 100,
        pin_mapping: 3,
        reserved_16: [0; 2],
        tae_cold_a: 0,
        tps_thresh: 50,
        tae_time: 10,
        tde_pct: 0,
        display_a: DisplayA::from_bits(0),
        display_b: DisplayB::from_bits(0),
        display_c: DisplayC::from_bits(0),
        reserved_25: 0,
        req_fuel: 120,
        divider: 2,
        alternate: 0,
        inj_open: 10,
        inj_oc_fuel: 0,
        inj_pwm_p: 0,
        inj_pwm_t: 0,
        reserved_33: 0,
        rpmk: 3000,
        // four cylinders, four-stroke, port injection
        engine_a: EngineA::from_bits(0x40),
        // four injectors
        engine_b: EngineB::from_bits(0x40),
        engine_c: EngineC::from_bits(0),
        prime_pulse: 20,
        ego_rpm: 20,
        fast_idle_temp: 100,
        ego_switch: 26,
        tae_cold_m: 100,
        tps_min: 0,
        tps_max: 255,
        reserved_46: [0; 82],
    };
}

impl Default for ConfigPage1 {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ConfigPage for ConfigPage1 {
    const ID: PageId = PageId::Fuel;

    fn to_bytes(&self) -> [u8; PAGE_SIZE] {
        let mut page = [0u8; PAGE_SIZE];
        slots::CRANK_COLD.put_byte(&mut page, self.crank_cold);
        slots::CRANK_HOT.put_byte(&mut page, self.crank_hot);
        slots::ASE_PCT.put_byte(&mut page, self.ase_pct);
        slots::ASE_COUNT.put_byte(&mut page, self.ase_count);
        slots::WUE_VALUES.put_array(&mut page, &self.wue_values);
        slots::CRANKING_PCT.put_byte(&mut page, self.cranking_pct);
        slots::PIN_MAPPING.put_byte(&mut page, self.pin_mapping);
        slots::RESERVED_16.put_array(&mut page, &self.reserved_16);
        slots::TAE_COLD_A.put_byte(&mut page, self.tae_cold_a);
        slots::TPS_THRESH.put_byte(&mut page, self.tps_thresh);
        slots::TAE_TIME.put_byte(&mut page, self.tae_time);
        slots::TDE_PCT.put_byte(&mut page, self.tde_pct);
        slots::DISPLAY_A.put_byte(&mut page, self.display_a.bits());
        slots::DISPLAY_B.put_byte(&mut page, self.display_b.bits());
        slots::DISPLAY_C.put_byte(&mut page, self.display_c.bits());
        slots::RESERVED_25.put_byte(&mut page, self.reserved_25);
        slots::REQ_FUEL.put_byte(&mut page, self.req_fuel);
        slots::DIVIDER.put_byte(&mut page, self.divider);
        slots::ALTERNATE.put_byte(&mut page, self.alternate);
        slots::INJ_OPEN.put_byte(&mut page, self.inj_open);
        slots::INJ_OC_FUEL.put_byte(&mut page, self.inj_oc_fuel);
        slots::INJ_PWM_P.put_byte(&mut page, self.inj_pwm_p);
        slots::INJ_PWM_T.put_byte(&mut page, self.inj_pwm_t);
        slots::RESERVED_33.put_byte(&mut page, self.reserved_33);
        slots::RPMK.put_u16_le(&mut page, self.rpmk);
        slots::ENGINE_A.put_byte(&mut page, self.engine_a.bits());
        slots::ENGINE_B.put_byte(&mut page, self.engine_b.bits());
        slots::ENGINE_C.put_byte(&mut page, self.engine_c.bits());
        slots::PRIME_PULSE.put_byte(&mut page, self.prime_pulse);
        slots::EGO_RPM.put_byte(&mut page, self.ego_rpm);
        slots::FAST_IDLE_TEMP.put_byte(&mut page, self.fast_idle_temp);
        slots::EGO_SWITCH.put_byte(&mut page, self.ego_switch);
        slots::TAE_COLD_M.put_byte(&mut page, self.tae_cold_m);
        slots::TPS_MIN.put_byte(&mut page, self.tps_min);
        slots::TPS_MAX.put_byte(&mut page, self.tps_max);
        slots::RESERVED_46.put_array(&mut page, &self.reserved_46);
        page
    }

    fn from_bytes(page: &[u8; PAGE_SIZE]) -> Self {
        Self {
            crank_cold: slots::CRANK_COLD.byte(page),
            crank_hot: slots::CRANK_HOT.byte(page),
            ase_pct: slots::ASE_PCT.byte(page),
            ase_count: slots::ASE_COUNT.byte(page),
            wue_values: slots::WUE_VALUES.array(page),
            cranking_pct: slots::CRANKING_PCT.byte(page),
            pin_mapping: slots::PIN_MAPPING.byte(page),
            reserved_16: slots::RESERVED_16.array(page),
            tae_cold_a: slots::TAE_COLD_A.byte(page),
            tps_thresh: slots::TPS_THRESH.byte(page),
            tae_time: slots::TAE_TIME.byte(page),
            tde_pct: slots::TDE_PCT.byte(page),
            display_a: DisplayA::from_bits(slots::DISPLAY_A.byte(page)),
            display_b: DisplayB::from_bits(slots::DISPLAY_B.byte(page)),
            display_c: DisplayC::from_bits(slots::DISPLAY_C.byte(page)),
            reserved_25: slots::RESERVED_25.byte(page),
            req_fuel: slots::REQ_FUEL.byte(page),
            divider: slots::DIVIDER.byte(page),
            alternate: slots::ALTERNATE.byte(page),
            inj_open: slots::INJ_OPEN.byte(page),
            inj_oc_fuel: slots::INJ_OC_FUEL.byte(page),
            inj_pwm_p: slots::INJ_PWM_P.byte(page),
            inj_pwm_t: slots::INJ_PWM_T.byte(page),
            reserved_33: slots::RESERVED_33.byte(page),
            rpmk: slots::RPMK.u16_le(page),
            engine_a: EngineA::from_bits(slots::ENGINE_A.byte(page)),
            engine_b: EngineB::from_bits(slots::ENGINE_B.byte(page)),
            engine_c: EngineC::from_bits(slots::ENGINE_C.byte(page)),
            prime_pulse: slots::PRIME_PULSE.byte(page),
            ego_rpm: slots::EGO_RPM.byte(page),
            fast_idle_temp: slots::FAST_IDLE_TEMP.byte(page),
            ego_switch: slots::EGO_SWITCH.byte(page),
            tae_cold_m: slots::TAE_COLD_M.byte(page),
            tps_min: slots::TPS_MIN.byte(page),
            tps_max: slots::TPS_MAX.byte(page),
            reserved_46: slots::RESERVED_46.array(page),
        }
    }
}
