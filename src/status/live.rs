//! Main-loop half of the live status

use super::shared::InterruptShared;
use super::snapshot::StatusSnapshot;
use crate::calibration::temperature;
use crate::error::{EcuError, EcuResult};
use crate::flags::EngineState;
use crate::traits::CalibrationLookup;

/// Live engine status owned by the main loop
///
/// Pairs the main-loop fields with the [`InterruptShared`] block the
/// interrupt handlers write. Sensor readings are only set together with the
/// raw ADC sample they came from, and the TPS history only moves forward in
/// time.
#[derive(Debug, Clone)]
pub struct LiveStatus<'s> {
    shared: &'s InterruptShared,

    /// Manifold pressure, kPa
    pub map: u8,
    tps: u8,
    tps_last: u8,
    tps_time: u32,
    tps_last_time: u32,
    tps_adc: u8,
    /// TPS rate of change, %/s ÷ 10
    pub tps_dot: u8,
    /// Current volumetric efficiency
    pub ve: u8,
    o2: u8,
    o2_adc: u16,
    coolant: i16,
    clt_adc: u16,
    iat: i16,
    iat_adc: u16,
    bat_adc: u16,
    battery10: u8,
    /// Coil dwell, tenths of a millisecond
    pub dwell: u16,
    /// Ignition advance, degrees
    pub advance: u8,
    /// Total fuel correction percentage
    pub corrections: u8,
    /// Acceleration enrichment being applied
    pub tae_amount: u8,
    /// Closed-loop AFR correction being applied
    pub ego_correction: u8,
    /// Warm-up enrichment being applied
    pub wue_correction: u8,
    /// Battery voltage correction being applied
    pub bat_correction: u8,
    /// Target AFR × 10
    pub afr_target: u8,
    /// Time acceleration enrichment ends, microseconds
    pub tae_end_time: u32,
    /// Engine operating state
    pub engine: EngineState,
    /// Free RAM in bytes
    pub free_ram: u16,
    current_loop_time: u32,
    previous_loop_time: u32,
}

impl<'s> LiveStatus<'s> {
    /// Creates a zeroed status paired with `shared`
    pub const fn new(shared: &'s InterruptShared) -> Self {
        Self {
            shared,
            map: 0,
            tps: 0,
            tps_last: 0,
            tps_time: 0,
            tps_last_time: 0,
            tps_adc: 0,
            tps_dot: 0,
            ve: 0,
            o2: 0,
            o2_adc: 0,
            coolant: 0,
            clt_adc: 0,
            iat: 0,
            iat_adc: 0,
            bat_adc: 0,
            battery10: 0,
            dwell: 0,
            advance: 0,
            corrections: 0,
            tae_amount: 0,
            ego_correction: 0,
            wue_correction: 0,
            bat_correction: 0,
            afr_target: 0,
            tae_end_time: 0,
            engine: EngineState::EMPTY,
            free_ram: 0,
            current_loop_time: 0,
            previous_loop_time: 0,
        }
    }

    /// The interrupt-written half
    pub fn shared(&self) -> &'s InterruptShared {
        self.shared
    }

    /// Throttle position, percent
    pub fn tps(&self) -> u8 {
        self.tps
    }

    /// Previous throttle position, percent
    pub fn tps_last(&self) -> u8 {
        self.tps_last
    }

    /// Time of the current TPS sample, microseconds
    pub fn tps_time(&self) -> u32 {
        self.tps_time
    }

    /// Time of the previous TPS sample, microseconds
    pub fn tps_last_time(&self) -> u32 {
        self.tps_last_time
    }

    /// Raw TPS reading scaled to a byte
    pub fn tps_adc(&self) -> u8 {
        self.tps_adc
    }

    /// Records a TPS sample, moving the current one to the previous slot
    ///
    /// # Errors
    /// [`EcuError::TimestampRegression`] if `time` is older than the current
    /// sample; nothing is changed.
    pub fn update_tps(&mut self, adc: u8, percent: u8, time: u32) -> EcuResult<()> {
        self.record_tps(percent, time)?;
        self.tps_adc = adc;
        Ok(())
    }

    fn record_tps(&mut self, percent: u8, time: u32) -> EcuResult<()> {
        if time < self.tps_time {
            return Err(EcuError::TimestampRegression {
                current: self.tps_time,
                offered: time,
            });
        }
        self.tps_last = self.tps;
        self.tps_last_time = self.tps_time;
        self.tps = percent;
        self.tps_time = time;
        Ok(())
    }

    /// Coolant temperature, °C
    pub fn coolant(&self) -> i16 {
        self.coolant
    }

    /// Raw coolant ADC sample
    pub fn clt_adc(&self) -> u16 {
        self.clt_adc
    }

    /// Records a coolant sample, calibrated through `table`
    pub fn update_coolant<T: CalibrationLookup>(&mut self, raw: u16, table: &T) {
        self.clt_adc = raw;
        self.coolant = temperature::decode(table.lookup(raw));
    }

    /// Intake air temperature, °C
    pub fn iat(&self) -> i16 {
        self.iat
    }

    /// Raw intake air ADC sample
    pub fn iat_adc(&self) -> u16 {
        self.iat_adc
    }

    /// Records an intake air sample, calibrated through `table`
    pub fn update_iat<T: CalibrationLookup>(&mut self, raw: u16, table: &T) {
        self.iat_adc = raw;
        self.iat = temperature::decode(table.lookup(raw));
    }

    /// Oxygen sensor reading, AFR × 10
    pub fn o2(&self) -> u8 {
        self.o2
    }

    /// Raw oxygen sensor ADC sample
    pub fn o2_adc(&self) -> u16 {
        self.o2_adc
    }

    /// Records an oxygen sensor sample, calibrated through `table`
    pub fn update_o2<T: CalibrationLookup>(&mut self, raw: u16, table: &T) {
        self.o2_adc = raw;
        self.o2 = table.lookup(raw);
    }

    /// Battery voltage × 10
    pub fn battery10(&self) -> u8 {
        self.battery10
    }

    /// Raw battery ADC sample
    pub fn bat_adc(&self) -> u16 {
        self.bat_adc
    }

    /// Records a battery sample and its voltage × 10 (125 = 12.5 V)
    pub fn update_battery(&mut self, adc: u16, volts10: u8) {
        self.bat_adc = adc;
        self.battery10 = volts10;
    }

    /// Marks the start of a main loop iteration at `now` microseconds
    pub fn start_loop(&mut self, now: u32) {
        self.previous_loop_time = self.current_loop_time;
        self.current_loop_time = now;
    }

    /// Start of the current loop iteration, microseconds
    pub fn current_loop_time(&self) -> u32 {
        self.current_loop_time
    }

    /// Start of the previous loop iteration, microseconds
    pub fn previous_loop_time(&self) -> u32 {
        self.previous_loop_time
    }

    /// Length of the last loop iteration; correct across timer wrap
    pub fn loop_duration(&self) -> u32 {
        self.current_loop_time.wrapping_sub(self.previous_loop_time)
    }

    /// Copies every field, the interrupt-written ones in one critical section
    pub fn snapshot(&self) -> StatusSnapshot {
        let interrupt = self.shared.capture();
        StatusSnapshot {
            has_sync: interrupt.has_sync,
            rpm: interrupt.rpm,
            pw: interrupt.pw,
            squirt: interrupt.squirt,
            spark: interrupt.spark,
            run_secs: interrupt.run_secs,
            secl: interrupt.secl,
            loops_per_second: interrupt.loops_per_second,
            ignition_count: interrupt.ignition_count,
            map: self.map,
            tps: self.tps,
            tps_last: self.tps_last,
            tps_time: self.tps_time,
            tps_last_time: self.tps_last_time,
            tps_adc: self.tps_adc,
            tps_dot: self.tps_dot,
            ve: self.ve,
            o2: self.o2,
            o2_adc: self.o2_adc,
            coolant: self.coolant,
            clt_adc: self.clt_adc,
            iat: self.iat,
            iat_adc: self.iat_adc,
            bat_adc: self.bat_adc,
            battery10: self.battery10,
            dwell: self.dwell,
            advance: self.advance,
            corrections: self.corrections,
            tae_amount: self.tae_amount,
            ego_correction: self.ego_correction,
            wue_correction: self.wue_correction,
            bat_correction: self.bat_correction,
            afr_target: self.afr_target,
            tae_end_time: self.tae_end_time,
            engine: self.engine,
            free_ram: self.free_ram,
            current_loop_time: self.current_loop_time,
            previous_loop_time: self.previous_loop_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationPoint, CalibrationTable};
    use crate::flags::EngineBit;

    #[test]
    fn test_tps_history_shifts() {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        live.update_tps(40, 15, 1_000).unwrap();
        live.update_tps(90, 35, 1_500).unwrap();

        assert_eq!(live.tps(), 35);
        assert_eq!(live.tps_last(), 15);
        assert_eq!(live.tps_time(), 1_500);
        assert_eq!(live.tps_last_time(), 1_000);
        assert_eq!(live.tps_adc(), 90);
    }

    #[test]
    fn test_tps_rejects_older_sample() {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        live.update_tps(40, 15, 2_000).unwrap();

        assert_eq!(
            live.update_tps(50, 20, 1_999),
            Err(EcuError::TimestampRegression {
                current: 2_000,
                offered: 1_999
            })
        );
        assert_eq!(live.tps(), 15);
        assert_eq!(live.tps_adc(), 40);

        // same instant is allowed
        live.update_tps(41, 16, 2_000).unwrap();
        assert!(live.tps_last_time() <= live.tps_time());
    }

    #[test]
    fn test_sensor_updates_store_raw_and_calibrated() {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        // 0 raw → -40 °C, 1023 raw → 215 °C
        let table = CalibrationTable::build(&[
            CalibrationPoint::new(0, 0),
            CalibrationPoint::new(1023, 255),
        ])
        .unwrap();

        live.update_coolant(512, &table);
        assert_eq!(live.clt_adc(), 512);
        assert_eq!(live.coolant(), 127 - 40);

        live.update_iat(0, &table);
        assert_eq!(live.iat(), -40);

        live.update_o2(1023, &table);
        assert_eq!((live.o2_adc(), live.o2()), (1023, 255));

        live.update_battery(640, 125);
        assert_eq!((live.bat_adc(), live.battery10()), (640, 125));
    }

    #[test]
    fn test_loop_timing_wraps() {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        live.start_loop(u32::MAX - 99);
        live.start_loop(100);
        assert_eq!(live.loop_duration(), 200);
    }

    #[test]
    fn test_snapshot_combines_halves() {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        shared.set_rpm(2500);
        live.map = 95;
        live.engine.set(EngineBit::Run);

        let snapshot = live.snapshot();
        assert_eq!(snapshot.rpm, 2500);
        assert_eq!(snapshot.map, 95);
        assert!(snapshot.engine.contains(EngineBit::Run));
    }
}
