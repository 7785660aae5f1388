//! Point-in-time copy of the live status and its telemetry frame

use crate::calibration::temperature;
use crate::flags::{EngineState, SquirtState};

/// Length of the realtime telemetry frame
pub const FRAME_LEN: usize = 32;

/// Byte offsets within the realtime telemetry frame
///
/// Multi-byte values are little-endian. Temperatures are sent as °C + 40.
pub mod frame {
    /// Free-running seconds counter
    pub const SECL: usize = 0;
    /// Injection state bits
    pub const SQUIRT: usize = 1;
    /// Engine state bits
    pub const ENGINE: usize = 2;
    /// Manifold pressure
    pub const MAP: usize = 3;
    /// Throttle position
    pub const TPS: usize = 4;
    /// Throttle rate of change
    pub const TPS_DOT: usize = 5;
    /// Volumetric efficiency
    pub const VE: usize = 6;
    /// Oxygen sensor reading
    pub const O2: usize = 7;
    /// Coolant temperature, °C + 40
    pub const COOLANT: usize = 8;
    /// Intake air temperature, °C + 40
    pub const IAT: usize = 9;
    /// Battery voltage × 10
    pub const BATTERY10: usize = 10;
    /// Ignition advance
    pub const ADVANCE: usize = 11;
    /// Total fuel correction
    pub const CORRECTIONS: usize = 12;
    /// Acceleration enrichment
    pub const TAE_AMOUNT: usize = 13;
    /// Closed-loop correction
    pub const EGO_CORRECTION: usize = 14;
    /// Warm-up enrichment
    pub const WUE_CORRECTION: usize = 15;
    /// Battery voltage correction
    pub const BAT_CORRECTION: usize = 16;
    /// Target AFR
    pub const AFR_TARGET: usize = 17;
    /// Engine speed, 2 bytes
    pub const RPM: usize = 18;
    /// Injector pulse width, 2 bytes
    pub const PW: usize = 20;
    /// Ignition state
    pub const SPARK: usize = 22;
    /// Seconds since cranking
    pub const RUN_SECS: usize = 23;
    /// Main loop rate, 2 bytes
    pub const LOOPS_PER_SECOND: usize = 24;
    /// Free RAM, 2 bytes
    pub const FREE_RAM: usize = 26;
    /// Coil dwell, 2 bytes
    pub const DWELL: usize = 28;
    /// 1 when the trigger decoder has sync
    pub const HAS_SYNC: usize = 30;
    /// Ignition event counter
    pub const IGNITION_COUNT: usize = 31;
}

const _: () = assert!(frame::IGNITION_COUNT + 1 == FRAME_LEN);

/// Every live status field at one instant
///
/// Produced by [`LiveStatus::snapshot`](super::LiveStatus::snapshot). The
/// interrupt-written fields were read together, so they are mutually
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    /// Trigger decoder has position sync
    pub has_sync: bool,
    /// Engine speed
    pub rpm: u16,
    /// Injector pulse width in microseconds
    pub pw: u16,
    /// Injection state
    pub squirt: SquirtState,
    /// Ignition state byte
    pub spark: u8,
    /// Seconds since cranking began
    pub run_secs: u8,
    /// Free-running seconds counter
    pub secl: u8,
    /// Main loop iterations in the last second
    pub loops_per_second: u16,
    /// Ignition events, modulo 256
    pub ignition_count: u8,
    /// Manifold pressure, kPa
    pub map: u8,
    /// Throttle position, percent
    pub tps: u8,
    /// Previous throttle position, percent
    pub tps_last: u8,
    /// Time of the TPS sample, microseconds
    pub tps_time: u32,
    /// Time of the previous TPS sample, microseconds
    pub tps_last_time: u32,
    /// Raw TPS reading scaled to a byte
    pub tps_adc: u8,
    /// TPS rate of change
    pub tps_dot: u8,
    /// Volumetric efficiency
    pub ve: u8,
    /// Oxygen sensor reading, AFR × 10
    pub o2: u8,
    /// Raw oxygen sensor sample
    pub o2_adc: u16,
    /// Coolant temperature, °C
    pub coolant: i16,
    /// Raw coolant sample
    pub clt_adc: u16,
    /// Intake air temperature, °C
    pub iat: i16,
    /// Raw intake air sample
    pub iat_adc: u16,
    /// Raw battery sample
    pub bat_adc: u16,
    /// Battery voltage × 10
    pub battery10: u8,
    /// Coil dwell, tenths of a millisecond
    pub dwell: u16,
    /// Ignition advance
    pub advance: u8,
    /// Total fuel correction
    pub corrections: u8,
    /// Acceleration enrichment
    pub tae_amount: u8,
    /// Closed-loop correction
    pub ego_correction: u8,
    /// Warm-up enrichment
    pub wue_correction: u8,
    /// Battery voltage correction
    pub bat_correction: u8,
    /// Target AFR × 10
    pub afr_target: u8,
    /// Time acceleration enrichment ends
    pub tae_end_time: u32,
    /// Engine state
    pub engine: EngineState,
    /// Free RAM in bytes
    pub free_ram: u16,
    /// Start of the current loop iteration
    pub current_loop_time: u32,
    /// Start of the previous loop iteration
    pub previous_loop_time: u32,
}

impl StatusSnapshot {
    /// Encodes the realtime telemetry frame sent to the tuning tool
    pub fn to_frame(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        out[frame::SECL] = self.secl;
        out[frame::SQUIRT] = self.squirt.bits();
        out[frame::ENGINE] = self.engine.bits();
        out[frame::MAP] = self.map;
        out[frame::TPS] = self.tps;
        out[frame::TPS_DOT] = self.tps_dot;
        out[frame::VE] = self.ve;
        out[frame::O2] = self.o2;
        out[frame::COOLANT] = temperature::encode(self.coolant);
        out[frame::IAT] = temperature::encode(self.iat);
        out[frame::BATTERY10] = self.battery10;
        out[frame::ADVANCE] = self.advance;
        out[frame::CORRECTIONS] = self.corrections;
        out[frame::TAE_AMOUNT] = self.tae_amount;
        out[frame::EGO_CORRECTION] = self.ego_correction;
        out[frame::WUE_CORRECTION] = self.wue_correction;
        out[frame::BAT_CORRECTION] = self.bat_correction;
        out[frame::AFR_TARGET] = self.afr_target;
        put_u16(&mut out, frame::RPM, self.rpm);
        put_u16(&mut out, frame::PW, self.pw);
        out[frame::SPARK] = self.spark;
        out[frame::RUN_SECS] = self.run_secs;
        put_u16(&mut out, frame::LOOPS_PER_SECOND, self.loops_per_second);
        put_u16(&mut out, frame::FREE_RAM, self.free_ram);
        put_u16(&mut out, frame::DWELL, self.dwell);
        out[frame::HAS_SYNC] = u8::from(self.has_sync);
        out[frame::IGNITION_COUNT] = self.ignition_count;
        out
    }
}

fn put_u16(out: &mut [u8; FRAME_LEN], offset: usize, value: u16) {
    out[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{EngineBit, SquirtBit};

    #[test]
    fn test_frame_offsets() {
        let mut snapshot = StatusSnapshot {
            rpm: 0x1234,
            pw: 0xABCD,
            coolant: 85,
            iat: -50,
            battery10: 138,
            has_sync: true,
            ignition_count: 7,
            secl: 200,
            ..StatusSnapshot::default()
        };
        snapshot.engine.set(EngineBit::Warmup);
        snapshot.squirt.set(SquirtBit::Inj1);

        let bytes = snapshot.to_frame();
        assert_eq!(bytes[frame::SECL], 200);
        assert_eq!(bytes[frame::ENGINE], 0b1000);
        assert_eq!(bytes[frame::SQUIRT], 0b1);
        assert_eq!(&bytes[frame::RPM..frame::RPM + 2], &[0x34, 0x12]);
        assert_eq!(&bytes[frame::PW..frame::PW + 2], &[0xCD, 0xAB]);
        assert_eq!(bytes[frame::COOLANT], 125);
        // below the representable range
        assert_eq!(bytes[frame::IAT], 0);
        assert_eq!(bytes[frame::BATTERY10], 138);
        assert_eq!(bytes[frame::HAS_SYNC], 1);
        assert_eq!(bytes[frame::IGNITION_COUNT], 7);
    }
}
