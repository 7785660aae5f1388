//! Status fields written from interrupt context

use critical_section::CriticalSection;

use super::tooth_log::ToothLog;
use crate::flags::{SquirtBit, SquirtState};
use crate::sync::{ByteCell, IsrCell};

/// Injection state shared with the injector interrupts
///
/// Every operation is a single read-modify-write that cannot be split by an
/// interrupt.
#[derive(Debug, Default)]
pub struct SharedSquirt {
    bits: ByteCell,
}

impl SharedSquirt {
    /// Creates a state with every bit cleared
    pub const fn new() -> Self {
        Self {
            bits: ByteCell::new(0),
        }
    }

    /// Sets one bit
    pub fn set(&self, bit: SquirtBit) {
        self.bits.fetch_or(bit.mask());
    }

    /// Clears one bit
    pub fn clear(&self, bit: SquirtBit) {
        self.bits.fetch_and(!bit.mask());
    }

    /// Clears every bit in `bits` at once
    pub fn clear_all(&self, bits: &[SquirtBit]) {
        let mask = bits.iter().fold(0u8, |mask, bit| mask | bit.mask());
        self.bits.fetch_and(!mask);
    }

    /// Clears both banks' squirting bits; called when the pulse timer expires
    pub fn end_pulses(&self) {
        self.bits.fetch_and(!SquirtBit::PULSE_IN_PROGRESS);
    }

    /// Returns true if the bit is set
    pub fn check(&self, bit: SquirtBit) -> bool {
        self.state().contains(bit)
    }

    /// The whole state byte
    pub fn state(&self) -> SquirtState {
        SquirtState::from_bits(self.bits.load())
    }

    /// Replaces the whole state byte
    pub fn store(&self, state: SquirtState) {
        self.bits.store(state.bits());
    }

    fn state_in(&self, cs: CriticalSection<'_>) -> SquirtState {
        SquirtState::from_bits(self.bits.load_in(cs))
    }
}

/// Interrupt-written half of the live status
///
/// Every method takes `&self`, so one instance can live in a `static` shared
/// by the main loop and the interrupt handlers. No method blocks, allocates,
/// or fails.
///
/// # Example
/// ```rust
/// use ecucore::status::InterruptShared;
///
/// static SHARED: InterruptShared = InterruptShared::new();
///
/// // trigger interrupt
/// SHARED.set_rpm(3200);
/// SHARED.count_ignition();
///
/// assert_eq!(SHARED.rpm(), 3200);
/// ```
#[derive(Debug, Default)]
pub struct InterruptShared {
    has_sync: ByteCell,
    rpm: IsrCell<u16>,
    pw: IsrCell<u16>,
    squirt: SharedSquirt,
    spark: ByteCell,
    run_secs: ByteCell,
    secl: ByteCell,
    loops_per_second: IsrCell<u16>,
    ignition_count: ByteCell,
    tooth_log: ToothLog,
}

/// Copy of every interrupt-written field, taken in one critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterruptFields {
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
    /// Seconds since cranking began, stopping at 255
    pub run_secs: u8,
    /// Free-running seconds counter, wrapping at 255
    pub secl: u8,
    /// Main loop iterations in the last second
    pub loops_per_second: u16,
    /// Ignition events, wrapping at 255
    pub ignition_count: u8,
}

impl InterruptShared {
    /// Creates a status with every field zeroed
    pub const fn new() -> Self {
        Self {
            has_sync: ByteCell::new(0),
            rpm: IsrCell::new(0),
            pw: IsrCell::new(0),
            squirt: SharedSquirt::new(),
            spark: ByteCell::new(0),
            run_secs: ByteCell::new(0),
            secl: ByteCell::new(0),
            loops_per_second: IsrCell::new(0),
            ignition_count: ByteCell::new(0),
            tooth_log: ToothLog::new(),
        }
    }

    /// Returns true if the trigger decoder has position sync
    pub fn has_sync(&self) -> bool {
        self.has_sync.load() != 0
    }

    /// Records gain or loss of trigger sync
    pub fn set_sync(&self, synced: bool) {
        self.has_sync.store(u8::from(synced));
    }

    /// Engine speed
    pub fn rpm(&self) -> u16 {
        self.rpm.get()
    }

    /// Records engine speed
    pub fn set_rpm(&self, rpm: u16) {
        self.rpm.set(rpm);
    }

    /// Injector pulse width in microseconds
    pub fn pw(&self) -> u16 {
        self.pw.get()
    }

    /// Records injector pulse width in microseconds
    pub fn set_pw(&self, pw: u16) {
        self.pw.set(pw);
    }

    /// Injection state
    pub fn squirt(&self) -> &SharedSquirt {
        &self.squirt
    }

    /// Ignition state byte
    pub fn spark(&self) -> u8 {
        self.spark.load()
    }

    /// Replaces the ignition state byte
    pub fn set_spark(&self, spark: u8) {
        self.spark.store(spark);
    }

    /// Seconds since cranking began
    pub fn run_secs(&self) -> u8 {
        self.run_secs.load()
    }

    /// Free-running seconds counter
    pub fn secl(&self) -> u8 {
        self.secl.load()
    }

    /// Advances both seconds counters; called from the one-second timer
    ///
    /// `secl` wraps from 255 to 0. `run_secs` counts only while `running`
    /// and stops at 255; it resets to 0 when the engine is not running.
    pub fn tick_second(&self, running: bool) {
        self.secl.wrapping_increment();
        if running {
            self.run_secs.saturating_increment();
        } else {
            self.run_secs.store(0);
        }
    }

    /// Seconds elapsed since `earlier` was read from [`Self::secl`]
    ///
    /// Correct across one wrap of the counter.
    pub fn secl_elapsed_since(&self, earlier: u8) -> u8 {
        self.secl().wrapping_sub(earlier)
    }

    /// Main loop iterations in the last second
    pub fn loops_per_second(&self) -> u16 {
        self.loops_per_second.get()
    }

    /// Records the main loop rate
    pub fn set_loops_per_second(&self, loops: u16) {
        self.loops_per_second.set(loops);
    }

    /// Ignition events, modulo 256
    pub fn ignition_count(&self) -> u8 {
        self.ignition_count.load()
    }

    /// Counts one ignition event and returns the new count
    pub fn count_ignition(&self) -> u8 {
        self.ignition_count.wrapping_increment()
    }

    /// Tooth gap history
    pub fn tooth_log(&self) -> &ToothLog {
        &self.tooth_log
    }

    /// Copies every field at once
    pub fn capture(&self) -> InterruptFields {
        critical_section::with(|cs| self.capture_in(cs))
    }

    /// Copies every field inside an already-open critical section
    pub fn capture_in(&self, cs: CriticalSection<'_>) -> InterruptFields {
        InterruptFields {
            has_sync: self.has_sync.load_in(cs) != 0,
            rpm: self.rpm.get_in(cs),
            pw: self.pw.get_in(cs),
            squirt: self.squirt.state_in(cs),
            spark: self.spark.load_in(cs),
            run_secs: self.run_secs.load_in(cs),
            secl: self.secl.load_in(cs),
            loops_per_second: self.loops_per_second.get_in(cs),
            ignition_count: self.ignition_count.load_in(cs),
        }
    }
}
