//! Tests for the live status split between interrupt and main-loop writers
//!
//! - Interrupt-side counters and bits stay exact under concurrent writers
//! - Snapshots never mix two writes of the same interrupt update
//! - TPS history only moves forward in time
//! - Tooth history wraps and reads back oldest first

#![allow(special_module_name)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ecucore::error::EcuError;
use ecucore::prelude::*;
use ecucore::status::{FRAME_LEN, TOOTH_LOG_SIZE, ToothLog, snapshot::frame};
use proptest::prelude::*;

mod lib;
use lib::*;

proptest! {
    #![proptest_config(concurrent_config())]

    /// Every ignition counted from any thread shows up modulo 256
    #[test]
    fn ignition_count_is_exact(threads in 2usize..6, per_thread in 1usize..400) {
        let shared = Arc::new(InterruptShared::new());
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        shared.count_ignition();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        prop_assert_eq!(shared.ignition_count(), ((threads * per_thread) % 256) as u8);
    }

    /// Bits set by one writer are never lost to another writer's update
    #[test]
    fn squirt_bits_survive_concurrent_writers(rounds in 1usize..200) {
        let shared = Arc::new(InterruptShared::new());
        let writers: Vec<_> = [SquirtBit::Inj1, SquirtBit::Inj2, SquirtBit::BoostCtrlOff]
            .into_iter()
            .map(|bit| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..rounds {
                        shared.squirt().clear(bit);
                        shared.squirt().set(bit);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        let state = shared.squirt().state();
        prop_assert!(state.contains(SquirtBit::Inj1));
        prop_assert!(state.contains(SquirtBit::Inj2));
        prop_assert!(state.contains(SquirtBit::BoostCtrlOff));
        prop_assert!(!state.contains(SquirtBit::Scheduled));
    }
}

proptest! {
    #![proptest_config(page_config())]

    /// TPS samples offered in time order are all accepted, older ones rejected
    #[test]
    fn tps_history_moves_forward(times in prop::collection::vec(any::<u32>(), 1..32)) {
        let shared = InterruptShared::new();
        let mut live = LiveStatus::new(&shared);
        for (step, time) in times.into_iter().enumerate() {
            let before = live.tps_time();
            let result = live.update_tps(step as u8, step as u8, time);
            if time < before {
                prop_assert_eq!(
                    result,
                    Err(EcuError::TimestampRegression { current: before, offered: time })
                );
                prop_assert_eq!(live.tps_time(), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(live.tps_time(), time);
                prop_assert_eq!(live.tps_last_time(), before);
            }
            prop_assert!(live.tps_last_time() <= live.tps_time());
        }
    }

    /// The history keeps the newest gaps in arrival order
    #[test]
    fn tooth_log_keeps_newest(count in 0usize..1300) {
        let log = ToothLog::new();
        for gap in 0..count {
            log.record(gap as u16);
        }

        let mut out = [0u16; TOOTH_LOG_SIZE];
        let len = log.copy_ordered(&mut out);
        prop_assert_eq!(len, count.min(TOOTH_LOG_SIZE));
        prop_assert_eq!(log.write_index(), count % TOOTH_LOG_SIZE);
        let first = count - len;
        for (slot, gap) in out[..len].iter().enumerate() {
            prop_assert_eq!(usize::from(*gap), first + slot);
        }
    }

    /// The seconds counter difference survives one wrap
    #[test]
    fn secl_elapsed_wraps(start in 0usize..256, elapsed in 0u8..=255) {
        let shared = InterruptShared::new();
        for _ in 0..start {
            shared.tick_second(true);
        }
        let earlier = shared.secl();
        for _ in 0..elapsed {
            shared.tick_second(true);
        }
        prop_assert_eq!(shared.secl_elapsed_since(earlier), elapsed);
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[test]
fn test_snapshot_reads_interrupt_fields_together() {
    static SHARED: InterruptShared = InterruptShared::new();
    let running = Arc::new(AtomicBool::new(true));

    // The writer keeps rpm and pw in lockstep inside one critical section
    let writer = {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut value = 0u16;
            while running.load(Ordering::Relaxed) {
                value = value.wrapping_add(1);
                critical_section::with(|_| {
                    SHARED.set_rpm(value);
                    SHARED.set_pw(value);
                });
            }
        })
    };

    let live = LiveStatus::new(&SHARED);
    for _ in 0..2_000 {
        let snapshot = live.snapshot();
        assert_eq!(snapshot.rpm, snapshot.pw);
    }
    running.store(false, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn test_run_seconds_follow_engine_state() {
    let shared = InterruptShared::new();
    for _ in 0..3 {
        shared.tick_second(true);
    }
    assert_eq!(shared.run_secs(), 3);

    shared.tick_second(false);
    assert_eq!(shared.run_secs(), 0);
    assert_eq!(shared.secl(), 4);
}

#[test]
fn test_live_status_frame() {
    let shared = InterruptShared::new();
    shared.set_sync(true);
    shared.set_rpm(3_000);
    shared.set_loops_per_second(812);
    shared.squirt().set(SquirtBit::Squirting);

    let table = CalibrationTable::filled(130);
    let mut live = LiveStatus::new(&shared);
    live.update_coolant(300, &table);
    live.update_battery(700, 141);
    live.engine.set(EngineBit::Run);
    live.engine.set(EngineBit::Warmup);
    live.dwell = 35;

    let bytes = live.snapshot().to_frame();
    assert_eq!(bytes.len(), FRAME_LEN);
    assert_eq!(bytes[frame::COOLANT], 130);
    assert_eq!(bytes[frame::BATTERY10], 141);
    assert_eq!(bytes[frame::ENGINE], 0b1001);
    assert_eq!(bytes[frame::SQUIRT], 0b1000);
    assert_eq!(&bytes[frame::RPM..frame::RPM + 2], &3_000u16.to_le_bytes());
    assert_eq!(
        &bytes[frame::LOOPS_PER_SECOND..frame::LOOPS_PER_SECOND + 2],
        &812u16.to_le_bytes()
    );
    assert_eq!(&bytes[frame::DWELL..frame::DWELL + 2], &35u16.to_le_bytes());
    assert_eq!(bytes[frame::HAS_SYNC], 1);
}

#[test]
fn test_tooth_log_clear() {
    let log = ToothLog::new();
    log.record(1_200);
    log.record(1_180);
    assert_eq!(log.len(), 2);

    log.clear();
    assert!(log.is_empty());
    assert_eq!(log.write_index(), 0);
}

#[test]
fn test_tooth_log_concurrent_writers() {
    static SHARED: InterruptShared = InterruptShared::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                for gap in 0..100u16 {
                    SHARED.tooth_log().record(gap);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(SHARED.tooth_log().len(), 400);
    assert_eq!(SHARED.tooth_log().write_index(), 400);
}
