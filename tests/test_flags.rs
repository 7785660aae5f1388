//! Quickcheck tests for the bit protocol
//!
//! - set_bit / clear_bit touch exactly the addressed bit
//! - check_bit reports the bit just written
//! - Typed state masks agree with the raw protocol

#![allow(special_module_name)]

use ecucore::flags::{EngineBit, EngineState, SquirtBit, SquirtState, check_bit, clear_bit, set_bit};
use quickcheck_macros::quickcheck;

mod lib;

#[quickcheck]
fn set_bit_changes_only_one_bit(mask: u8, position: u8) -> bool {
    let position = position % 8;
    let updated = set_bit(mask, position);
    check_bit(updated, position) && (updated & !(1 << position)) == (mask & !(1 << position))
}

#[quickcheck]
fn clear_bit_changes_only_one_bit(mask: u8, position: u8) -> bool {
    let position = position % 8;
    let updated = clear_bit(mask, position);
    !check_bit(updated, position) && (updated & !(1 << position)) == (mask & !(1 << position))
}

#[quickcheck]
fn set_then_clear_restores_other_bits(mask: u8, position: u8) -> bool {
    let position = position % 8;
    clear_bit(set_bit(mask, position), position) == clear_bit(mask, position)
}

#[quickcheck]
fn engine_state_matches_raw_protocol(mask: u8, position: u8, on: bool) -> bool {
    let bit = match EngineBit::from_position(position % 8) {
        Some(bit) => bit,
        None => return false,
    };
    let mut state = EngineState::from_bits(mask);
    state.assign(bit, on);

    let raw = if on {
        set_bit(mask, bit.position())
    } else {
        clear_bit(mask, bit.position())
    };
    state.bits() == raw && state.contains(bit) == on
}

#[quickcheck]
fn squirt_positions_above_six_do_not_exist(position: u8) -> bool {
    SquirtBit::from_position(position).is_some() == (position < 7)
}

#[quickcheck]
fn acceleration_bits_combine_freely(acc: bool, dcc: bool, map_acc: bool) -> bool {
    let mut state = EngineState::EMPTY;
    state.assign(EngineBit::Acc, acc);
    state.assign(EngineBit::Dcc, dcc);
    state.assign(EngineBit::MapAcc, map_acc);
    state.contains(EngineBit::Acc) == acc
        && state.contains(EngineBit::Dcc) == dcc
        && state.contains(EngineBit::MapAcc) == map_acc
}

#[test]
fn test_run_crank_scenario() {
    let mut engine = EngineState::EMPTY;
    engine.set(EngineBit::Run);
    engine.set(EngineBit::Crank);
    assert!(engine.contains(EngineBit::Run) && engine.contains(EngineBit::Crank));
    assert!(!engine.contains(EngineBit::Idle));

    engine.clear(EngineBit::Crank);
    assert!(engine.contains(EngineBit::Run));
    assert!(!engine.contains(EngineBit::Crank));
}

#[test]
fn test_squirt_state_from_raw() {
    let state = SquirtState::from(0b0000_1100u8);
    assert!(state.contains(SquirtBit::Scheduled));
    assert!(state.contains(SquirtBit::Squirting));
    assert_eq!(u8::from(state), 0b0000_1100);
}
