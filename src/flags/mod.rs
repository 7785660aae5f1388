//! Named bit positions for the engine and squirt state bitmasks
//!
//! Both masks are single bytes. The raw protocol ([`set_bit`], [`clear_bit`],
//! [`check_bit`]) works on positions 0-7 and always touches exactly one bit.
//! [`EngineState`] and [`SquirtState`] wrap the raw byte with typed positions.
//!
//! | Bit | [`EngineBit`] | [`SquirtBit`] |
//! |-----|---------------|---------------|
//! | 0 | `Run` | `Inj1` |
//! | 1 | `Crank` | `Inj2` |
//! | 2 | `Ase` | `Scheduled` |
//! | 3 | `Warmup` | `Squirting` |
//! | 4 | `Acc` | `Inj2Scheduled` |
//! | 5 | `Dcc` | `Inj2Squirting` |
//! | 6 | `MapAcc` | `BoostCtrlOff` |
//! | 7 | `Idle` | - |

/// Number of addressable positions in a state mask
pub const MASK_BITS: u8 = 8;

const fn bit(position: u8) -> u8 {
    debug_assert!(position < MASK_BITS);
    1 << (position & (MASK_BITS - 1))
}

/// Returns `mask` with the bit at `position` set
pub const fn set_bit(mask: u8, position: u8) -> u8 {
    mask | bit(position)
}

/// Returns `mask` with the bit at `position` cleared
pub const fn clear_bit(mask: u8, position: u8) -> u8 {
    mask & !bit(position)
}

/// Returns true if the bit at `position` is set in `mask`
pub const fn check_bit(mask: u8, position: u8) -> bool {
    mask & bit(position) != 0
}

/// Defines a typed bit position enum and the state byte it indexes
macro_rules! state_mask {
    (
        $(#[$bit_meta:meta])*
        bits: $bits:ident,
        $(#[$state_meta:meta])*
        state: $state:ident,
        {
            $( $(#[$variant_meta:meta])* $variant:ident = $position:literal, )+
        }
    ) => {
        $(#[$bit_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $bits {
            $( $(#[$variant_meta])* $variant = $position, )+
        }

        impl $bits {
            /// Every position, lowest first
            pub const ALL: &'static [$bits] = &[$($bits::$variant),+];

            /// Bit position within the state byte
            pub const fn position(self) -> u8 {
                self as u8
            }

            /// Single-bit mask for this position
            pub const fn mask(self) -> u8 {
                1 << (self as u8)
            }

            /// Looks up the position with the given index
            pub const fn from_position(position: u8) -> Option<Self> {
                match position {
                    $( $position => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        $(#[$state_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $state(u8);

        impl $state {
            /// State with every bit cleared
            pub const EMPTY: Self = Self(0);

            /// Wraps a raw state byte
            pub const fn from_bits(bits: u8) -> Self {
                Self(bits)
            }

            /// Raw state byte
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// Sets one bit, leaving the others unchanged
            pub fn set(&mut self, bit: $bits) {
                self.0 = set_bit(self.0, bit.position());
            }

            /// Clears one bit, leaving the others unchanged
            pub fn clear(&mut self, bit: $bits) {
                self.0 = clear_bit(self.0, bit.position());
            }

            /// Sets or clears one bit
            pub fn assign(&mut self, bit: $bits, on: bool) {
                if on {
                    self.set(bit);
                } else {
                    self.clear(bit);
                }
            }

            /// Returns true if the bit is set
            pub const fn contains(self, bit: $bits) -> bool {
                check_bit(self.0, bit.position())
            }

            /// Returns true if no bit is set
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u8> for $state {
            fn from(bits: u8) -> Self {
                Self(bits)
            }
        }

        impl From<$state> for u8 {
            fn from(state: $state) -> u8 {
                state.0
            }
        }
    };
}

state_mask! {
    /// Engine operating-state bits
    ///
    /// Set and cleared by the main control loop from sensor thresholds; read by
    /// enrichment code to pick the correction path.
    bits: EngineBit,
    /// Engine operating-state bitmask
    state: EngineState,
    {
        /// Engine running
        Run = 0,
        /// Engine cranking
        Crank = 1,
        /// After-start enrichment active
        Ase = 2,
        /// Warm-up enrichment active
        Warmup = 3,
        /// TPS-based acceleration enrichment active
        Acc = 4,
        /// Deceleration fuel cut active
        Dcc = 5,
        /// MAP-based acceleration enrichment active
        MapAcc = 6,
        /// Idle control active
        Idle = 7,
    }
}

state_mask! {
    /// Injection ("squirt") state bits
    ///
    /// Set by scheduling code; the injector interrupt clears the squirting
    /// bits when a pulse completes.
    bits: SquirtBit,
    /// Injection state bitmask
    state: SquirtState,
    {
        /// Injector bank 1 squirt requested
        Inj1 = 0,
        /// Injector bank 2 squirt requested
        Inj2 = 1,
        /// Bank 1 pulse scheduled
        Scheduled = 2,
        /// Bank 1 pulse in progress
        Squirting = 3,
        /// Bank 2 pulse scheduled
        Inj2Scheduled = 4,
        /// Bank 2 pulse in progress
        Inj2Squirting = 5,
        /// Boost cut control disabled
        BoostCtrlOff = 6,
    }
}

impl SquirtBit {
    /// Bits the injector interrupt owns clearing on pulse completion
    pub const PULSE_IN_PROGRESS: u8 = Self::Squirting.mask() | Self::Inj2Squirting.mask();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_protocol_touches_one_bit() {
        for p in 0..MASK_BITS {
            let set = set_bit(0, p);
            assert_eq!(set.count_ones(), 1);
            assert!(check_bit(set, p));
            assert_eq!(clear_bit(0xFF, p).count_ones(), 7);
            assert!(!check_bit(clear_bit(0xFF, p), p));
        }
    }

    #[test]
    fn test_engine_run_and_crank() {
        let mut engine = EngineState::EMPTY;
        engine.set(EngineBit::Run);
        engine.set(EngineBit::Crank);
        assert!(engine.contains(EngineBit::Run));
        assert!(engine.contains(EngineBit::Crank));
        assert!(!engine.contains(EngineBit::Idle));
        assert_eq!(engine.bits(), 0b0000_0011);

        engine.clear(EngineBit::Crank);
        assert!(engine.contains(EngineBit::Run));
        assert!(!engine.contains(EngineBit::Crank));
    }

    #[test]
    fn test_registry_positions() {
        assert_eq!(EngineBit::ALL.len(), 8);
        assert_eq!(SquirtBit::ALL.len(), 7);
        assert_eq!(EngineBit::Idle.position(), 7);
        assert_eq!(SquirtBit::BoostCtrlOff.position(), 6);
        assert_eq!(EngineBit::from_position(4), Some(EngineBit::Acc));
        assert_eq!(SquirtBit::from_position(7), None);
        assert_eq!(SquirtBit::PULSE_IN_PROGRESS, 0b0010_1000);
    }

    #[test]
    fn test_assign() {
        let mut squirt = SquirtState::from_bits(0);
        squirt.assign(SquirtBit::Scheduled, true);
        assert!(squirt.contains(SquirtBit::Scheduled));
        squirt.assign(SquirtBit::Scheduled, false);
        assert!(squirt.is_empty());
    }
}
