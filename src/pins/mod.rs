//! Logical-function to physical-pin assignments
//!
//! The I/O driver layer reads a [`PinMap`] once at boot to configure its
//! outputs and analog inputs. Each board revision has one layout, selected by
//! the `pin_mapping` byte of [`ConfigPage1`](crate::config::ConfigPage1).
//!
//! Pin numbers follow the Arduino Mega numbering; analog inputs start at
//! [`A0`]. Pin 0 is the serial receive line on every supported board, so it
//! doubles as the "unassigned" sentinel.

/// Arduino Mega number of analog input A0
pub const A0: u8 = 54;

/// Number of injector outputs in a map
pub const INJECTOR_SLOTS: usize = 8;

/// Number of ignition coil outputs in a map
pub const COIL_SLOTS: usize = 4;

/// Number of spare temperature inputs in a map
pub const SPARE_TEMP_SLOTS: usize = 2;

/// Number of spare generic outputs in a map
pub const SPARE_OUT_SLOTS: usize = 6;

/// Total number of pin slots in a map
pub const PIN_SLOTS: usize = INJECTOR_SLOTS + COIL_SLOTS + SPARE_TEMP_SLOTS + SPARE_OUT_SLOTS + 11;

const fn analog(channel: u8) -> Pin {
    Pin(A0 + channel)
}

/// A physical pin number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pin(u8);

impl Pin {
    /// No pin assigned
    pub const UNASSIGNED: Self = Self(0);

    /// Wraps a raw pin number; 0 means unassigned
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Returns true if a physical pin is assigned
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// The pin number, if one is assigned
    pub const fn number(self) -> Option<u8> {
        if self.is_assigned() { Some(self.0) } else { None }
    }

    /// Raw byte, 0 when unassigned
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// What a pin slot drives or reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinFunction {
    /// Injector output, numbered from 1
    Injector(u8),
    /// Ignition coil output, numbered from 1
    Coil(u8),
    /// Primary trigger (crank) input
    Trigger,
    /// Secondary trigger (cam) input
    Trigger2,
    /// Throttle position sensor
    Tps,
    /// Manifold pressure sensor
    Map,
    /// Second manifold pressure sensor
    Map2,
    /// Intake air temperature sensor
    Iat,
    /// Coolant temperature sensor
    Clt,
    /// Exhaust oxygen sensor
    O2,
    /// Battery voltage divider
    Battery,
    /// Display reset line
    DisplayReset,
    /// Tachometer output
    TachOut,
    /// Spare temperature input, numbered from 1
    SpareTemp(u8),
    /// Spare generic output, numbered from 1
    SpareOut(u8),
}

/// Supported board revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardLayout {
    /// Board v0.1
    V01,
    /// Board v0.2
    V02,
    /// Board v0.3
    V03,
    /// Board v0.4
    V04,
}

impl BoardLayout {
    /// Every supported revision
    pub const ALL: [Self; 4] = [Self::V01, Self::V02, Self::V03, Self::V04];

    /// Looks up the revision stored in `pin_mapping`
    pub const fn from_byte(pin_mapping: u8) -> Option<Self> {
        match pin_mapping {
            1 => Some(Self::V01),
            2 => Some(Self::V02),
            3 => Some(Self::V03),
            4 => Some(Self::V04),
            _ => None,
        }
    }

    /// The `pin_mapping` byte selecting this revision
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::V01 => 1,
            Self::V02 => 2,
            Self::V03 => 3,
            Self::V04 => 4,
        }
    }
}

/// Every pin the firmware drives or reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinMap {
    /// Injector outputs 1-8
    pub injectors: [Pin; INJECTOR_SLOTS],
    /// Ignition coil outputs 1-4
    pub coils: [Pin; COIL_SLOTS],
    /// Primary trigger input
    pub trigger: Pin,
    /// Secondary trigger input
    pub trigger2: Pin,
    /// Throttle position input
    pub tps: Pin,
    /// Manifold pressure input
    pub map: Pin,
    /// Second manifold pressure input
    pub map2: Pin,
    /// Intake air temperature input
    pub iat: Pin,
    /// Coolant temperature input
    pub clt: Pin,
    /// Oxygen sensor input
    pub o2: Pin,
    /// Battery voltage input
    pub battery: Pin,
    /// Display reset output
    pub display_reset: Pin,
    /// Tachometer output
    pub tach_out: Pin,
    /// Spare temperature inputs 1-2
    pub spare_temp: [Pin; SPARE_TEMP_SLOTS],
    /// Spare generic outputs 1-6
    pub spare_out: [Pin; SPARE_OUT_SLOTS],
}

impl PinMap {
    /// A map with nothing assigned
    pub const UNASSIGNED: Self = Self {
        injectors: [Pin::UNASSIGNED; INJECTOR_SLOTS],
        coils: [Pin::UNASSIGNED; COIL_SLOTS],
        trigger: Pin::UNASSIGNED,
        trigger2: Pin::UNASSIGNED,
        tps: Pin::UNASSIGNED,
        map: Pin::UNASSIGNED,
        map2: Pin::UNASSIGNED,
        iat: Pin::UNASSIGNED,
        clt: Pin::UNASSIGNED,
        o2: Pin::UNASSIGNED,
        battery: Pin::UNASSIGNED,
        display_reset: Pin::UNASSIGNED,
        tach_out: Pin::UNASSIGNED,
        spare_temp: [Pin::UNASSIGNED; SPARE_TEMP_SLOTS],
        spare_out: [Pin::UNASSIGNED; SPARE_OUT_SLOTS],
    };

    /// The map for a `pin_mapping` byte
    ///
    /// Unknown layouts yield [`PinMap::UNASSIGNED`] and a warning, so no
    /// output is driven on a board the firmware does not know.
    pub fn for_layout(pin_mapping: u8) -> Self {
        match BoardLayout::from_byte(pin_mapping) {
            Some(layout) => Self::for_board(layout),
            None => {
                log::warn!("unknown pin layout {}, all pins unassigned", pin_mapping);
                Self::UNASSIGNED
            }
        }
    }

    /// The map for a known board revision
    pub const fn for_board(layout: BoardLayout) -> Self {
        let mut map = Self::UNASSIGNED;
        match layout {
            BoardLayout::V01 => {
                map.injectors[0] = Pin(8);
                map.injectors[1] = Pin(9);
                map.injectors[2] = Pin(11);
                map.injectors[3] = Pin(10);
                map.coils = [Pin(6), Pin(7), Pin(12), Pin(13)];
                map.trigger = Pin(2);
                map.trigger2 = Pin(3);
                map.tps = analog(0);
                map.map = analog(1);
                map.iat = analog(2);
                map.clt = analog(3);
                map.o2 = analog(4);
            }
            BoardLayout::V02 | BoardLayout::V03 => {
                map.injectors[0] = Pin(8);
                map.injectors[1] = Pin(9);
                map.injectors[2] = Pin(10);
                map.injectors[3] = Pin(11);
                map.coils = [Pin(28), Pin(24), Pin(40), Pin(36)];
                map.tps = analog(2);
                map.map = analog(3);
                map.iat = analog(0);
                map.clt = analog(1);
                map.o2 = analog(8);
                map.battery = analog(4);
                map.display_reset = Pin(48);
                if matches!(layout, BoardLayout::V02) {
                    map.trigger = Pin(20);
                    map.trigger2 = Pin(21);
                } else {
                    map.trigger = Pin(19);
                    map.trigger2 = Pin(18);
                    map.tach_out = Pin(49);
                }
            }
            BoardLayout::V04 => {
                map.injectors[0] = Pin(8);
                map.injectors[1] = Pin(9);
                map.injectors[2] = Pin(10);
                map.injectors[3] = Pin(11);
                map.injectors[4] = Pin(12);
                map.coils = [Pin(40), Pin(38), Pin(52), Pin(50)];
                map.trigger = Pin(19);
                map.trigger2 = Pin(18);
                map.tps = analog(2);
                map.map = analog(3);
                map.iat = analog(0);
                map.clt = analog(1);
                map.o2 = analog(8);
                map.battery = analog(4);
                map.display_reset = Pin(48);
                map.tach_out = Pin(49);
            }
        }
        map
    }

    /// The pin serving `function`
    ///
    /// Out-of-range slot numbers read as unassigned.
    pub fn get(&self, function: PinFunction) -> Pin {
        fn slot<const N: usize>(pins: &[Pin; N], number: u8) -> Pin {
            usize::from(number)
                .checked_sub(1)
                .and_then(|index| pins.get(index).copied())
                .unwrap_or(Pin::UNASSIGNED)
        }

        match function {
            PinFunction::Injector(n) => slot(&self.injectors, n),
            PinFunction::Coil(n) => slot(&self.coils, n),
            PinFunction::Trigger => self.trigger,
            PinFunction::Trigger2 => self.trigger2,
            PinFunction::Tps => self.tps,
            PinFunction::Map => self.map,
            PinFunction::Map2 => self.map2,
            PinFunction::Iat => self.iat,
            PinFunction::Clt => self.clt,
            PinFunction::O2 => self.o2,
            PinFunction::Battery => self.battery,
            PinFunction::DisplayReset => self.display_reset,
            PinFunction::TachOut => self.tach_out,
            PinFunction::SpareTemp(n) => slot(&self.spare_temp, n),
            PinFunction::SpareOut(n) => slot(&self.spare_out, n),
        }
    }

    /// Every slot with its function, assigned or not
    pub fn iter(&self) -> impl Iterator<Item = (PinFunction, Pin)> {
        let mut slots = [(PinFunction::Trigger, Pin::UNASSIGNED); PIN_SLOTS];
        let mut next = 0;
        let mut push = |function: PinFunction, pin: Pin| {
            slots[next] = (function, pin);
            next += 1;
        };

        for (i, &pin) in self.injectors.iter().enumerate() {
            push(PinFunction::Injector(i as u8 + 1), pin);
        }
        for (i, &pin) in self.coils.iter().enumerate() {
            push(PinFunction::Coil(i as u8 + 1), pin);
        }
        push(PinFunction::Trigger, self.trigger);
        push(PinFunction::Trigger2, self.trigger2);
        push(PinFunction::Tps, self.tps);
        push(PinFunction::Map, self.map);
        push(PinFunction::Map2, self.map2);
        push(PinFunction::Iat, self.iat);
        push(PinFunction::Clt, self.clt);
        push(PinFunction::O2, self.o2);
        push(PinFunction::Battery, self.battery);
        push(PinFunction::DisplayReset, self.display_reset);
        push(PinFunction::TachOut, self.tach_out);
        for (i, &pin) in self.spare_temp.iter().enumerate() {
            push(PinFunction::SpareTemp(i as u8 + 1), pin);
        }
        for (i, &pin) in self.spare_out.iter().enumerate() {
            push(PinFunction::SpareOut(i as u8 + 1), pin);
        }

        slots.into_iter()
    }

    /// Assigned slots only
    pub fn assigned(&self) -> impl Iterator<Item = (PinFunction, u8)> {
        self.iter()
            .filter_map(|(function, pin)| pin.number().map(|number| (function, number)))
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_sentinel() {
        assert!(!Pin::UNASSIGNED.is_assigned());
        assert_eq!(Pin::UNASSIGNED.number(), None);
        assert_eq!(Pin::new(13).number(), Some(13));
    }

    #[test]
    fn test_unknown_layout() {
        for byte in [0u8, 5, 255] {
            let map = PinMap::for_layout(byte);
            assert_eq!(map, PinMap::UNASSIGNED);
            assert_eq!(map.assigned().count(), 0);
        }
    }

    #[test]
    fn test_layout_bytes() {
        for layout in BoardLayout::ALL {
            assert_eq!(BoardLayout::from_byte(layout.to_byte()), Some(layout));
            assert_eq!(PinMap::for_layout(layout.to_byte()), PinMap::for_board(layout));
        }
    }

    #[test]
    fn test_v03_pins() {
        let map = PinMap::for_board(BoardLayout::V03);
        assert_eq!(map.get(PinFunction::Injector(1)), Pin::new(8));
        assert_eq!(map.get(PinFunction::Coil(4)), Pin::new(36));
        assert_eq!(map.get(PinFunction::Trigger), Pin::new(19));
        assert_eq!(map.get(PinFunction::TachOut), Pin::new(49));
        assert_eq!(map.get(PinFunction::Tps), Pin::new(A0 + 2));
        assert_eq!(map.get(PinFunction::Injector(5)), Pin::UNASSIGNED);
        assert_eq!(map.get(PinFunction::Injector(0)), Pin::UNASSIGNED);
        assert_eq!(map.get(PinFunction::SpareOut(7)), Pin::UNASSIGNED);
    }

    #[test]
    fn test_iter_covers_every_slot() {
        let map = PinMap::for_board(BoardLayout::V04);
        assert_eq!(map.iter().count(), PIN_SLOTS);
        for (function, pin) in map.iter() {
            assert_eq!(map.get(function), pin);
        }
        assert_eq!(map.assigned().count(), 5 + 4 + 2 + 6 + 2);
    }

    #[test]
    fn test_assigned_pins_are_distinct() {
        for layout in BoardLayout::ALL {
            let map = PinMap::for_board(layout);
            let mut seen = [false; 256];
            for (_, number) in map.assigned() {
                assert!(!seen[usize::from(number)], "{layout:?} reuses pin {number}");
                seen[usize::from(number)] = true;
            }
        }
    }
}
