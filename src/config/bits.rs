//! Bit-packed configuration bytes
//!
//! Several page slots pack small enumerations and counts into one byte. The
//! [`bit_group!`] macro generates a `u8` newtype with one getter and setter
//! per field and a compile-time check that the fields neither overlap nor
//! stray outside the byte, and that their widths add up to the group's
//! declared budget. Bits outside every field are spare: they are kept
//! verbatim so an image written by a newer tool survives a round trip.

/// Mask of the low `width` bits
pub const fn width_mask(width: u8) -> u8 {
    if width >= 8 {
        u8::MAX
    } else {
        (1u8 << width) - 1
    }
}

/// Mask of a field at `shift` spanning `width` bits
pub const fn field_mask(shift: u8, width: u8) -> u8 {
    width_mask(width) << shift
}

/// Returns true if `fields` (shift, width) pairs are non-empty, in range,
/// disjoint, and together exactly `budget` bits wide
pub const fn fields_fit(fields: &[(u8, u8)], budget: u8) -> bool {
    if budget > 8 {
        return false;
    }
    let mut used = 0u8;
    let mut total = 0u8;
    let mut i = 0;
    while i < fields.len() {
        let (shift, width) = fields[i];
        if width == 0 || shift as u16 + width as u16 > 8 {
            return false;
        }
        let mask = field_mask(shift, width);
        if used & mask != 0 {
            return false;
        }
        used |= mask;
        total += width;
        i += 1;
    }
    total == budget
}

/// Defines a bit-packed configuration byte
///
/// Each field is written `getter / setter: shift, width;`. Setters drop value
/// bits beyond the field's width and leave every other bit untouched.
///
/// ```ignore
/// bit_group! {
///     /// Injector setup
///     Setup, budget: 6, {
///         /// Cylinder count
///         cylinders / set_cylinders: 0, 4;
///         /// Two-stroke flag
///         two_stroke / set_two_stroke: 4, 2;
///     }
/// }
/// ```
macro_rules! bit_group {
    (
        $(#[$meta:meta])*
        $name:ident, budget: $budget:literal, {
            $( $(#[$field_meta:meta])* $get:ident / $set:ident : $shift:literal, $width:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u8);

        impl $name {
            /// Bits covered by a named field
            pub const USED_MASK: u8 = 0 $( | $crate::config::bits::field_mask($shift, $width) )+;

            /// Wraps a raw byte, spare bits included
            pub const fn from_bits(bits: u8) -> Self {
                Self(bits)
            }

            /// Raw byte, spare bits included
            pub const fn bits(self) -> u8 {
                self.0
            }

            $(
                $(#[$field_meta])*
                pub const fn $get(self) -> u8 {
                    (self.0 >> $shift) & $crate::config::bits::width_mask($width)
                }

                #[doc = concat!("Sets [`Self::", stringify!($get), "`], keeping the low ", stringify!($width), " bit(s) of `value`")]
                pub fn $set(&mut self, value: u8) {
                    let mask = $crate::config::bits::field_mask($shift, $width);
                    self.0 = (self.0 & !mask) | ((value << $shift) & mask);
                }
            )+
        }

        const _: () = assert!(
            $crate::config::bits::fields_fit(&[$(($shift, $width)),+], $budget),
            concat!("bit fields of ", stringify!($name), " do not fit their declared budget"),
        );
    };
}

pub(crate) use bit_group;

#[cfg(test)]
mod tests {
    use super::*;

    bit_group! {
        /// Test group
        Packed, budget: 6, {
            /// Low field
            low / set_low: 0, 2;
            /// High field
            high / set_high: 2, 4;
        }
    }

    #[test]
    fn test_masks() {
        assert_eq!(width_mask(3), 0b111);
        assert_eq!(width_mask(8), 0xFF);
        assert_eq!(field_mask(6, 2), 0b1100_0000);
        assert_eq!(Packed::USED_MASK, 0b0011_1111);
    }

    #[test]
    fn test_fields_fit() {
        assert!(fields_fit(&[(0, 3), (3, 3), (6, 2)], 8));
        assert!(fields_fit(&[(0, 2), (2, 2)], 4));
        assert!(!fields_fit(&[(0, 3), (2, 3)], 6));
        assert!(!fields_fit(&[(6, 3)], 3));
        assert!(!fields_fit(&[(0, 2)], 3));
        assert!(!fields_fit(&[(0, 0)], 0));
    }

    #[test]
    fn test_setters_isolate_fields() {
        let mut packed = Packed::from_bits(0b1100_0000);
        packed.set_high(0b1010);
        packed.set_low(0b111);
        assert_eq!(packed.low(), 0b11);
        assert_eq!(packed.high(), 0b1010);
        assert_eq!(packed.bits(), 0b1110_1011);

        packed.set_high(0);
        assert_eq!(packed.bits(), 0b1100_0011);
    }
}
