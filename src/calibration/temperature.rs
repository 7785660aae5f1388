//! Offset encoding for temperatures stored in a single byte
//!
//! Temperatures are stored as `°C + 40`, giving an unsigned range of
//! -40 °C to 215 °C.

/// Offset added to every stored temperature
pub const TEMPERATURE_OFFSET: i16 = 40;

/// Lowest representable temperature in °C
pub const MIN_CELSIUS: i16 = -TEMPERATURE_OFFSET;

/// Highest representable temperature in °C
pub const MAX_CELSIUS: i16 = u8::MAX as i16 - TEMPERATURE_OFFSET;

/// Encodes a temperature, saturating outside -40..=215 °C
pub const fn encode(celsius: i16) -> u8 {
    let clamped = if celsius < MIN_CELSIUS {
        MIN_CELSIUS
    } else if celsius > MAX_CELSIUS {
        MAX_CELSIUS
    } else {
        celsius
    };
    (clamped + TEMPERATURE_OFFSET) as u8
}

/// Decodes a stored temperature byte to °C
pub const fn decode(stored: u8) -> i16 {
    stored as i16 - TEMPERATURE_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        assert_eq!(encode(0), 40);
        assert_eq!(encode(100), 140);
        assert_eq!(decode(0), -40);
        assert_eq!(decode(255), 215);
    }

    #[test]
    fn test_full_range_round_trip() {
        for celsius in MIN_CELSIUS..=MAX_CELSIUS {
            assert_eq!(decode(encode(celsius)), celsius);
        }
    }

    #[test]
    fn test_saturation() {
        assert_eq!(encode(-100), 0);
        assert_eq!(encode(400), 255);
    }
}
