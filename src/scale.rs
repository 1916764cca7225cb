use crate::constants::{Gain, MAX_CODE};

/// Gain setting together with the volts-per-digit it implies.
///
/// Both are replaced as one value so a reader never sees a scale factor
/// belonging to a different gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    gain: Gain,
    volts_per_digit: f64,
}

impl Scale {
    pub fn new(gain: Gain, v_ref: f64) -> Self {
        Scale {
            gain,
            volts_per_digit: 2.0 * v_ref / (gain.value() * f64::from(MAX_CODE)),
        }
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn volts_per_digit(&self) -> f64 {
        self.volts_per_digit
    }

    pub fn to_voltage(&self, code: i32) -> f64 {
        f64::from(code) * self.volts_per_digit
    }
}

/// Sign-extends a big-endian 24-bit two's-complement conversion result.
pub fn decode_code(bytes: [u8; 3]) -> i32 {
    i32::from_be_bytes([bytes[0], bytes[1], bytes[2], 0]) >> 8
}
