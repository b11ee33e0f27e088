use crate::{ReadoutResolution, Temperature};
use embedded_onewire::OneWireCrc;

/// The 9-byte scratchpad of a DS18B20.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0-1 | Temperature, signed, 1/16 °C, little-endian |
/// | 2 | T_H alarm register |
/// | 3 | T_L alarm register |
/// | 4 | Configuration (resolution) |
/// | 5-7 | Reserved |
/// | 8 | CRC-8 of bytes 0-7 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratchpad([u8; 9]);

impl Scratchpad {
    /// Wraps `bytes` if byte 8 is the CRC-8 of bytes 0-7.
    pub fn from_bytes(bytes: [u8; 9]) -> Option<Self> {
        OneWireCrc::validate(&bytes).then_some(Scratchpad(bytes))
    }

    /// Last converted temperature.
    pub fn temperature(&self) -> Temperature {
        Temperature::from_le_bytes([self.0[0], self.0[1]])
    }

    /// Last converted temperature in 1/16 °C.
    pub fn raw_temperature(&self) -> i16 {
        i16::from_le_bytes([self.0[0], self.0[1]])
    }

    /// High alarm threshold in °C.
    pub fn alarm_high(&self) -> i8 {
        self.0[2] as i8
    }

    /// Low alarm threshold in °C.
    pub fn alarm_low(&self) -> i8 {
        self.0[3] as i8
    }

    /// Configured resolution, `None` if the configuration register holds an
    /// unknown pattern.
    pub fn resolution(&self) -> Option<ReadoutResolution> {
        ReadoutResolution::try_from(self.0[4]).ok()
    }

    /// The raw bytes, CRC included.
    pub fn as_bytes(&self) -> &[u8; 9] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_onewire::crc8;

    fn scratchpad(lo: u8, hi: u8) -> Scratchpad {
        let mut bytes = [lo, hi, 0x4b, 0x46, 0x7f, 0xff, 0x0c, 0x10, 0];
        bytes[8] = crc8(&bytes[..8]);
        Scratchpad::from_bytes(bytes).unwrap()
    }

    #[test]
    fn temperature_decode() {
        let cases: [([u8; 2], f32); 7] = [
            ([0x90, 0x01], 25.0),
            ([0x00, 0x00], 0.0),
            ([0xfe, 0xff], -0.125),
            ([0x91, 0x01], 25.0625),
            ([0xd0, 0x07], 125.0),
            ([0xf8, 0xff], -0.5),
            ([0x90, 0xfc], -55.0),
        ];
        for ([lo, hi], expected) in cases {
            let pad = scratchpad(lo, hi);
            assert_eq!(pad.temperature().to_num::<f32>(), expected);
            assert_eq!(pad.raw_temperature() as f32 / 16.0, expected);
        }
    }

    #[test]
    fn configuration_registers() {
        let pad = scratchpad(0x90, 0x01);
        assert_eq!(pad.alarm_high(), 75);
        assert_eq!(pad.alarm_low(), 70);
        assert!(matches!(
            pad.resolution(),
            Some(ReadoutResolution::Resolution12bit)
        ));
    }

    #[test]
    fn rejects_bad_crc() {
        let mut bytes = *scratchpad(0x90, 0x01).as_bytes();
        bytes[0] ^= 0x01;
        assert_eq!(Scratchpad::from_bytes(bytes), None);
    }
}
