/// Reflected form of the Dallas/Maxim polynomial x^8 + x^5 + x^4 + 1.
const CRC8_POLY: u8 = 0x8c;

#[derive(Debug, Default, Clone, Copy)]
/// Calculate CRC-8 used in 1-Wire communications.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        #[cfg(feature = "crc-table")]
        {
            self.0 = CRC8_TABLE[(self.0 ^ byte) as usize];
        }
        #[cfg(not(feature = "crc-table"))]
        {
            self.0 = update_bitwise(self.0, byte);
        }
    }

    /// Compute the CRC-8 of a whole byte sequence, starting from a zero seed.
    pub fn checksum(bytes: &[u8]) -> u8 {
        let mut crc = OneWireCrc::default();
        for &byte in bytes {
            crc.update(byte);
        }
        crc.value()
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    ///
    /// An empty sequence carries no CRC and is never valid.
    pub fn validate(sequence: &[u8]) -> bool {
        match sequence.split_last() {
            Some((&crc, payload)) => Self::checksum(payload) == crc,
            None => false,
        }
    }
}

/// Dallas/Maxim CRC-8 of `bytes`.
///
/// Shorthand for [`OneWireCrc::checksum`].
pub fn crc8(bytes: &[u8]) -> u8 {
    OneWireCrc::checksum(bytes)
}

/// Shift one byte through the CRC register, least significant bit first.
const fn update_bitwise(mut crc: u8, mut byte: u8) -> u8 {
    let mut bit = 0;
    while bit < 8 {
        let mix = (crc ^ byte) & 0x01;
        crc >>= 1;
        if mix != 0 {
            crc ^= CRC8_POLY;
        }
        byte >>= 1;
        bit += 1;
    }
    crc
}

#[cfg(feature = "crc-table")]
static CRC8_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut idx = 0;
    while idx < 256 {
        table[idx] = update_bitwise(0, idx as u8);
        idx += 1;
    }
    table
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        let vectors: [(&[u8], u8); 8] = [
            (&[0x28, 0xff, 0x64, 0x1e, 0x04, 0x16, 0x03], 0x51),
            (&[0x28, 0xee, 0x9e, 0x3c, 0x1d, 0x16, 0x02], 0xcb),
            // Maxim application note 27 example ROM
            (&[0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00], 0xa2),
            (&[0x90, 0x01, 0x4b, 0x46, 0x7f, 0xff, 0x0c, 0x10], 0x33),
            (&[0x50, 0x05, 0x4b, 0x46, 0x7f, 0xff, 0x0c, 0x10], 0x1c),
            (b"123456789", 0xa1),
            (&[0xff], 0x35),
            (&[], 0x00),
        ];
        for (bytes, expected) in vectors {
            assert_eq!(crc8(bytes), expected, "crc8({bytes:02x?})");
        }
    }

    #[test]
    fn incremental_matches_one_shot() {
        let data = [0x28, 0xff, 0x64, 0x1e, 0x04, 0x16, 0x03];
        let mut crc = OneWireCrc::default();
        for b in data {
            crc.update(b);
        }
        assert_eq!(crc.value(), OneWireCrc::checksum(&data));
    }

    #[test]
    fn validate_trailing_crc() {
        assert!(OneWireCrc::validate(&[0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa2]));
        assert!(!OneWireCrc::validate(&[0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa3]));
        assert!(!OneWireCrc::validate(&[]));
        // a lone zero byte is the CRC of the empty payload
        assert!(OneWireCrc::validate(&[0x00]));
    }

    #[test]
    fn appended_crc_validates() {
        use rand::Rng;
        let mut rng = rand::rng();
        for len in 1..=16 {
            let mut buf = [0u8; 17];
            rng.fill(&mut buf[..len]);
            buf[len] = crc8(&buf[..len]);
            assert!(OneWireCrc::validate(&buf[..=len]));
            // the register runs to zero once its own CRC is shifted through
            assert_eq!(crc8(&buf[..=len]), 0);
            buf[rng.random_range(0..len)] ^= 1 << rng.random_range(0..8u8);
            assert!(!OneWireCrc::validate(&buf[..=len]));
        }
    }

    #[cfg(feature = "crc-table")]
    #[test]
    fn table_matches_bitwise() {
        for byte in 0..=255u8 {
            for seed in [0x00, 0x5a, 0xff] {
                assert_eq!(CRC8_TABLE[(seed ^ byte) as usize], update_bitwise(seed, byte));
            }
        }
    }
}
