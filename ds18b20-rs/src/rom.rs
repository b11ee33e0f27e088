use core::fmt;
use embedded_onewire::OneWireCrc;

/// 64-bit ROM code of a 1-Wire device.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0 | Family code (0x28 for DS18B20) |
/// | 1-6 | Serial number, least significant byte first |
/// | 7 | CRC-8 of bytes 0-6 |
///
/// A `RomCode` can only be built from bytes whose CRC checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomCode([u8; 8]);

impl RomCode {
    /// Wraps `bytes` if byte 7 is the CRC-8 of bytes 0-6.
    pub fn from_bytes(bytes: [u8; 8]) -> Option<Self> {
        OneWireCrc::validate(&bytes).then_some(RomCode(bytes))
    }

    /// Family code.
    pub fn family(&self) -> u8 {
        self.0[0]
    }

    /// 48-bit serial number.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.0[1..7]);
        serial
    }

    /// CRC byte.
    pub fn crc(&self) -> u8 {
        self.0[7]
    }

    /// The raw bytes, in bus order.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<RomCode> for u64 {
    fn from(rom: RomCode) -> u64 {
        u64::from_le_bytes(rom.0)
    }
}

/// Bytes in bus order as lowercase hex, e.g. `28ff641e04160351`.
impl fmt::Display for RomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROM: [u8; 8] = [0x28, 0xff, 0x64, 0x1e, 0x04, 0x16, 0x03, 0x51];

    #[test]
    fn accessors() {
        let rom = RomCode::from_bytes(ROM).unwrap();
        assert_eq!(rom.family(), 0x28);
        assert_eq!(rom.serial(), [0xff, 0x64, 0x1e, 0x04, 0x16, 0x03]);
        assert_eq!(rom.crc(), 0x51);
        assert_eq!(u64::from(rom), 0x5103_1604_1e64_ff28);
    }

    #[test]
    fn rejects_bad_crc() {
        let mut bytes = ROM;
        bytes[7] ^= 0x80;
        assert_eq!(RomCode::from_bytes(bytes), None);
        let mut bytes = ROM;
        bytes[3] ^= 0x01;
        assert_eq!(RomCode::from_bytes(bytes), None);
    }

    #[test]
    fn displays_as_hex() {
        use core::fmt::Write;
        struct Buf([u8; 16], usize);
        impl Write for Buf {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                let end = self.1 + s.len();
                self.0.get_mut(self.1..end).ok_or(fmt::Error)?.copy_from_slice(s.as_bytes());
                self.1 = end;
                Ok(())
            }
        }
        let mut buf = Buf([0; 16], 0);
        write!(buf, "{}", RomCode::from_bytes(ROM).unwrap()).unwrap();
        assert_eq!(&buf.0, b"28ff641e04160351");
    }
}
