#![no_std]
//! Driver for a single DS18B20 digital thermometer on a 1-Wire bus.
//!
//! Works with any bus master implementing [`OneWire`]. Only one device may be
//! attached: the ROM code is read with Read ROM and every function command is
//! addressed with Skip ROM.
use embedded_hal::delay::DelayNs;
use embedded_onewire::{
    OneWire, OneWireError, OneWireResult,
    consts::{ONEWIRE_READ_ROM_CMD, ONEWIRE_SKIP_ROM_CMD},
};
use fixed::types::I12F4;

mod rom;
mod scratchpad;
pub use rom::RomCode;
pub use scratchpad::Scratchpad;

const DS18B20_START_CONV: u8 = 0x44;
const DS18B20_READ_SCRATCH: u8 = 0xbe;

/// Settling time after Convert T, long enough for any resolution.
const DEFAULT_CONVERSION_DELAY_US: u32 = 1_000_000;

/// Temperature in 1/16 °C steps.
pub type Temperature = I12F4;

/// A DS18B20 alone on its bus.
#[derive(Debug, Clone, Copy)]
pub struct Ds18b20 {
    conversion_delay_us: u32,
}

impl Default for Ds18b20 {
    fn default() -> Self {
        Self {
            conversion_delay_us: DEFAULT_CONVERSION_DELAY_US,
        }
    }
}

impl Ds18b20 {
    #[inline]
    pub const fn family() -> u8 {
        0x28
    }

    /// Time to wait between Convert T and Read Scratchpad.
    ///
    /// Defaults to one second whatever resolution the device is configured for.
    pub fn with_conversion_delay_ms(mut self, ms: u32) -> Self {
        self.conversion_delay_us = ms.saturating_mul(1000);
        self
    }

    /// Waits exactly the datasheet conversion time of `resolution`.
    pub fn with_conversion_delay_for(mut self, resolution: ReadoutResolution) -> Self {
        self.conversion_delay_us = resolution.delay_us();
        self
    }

    pub fn conversion_delay_us(&self) -> u32 {
        self.conversion_delay_us
    }

    /// Reads the 64-bit ROM code of the device.
    ///
    /// # Errors
    /// Any reset or bus failure, or [`OneWireError::InvalidCrc`] if the code
    /// does not match its CRC byte.
    pub fn read_rom<O: OneWire>(&self, bus: &mut O) -> OneWireResult<RomCode, O::BusError> {
        bus.reset()?;
        bus.write_byte(ONEWIRE_READ_ROM_CMD)?;
        let mut buf = [0; 8];
        bus.read_bytes(&mut buf)?;
        let Some(rom) = RomCode::from_bytes(buf) else {
            return Err(OneWireError::InvalidCrc);
        };
        if rom.family() != Self::family() {
            log::warn!("unexpected family code {:#04x}", rom.family());
        }
        Ok(rom)
    }

    pub(crate) fn address_any<O: OneWire>(bus: &mut O) -> OneWireResult<(), O::BusError> {
        bus.reset()?; // reset 1-Wire bus
        bus.write_byte(ONEWIRE_SKIP_ROM_CMD) // single drop, skip addressing
    }

    /// Starts a conversion and blocks until the configured settling time is over.
    pub fn trigger_temperature_conversion<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
    ) -> OneWireResult<(), O::BusError> {
        Self::address_any(bus)?;
        bus.write_byte(DS18B20_START_CONV)?;
        delay.delay_us(self.conversion_delay_us); // conversion cannot be interrupted
        Ok(())
    }

    /// Reads and validates the scratchpad.
    pub fn read_scratchpad<O: OneWire>(
        &self,
        bus: &mut O,
    ) -> OneWireResult<Scratchpad, O::BusError> {
        Self::address_any(bus)?;
        bus.write_byte(DS18B20_READ_SCRATCH)?;
        let mut buf = [0; 9];
        bus.read_bytes(&mut buf)?;
        Scratchpad::from_bytes(buf).ok_or(OneWireError::InvalidCrc)
    }

    /// Converts and reads the temperature in °C.
    ///
    /// # Errors
    /// Any reset or bus failure, or [`OneWireError::InvalidCrc`] if the
    /// scratchpad does not match its CRC byte.
    pub fn read_temperature<O: OneWire, D: DelayNs>(
        &self,
        bus: &mut O,
        delay: &mut D,
    ) -> OneWireResult<f32, O::BusError> {
        self.trigger_temperature_conversion(bus, delay)?;
        let scratchpad = self.read_scratchpad(bus)?;
        Ok(scratchpad.temperature().to_num())
    }
}

/// Resolution held in the configuration register.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ReadoutResolution {
    Resolution9bit = 0x1f,
    Resolution10bit = 0x3f,
    Resolution11bit = 0x5f,
    #[default]
    Resolution12bit = 0x7f,
}

impl ReadoutResolution {
    /// Maximum conversion time from the datasheet.
    pub fn delay_us(&self) -> u32 {
        use ReadoutResolution::*;
        match self {
            Resolution9bit => 93750,
            Resolution10bit => 187500,
            Resolution11bit => 375000,
            Resolution12bit => 750000,
        }
    }
}

impl TryFrom<u8> for ReadoutResolution {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ReadoutResolution::*;
        match value {
            0x1f => Ok(Resolution9bit),
            0x3f => Ok(Resolution10bit),
            0x5f => Ok(Resolution11bit),
            0x7f => Ok(Resolution12bit),
            _ => Err("Invalid readout resolution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_delay() {
        assert_eq!(Ds18b20::default().conversion_delay_us(), 1_000_000);
        assert_eq!(
            Ds18b20::default()
                .with_conversion_delay_ms(750)
                .conversion_delay_us(),
            750_000
        );
        assert_eq!(
            Ds18b20::default()
                .with_conversion_delay_for(ReadoutResolution::Resolution9bit)
                .conversion_delay_us(),
            93_750
        );
    }

    #[test]
    fn resolution_register() {
        for res in [
            ReadoutResolution::Resolution9bit,
            ReadoutResolution::Resolution10bit,
            ReadoutResolution::Resolution11bit,
            ReadoutResolution::Resolution12bit,
        ] {
            assert_eq!(ReadoutResolution::try_from(res as u8), Ok(res));
        }
        assert!(ReadoutResolution::try_from(0x00).is_err());
    }
}
