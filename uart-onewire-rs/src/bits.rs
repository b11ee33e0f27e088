use crate::{SerialTransport, UartOneWire, UartResult, transport::exchange};

const SLOT_RELEASE: u8 = 0xff;
const SLOT_LOW: u8 = 0x00;

/// UART frame generating the time slot for `bit`.
pub const fn encode_slot(bit: bool) -> u8 {
    if bit { SLOT_RELEASE } else { SLOT_LOW }
}

/// Bit observed on the line given the echoed frame.
///
/// Only an untouched frame reads as 1; any bit pulled low reads as 0.
pub const fn decode_slot(echo: u8) -> bool {
    echo == SLOT_RELEASE
}

impl<T: SerialTransport> UartOneWire<T> {
    /// Runs one time slot: drives `bit` onto the line and returns the bit observed.
    ///
    /// Writing a 1 is a read slot, a slave may pull it down to 0.
    ///
    /// # Errors
    /// [`NotConnected`](crate::OneWireError::NotConnected) if the port is closed,
    /// [`ShortRead`](crate::UartError::ShortRead) if the echo does not come back in time.
    pub fn touch_bit(&mut self, bit: bool) -> UartResult<bool, T::Error> {
        self.ensure_connected()?;
        let mut echo = [0u8; 1];
        exchange(&mut self.transport, &[encode_slot(bit)], &mut echo)?;
        Ok(decode_slot(echo[0]))
    }

    /// Runs eight time slots, least significant bit first, and assembles the
    /// observed bits.
    pub fn touch_byte(&mut self, byte: u8) -> UartResult<u8, T::Error> {
        let mut value = 0u8;
        for idx in 0..8 {
            if self.touch_bit(byte & (1 << idx) != 0)? {
                value |= 1 << idx;
            }
        }
        log::trace!("touch {byte:#04x} -> {value:#04x}");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OneWireError, UartError, mock::SimulatedBus};

    #[test]
    fn slot_encoding() {
        assert_eq!(encode_slot(true), 0xff);
        assert_eq!(encode_slot(false), 0x00);
        assert!(decode_slot(0xff));
        for echo in 0..0xff {
            assert!(!decode_slot(echo));
        }
    }

    #[test]
    fn byte_is_sent_lsb_first() {
        let mut bus = UartOneWire::new(SimulatedBus::loopback());
        assert_eq!(bus.touch_byte(0b1000_0101).unwrap(), 0b1000_0101);
        let frames: Vec<u8> = bus.transport().sent().iter().map(|f| f.byte).collect();
        assert_eq!(frames, [0xff, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff]);
        // one clear before every slot
        assert_eq!(bus.transport().clears(), 8);
    }

    #[test]
    fn touch_every_byte_over_loopback() {
        let mut bus = UartOneWire::new(SimulatedBus::loopback());
        for byte in 0..=u8::MAX {
            assert_eq!(bus.touch_byte(byte).unwrap(), byte);
        }
    }

    #[test]
    fn missing_echo_is_a_short_read() {
        let mut bus = UartOneWire::new(SimulatedBus::loopback().mute_after(3));
        assert_eq!(
            bus.touch_byte(0x00),
            Err(OneWireError::Other(UartError::ShortRead {
                expected: 1,
                received: 0
            }))
        );
    }

    #[test]
    fn closed_port_is_not_touched() {
        let mut port = SimulatedBus::loopback();
        port.close();
        let mut bus = UartOneWire::new(port);
        assert_eq!(bus.touch_bit(true), Err(OneWireError::NotConnected));
        assert!(bus.transport().sent().is_empty());
    }
}
