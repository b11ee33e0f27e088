use crate::{
    BIT_BAUD, PresenceResult, RESET_BAUD, SerialTransport, UartError, UartOneWire, UartResult,
    classify_presence,
    presence::RESET_PULSE,
    transport::exchange,
};
use core::ops::{Deref, DerefMut};
use embedded_onewire::{OneWire, OneWireError};

/// Keeps the port at [`RESET_BAUD`] while alive and puts it back to
/// [`BIT_BAUD`] when dropped, whichever way the reset cycle ends.
struct ResetSpeed<'a, T: SerialTransport> {
    transport: &'a mut T,
}

impl<'a, T: SerialTransport> ResetSpeed<'a, T> {
    fn engage(transport: &'a mut T) -> Result<Self, UartError<T::Error>> {
        let mut guard = ResetSpeed { transport };
        guard.transport.set_baud_rate(RESET_BAUD)?;
        Ok(guard)
    }
}

impl<T: SerialTransport> Deref for ResetSpeed<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.transport
    }
}

impl<T: SerialTransport> DerefMut for ResetSpeed<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.transport
    }
}

impl<T: SerialTransport> Drop for ResetSpeed<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.transport.set_baud_rate(BIT_BAUD) {
            log::warn!("failed to restore {BIT_BAUD} baud after reset: {e:?}");
        }
    }
}

impl<T: SerialTransport> OneWire for UartOneWire<T> {
    type Status = PresenceResult;

    type BusError = UartError<T::Error>;

    fn reset(&mut self) -> UartResult<Self::Status, T::Error> {
        self.ensure_connected()?;
        let mut echo = [0u8; 1];
        {
            let mut line = ResetSpeed::engage(&mut self.transport)?;
            exchange(&mut *line, &[RESET_PULSE], &mut echo)?;
        }
        let status = classify_presence(echo[0]);
        match status {
            PresenceResult::Present => log::debug!("presence pulse {:#04x}", echo[0]),
            _ => log::warn!("reset failed: {status:?}"),
        }
        status.into_result()
    }

    fn write_byte(&mut self, byte: u8) -> UartResult<(), T::Error> {
        let echoed = self.touch_byte(byte)?;
        if echoed != byte {
            return Err(OneWireError::InvalidResponse {
                written: byte,
                echoed,
            });
        }
        Ok(())
    }

    fn read_byte(&mut self) -> UartResult<u8, T::Error> {
        self.touch_byte(0xff)
    }

    fn write_bit(&mut self, bit: bool) -> UartResult<(), T::Error> {
        let observed = self.touch_bit(bit)?;
        if observed != bit {
            return Err(OneWireError::InvalidResponse {
                written: bit as u8,
                echoed: observed as u8,
            });
        }
        Ok(())
    }

    fn read_bit(&mut self) -> UartResult<bool, T::Error> {
        self.touch_bit(true)
    }
}
