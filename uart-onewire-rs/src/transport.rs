use crate::UartError;
use core::fmt::Debug;

/// Baud rate used for the reset/presence-detect cycle.
///
/// One `0xf0` frame at this rate pulls the line low for ~520 µs, which
/// is a valid 1-Wire reset pulse.
pub const RESET_BAUD: u32 = 9600;

/// Baud rate used for every bit time slot.
///
/// The start bit of one frame at this rate is ~8.7 µs long: short enough
/// for a write-1/read slot, and a `0x00` frame holds the line for a write-0 slot.
pub const BIT_BAUD: u32 = 115_200;

/// A byte-oriented, timeout-bounded duplex serial channel.
///
/// TX and RX are expected to be wired onto the same open-drain 1-Wire line,
/// so every transmitted frame is echoed back, possibly with bits pulled low
/// by a slave.
pub trait SerialTransport {
    /// Errors reported by the underlying port.
    type Error: Debug;

    /// Returns `true` while the port is open.
    fn is_open(&self) -> bool;

    /// Changes the line speed.
    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error>;

    /// Discards pending input and output.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Transmits every byte of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads into `buf` until it is full or the port timeout expires,
    /// returning the number of bytes received.
    ///
    /// Must never block past the timeout.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Sends `frames` on a freshly cleared line and collects exactly as many echoed bytes.
pub(crate) fn exchange<T: SerialTransport>(
    transport: &mut T,
    frames: &[u8],
    echo: &mut [u8],
) -> Result<(), UartError<T::Error>> {
    transport.clear()?;
    transport.write(frames)?;
    let received = transport.read(echo)?;
    if received < echo.len() {
        return Err(UartError::ShortRead {
            expected: echo.len(),
            received,
        });
    }
    Ok(())
}
