#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]

/*! # uart-onewire
 *
 * A 1-Wire bus master built from nothing but a UART whose TX and RX pins
 * are tied to the 1-Wire data line (open drain). Each 1-Wire time slot is
 * generated by one UART frame: the reset pulse is a `0xf0` frame at
 * 9600 baud, and every bit slot is a `0xff` (write 1 / read) or `0x00`
 * (write 0) frame at 115200 baud. Reading the echoed frame tells whether a
 * slave pulled the line low.
 *
 * [`UartOneWire`] implements the [`OneWire`] trait, so any driver written
 * against `embedded-onewire` runs on top of it.
 */

pub use embedded_onewire::{OneWire, OneWireError, OneWireResult};
mod bits;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod onewire;
mod presence;
#[cfg(feature = "serialport")]
mod serial;
mod transport;

pub use bits::{decode_slot, encode_slot};
pub use error::UartError;
pub use presence::{PresenceResult, classify_presence};
#[cfg(feature = "serialport")]
pub use serial::SerialPortTransport;
pub use transport::{BIT_BAUD, RESET_BAUD, SerialTransport};

/// Results of UART bus master calls.
pub type UartResult<T, E> = OneWireResult<T, UartError<E>>;

/// A 1-Wire bus master driving the line through a UART.
///
/// Takes ownership of a serial port implementing [`SerialTransport`]; the port
/// is expected to be configured for [`BIT_BAUD`] whenever no reset is in
/// progress. Every operation borrows the master mutably, so at most one
/// transaction is on the line at a time. Sharing one master between threads
/// requires an external lock held for a whole device operation, since the
/// bus state between a reset and the following reads is not protected.
pub struct UartOneWire<T> {
    pub(crate) transport: T,
}

impl<T: SerialTransport> UartOneWire<T> {
    /// Creates a new bus master on top of `transport`.
    pub fn new(transport: T) -> Self {
        UartOneWire { transport }
    }

    /// Returns `true` while the underlying transport is open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Shared access to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exclusive access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Gives the transport back, e.g. to close it.
    pub fn release(self) -> T {
        self.transport
    }

    pub(crate) fn ensure_connected(&self) -> UartResult<(), T::Error> {
        if self.transport.is_open() {
            Ok(())
        } else {
            Err(OneWireError::NotConnected)
        }
    }
}
