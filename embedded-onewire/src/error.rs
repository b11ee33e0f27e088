use thiserror::Error;

/// One wire communication error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    #[error("bus master error: {0}")]
    Other(E),
    /// The bus master is not connected to the line (transport closed).
    #[error("device is not connected")]
    NotConnected,
    /// Indicates that no device is present on the bus.
    #[error("no device present")]
    NoDevicePresent,
    /// Indicates that a short circuit was detected on the bus.
    #[error("short circuit")]
    ShortCircuit,
    /// The reset pulse was answered with an unexpected presence pattern.
    #[error("presence error: {0:#04x}")]
    InvalidPresence(u8),
    /// The bits read back while writing did not match the bits written,
    /// which indicates bus contention or line noise.
    #[error("invalid response: wrote {written:#04x}, read back {echoed:#04x}")]
    InvalidResponse {
        /// Byte that was put on the bus.
        written: u8,
        /// Byte that was observed on the bus.
        echoed: u8,
    },
    /// Computed CRC of a ROM code or scratchpad does not match its trailing byte.
    #[error("CRC error")]
    InvalidCrc,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
