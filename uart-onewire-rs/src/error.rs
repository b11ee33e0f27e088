use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
/// UART bus master errors.
pub enum UartError<E> {
    /// Serial transport errors.
    #[error("serial transport: {0}")]
    Transport(E),
    /// The transport timed out before every echoed byte came back.
    #[error("read/write error: expected {expected} byte(s), received {received}")]
    ShortRead {
        /// Number of bytes the transaction needed.
        expected: usize,
        /// Number of bytes received before the timeout.
        received: usize,
    },
}

impl<E> From<E> for UartError<E> {
    fn from(value: E) -> Self {
        Self::Transport(value)
    }
}
