use crate::{BIT_BAUD, SerialTransport};
use serialport::{ClearBuffer, ErrorKind, SerialPort};
use std::{
    io::{self, Read, Write},
    time::Duration,
};

/// [`SerialTransport`] over a host serial port (e.g. `/dev/ttyUSB0`).
pub struct SerialPortTransport {
    path: String,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortTransport {
    /// Creates a closed transport for the port at `path`.
    ///
    /// Every read on the port gives up after `timeout`.
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        SerialPortTransport {
            path: path.into(),
            timeout,
            port: None,
        }
    }

    /// Opens the port at `path`, configured for [`BIT_BAUD`].
    pub fn open(path: impl Into<String>, timeout: Duration) -> Result<Self, serialport::Error> {
        let mut transport = Self::new(path, timeout);
        transport.connect()?;
        Ok(transport)
    }

    /// Opens the port if it is not open yet.
    pub fn connect(&mut self) -> Result<(), serialport::Error> {
        if self.port.is_none() {
            let port = serialport::new(&self.path, BIT_BAUD)
                .timeout(self.timeout)
                .open()?;
            log::debug!("opened {} with {:?} timeout", self.path, self.timeout);
            self.port = Some(port);
        }
        Ok(())
    }

    /// Closes the port. Closing a closed port does nothing.
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            log::debug!("closed {}", self.path);
        }
    }

    /// Path of the port.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn port(&mut self) -> Result<&mut dyn SerialPort, serialport::Error> {
        match self.port.as_deref_mut() {
            Some(port) => Ok(port),
            None => Err(serialport::Error::new(
                ErrorKind::NoDevice,
                "serial port is closed",
            )),
        }
    }
}

impl SerialTransport for SerialPortTransport {
    type Error = serialport::Error;

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error> {
        self.port()?.set_baud_rate(baud)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.port()?.clear(ClearBuffer::All)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let port = self.port()?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let port = self.port()?;
        let mut filled = 0;
        while filled < buf.len() {
            match port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}
