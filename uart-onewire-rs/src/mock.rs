//! In-memory stand-in for a UART wired to a 1-Wire line.
//!
//! [`SimulatedBus`] implements [`SerialTransport`] and echoes every frame the
//! way the shared line would, optionally with a [`SimulatedDevice`] attached
//! that answers the reset pulse and the DS18B20 ROM and function commands.

use crate::{BIT_BAUD, RESET_BAUD, SerialTransport, decode_slot, presence::RESET_PULSE};
use embedded_onewire::{
    consts::{ONEWIRE_READ_ROM_CMD, ONEWIRE_SKIP_ROM_CMD},
    crc8,
};
use std::collections::VecDeque;
use thiserror::Error;

const CONVERT_T: u8 = 0x44;
const READ_SCRATCHPAD: u8 = 0xbe;
const DS18B20_FAMILY: u8 = 0x28;

/// Errors injected by [`SimulatedBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MockError {
    /// The port was used after [`SimulatedBus::close`].
    #[error("port is closed")]
    Closed,
    /// Write failure requested with [`SimulatedBus::fail_writes`].
    #[error("write failed")]
    WriteFailed,
}

/// One frame put on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Baud rate the port was set to.
    pub baud: u32,
    /// Byte transmitted.
    pub byte: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    RomCommand,
    FunctionCommand,
    Idle,
}

/// A single DS18B20-like slave.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    rom: [u8; 8],
    scratchpad: [u8; 9],
    presence: u8,
    phase: Phase,
    incoming: u8,
    incoming_bits: u8,
    outgoing: VecDeque<u8>,
    outgoing_bit: u8,
    conversions: usize,
}

impl SimulatedDevice {
    /// A device answering with `rom` and `scratchpad` verbatim, CRC bytes included.
    pub fn new(rom: [u8; 8], scratchpad: [u8; 9]) -> Self {
        SimulatedDevice {
            rom,
            scratchpad,
            presence: 0x50,
            phase: Phase::Idle,
            incoming: 0,
            incoming_bits: 0,
            outgoing: VecDeque::new(),
            outgoing_bit: 0,
            conversions: 0,
        }
    }

    /// A DS18B20 with the given serial number, holding `raw_temp` (1/16 °C)
    /// in a 12-bit configured scratchpad. Both CRC bytes are valid.
    pub fn ds18b20(serial: [u8; 6], raw_temp: i16) -> Self {
        let mut rom = [0u8; 8];
        rom[0] = DS18B20_FAMILY;
        rom[1..7].copy_from_slice(&serial);
        rom[7] = crc8(&rom[..7]);
        let [lo, hi] = raw_temp.to_le_bytes();
        let mut scratchpad = [lo, hi, 0x4b, 0x46, 0x7f, 0xff, 0x0c, 0x10, 0];
        scratchpad[8] = crc8(&scratchpad[..8]);
        Self::new(rom, scratchpad)
    }

    /// Byte echoed while answering a reset pulse.
    pub fn with_presence(mut self, echo: u8) -> Self {
        self.presence = echo;
        self
    }

    /// ROM code sent on Read ROM.
    pub fn rom(&self) -> [u8; 8] {
        self.rom
    }

    /// Scratchpad sent on Read Scratchpad.
    pub fn scratchpad(&self) -> [u8; 9] {
        self.scratchpad
    }

    /// Number of Convert T commands received.
    pub fn conversions(&self) -> usize {
        self.conversions
    }

    fn reset(&mut self) -> u8 {
        self.phase = Phase::RomCommand;
        self.incoming = 0;
        self.incoming_bits = 0;
        self.outgoing.clear();
        self.outgoing_bit = 0;
        self.presence
    }

    fn slot(&mut self, frame: u8) -> u8 {
        if let Some(&byte) = self.outgoing.front() {
            let bit = byte & (1 << self.outgoing_bit) != 0;
            self.outgoing_bit += 1;
            if self.outgoing_bit == 8 {
                self.outgoing_bit = 0;
                self.outgoing.pop_front();
            }
            // a 0 holds the line low past the first data bits of the frame
            return if bit { frame } else { frame & 0xe0 };
        }
        if self.phase != Phase::Idle {
            if decode_slot(frame) {
                self.incoming |= 1 << self.incoming_bits;
            }
            self.incoming_bits += 1;
            if self.incoming_bits == 8 {
                let cmd = self.incoming;
                self.incoming = 0;
                self.incoming_bits = 0;
                self.command(cmd);
            }
        }
        frame
    }

    fn command(&mut self, cmd: u8) {
        self.phase = match (self.phase, cmd) {
            (Phase::RomCommand, ONEWIRE_READ_ROM_CMD) => {
                self.outgoing.extend(self.rom);
                Phase::Idle
            }
            (Phase::RomCommand, ONEWIRE_SKIP_ROM_CMD) => Phase::FunctionCommand,
            (Phase::FunctionCommand, CONVERT_T) => {
                self.conversions += 1;
                Phase::Idle
            }
            (Phase::FunctionCommand, READ_SCRATCHPAD) => {
                self.outgoing.extend(self.scratchpad);
                Phase::Idle
            }
            _ => Phase::Idle,
        };
    }
}

/// A UART port looped onto a 1-Wire line.
#[derive(Debug)]
pub struct SimulatedBus {
    device: Option<SimulatedDevice>,
    open: bool,
    baud: u32,
    pending: VecDeque<u8>,
    sent: Vec<Frame>,
    clears: usize,
    slots: usize,
    mute_after: Option<usize>,
    pull_low: Option<usize>,
    fail_writes: bool,
}

impl SimulatedBus {
    /// An open port with `device` attached to the line.
    pub fn new(device: SimulatedDevice) -> Self {
        SimulatedBus {
            device: Some(device),
            ..Self::loopback()
        }
    }

    /// An open port with nothing but the pull-up on the line: every frame
    /// comes back as sent.
    pub fn loopback() -> Self {
        SimulatedBus {
            device: None,
            open: true,
            baud: BIT_BAUD,
            pending: VecDeque::new(),
            sent: Vec::new(),
            clears: 0,
            slots: 0,
            mute_after: None,
            pull_low: None,
            fail_writes: false,
        }
    }

    /// Drops the echo of every frame after the first `frames` ones.
    pub fn mute_after(mut self, frames: usize) -> Self {
        self.mute_after = Some(frames);
        self
    }

    /// Forces the bit slot with index `slot` (counted from 0) low.
    pub fn pull_low(mut self, slot: usize) -> Self {
        self.pull_low = Some(slot);
        self
    }

    /// Makes every write fail with [`MockError::WriteFailed`].
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Closes the port.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Every frame transmitted so far.
    pub fn sent(&self) -> &[Frame] {
        &self.sent
    }

    /// Number of buffer clears requested.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Current baud rate.
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// The attached device, if any.
    pub fn device(&self) -> Option<&SimulatedDevice> {
        self.device.as_ref()
    }

    fn line(&mut self, frame: u8) -> u8 {
        if self.baud == RESET_BAUD {
            return match self.device.as_mut() {
                Some(device) if frame == RESET_PULSE => device.reset(),
                _ => frame,
            };
        }
        let slot = self.slots;
        self.slots += 1;
        let echo = match self.device.as_mut() {
            Some(device) => device.slot(frame),
            None => frame,
        };
        if self.pull_low == Some(slot) { 0x00 } else { echo }
    }

    fn ensure_open(&self) -> Result<(), MockError> {
        if self.open {
            Ok(())
        } else {
            Err(MockError::Closed)
        }
    }
}

impl SerialTransport for SimulatedBus {
    type Error = MockError;

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), MockError> {
        self.ensure_open()?;
        self.baud = baud;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), MockError> {
        self.ensure_open()?;
        self.pending.clear();
        self.clears += 1;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        self.ensure_open()?;
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        for &byte in bytes {
            let muted = self.mute_after.is_some_and(|frames| self.sent.len() >= frames);
            self.sent.push(Frame {
                baud: self.baud,
                byte,
            });
            let echo = self.line(byte);
            if !muted {
                self.pending.push_back(echo);
            }
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        self.ensure_open()?;
        let count = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}
