//! ROM command constants for 1-Wire communication.

/// Command to read the ROM code of the only device on the bus.
///
/// The bus master must be certain a single slave is attached, otherwise
/// the wired-AND of all ROM codes is read back and fails its CRC check.
pub const ONEWIRE_READ_ROM_CMD: u8 = 0x33;

/// Command to skip ROM address in 1-Wire communication (non-overdrive mode).
///
/// On a single-drop bus this addresses the only device without sending its ROM code.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;
