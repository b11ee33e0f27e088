use embedded_onewire::{OneWireError, OneWireResult, OneWireStatus};

/// Byte written at [`RESET_BAUD`](crate::RESET_BAUD) to generate the reset pulse.
pub(crate) const RESET_PULSE: u8 = 0xf0;

/// Decoded outcome of a reset pulse.
///
/// A present slave stretches the frame's low time with its presence pulse,
/// so the echoed byte comes back with some of its high bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceResult {
    /// A device answered with a well-formed presence pulse.
    Present,
    /// The frame came back untouched.
    NoDevice,
    /// The line was held low for the whole frame.
    ShortCircuit,
    /// The echo does not look like a presence pulse.
    Malformed(u8),
}

/// Classifies the byte echoed during a reset cycle.
pub const fn classify_presence(echo: u8) -> PresenceResult {
    match echo {
        RESET_PULSE => PresenceResult::NoDevice,
        0x00 => PresenceResult::ShortCircuit,
        0x10..=0xe0 => PresenceResult::Present,
        other => PresenceResult::Malformed(other),
    }
}

impl PresenceResult {
    /// Turns every outcome but [`PresenceResult::Present`] into the matching bus error.
    pub fn into_result<E>(self) -> OneWireResult<Self, E> {
        match self {
            PresenceResult::Present => Ok(self),
            PresenceResult::NoDevice => Err(OneWireError::NoDevicePresent),
            PresenceResult::ShortCircuit => Err(OneWireError::ShortCircuit),
            PresenceResult::Malformed(echo) => Err(OneWireError::InvalidPresence(echo)),
        }
    }
}

impl OneWireStatus for PresenceResult {
    fn presence(&self) -> bool {
        matches!(self, PresenceResult::Present)
    }

    fn shortcircuit(&self) -> bool {
        matches!(self, PresenceResult::ShortCircuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total() {
        for echo in 0..=u8::MAX {
            let expected = match echo {
                0xf0 => PresenceResult::NoDevice,
                0x00 => PresenceResult::ShortCircuit,
                0x10..=0xe0 => PresenceResult::Present,
                _ => PresenceResult::Malformed(echo),
            };
            assert_eq!(classify_presence(echo), expected, "echo {echo:#04x}");
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(classify_presence(0x0f), PresenceResult::Malformed(0x0f));
        assert_eq!(classify_presence(0x10), PresenceResult::Present);
        assert_eq!(classify_presence(0x50), PresenceResult::Present);
        assert_eq!(classify_presence(0xe0), PresenceResult::Present);
        assert_eq!(classify_presence(0xe1), PresenceResult::Malformed(0xe1));
        assert_eq!(classify_presence(0xff), PresenceResult::Malformed(0xff));
    }

    #[test]
    fn errors_follow_outcome() {
        let res: OneWireResult<_, ()> = classify_presence(0x50).into_result();
        assert_eq!(res, Ok(PresenceResult::Present));
        let res: OneWireResult<_, ()> = classify_presence(0xf0).into_result();
        assert_eq!(res, Err(OneWireError::NoDevicePresent));
        let res: OneWireResult<_, ()> = classify_presence(0x00).into_result();
        assert_eq!(res, Err(OneWireError::ShortCircuit));
        let res: OneWireResult<_, ()> = classify_presence(0xf8).into_result();
        assert_eq!(res, Err(OneWireError::InvalidPresence(0xf8)));
        assert!(PresenceResult::Present.presence());
        assert!(!PresenceResult::ShortCircuit.presence());
        assert!(PresenceResult::ShortCircuit.shortcircuit());
    }
}
