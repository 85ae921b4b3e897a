//! Device family descriptors
//!
//! Everything that differs between logue-series products lives here as constant data. A new
//! family is a new [`DeviceFamily`] variant plus its table; the codec and framing code stay
//! untouched.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::response::lookup;
use super::{CHANNEL_BASE, DEVICE_ID_MAX, DEVICE_ID_MIN, Error, MessageType, ResponseSpec, Result};

/// Products this crate can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Korg prologue
    Prologue,
}

const PROLOGUE_RESPONSES: &[(MessageType, ResponseSpec)] = &[
    (
        MessageType::GlobalDataDumpRequest,
        ResponseSpec::data(MessageType::GlobalDataDump, 0),
    ),
    (
        MessageType::CurrentProgramDataDumpRequest,
        ResponseSpec::data(MessageType::CurrentProgramDataDump, 0),
    ),
    (
        MessageType::CurrentProgramDataDump,
        ResponseSpec::status(MessageType::DataLoadCompleted),
    ),
    (
        MessageType::ProgramDataDumpRequest,
        ResponseSpec::data(MessageType::ProgramDataDump, 2),
    ),
    (
        MessageType::ProgramDataDump,
        ResponseSpec::status(MessageType::DataLoadCompleted),
    ),
    (
        MessageType::UserSlotDataRequest,
        ResponseSpec::data(MessageType::UserSlotData, 3),
    ),
    (
        MessageType::UserSlotData,
        ResponseSpec::status(MessageType::DataLoadCompleted),
    ),
    (
        MessageType::UserSlotStatusRequest,
        ResponseSpec::data(MessageType::UserSlotStatus, 3),
    ),
    (
        MessageType::UserModuleInfoRequest,
        ResponseSpec::data(MessageType::UserModuleInfo, 2),
    ),
    (
        MessageType::ClearUserSlot,
        ResponseSpec::status(MessageType::DataLoadCompleted),
    ),
    (
        MessageType::ClearUserModule,
        ResponseSpec::status(MessageType::DataLoadCompleted),
    ),
];

impl DeviceFamily {
    /// Family ID byte carried in every frame
    #[must_use]
    pub const fn family_id(self) -> u8 {
        match self {
            Self::Prologue => 0x4B,
        }
    }

    /// Lowercase product name, also used as the manifest platform
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Prologue => "prologue",
        }
    }

    /// Platform byte stored in user module headers
    #[must_use]
    pub const fn platform_id(self) -> u8 {
        match self {
            Self::Prologue => 0x01,
        }
    }

    /// Stored program numbers, 1-based and inclusive
    #[must_use]
    pub const fn program_range(self) -> RangeInclusive<u16> {
        match self {
            Self::Prologue => 1..=500,
        }
    }

    /// Size of one binary program
    #[must_use]
    pub const fn program_size(self) -> usize {
        match self {
            Self::Prologue => 336,
        }
    }

    /// Prefix of the device's MIDI port names
    #[must_use]
    pub const fn port_prefix(self) -> &'static str {
        match self {
            Self::Prologue => "prologue",
        }
    }

    /// Reply shapes for this family
    #[must_use]
    pub const fn response_table(self) -> &'static [(MessageType, ResponseSpec)] {
        match self {
            Self::Prologue => PROLOGUE_RESPONSES,
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DeviceFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prologue" => Ok(Self::Prologue),
            _ => Err(Error::UnknownFamily(s.to_string())),
        }
    }
}

/// Device selected for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    family: DeviceFamily,
    device_id: u8,
}

impl DeviceProfile {
    /// Create a profile for the device listening on global channel `device_id` (1-16)
    ///
    /// # Errors
    ///
    /// Returns an error if `device_id` is outside `1..=16`.
    pub fn new(family: DeviceFamily, device_id: u8) -> Result<Self> {
        if !(DEVICE_ID_MIN..=DEVICE_ID_MAX).contains(&device_id) {
            return Err(Error::out_of_range("device id", device_id, DEVICE_ID_MIN, DEVICE_ID_MAX));
        }
        Ok(Self { family, device_id })
    }

    /// Get device family
    #[must_use]
    pub const fn family(&self) -> DeviceFamily {
        self.family
    }

    /// Get device ID (1-16)
    #[must_use]
    pub const fn device_id(&self) -> u8 {
        self.device_id
    }

    /// Get family ID byte
    #[must_use]
    pub const fn family_id(&self) -> u8 {
        self.family.family_id()
    }

    /// SysEx channel byte (`0x30 + id - 1`)
    #[must_use]
    pub const fn channel(&self) -> u8 {
        CHANNEL_BASE + self.device_id - 1
    }

    /// 0-based MIDI channel for channel voice messages
    #[must_use]
    pub const fn midi_channel(&self) -> u8 {
        self.device_id - 1
    }

    /// Check whether a 1-based program number addresses stored memory
    #[must_use]
    pub fn has_program(&self, number: u16) -> bool {
        self.family.program_range().contains(&number)
    }

    /// Reply shape for a sent message type
    #[must_use]
    pub fn response_for(&self, sent: MessageType) -> Option<ResponseSpec> {
        lookup(self, sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prologue_constants() {
        let profile = DeviceProfile::new(DeviceFamily::Prologue, 1).unwrap();

        assert_eq!(profile.family_id(), 0x4B);
        assert_eq!(profile.channel(), 0x30);
        assert_eq!(profile.midi_channel(), 0);
        assert!(profile.has_program(1));
        assert!(profile.has_program(500));
        assert!(!profile.has_program(0));
        assert!(!profile.has_program(501));
        assert_eq!(profile.family().program_size(), 336);
    }

    #[test]
    fn test_device_id_bounds() {
        assert!(DeviceProfile::new(DeviceFamily::Prologue, 0).is_err());
        assert!(DeviceProfile::new(DeviceFamily::Prologue, 17).is_err());
        assert_eq!(DeviceProfile::new(DeviceFamily::Prologue, 16).unwrap().channel(), 0x3F);
    }

    #[test]
    fn test_family_names() {
        assert_eq!("prologue".parse::<DeviceFamily>().unwrap(), DeviceFamily::Prologue);
        assert_eq!(" Prologue ".parse::<DeviceFamily>().unwrap(), DeviceFamily::Prologue);
        assert!(matches!("minilogue".parse::<DeviceFamily>(), Err(Error::UnknownFamily(_))));
        assert_eq!(DeviceFamily::Prologue.to_string(), "prologue");
    }
}
