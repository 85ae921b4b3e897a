//! logue SysEx message types

use std::fmt;

/// SysEx message types understood by logue-series devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Request the global parameter dump
    GlobalDataDumpRequest = 0x0E,
    /// Request the edit buffer
    CurrentProgramDataDumpRequest = 0x10,
    /// Request the tuning scale dump
    TuningScaleDataDumpRequest = 0x14,
    /// Request the tuning octave dump
    TuningOctaveDataDumpRequest = 0x15,
    /// Request the liveset dump
    LivesetDataDumpRequest = 0x16,
    /// Request the user API version
    UserApiVersionRequest = 0x17,
    /// Request user module capacity
    UserModuleInfoRequest = 0x18,
    /// Request the header of one user slot
    UserSlotStatusRequest = 0x19,
    /// Request the contents of one user slot
    UserSlotDataRequest = 0x1A,
    /// Erase one user slot
    ClearUserSlot = 0x1B,
    /// Request a stored program
    ProgramDataDumpRequest = 0x1C,
    /// Erase every slot of a user module
    ClearUserModule = 0x1D,
    /// Swap two user slots
    SwapUserData = 0x1E,

    /// Data accepted
    DataLoadCompleted = 0x23,
    /// Load error
    DataLoadError = 0x24,
    /// Data format error
    DataFormatError = 0x26,
    /// User data size error
    UserDataSizeError = 0x27,
    /// User data CRC error
    UserDataCrcError = 0x28,
    /// User target error
    UserTargetError = 0x29,
    /// User API error
    UserApiError = 0x2A,
    /// User load size error
    UserLoadSizeError = 0x2B,
    /// User module error
    UserModuleError = 0x2C,
    /// User slot error
    UserSlotError = 0x2D,
    /// User format error
    UserFormatError = 0x2E,
    /// User internal error
    UserInternalError = 0x2F,

    /// Edit buffer dump
    CurrentProgramDataDump = 0x40,
    /// Tuning scale dump
    TuningScaleDataDump = 0x44,
    /// Tuning octave dump
    TuningOctaveDataDump = 0x45,
    /// Liveset dump
    LivesetDataDump = 0x46,
    /// User API version
    UserApiVersion = 0x47,
    /// User module capacity
    UserModuleInfo = 0x48,
    /// Header of one user slot
    UserSlotStatus = 0x49,
    /// Contents of one user slot
    UserSlotData = 0x4A,
    /// Stored program dump
    ProgramDataDump = 0x4C,
    /// Global parameter dump
    GlobalDataDump = 0x51,
}

impl MessageType {
    /// Convert from byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0E => Some(Self::GlobalDataDumpRequest),
            0x10 => Some(Self::CurrentProgramDataDumpRequest),
            0x14 => Some(Self::TuningScaleDataDumpRequest),
            0x15 => Some(Self::TuningOctaveDataDumpRequest),
            0x16 => Some(Self::LivesetDataDumpRequest),
            0x17 => Some(Self::UserApiVersionRequest),
            0x18 => Some(Self::UserModuleInfoRequest),
            0x19 => Some(Self::UserSlotStatusRequest),
            0x1A => Some(Self::UserSlotDataRequest),
            0x1B => Some(Self::ClearUserSlot),
            0x1C => Some(Self::ProgramDataDumpRequest),
            0x1D => Some(Self::ClearUserModule),
            0x1E => Some(Self::SwapUserData),
            0x23 => Some(Self::DataLoadCompleted),
            0x24 => Some(Self::DataLoadError),
            0x26 => Some(Self::DataFormatError),
            0x27 => Some(Self::UserDataSizeError),
            0x28 => Some(Self::UserDataCrcError),
            0x29 => Some(Self::UserTargetError),
            0x2A => Some(Self::UserApiError),
            0x2B => Some(Self::UserLoadSizeError),
            0x2C => Some(Self::UserModuleError),
            0x2D => Some(Self::UserSlotError),
            0x2E => Some(Self::UserFormatError),
            0x2F => Some(Self::UserInternalError),
            0x40 => Some(Self::CurrentProgramDataDump),
            0x44 => Some(Self::TuningScaleDataDump),
            0x45 => Some(Self::TuningOctaveDataDump),
            0x46 => Some(Self::LivesetDataDump),
            0x47 => Some(Self::UserApiVersion),
            0x48 => Some(Self::UserModuleInfo),
            0x49 => Some(Self::UserSlotStatus),
            0x4A => Some(Self::UserSlotData),
            0x4C => Some(Self::ProgramDataDump),
            0x51 => Some(Self::GlobalDataDump),
            _ => None,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this is one of the device's error statuses
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self.as_u8(), 0x24..=0x2F)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GlobalDataDumpRequest => "global data dump request",
            Self::CurrentProgramDataDumpRequest => "current program data dump request",
            Self::TuningScaleDataDumpRequest => "tuning scale data dump request",
            Self::TuningOctaveDataDumpRequest => "tuning octave data dump request",
            Self::LivesetDataDumpRequest => "liveset data dump request",
            Self::UserApiVersionRequest => "user API version request",
            Self::UserModuleInfoRequest => "user module info request",
            Self::UserSlotStatusRequest => "user slot status request",
            Self::UserSlotDataRequest => "user slot data request",
            Self::ClearUserSlot => "clear user slot",
            Self::ProgramDataDumpRequest => "program data dump request",
            Self::ClearUserModule => "clear user module",
            Self::SwapUserData => "swap user data",
            Self::DataLoadCompleted => "data load completed",
            Self::DataLoadError => "data load error",
            Self::DataFormatError => "data format error",
            Self::UserDataSizeError => "user data size error",
            Self::UserDataCrcError => "user data CRC error",
            Self::UserTargetError => "user target error",
            Self::UserApiError => "user API error",
            Self::UserLoadSizeError => "user load size error",
            Self::UserModuleError => "user module error",
            Self::UserSlotError => "user slot error",
            Self::UserFormatError => "user format error",
            Self::UserInternalError => "user internal error",
            Self::CurrentProgramDataDump => "current program data dump",
            Self::TuningScaleDataDump => "tuning scale data dump",
            Self::TuningOctaveDataDump => "tuning octave data dump",
            Self::LivesetDataDump => "liveset data dump",
            Self::UserApiVersion => "user API version",
            Self::UserModuleInfo => "user module info",
            Self::UserSlotStatus => "user slot status",
            Self::UserSlotData => "user slot data",
            Self::ProgramDataDump => "program data dump",
            Self::GlobalDataDump => "global data dump",
        };
        write!(f, "{name}")
    }
}
