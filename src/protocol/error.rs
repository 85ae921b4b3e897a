//! Error types shared by the codec, module container and transport layers

use std::time::Duration;

use thiserror::Error;

use super::MessageType;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed 7-bit data or fixed-layout record
    Format,
    /// Malformed SysEx envelope
    Protocol,
    /// No reply within the bounded wait
    Timeout,
    /// No writable output or the inbound side went away
    Transport,
    /// Number outside its declared bounds
    Range,
    /// The device answered with an error status
    Device,
    /// Unknown device family or other setup mistake
    Config,
}

/// logue SysEx errors
#[derive(Error, Debug)]
pub enum Error {
    /// A 7-bit group too short to carry data
    #[error("truncated 7-bit group at offset {offset}: {len} byte(s), need at least 2")]
    TruncatedGroup {
        /// Offset of the group in the encoded input
        offset: usize,
        /// Length of the group
        len: usize,
    },

    /// Byte with the top bit set inside 7-bit data
    #[error("byte {byte:#04x} at offset {offset} is not 7-bit clean")]
    NotSevenBit {
        /// Offset in the encoded input
        offset: usize,
        /// Offending byte
        byte: u8,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Declared payload runs past the end of the buffer
    #[error("payload of {declared} bytes exceeds the {available} bytes available")]
    PayloadOverrun {
        /// Payload size from the header
        declared: usize,
        /// Bytes left after the header block
        available: usize,
    },

    /// Declared total size larger than any user slot
    #[error("module total size {declared} exceeds {max} bytes")]
    TotalSizeTooLarge {
        /// Total size from the header
        declared: u32,
        /// Largest accepted total size
        max: u32,
    },

    /// Parameter table larger than the header block can hold
    #[error("{count} parameters declared (max {max})")]
    TooManyParameters {
        /// Declared count
        count: usize,
        /// Capacity of the header block
        max: usize,
    },

    /// Program data of the wrong size for the device family
    #[error("program data is {got} bytes, expected {expected}")]
    ProgramSize {
        /// Family program size
        expected: usize,
        /// Supplied size
        got: usize,
    },

    /// Version string not in `major.minor-patch` form
    #[error("invalid version string: {0:?}")]
    InvalidVersion(String),

    /// Malformed manifest document
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// Manifest JSON could not be (de)serialized
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame shorter than the minimal envelope
    #[error("frame too short: {len} bytes (min 8)")]
    FrameTooShort {
        /// Frame length
        len: usize,
    },

    /// Wrong SysEx start byte
    #[error("invalid start byte: expected 0xf0, got {found:#04x}")]
    InvalidStart {
        /// Found byte
        found: u8,
    },

    /// Wrong manufacturer byte
    #[error("invalid vendor id: expected 0x42, got {found:#04x}")]
    InvalidVendor {
        /// Found byte
        found: u8,
    },

    /// Minimal frame without a closing end byte
    #[error("missing end byte: got {found:#04x}")]
    MissingEnd {
        /// Byte found where 0xF7 was expected
        found: u8,
    },

    /// Reply carries a message type outside the known table
    #[error("unknown message type {0:#04x}")]
    UnknownMessageType(u8),

    /// No reply arrived in time
    #[error("no reply within {waited:?}")]
    Timeout {
        /// The bounded wait that elapsed
        waited: Duration,
    },

    /// Session opened without a writable output
    #[error("output port is not writable")]
    NoOutput,

    /// The background listener stopped delivering frames
    #[error("inbound listener has stopped")]
    ListenerClosed,

    /// Underlying port failure
    #[error("port error: {0}")]
    Port(String),

    /// Value outside its declared bounds
    #[error("{what} {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// What was being checked
        what: &'static str,
        /// Offending value
        value: i64,
        /// Lower bound (inclusive)
        min: i64,
        /// Upper bound (inclusive)
        max: i64,
    },

    /// Device replied with an error status
    #[error("device reported {status}")]
    DeviceStatus {
        /// Status message type sent back by the device
        status: MessageType,
    },

    /// Unknown device family name
    #[error("unknown device family: {0:?}")]
    UnknownFamily(String),

    /// Unparseable user module target
    #[error("invalid module slot {0:?}, expected `module` or `module/slot`")]
    InvalidModuleSlot(String),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TruncatedGroup { .. }
            | Self::NotSevenBit { .. }
            | Self::BufferTooSmall { .. }
            | Self::PayloadOverrun { .. }
            | Self::TotalSizeTooLarge { .. }
            | Self::TooManyParameters { .. }
            | Self::ProgramSize { .. }
            | Self::InvalidVersion(_)
            | Self::Manifest(_)
            | Self::Json(_) => ErrorKind::Format,
            Self::FrameTooShort { .. }
            | Self::InvalidStart { .. }
            | Self::InvalidVendor { .. }
            | Self::MissingEnd { .. }
            | Self::UnknownMessageType(_) => ErrorKind::Protocol,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NoOutput | Self::ListenerClosed | Self::Port(_) => ErrorKind::Transport,
            Self::OutOfRange { .. } => ErrorKind::Range,
            Self::DeviceStatus { .. } => ErrorKind::Device,
            Self::UnknownFamily(_) | Self::InvalidModuleSlot(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn out_of_range(
        what: &'static str,
        value: impl Into<i64>,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> Self {
        Self::OutOfRange {
            what,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::TruncatedGroup { offset: 8, len: 1 }.kind(), ErrorKind::Format);
        assert_eq!(Error::FrameTooShort { len: 3 }.kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::Timeout {
                waited: Duration::from_secs(2)
            }
            .kind(),
            ErrorKind::Timeout
        );
        assert_eq!(Error::NoOutput.kind(), ErrorKind::Transport);
        assert_eq!(Error::out_of_range("program", 501, 1, 500).kind(), ErrorKind::Range);
        assert_eq!(
            Error::DeviceStatus {
                status: MessageType::UserDataCrcError
            }
            .kind(),
            ErrorKind::Device
        );
    }

    #[test]
    fn test_range_message() {
        let err = Error::out_of_range("program number", 501, 1, 500);
        assert_eq!(err.to_string(), "program number 501 out of range [1, 500]");
    }
}
