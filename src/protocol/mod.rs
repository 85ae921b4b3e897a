//! logue SysEx protocol core
//!
//! This module provides the 7-bit transcoding, the SysEx envelope, message types and the
//! per-family reply tables.

pub mod channel;
mod error;
mod frame;
mod profile;
mod response;
pub mod seven_bit;
mod types;

pub use error::{Error, ErrorKind, Result};
pub use frame::{
    PROGRAM_NUMBER_MAX, Response, build_request, channel_byte, parse_response, program_number,
};
pub use profile::{DeviceFamily, DeviceProfile};
pub use response::{ResponseSpec, lookup};
pub use types::MessageType;

/// SysEx start byte
pub const START: u8 = 0xF0;

/// SysEx end byte
pub const END: u8 = 0xF7;

/// Korg manufacturer ID
pub const KORG_ID: u8 = 0x42;

/// Channel byte for device ID 1
pub const CHANNEL_BASE: u8 = 0x30;

/// Lowest global MIDI channel a device can listen on
pub const DEVICE_ID_MIN: u8 = 1;

/// Highest global MIDI channel a device can listen on
pub const DEVICE_ID_MAX: u8 = 16;

/// Envelope bytes before the body (start through message type)
pub const ENVELOPE_PREFIX_SIZE: usize = 7;

/// Smallest well-formed frame (envelope prefix + end byte)
pub const MIN_FRAME_SIZE: usize = ENVELOPE_PREFIX_SIZE + 1;
