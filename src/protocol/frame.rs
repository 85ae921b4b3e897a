//! SysEx envelope framing
//!
//! # Wire Format
//!
//! ```text
//! +------+------+---------+------+------+--------+------+-----------+------+
//! | 0xF0 | 0x42 | 0x3n    | 0x00 | 0x01 | family | type | body ...  | 0xF7 |
//! +------+------+---------+------+------+--------+------+-----------+------+
//!   start  Korg   channel   reserved      family   msg    header +
//!                 (id - 1)                id       type   7-bit data
//! ```

use bytes::Bytes;

use super::{
    CHANNEL_BASE, DEVICE_ID_MAX, DEVICE_ID_MIN, END, Error, KORG_ID, MIN_FRAME_SIZE, MessageType,
    Result, START,
};

/// Highest program number the two 7-bit wire bytes can address
pub const PROGRAM_NUMBER_MAX: u16 = 1 << 14;

/// Build a request frame
///
/// `body` is the caller's header bytes followed by already transcoded data.
///
/// # Errors
///
/// Returns an error if `device_id` is outside `1..=16`.
pub fn build_request(
    family_id: u8,
    device_id: u8,
    message_type: MessageType,
    body: &[u8],
) -> Result<Vec<u8>> {
    let channel = channel_byte(device_id)?;

    let mut frame = Vec::with_capacity(MIN_FRAME_SIZE + body.len());
    frame.extend_from_slice(&[
        START,
        KORG_ID,
        channel,
        0x00,
        0x01,
        family_id,
        message_type.as_u8(),
    ]);
    frame.extend_from_slice(body);
    frame.push(END);

    Ok(frame)
}

/// Transport channel byte for a device ID
///
/// # Errors
///
/// Returns an error if `device_id` is outside `1..=16`.
pub fn channel_byte(device_id: u8) -> Result<u8> {
    if !(DEVICE_ID_MIN..=DEVICE_ID_MAX).contains(&device_id) {
        return Err(Error::out_of_range("device id", device_id, DEVICE_ID_MIN, DEVICE_ID_MAX));
    }
    Ok(CHANNEL_BASE + device_id - 1)
}

/// Parsed reply frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    family_id: u8,
    msg_type: u8,
    data: Bytes,
}

impl Response {
    /// Get family ID
    #[must_use]
    pub const fn family_id(&self) -> u8 {
        self.family_id
    }

    /// Get message type byte
    #[must_use]
    pub const fn msg_type_byte(&self) -> u8 {
        self.msg_type
    }

    /// Get message type
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u8(self.msg_type)
    }

    /// Data section between the message type and the end byte
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Take the data section
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

/// Parse a reply frame
///
/// A frame of exactly eight bytes must end in `0xF7` and has an empty data section. Longer
/// frames yield everything between the message type and the final byte.
///
/// # Errors
///
/// Returns an error if:
/// - the frame is shorter than eight bytes
/// - the start byte is not `0xF0` or the vendor byte is not `0x42`
/// - an eight-byte frame does not end in `0xF7`
pub fn parse_response(frame: impl Into<Bytes>) -> Result<Response> {
    let frame: Bytes = frame.into();

    if frame.len() < MIN_FRAME_SIZE {
        return Err(Error::FrameTooShort { len: frame.len() });
    }
    if frame[0] != START {
        return Err(Error::InvalidStart { found: frame[0] });
    }
    if frame[1] != KORG_ID {
        return Err(Error::InvalidVendor { found: frame[1] });
    }

    let family_id = frame[5];
    let msg_type = frame[6];

    let data = if frame.len() == MIN_FRAME_SIZE {
        if frame[7] != END {
            return Err(Error::MissingEnd { found: frame[7] });
        }
        Bytes::new()
    } else {
        frame.slice(7..frame.len() - 1)
    };

    Ok(Response {
        family_id,
        msg_type,
        data,
    })
}

/// Wire bytes for a 1-based program number
///
/// ```
/// use logue_sysex::protocol::program_number;
///
/// assert_eq!(program_number(1)?, [0x00, 0x00]);
/// assert_eq!(program_number(500)?, [0x73, 0x03]);
/// # Ok::<(), logue_sysex::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if `number` is zero or above 16384.
pub fn program_number(number: u16) -> Result<[u8; 2]> {
    if !(1..=PROGRAM_NUMBER_MAX).contains(&number) {
        return Err(Error::out_of_range("program number", number, 1, PROGRAM_NUMBER_MAX));
    }
    let index = number - 1;
    Ok([(index & 0x7F) as u8, ((index >> 7) & 0x7F) as u8])
}
