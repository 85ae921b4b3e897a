//! Channel voice messages used to switch programs
//!
//! logue devices select a program with bank select (CC 0x00 / CC 0x20) followed by a program
//! change; a note-on/off pair and "all sound off" first wake the sound engine and silence
//! whatever is still ringing.

use super::{Error, Result};

/// Note off status nibble
pub const NOTE_OFF: u8 = 0x80;
/// Note on status nibble
pub const NOTE_ON: u8 = 0x90;
/// Control change status nibble
pub const CONTROL_CHANGE: u8 = 0xB0;
/// Program change status nibble
pub const PROGRAM_CHANGE: u8 = 0xC0;

/// Bank select MSB controller
pub const CC_BANK_MSB: u8 = 0x00;
/// Bank select LSB controller
pub const CC_BANK_LSB: u8 = 0x20;
/// All sound off controller
pub const CC_ALL_SOUND_OFF: u8 = 0x78;

/// Programs per bank
pub const PROGRAMS_PER_BANK: u16 = 100;

/// One short channel message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMessage {
    /// Note on
    NoteOn {
        /// Key number
        key: u8,
        /// Velocity
        velocity: u8,
    },
    /// Note off
    NoteOff {
        /// Key number
        key: u8,
    },
    /// Control change
    ControlChange {
        /// Controller number
        controller: u8,
        /// Controller value
        value: u8,
    },
    /// Program change
    ProgramChange {
        /// Program within the selected bank
        program: u8,
    },
}

impl ChannelMessage {
    /// Wire bytes on a 0-based MIDI channel
    #[must_use]
    pub fn to_bytes(self, channel: u8) -> Vec<u8> {
        let channel = channel & 0x0F;
        match self {
            Self::NoteOn { key, velocity } => vec![NOTE_ON | channel, key & 0x7F, velocity & 0x7F],
            Self::NoteOff { key } => vec![NOTE_OFF | channel, key & 0x7F, 0x00],
            Self::ControlChange { controller, value } => {
                vec![CONTROL_CHANGE | channel, controller & 0x7F, value & 0x7F]
            }
            Self::ProgramChange { program } => vec![PROGRAM_CHANGE | channel, program & 0x7F],
        }
    }
}

/// Program-select sequence, split where the device needs a short pause
///
/// The first batch wakes and silences the device, the second switches bank and program.
///
/// # Errors
///
/// Returns an error if `number` is zero or beyond the bank select range.
pub fn program_select(number: u16) -> Result<[Vec<ChannelMessage>; 2]> {
    let max = PROGRAMS_PER_BANK * 128;
    if !(1..=max).contains(&number) {
        return Err(Error::out_of_range("program number", number, 1, max));
    }

    let index = number - 1;
    let bank = (index / PROGRAMS_PER_BANK) as u8;
    let program = (index % PROGRAMS_PER_BANK) as u8;

    let wake = vec![
        ChannelMessage::NoteOn { key: 1, velocity: 1 },
        ChannelMessage::NoteOff { key: 1 },
        ChannelMessage::ControlChange {
            controller: CC_ALL_SOUND_OFF,
            value: 0,
        },
    ];
    let select = vec![
        ChannelMessage::ControlChange {
            controller: CC_BANK_MSB,
            value: 0,
        },
        ChannelMessage::ControlChange {
            controller: CC_BANK_LSB,
            value: bank,
        },
        ChannelMessage::ProgramChange { program },
    ];

    Ok([wake, select])
}
