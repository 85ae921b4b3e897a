//! Device commands on top of a [`Session`]
//!
//! Every command is one request/reply exchange: the request body is the command header
//! followed by the 7-bit encoded payload, and the reply's data section is split the same way
//! using the family's reply table.

use std::thread;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use crate::module::{Module, ModuleHeader, ModuleInfo, ModuleKind, ModuleManifest, ModuleSlot};
use crate::protocol::channel::program_select;
use crate::protocol::{
    DeviceProfile, Error, MessageType, Result, build_request, parse_response, program_number,
    seven_bit,
};
use crate::transport::Session;

/// Device configuration options.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// How long to wait for each reply.
    pub reply_timeout: Duration,
    /// Pause after each batch of program-select channel messages.
    pub select_pause: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(2),
            select_pause: Duration::from_millis(1),
        }
    }
}

/// Decoded reply to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Family ID the device answered with
    pub family_id: u8,
    /// Reply message type
    pub message_type: MessageType,
    /// Data section bytes preceding the 7-bit payload
    pub header: Bytes,
    /// Decoded payload
    pub data: Vec<u8>,
}

/// A logue device reachable through a session
#[derive(Debug)]
pub struct Device {
    profile: DeviceProfile,
    session: Session,
    config: DeviceConfig,
}

impl Device {
    /// Create a device handle
    #[must_use]
    pub fn new(profile: DeviceProfile, session: Session, config: DeviceConfig) -> Self {
        Self {
            profile,
            session,
            config,
        }
    }

    /// Get device profile
    #[must_use]
    pub const fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Get underlying session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Send one request and decode its reply
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the exchange fails or times out
    /// - the reply frame is malformed or its payload is not valid 7-bit data
    /// - the device answers with an error status
    #[instrument(
        level = "debug",
        skip(self, header, payload),
        fields(payload_len = payload.len())
    )]
    pub fn request(
        &mut self,
        message_type: MessageType,
        header: &[u8],
        payload: &[u8],
    ) -> Result<Reply> {
        let mut body = Vec::with_capacity(header.len() + seven_bit::encoded_len(payload.len()));
        body.extend_from_slice(header);
        body.extend_from_slice(&seven_bit::encode(payload));

        let frame = build_request(
            self.profile.family_id(),
            self.profile.device_id(),
            message_type,
            &body,
        )?;
        let reply = self.session.exchange(&frame, self.config.reply_timeout)?;
        let response = parse_response(reply)?;

        if response.family_id() != self.profile.family_id() {
            warn!(
                expected = self.profile.family_id(),
                got = response.family_id(),
                "reply from another device family"
            );
        }

        let spec = self.profile.response_for(message_type);
        let Some(reply_type) = response.message_type() else {
            warn!(msg_type = response.msg_type_byte(), "unknown reply message type");
            return Err(Error::UnknownMessageType(response.msg_type_byte()));
        };

        if reply_type.is_error() {
            debug!(status = %reply_type, "device rejected request");
            return Err(Error::DeviceStatus { status: reply_type });
        }
        if let Some(spec) = spec {
            if spec.reply != reply_type {
                warn!(expected = %spec.reply, got = %reply_type, "unexpected reply type");
            }
        }

        let family_id = response.family_id();
        let section = response.into_data();
        let header_size = spec.and_then(|spec| spec.header_size);

        let (header, data) = match header_size {
            Some(size) if section.len() > size => {
                let data = seven_bit::decode(&section[size..])?;
                (section.slice(..size), data)
            }
            _ => (section, Vec::new()),
        };

        debug!(reply = %reply_type, data_len = data.len(), "reply decoded");

        Ok(Reply {
            family_id,
            message_type: reply_type,
            header,
            data,
        })
    }

    /// Read a stored program, or the edit buffer when `number` is `None`
    #[instrument(level = "debug", skip(self))]
    pub fn read_program(&mut self, number: Option<u16>) -> Result<Vec<u8>> {
        let reply = match number {
            Some(number) => {
                let header = self.program_header(number)?;
                self.request(MessageType::ProgramDataDumpRequest, &header, &[])?
            }
            None => self.request(MessageType::CurrentProgramDataDumpRequest, &[], &[])?,
        };
        Ok(reply.data)
    }

    /// Write a stored program, or the edit buffer when `number` is `None`
    #[instrument(level = "debug", skip(self, data), fields(len = data.len()))]
    pub fn write_program(&mut self, number: Option<u16>, data: &[u8]) -> Result<()> {
        let expected = self.profile.family().program_size();
        if data.len() != expected {
            return Err(Error::ProgramSize {
                expected,
                got: data.len(),
            });
        }

        match number {
            Some(number) => {
                let header = self.program_header(number)?;
                self.request(MessageType::ProgramDataDump, &header, data)?;
            }
            None => {
                self.request(MessageType::CurrentProgramDataDump, &[], data)?;
            }
        }
        Ok(())
    }

    /// Switch the device to a stored program
    #[instrument(level = "debug", skip(self))]
    pub fn select_program(&mut self, number: u16) -> Result<()> {
        self.check_program(number)?;

        let channel = self.profile.midi_channel();
        for batch in program_select(number)? {
            for message in batch {
                self.session.send(&message.to_bytes(channel))?;
            }
            thread::sleep(self.config.select_pause);
        }
        Ok(())
    }

    /// Read the global settings block
    #[instrument(level = "debug", skip(self))]
    pub fn read_global(&mut self) -> Result<Vec<u8>> {
        Ok(self.request(MessageType::GlobalDataDumpRequest, &[], &[])?.data)
    }

    /// Download the module stored in a user slot
    ///
    /// A module whose CRC does not match its contents is returned anyway.
    #[instrument(level = "debug", skip(self, slot), fields(slot = %slot))]
    pub fn read_user_slot(&mut self, slot: ModuleSlot) -> Result<Module> {
        let header = single_slot(slot)?;
        let reply = self.request(MessageType::UserSlotDataRequest, &header, &[])?;

        let module = Module::from_bytes(&reply.data)?;
        if !module.crc_matches() {
            warn!(
                stored = module.header.crc32,
                computed = module.compute_crc32(),
                "user slot CRC mismatch"
            );
        }
        Ok(module)
    }

    /// Upload a module built from `manifest` and `payload` into a user slot
    #[instrument(level = "debug", skip(self, slot, manifest, payload), fields(slot = %slot))]
    pub fn write_user_slot(
        &mut self,
        slot: ModuleSlot,
        manifest: &ModuleManifest,
        payload: &[u8],
    ) -> Result<()> {
        let header = single_slot(slot)?;
        let (platform, module) = manifest.build_module(payload)?;
        debug!(%platform, name = %module.header.name, crc = module.header.crc32, "module built");

        self.request(MessageType::UserSlotData, &header, &module.to_bytes())?;
        Ok(())
    }

    /// Clear one slot, or every slot of a module type
    #[instrument(level = "debug", skip(self, target), fields(target = %target))]
    pub fn clear_user_data(&mut self, target: ModuleSlot) -> Result<()> {
        let message_type = if target.slot_index().is_some() {
            MessageType::ClearUserSlot
        } else {
            MessageType::ClearUserModule
        };
        self.request(message_type, &target.header_bytes(), &[])?;
        Ok(())
    }

    /// Capacity of a user module type
    #[instrument(level = "debug", skip(self))]
    pub fn user_module_info(&mut self, kind: ModuleKind) -> Result<ModuleInfo> {
        let reply = self.request(MessageType::UserModuleInfoRequest, &[kind.id()], &[])?;
        ModuleInfo::from_bytes(&reply.data)
    }

    /// Header of the module in a user slot, `None` when the slot is empty
    #[instrument(level = "debug", skip(self, slot), fields(slot = %slot))]
    pub fn user_slot_status(&mut self, slot: ModuleSlot) -> Result<Option<ModuleHeader>> {
        let header = single_slot(slot)?;
        let reply = self.request(MessageType::UserSlotStatusRequest, &header, &[])?;
        ModuleHeader::from_slot_status(&reply.data)
    }

    fn check_program(&self, number: u16) -> Result<()> {
        if self.profile.has_program(number) {
            return Ok(());
        }
        let range = self.profile.family().program_range();
        Err(Error::out_of_range("program number", number, *range.start(), *range.end()))
    }

    fn program_header(&self, number: u16) -> Result<[u8; 2]> {
        self.check_program(number)?;
        program_number(number)
    }
}

fn single_slot(slot: ModuleSlot) -> Result<Vec<u8>> {
    if slot.slot_index().is_none() {
        return Err(Error::InvalidModuleSlot(slot.to_string()));
    }
    Ok(slot.header_bytes())
}
