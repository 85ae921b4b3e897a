//! logue-sysex - SysEx toolkit for Korg logue-series synthesizers
//!
//! This library speaks the SysEx dialect of the Korg prologue: 7-bit transcoding of binary
//! payloads, request framing and reply parsing, the user module container with its JSON
//! manifest, and a request/reply session over a pair of MIDI ports.
//!
//! # Quick Start
//!
//! ```rust
//! use logue_sysex::protocol::{DeviceFamily, DeviceProfile, MessageType, build_request, seven_bit};
//!
//! let profile = DeviceProfile::new(DeviceFamily::Prologue, 1)?;
//!
//! // Request program 1 from the device
//! let header = logue_sysex::protocol::program_number(1)?;
//! let frame = build_request(
//!     profile.family_id(),
//!     profile.device_id(),
//!     MessageType::ProgramDataDumpRequest,
//!     &header,
//! )?;
//! assert_eq!(frame, [0xF0, 0x42, 0x30, 0x00, 0x01, 0x4B, 0x1C, 0x00, 0x00, 0xF7]);
//!
//! // Binary payloads travel 7-bit clean
//! let encoded = seven_bit::encode(&[0x80, 0xFF]);
//! assert_eq!(seven_bit::decode(&encoded)?, [0x80, 0xFF]);
//! # Ok::<(), logue_sysex::Error>(())
//! ```
//!
//! # Features
//!
//! - **7-bit transcoding** - groups of seven bytes behind a high-bit header byte
//! - **Table-driven device families** - reply shapes and limits are data, not code
//! - **User modules** - header block, parameter table, CRC32 and JSON manifests
//! - **`midir` feature** - physical MIDI ports for [`transport::Session`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod device;
pub mod module;
pub mod protocol;
pub mod transport;

pub use device::{Device, DeviceConfig, Reply};
pub use module::{Module, ModuleHeader, ModuleManifest};
pub use protocol::{DeviceFamily, DeviceProfile, Error, ErrorKind, MessageType, Result};
pub use transport::{FrameSink, Session, SessionConfig};
