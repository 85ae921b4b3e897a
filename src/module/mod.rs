//! User module container
//!
//! A user module (oscillator or effect unit) travels as a 1032-byte header block followed by
//! its payload. The header carries a parameter table and a CRC32 over everything after the
//! first eight bytes; a JSON manifest mirrors the header for tooling.

mod container;
mod header;
mod info;
mod kind;
mod manifest;

pub use container::Module;
pub use header::{ModuleHeader, ParamKind, Parameter, Version};
pub use info::{ModuleInfo, ModuleSlot};
pub use kind::ModuleKind;
pub use manifest::{ManifestHeader, ManifestParam, ModuleManifest};

/// Width of the header block in bytes
pub const HEADER_SIZE: usize = 1032;

/// Module name width
pub const NAME_LEN: usize = 13;

/// Parameter name width
pub const PARAM_NAME_LEN: usize = 10;

/// Bytes per parameter table entry
pub const PARAM_SIZE: usize = 16;

/// Offset of the first parameter table entry
pub const PARAMS_OFFSET: usize = 44;

/// Offset of the payload size field
pub const PAYLOAD_SIZE_OFFSET: usize = 1028;

/// Parameter entries that fit between the table start and the payload size field
pub const MAX_PARAMETERS: usize = (PAYLOAD_SIZE_OFFSET - PARAMS_OFFSET) / PARAM_SIZE;

/// Total size written into newly built modules
pub const DEFAULT_TOTAL_SIZE: u32 = 0xC84;

/// Largest total size accepted from a serialized module
///
/// Well above any logue user slot; anything larger is corrupt data.
pub const MAX_TOTAL_SIZE: u32 = 0x0010_0000;

/// The CRC covers the serialized module from this offset on
pub const CRC_START: usize = 8;
