//! User module header block
//!
//! The header is 1032 bytes with fixed field offsets.

use std::fmt;
use std::str::FromStr;

use super::{
    HEADER_SIZE, MAX_PARAMETERS, ModuleKind, NAME_LEN, PARAM_NAME_LEN, PARAM_SIZE, PARAMS_OFFSET,
    PAYLOAD_SIZE_OFFSET,
};
use crate::protocol::{Error, Result};

const TOTAL_SIZE_OFFSET: usize = 0;
const CRC32_OFFSET: usize = 4;
const MODULE_ID_OFFSET: usize = 8;
const PLATFORM_ID_OFFSET: usize = 9;
const API_VERSION_OFFSET: usize = 10;
const DEVELOPER_ID_OFFSET: usize = 14;
const PROGRAM_ID_OFFSET: usize = 18;
const VERSION_OFFSET: usize = 22;
const NAME_OFFSET: usize = 26;
const PARAM_COUNT_OFFSET: usize = 40;

/// Three-part version stored as `(patch, minor, major)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch level
    pub patch: u8,
}

impl Version {
    /// Create a version
    #[must_use]
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self { major, minor, patch }
    }

    /// Read from wire order `(patch, minor, major)`
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            patch: bytes[0],
            minor: bytes[1],
            major: bytes[2],
        }
    }

    /// Wire order `(patch, minor, major)`
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.patch, self.minor, self.major]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}-{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Parse `major.minor-patch`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_string());

        let (major, rest) = s.split_once('.').ok_or_else(invalid)?;
        let (minor, patch) = rest.split_once('-').ok_or_else(invalid)?;

        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
            patch: patch.parse().map_err(|_| invalid())?,
        })
    }
}

/// How the device displays a parameter value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamKind {
    /// Shown as a percentage
    Percent,
    /// Shown as a plain number
    #[default]
    Plain,
}

impl ParamKind {
    const PERCENT_BYTE: u8 = 0x02;
    const PLAIN_BYTE: u8 = 0x00;

    /// Kind from its table byte
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            Self::PERCENT_BYTE => Self::Percent,
            _ => Self::Plain,
        }
    }

    /// Table byte
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Percent => Self::PERCENT_BYTE,
            Self::Plain => Self::PLAIN_BYTE,
        }
    }

    /// Kind from its manifest tag (`"%"` or `""`)
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == "%" { Self::Percent } else { Self::Plain }
    }

    /// Manifest tag
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Plain => "",
        }
    }
}

/// One entry of the parameter table
///
/// # Layout
///
/// ```text
/// 0: min (i8)  1: max (i8)  2: kind  3..13: name  13..16: zero
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Lowest value
    pub min: i8,
    /// Highest value
    pub max: i8,
    /// Display kind
    pub kind: ParamKind,
    /// Name, at most 10 bytes on the wire
    pub name: String,
}

impl Parameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, min: i8, max: i8, kind: ParamKind) -> Self {
        Self {
            min,
            max,
            kind,
            name: name.into(),
        }
    }

    fn from_entry(entry: &[u8]) -> Self {
        Self {
            min: i8::from_ne_bytes([entry[0]]),
            max: i8::from_ne_bytes([entry[1]]),
            kind: ParamKind::from_byte(entry[2]),
            name: read_fixed_str(&entry[3..3 + PARAM_NAME_LEN]),
        }
    }

    fn write_entry(&self, entry: &mut [u8]) {
        entry[0] = self.min.to_ne_bytes()[0];
        entry[1] = self.max.to_ne_bytes()[0];
        entry[2] = self.kind.as_byte();
        write_fixed_str(&mut entry[3..3 + PARAM_NAME_LEN], &self.name);
    }
}

/// User module header
///
/// # Layout
///
/// ```text
///    0  total size (u32 LE)         4  CRC32 (u32 LE)
///    8  module ID                   9  platform ID
///   10  API version (3) + pad      14  developer ID (u32 LE)
///   18  program ID (u32 LE)        22  version (3) + pad
///   26  name (13)                  40  parameter count
///   44  parameters (16 each)     1028  payload size (u32 LE)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleHeader {
    /// Declared total size; the serialized module is `total_size + 8` bytes
    pub total_size: u32,
    /// CRC32 over the serialized module from offset 8
    pub crc32: u32,
    /// Module type ID
    pub module_id: u8,
    /// Target platform byte
    pub platform_id: u8,
    /// User API the module was built against
    pub api_version: Version,
    /// Developer ID
    pub developer_id: u32,
    /// Program ID
    pub program_id: u32,
    /// Module version
    pub version: Version,
    /// Name, at most 13 bytes on the wire
    pub name: String,
    /// Parameter table
    pub parameters: Vec<Parameter>,
    /// Payload size following the header block
    pub payload_size: u32,
}

impl ModuleHeader {
    /// Module type
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        ModuleKind::from_id(self.module_id)
    }

    /// Number of parameter table entries
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Parse from the first 1032 bytes of `bytes`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the buffer is shorter than 1032 bytes
    /// - the parameter count exceeds the table capacity
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        let count = usize::from(bytes[PARAM_COUNT_OFFSET]);
        if count > MAX_PARAMETERS {
            return Err(Error::TooManyParameters {
                count,
                max: MAX_PARAMETERS,
            });
        }

        let parameters = bytes[PARAMS_OFFSET..]
            .chunks_exact(PARAM_SIZE)
            .take(count)
            .map(Parameter::from_entry)
            .collect();

        Ok(Self {
            total_size: read_u32(bytes, TOTAL_SIZE_OFFSET),
            crc32: read_u32(bytes, CRC32_OFFSET),
            module_id: bytes[MODULE_ID_OFFSET],
            platform_id: bytes[PLATFORM_ID_OFFSET],
            api_version: read_version(bytes, API_VERSION_OFFSET),
            developer_id: read_u32(bytes, DEVELOPER_ID_OFFSET),
            program_id: read_u32(bytes, PROGRAM_ID_OFFSET),
            version: read_version(bytes, VERSION_OFFSET),
            name: read_fixed_str(&bytes[NAME_OFFSET..NAME_OFFSET + NAME_LEN]),
            parameters,
            payload_size: read_u32(bytes, PAYLOAD_SIZE_OFFSET),
        })
    }

    /// Serialize to the 1032-byte header block
    ///
    /// Gaps between fields are zero. The stored `crc32` is written as is; computing it is the
    /// caller's job (see [`super::Module::seal`]). Parameters beyond the table capacity are
    /// not written.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        write_u32(&mut bytes, TOTAL_SIZE_OFFSET, self.total_size);
        write_u32(&mut bytes, CRC32_OFFSET, self.crc32);
        bytes[MODULE_ID_OFFSET] = self.module_id;
        bytes[PLATFORM_ID_OFFSET] = self.platform_id;
        write_version(&mut bytes, API_VERSION_OFFSET, self.api_version);
        write_u32(&mut bytes, DEVELOPER_ID_OFFSET, self.developer_id);
        write_u32(&mut bytes, PROGRAM_ID_OFFSET, self.program_id);
        write_version(&mut bytes, VERSION_OFFSET, self.version);
        write_fixed_str(&mut bytes[NAME_OFFSET..NAME_OFFSET + NAME_LEN], &self.name);

        let count = self.parameters.len().min(MAX_PARAMETERS);
        bytes[PARAM_COUNT_OFFSET] = u8::try_from(count).unwrap_or(u8::MAX);
        for (param, entry) in self
            .parameters
            .iter()
            .zip(bytes[PARAMS_OFFSET..PAYLOAD_SIZE_OFFSET].chunks_exact_mut(PARAM_SIZE))
        {
            param.write_entry(entry);
        }

        write_u32(&mut bytes, PAYLOAD_SIZE_OFFSET, self.payload_size);

        bytes
    }

    /// Parse a user slot status reply
    ///
    /// The device sends the header without its size and CRC fields. An empty reply means the
    /// slot holds nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the reconstructed header is malformed.
    pub fn from_slot_status(data: &[u8]) -> Result<Option<Self>> {
        if data.is_empty() {
            return Ok(None);
        }

        let mut block = vec![0u8; CRC32_OFFSET + 4];
        block.extend_from_slice(data);
        if block.len() < HEADER_SIZE {
            block.resize(HEADER_SIZE, 0);
        }

        Self::from_bytes(&block).map(Some)
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_version(bytes: &[u8], offset: usize) -> Version {
    Version::from_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2]])
}

fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Versions occupy four bytes; the last stays zero
fn write_version(bytes: &mut [u8], offset: usize, version: Version) {
    bytes[offset..offset + 3].copy_from_slice(&version.to_bytes());
}

/// Read a NUL padded field, dropping the padding
fn read_fixed_str(field: &[u8]) -> String {
    let end = field.iter().rposition(|&byte| byte != 0).map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Write `value` NUL padded, truncated to the field width on a char boundary
fn write_fixed_str(field: &mut [u8], value: &str) {
    let mut end = value.len().min(field.len());
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&value.as_bytes()[..end]);
    field[end..].fill(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> ModuleHeader {
        ModuleHeader {
            total_size: 0xC84,
            crc32: 0xDEAD_BEEF,
            module_id: ModuleKind::Osc.id(),
            platform_id: 1,
            api_version: Version::new(1, 1, 0),
            developer_id: 0x1234_5678,
            program_id: 42,
            version: Version::new(1, 0, 3),
            name: "waves".to_string(),
            parameters: vec![
                Parameter::new("Wave A", 0, 45, ParamKind::Plain),
                Parameter::new("Sub Mix", 0, 100, ParamKind::Percent),
                Parameter::new("Detune", -50, 50, ParamKind::Plain),
            ],
            payload_size: 1200,
        }
    }

    #[test]
    fn test_version_format() {
        let version = Version::new(1, 2, 3);
        assert_eq!(version.to_string(), "1.2-3");
        assert_eq!("1.2-3".parse::<Version>().unwrap(), version);
        assert_eq!(version.to_bytes(), [3, 2, 1]);
        assert_eq!(Version::from_bytes([3, 2, 1]), version);
    }

    #[test]
    fn test_version_rejects_other_formats() {
        for bad in ["1.2.3", "1-2.3", "1.2", "", "a.b-c", "1.2-300"] {
            assert!(matches!(bad.parse::<Version>(), Err(Error::InvalidVersion(_))), "{bad}");
        }
    }

    #[test]
    fn test_header_offsets() {
        let bytes = sample_header().to_bytes();

        assert_eq!(&bytes[0..4], &0xC84u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &0xDEAD_BEEFu32.to_le_bytes());
        assert_eq!(bytes[8], 4);
        assert_eq!(bytes[9], 1);
        assert_eq!(&bytes[10..14], &[0, 1, 1, 0]);
        assert_eq!(&bytes[14..18], &0x1234_5678u32.to_le_bytes());
        assert_eq!(&bytes[18..22], &42u32.to_le_bytes());
        assert_eq!(&bytes[22..26], &[3, 0, 1, 0]);
        assert_eq!(&bytes[26..31], b"waves");
        assert!(bytes[31..40].iter().all(|&b| b == 0));
        assert_eq!(bytes[40], 3);

        // Second parameter entry
        assert_eq!(&bytes[60..63], &[0, 100, 0x02]);
        assert_eq!(&bytes[63..70], b"Sub Mix");
        // Third parameter minimum is two's complement
        assert_eq!(bytes[76], 0xCE);

        assert_eq!(&bytes[1028..1032], &1200u32.to_le_bytes());
    }

    #[test]
    fn test_header_roundtrip() {
        let header = sample_header();
        let decoded = ModuleHeader::from_bytes(&header.to_bytes()).unwrap();

        assert_eq!(decoded, header);
        assert_eq!(decoded.parameter_count(), 3);
        assert_eq!(decoded.kind(), ModuleKind::Osc);
    }

    #[test]
    fn test_long_names_truncated() {
        let mut header = sample_header();
        header.name = "a very long module name".to_string();
        header.parameters[0].name = "Parameter Alpha".to_string();

        let decoded = ModuleHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded.name, "a very long m");
        assert_eq!(decoded.parameters[0].name, "Parameter ");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let mut header = sample_header();
        header.name = "ondes-Martenø".to_string(); // 14 bytes, ø is two

        let decoded = ModuleHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded.name, "ondes-Marten");
    }

    #[test]
    fn test_header_too_short() {
        let result = ModuleHeader::from_bytes(&[0u8; 100]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                needed: HEADER_SIZE,
                got: 100
            })
        ));
    }

    #[test]
    fn test_too_many_parameters() {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[40] = 62;
        assert!(matches!(
            ModuleHeader::from_bytes(&bytes),
            Err(Error::TooManyParameters { count: 62, .. })
        ));
    }

    #[test]
    fn test_slot_status() {
        assert_eq!(ModuleHeader::from_slot_status(&[]).unwrap(), None);

        let header = sample_header();
        let bytes = header.to_bytes();
        let status = ModuleHeader::from_slot_status(&bytes[8..100]).unwrap().unwrap();

        assert_eq!(status.total_size, 0);
        assert_eq!(status.crc32, 0);
        assert_eq!(status.name, "waves");
        assert_eq!(status.version, header.version);
        assert_eq!(status.parameters, header.parameters);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn parameter_strategy() -> impl Strategy<Value = Parameter> {
            (any::<i8>(), any::<i8>(), any::<bool>(), "[ -~]{0,10}").prop_map(
                |(min, max, percent, name)| {
                    let kind = if percent { ParamKind::Percent } else { ParamKind::Plain };
                    Parameter::new(name, min, max, kind)
                },
            )
        }

        proptest! {
            /// Property: serialize(parse(serialize(h))) == serialize(h)
            #[test]
            fn prop_header_idempotent(
                total_size in any::<u32>(),
                crc32 in any::<u32>(),
                module_id in any::<u8>(),
                ids in any::<(u32, u32)>(),
                versions in any::<([u8; 3], [u8; 3])>(),
                name in "[ -~]{0,13}",
                parameters in prop::collection::vec(parameter_strategy(), 0..=14),
                payload_size in any::<u32>(),
            ) {
                let header = ModuleHeader {
                    total_size,
                    crc32,
                    module_id,
                    platform_id: 1,
                    api_version: Version::from_bytes(versions.0),
                    developer_id: ids.0,
                    program_id: ids.1,
                    version: Version::from_bytes(versions.1),
                    name,
                    parameters,
                    payload_size,
                };

                let bytes = header.to_bytes();
                let reparsed = ModuleHeader::from_bytes(&bytes).unwrap();
                prop_assert_eq!(reparsed.to_bytes(), bytes);
            }
        }
    }
}
