use bytes::Bytes;

use super::{CRC_START, DEFAULT_TOTAL_SIZE, HEADER_SIZE, MAX_TOTAL_SIZE, ModuleHeader};
use crate::protocol::{Error, Result};

static ZEROS: [u8; 256] = [0; 256];

/// User module: header block followed by its payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    /// Header block
    pub header: ModuleHeader,
    /// Payload bytes
    pub payload: Bytes,
}

impl Module {
    /// Create a module from a header and payload
    pub fn new(header: ModuleHeader, payload: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Parse a serialized module
    ///
    /// Bytes past the declared payload (padding) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the header block is short or malformed
    /// - the declared total size exceeds [`MAX_TOTAL_SIZE`]
    /// - the declared payload runs past the end of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = ModuleHeader::from_bytes(bytes)?;
        if header.total_size > MAX_TOTAL_SIZE {
            return Err(Error::TotalSizeTooLarge {
                declared: header.total_size,
                max: MAX_TOTAL_SIZE,
            });
        }

        let declared = header.payload_size as usize;
        let available = bytes.len() - HEADER_SIZE;
        if declared > available {
            return Err(Error::PayloadOverrun { declared, available });
        }

        let payload = Bytes::copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + declared]);
        Ok(Self { header, payload })
    }

    /// Serialize header and payload, zero padded to `total_size + 8` when that is longer
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let unpadded = HEADER_SIZE + self.payload.len();
        let mut bytes = Vec::with_capacity(unpadded + self.padding_len());

        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes.resize(unpadded + self.padding_len(), 0);

        bytes
    }

    /// CRC32 (IEEE) of the serialized module from offset 8 on
    ///
    /// Streams the header, payload and zero padding without building the image.
    #[must_use]
    pub fn compute_crc32(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&self.header.to_bytes()[CRC_START..]);
        hasher.update(&self.payload);

        let mut padding = self.padding_len();
        while padding > 0 {
            let chunk = padding.min(ZEROS.len());
            hasher.update(&ZEROS[..chunk]);
            padding -= chunk;
        }

        hasher.finalize()
    }

    /// Check the stored CRC against the module contents
    #[must_use]
    pub fn crc_matches(&self) -> bool {
        self.header.crc32 == self.compute_crc32()
    }

    /// Fill in payload size, total size and CRC so the module is ready to upload
    ///
    /// # Errors
    ///
    /// Returns an error if the payload length does not fit the 32-bit size field.
    pub fn seal(&mut self) -> Result<()> {
        let payload_size = u32::try_from(self.payload.len()).map_err(|_| Error::PayloadOverrun {
            declared: self.payload.len(),
            available: u32::MAX as usize,
        })?;

        self.header.payload_size = payload_size;
        self.header.total_size = DEFAULT_TOTAL_SIZE;
        self.header.crc32 = self.compute_crc32();
        Ok(())
    }

    /// Zero bytes needed to reach `total_size + 8`
    fn padding_len(&self) -> usize {
        (self.header.total_size as usize + CRC_START)
            .saturating_sub(HEADER_SIZE + self.payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleKind, ParamKind, Parameter, Version};

    fn sample_module() -> Module {
        let header = ModuleHeader {
            module_id: ModuleKind::Osc.id(),
            platform_id: 1,
            api_version: Version::new(1, 1, 0),
            developer_id: 7,
            program_id: 9,
            version: Version::new(1, 0, 0),
            name: "sine".to_string(),
            parameters: vec![Parameter::new("Shape", 0, 100, ParamKind::Percent)],
            ..ModuleHeader::default()
        };
        Module::new(header, vec![0xA5; 64])
    }

    #[test]
    fn test_module_roundtrip() {
        let mut module = sample_module();
        module.seal().unwrap();

        let bytes = module.to_bytes();
        assert_eq!(bytes.len(), DEFAULT_TOTAL_SIZE as usize + 8);

        let decoded = Module::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, module);
        assert!(decoded.crc_matches());
    }

    #[test]
    fn test_seal_fields() {
        let mut module = sample_module();
        module.seal().unwrap();

        assert_eq!(module.header.payload_size, 64);
        assert_eq!(module.header.total_size, 0xC84);
        assert_eq!(module.header.crc32, crc32fast::hash(&module.to_bytes()[8..]));
    }

    #[test]
    fn test_crc_ignores_leading_fields() {
        let mut module = sample_module();
        module.seal().unwrap();
        let crc = module.header.crc32;

        module.header.crc32 = 0;
        assert_eq!(module.compute_crc32(), crc);
    }

    #[test]
    fn test_crc_detects_payload_change() {
        let mut module = sample_module();
        module.seal().unwrap();

        let mut bytes = module.to_bytes();
        bytes[HEADER_SIZE + 10] ^= 0x01;
        let corrupted = Module::from_bytes(&bytes).unwrap();
        assert!(!corrupted.crc_matches());
    }

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32fast::hash(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_no_padding_when_payload_is_large() {
        let mut module = sample_module();
        module.payload = Bytes::from(vec![1u8; 4000]);
        module.seal().unwrap();

        assert_eq!(module.to_bytes().len(), HEADER_SIZE + 4000);
    }

    #[test]
    fn test_payload_overrun() {
        let mut module = sample_module();
        module.header.payload_size = 100;
        module.header.total_size = 0;
        let mut bytes = module.header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 40]);

        assert!(matches!(
            Module::from_bytes(&bytes),
            Err(Error::PayloadOverrun {
                declared: 100,
                available: 40
            })
        ));
    }

    #[test]
    fn test_oversized_total_size_rejected() {
        let mut module = sample_module();
        module.header.total_size = 0x3FFF_FFF0;
        module.header.payload_size = 4;
        let mut bytes = module.header.to_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4]);

        assert!(matches!(
            Module::from_bytes(&bytes),
            Err(Error::TotalSizeTooLarge {
                declared: 0x3FFF_FFF0,
                max: MAX_TOTAL_SIZE
            })
        ));
    }

    #[test]
    fn test_streamed_crc_matches_padded_image() {
        let mut module = sample_module();
        module.seal().unwrap();
        // Padding longer than one zero chunk
        module.header.total_size = MAX_TOTAL_SIZE;

        let image = module.to_bytes();
        assert_eq!(image.len(), MAX_TOTAL_SIZE as usize + 8);
        assert_eq!(module.compute_crc32(), crc32fast::hash(&image[CRC_START..]));
    }

    #[test]
    fn test_short_module() {
        assert!(matches!(
            Module::from_bytes(&[0u8; 1031]),
            Err(Error::BufferTooSmall { .. })
        ));
    }
}
