//! JSON manifest describing a user module
//!
//! ```json
//! {"header": {"platform": "prologue", "module": "osc", "api": "1.2-3", "dev_id": 8,
//!   "prg_id": 9, "version": "5.6-7", "name": "waves", "num_param": 1,
//!   "params": [["Sub Mix", 0, 100, "%"]]}}
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Module, ModuleHeader, ModuleKind, ParamKind, Parameter, Version};
use crate::protocol::{DeviceFamily, Error, Result};

/// Manifest document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module description
    pub header: ManifestHeader,
}

/// Manifest `header` object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    /// Target platform name
    pub platform: String,
    /// Module type name
    pub module: String,
    /// User API version, `major.minor-patch`
    pub api: String,
    /// Developer ID
    pub dev_id: u32,
    /// Program ID
    pub prg_id: u32,
    /// Module version, `major.minor-patch`
    pub version: String,
    /// Module name
    pub name: String,
    /// Number of entries of `params` in use
    pub num_param: usize,
    /// Parameter descriptors
    #[serde(default)]
    pub params: Vec<ManifestParam>,
}

/// Parameter descriptor, serialized as `[name, min, max, "%" | ""]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestParam(pub String, pub i32, pub i32, pub String);

impl ManifestParam {
    fn to_parameter(&self) -> Result<Parameter> {
        let bound = |value: i32| {
            i8::try_from(value)
                .map_err(|_| Error::out_of_range("parameter bound", value, i8::MIN, i8::MAX))
        };

        Ok(Parameter {
            min: bound(self.1)?,
            max: bound(self.2)?,
            kind: ParamKind::from_tag(&self.3),
            name: self.0.clone(),
        })
    }
}

impl From<&Parameter> for ManifestParam {
    fn from(param: &Parameter) -> Self {
        Self(
            param.name.clone(),
            i32::from(param.min),
            i32::from(param.max),
            param.kind.tag().to_string(),
        )
    }
}

impl ModuleManifest {
    /// Parse a manifest document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a header from the manifest
    ///
    /// Returns the manifest's platform name alongside the header. Size and CRC fields are
    /// left zero; an unknown platform stores the prologue platform byte.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `num_param` exceeds the number of `params` entries
    /// - a version string is malformed
    /// - a parameter bound does not fit in `i8`
    pub fn to_header(&self) -> Result<(String, ModuleHeader)> {
        let manifest = &self.header;

        if manifest.num_param > manifest.params.len() {
            return Err(Error::Manifest(format!(
                "num_param is {} but only {} params are listed",
                manifest.num_param,
                manifest.params.len()
            )));
        }

        let parameters = manifest.params[..manifest.num_param]
            .iter()
            .map(ManifestParam::to_parameter)
            .collect::<Result<Vec<_>>>()?;

        let platform_id = DeviceFamily::from_str(&manifest.platform)
            .unwrap_or(DeviceFamily::Prologue)
            .platform_id();

        let header = ModuleHeader {
            module_id: ModuleKind::from_name(&manifest.module).id(),
            platform_id,
            api_version: manifest.api.parse::<Version>()?,
            developer_id: manifest.dev_id,
            program_id: manifest.prg_id,
            version: manifest.version.parse::<Version>()?,
            name: manifest.name.clone(),
            parameters,
            ..ModuleHeader::default()
        };

        Ok((manifest.platform.clone(), header))
    }

    /// Build a sealed module ready for upload
    pub fn build_module(&self, payload: &[u8]) -> Result<(String, Module)> {
        let (platform, header) = self.to_header()?;
        let mut module = Module::new(header, payload.to_vec());
        module.seal()?;
        Ok((platform, module))
    }
}

impl ModuleHeader {
    /// Describe this header as a manifest for `platform`
    #[must_use]
    pub fn to_manifest(&self, platform: &str) -> ModuleManifest {
        ModuleManifest {
            header: ManifestHeader {
                platform: platform.to_string(),
                module: self.kind().name().to_string(),
                api: self.api_version.to_string(),
                dev_id: self.developer_id,
                prg_id: self.program_id,
                version: self.version.to_string(),
                name: self.name.clone(),
                num_param: self.parameters.len(),
                params: self.parameters.iter().map(ManifestParam::from).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAVES: &str = r#"
    {
        "header" :
        {
            "platform" : "prologue",
            "module" : "osc",
            "api" : "1.2-3",
            "dev_id" : 8,
            "prg_id" : 9,
            "version" : "5.6-7",
            "name" : "waves",
            "num_param" : 6,
            "params" : [
                ["Wave A",      0,  45,  ""],
                ["Wave B",      0,  43,  ""],
                ["Sub Wave",    0,  15,  ""],
                ["Sub Mix",     0, 100, "%"],
                ["Ring Mix",    0, 100, "%"],
                ["Bit Crush",   0, 100, "%"]
            ]
        }
    }"#;

    #[test]
    fn test_manifest_to_header() {
        let manifest = ModuleManifest::from_json(WAVES).unwrap();
        let (platform, header) = manifest.to_header().unwrap();

        assert_eq!(platform, "prologue");
        assert_eq!(header.kind(), ModuleKind::Osc);
        assert_eq!(header.platform_id, 1);
        assert_eq!(header.api_version, Version::new(1, 2, 3));
        assert_eq!(header.version, Version::new(5, 6, 7));
        assert_eq!(header.developer_id, 8);
        assert_eq!(header.program_id, 9);
        assert_eq!(header.name, "waves");
        assert_eq!(header.parameters.len(), 6);
        assert_eq!(header.parameters[3], Parameter::new("Sub Mix", 0, 100, ParamKind::Percent));
        assert_eq!(header.total_size, 0);
        assert_eq!(header.crc32, 0);
        assert_eq!(header.payload_size, 0);
    }

    #[test]
    fn test_manifest_roundtrip() {
        let manifest = ModuleManifest::from_json(WAVES).unwrap();
        let (platform, header) = manifest.to_header().unwrap();

        assert_eq!(header.to_manifest(&platform), manifest);

        let json = manifest.to_json().unwrap();
        assert_eq!(ModuleManifest::from_json(&json).unwrap(), manifest);
        assert!(json.contains(r#"["Sub Mix",0,100,"%"]"#));
    }

    #[test]
    fn test_build_module() {
        let manifest = ModuleManifest::from_json(WAVES).unwrap();
        let payload = vec![0x11u8; 256];
        let (platform, module) = manifest.build_module(&payload).unwrap();

        assert_eq!(platform, "prologue");
        assert_eq!(module.header.payload_size, 256);
        assert_eq!(module.header.total_size, 0xC84);
        assert!(module.crc_matches());
        assert_eq!(&module.payload[..], &payload[..]);
    }

    #[test]
    fn test_num_param_exceeds_params() {
        let mut manifest = ModuleManifest::from_json(WAVES).unwrap();
        manifest.header.num_param = 7;

        let err = manifest.to_header().unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_bound_out_of_range() {
        let mut manifest = ModuleManifest::from_json(WAVES).unwrap();
        manifest.header.params[0].2 = 200;

        let err = manifest.to_header().unwrap_err();
        assert!(matches!(err, Error::OutOfRange { value: 200, .. }));
    }

    #[test]
    fn test_unknown_platform_and_module() {
        let mut manifest = ModuleManifest::from_json(WAVES).unwrap();
        manifest.header.platform = "nts-1".to_string();
        manifest.header.module = "synth".to_string();

        let (platform, header) = manifest.to_header().unwrap();
        assert_eq!(platform, "nts-1");
        assert_eq!(header.platform_id, DeviceFamily::Prologue.platform_id());
        assert_eq!(header.kind(), ModuleKind::Unknown);
    }

    #[test]
    fn test_bad_version() {
        let mut manifest = ModuleManifest::from_json(WAVES).unwrap();
        manifest.header.api = "1.2".to_string();

        assert!(matches!(manifest.to_header(), Err(Error::InvalidVersion(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = ModuleManifest::from_json("{\"header\": 5}").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
