//! Sequence configuration

use rgbdcloud_core::{Error, Result, RigidTransform};
use rgbdcloud_io::PcdDataFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for turning a frame sequence into point cloud files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Keep every n-th row and column of each frame
    pub subsampling_step: usize,
    pub write_pcd: bool,
    /// `ascii` or `binary`
    pub pcd_format: PcdDataFormat,
    pub write_ptx: bool,
    /// Scanner pose the PTX files are written from
    pub ptx_transform: RigidTransform,
    /// File names are `<file_stem><zero-padded index>.<ext>`
    pub file_stem: String,
    pub index_width: usize,
    pub manifest_name: String,
    /// Write frames on the rayon pool
    pub parallel: bool,
    /// Worker count for parallel runs (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            subsampling_step: 1,
            write_pcd: true,
            pcd_format: PcdDataFormat::Binary,
            write_ptx: true,
            ptx_transform: RigidTransform::identity(),
            file_stem: "pointCloud".to_string(),
            index_width: 3,
            manifest_name: "pcdSequence.txt".to_string(),
            parallel: false,
            threads: None,
        }
    }
}

impl SequenceConfig {
    /// Parse and validate a JSON config; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidData(format!("sequence config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidData(format!("sequence config: {}", e)))
    }

    /// The PCD body format; only `ascii` and `binary` can be written
    pub fn pcd_data_format(&self) -> Result<PcdDataFormat> {
        match self.pcd_format {
            PcdDataFormat::BinaryCompressed => Err(Error::UnsupportedFormat(
                "binary_compressed PCD output is not supported".to_string(),
            )),
            format => Ok(format),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subsampling_step == 0 {
            return Err(Error::InvalidData("subsampling_step must be at least 1".to_string()));
        }
        if !self.write_pcd && !self.write_ptx {
            return Err(Error::InvalidData(
                "at least one of write_pcd and write_ptx must be enabled".to_string(),
            ));
        }
        if self.write_pcd {
            self.pcd_data_format()?;
        }
        if self.index_width == 0 {
            return Err(Error::InvalidData("index_width must be at least 1".to_string()));
        }
        for (key, name) in [("file_stem", &self.file_stem), ("manifest_name", &self.manifest_name)] {
            if name.is_empty() || name.contains(['/', '\\', '\n']) {
                return Err(Error::InvalidData(format!("{} '{}' is not a plain file name", key, name)));
            }
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidData("threads must be at least 1".to_string()));
        }
        self.ptx_transform.validate(1e-6)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SequenceConfig::default();
        assert_eq!(config.subsampling_step, 1);
        assert_eq!(config.pcd_data_format().unwrap(), PcdDataFormat::Binary);
        assert_eq!(config.manifest_name, "pcdSequence.txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SequenceConfig::from_json_str(r#"{ "subsampling_step": 4, "pcd_format": "ascii" }"#).unwrap();
        assert_eq!(config.subsampling_step, 4);
        assert_eq!(config.pcd_data_format().unwrap(), PcdDataFormat::Ascii);
        assert!(config.write_ptx);
        assert_eq!(config.file_stem, "pointCloud");
    }

    #[test]
    fn test_pcd_format_names() {
        let config = SequenceConfig {
            pcd_format: PcdDataFormat::Ascii,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert!(json.contains(r#""pcd_format": "ascii""#));

        let config = SequenceConfig::from_json_str(r#"{ "pcd_format": "binary" }"#).unwrap();
        assert_eq!(config.pcd_format, PcdDataFormat::Binary);
        assert!(SequenceConfig::from_json_str(r#"{ "pcd_format": "Binary" }"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SequenceConfig {
            parallel: true,
            threads: Some(2),
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(SequenceConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            SequenceConfig::from_json_str(r#"{ "pcd_format": "xml" }"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            SequenceConfig::from_json_str(r#"{ "pcd_format": "binary_compressed" }"#),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SequenceConfig::from_json_str(r#"{ "subsampling_step": 0 }"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            SequenceConfig::from_json_str(r#"{ "write_pcd": false, "write_ptx": false }"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            SequenceConfig::from_json_str(r#"{ "file_stem": "../frame" }"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(SequenceConfig::from_json_str("{ not json"), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_pcd_format_ignored_without_pcd_output() {
        let config =
            SequenceConfig::from_json_str(r#"{ "write_pcd": false, "pcd_format": "binary_compressed" }"#).unwrap();
        assert!(!config.write_pcd);
        assert_eq!(config.pcd_format, PcdDataFormat::BinaryCompressed);
    }
}
