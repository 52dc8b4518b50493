//! Settings file loading.
//!
//! Settings live under a `params` section of a YAML or JSON document, the
//! format being chosen from the file extension.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::config::types::{DeblurConfig, NoiseConfig, PsfSpec};
use crate::deblur_pipeline::image::{OutputConfig, TiffCompression};
use crate::deblur_pipeline::noise::{NoiseParams, NoisePolicy};
use crate::deblur_pipeline::psf::PsfKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsFormat {
    Yaml,
    Json,
}

impl SettingsFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| DeblurError::Config(format!("{}: missing file extension", path.display())))?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(DeblurError::Config(format!(
                "{}: unsupported settings extension {ext:?}",
                path.display()
            )))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    params: Params,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    input_image: PathBuf,
    blurred_image: PathBuf,
    deblurred_image: PathBuf,
    psf: PsfKind,
    n: i64,
    psf_param: f64,
    add_noise: bool,
    mean: f64,
    var: f64,
    show_images: bool,
    color: bool,
    #[serde(default)]
    noise_policy: NoisePolicy,
    #[serde(default)]
    noise_seed: Option<u64>,
    #[serde(default)]
    compression: TiffCompression,
    #[serde(default)]
    predictor: Option<u16>,
}

impl Params {
    fn into_config(self) -> Result<DeblurConfig> {
        let length = usize::try_from(self.n).map_err(|_| {
            DeblurError::InvalidParameter(format!("kernel length must be positive, got {}", self.n))
        })?;

        Ok(DeblurConfig {
            input_image: self.input_image,
            blurred_image: self.blurred_image,
            deblurred_image: self.deblurred_image,
            psf: PsfSpec {
                kind: self.psf,
                length,
                param: self.psf_param,
            },
            color: self.color,
            noise: NoiseConfig {
                enabled: self.add_noise,
                params: NoiseParams {
                    mean: self.mean,
                    variance: self.var,
                },
                policy: self.noise_policy,
                seed: self.noise_seed,
            },
            show_images: self.show_images,
            output: OutputConfig {
                compression: self.compression,
                predictor: self.predictor,
                ..OutputConfig::default()
            },
        })
    }
}

impl DeblurConfig {
    /// Parse and validate settings text in the given format.
    pub fn from_settings_str(text: &str, format: SettingsFormat) -> Result<Self> {
        let file: SettingsFile = match format {
            SettingsFormat::Yaml => {
                serde_yml::from_str(text).map_err(|e| DeblurError::Config(e.to_string()))?
            }
            SettingsFormat::Json => {
                serde_json::from_str(text).map_err(|e| DeblurError::Config(e.to_string()))?
            }
        };

        let config = file.params.into_config()?;
        config.validate()?;
        debug!(?config, "Parsed settings");
        Ok(config)
    }

    /// Read, parse and validate a settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeblurError::Config(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), ?format, "Loading settings");
        Self::from_settings_str(&text, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
params:
  input_image: lena.tif
  blurred_image: blurred.tif
  deblurred_image: deblurred.tif
  psf: defocus
  n: 7
  psf_param: 2
  add_noise: true
  mean: 0.05
  var: 0.01
  show_images: false
  color: true
"#;

    #[test]
    fn test_yaml_settings() {
        let config = DeblurConfig::from_settings_str(YAML, SettingsFormat::Yaml).unwrap();

        assert_eq!(config.input_image, PathBuf::from("lena.tif"));
        assert_eq!(config.psf, PsfSpec { kind: PsfKind::Defocus, length: 7, param: 2.0 });
        assert!(config.color);
        assert!(config.noise.enabled);
        assert_eq!(config.noise.params, NoiseParams { mean: 0.05, variance: 0.01 });
        assert_eq!(config.noise.policy, NoisePolicy::Configured);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_json_settings_with_optional_keys() {
        let json = r#"{
            "params": {
                "input_image": "in.tif",
                "blurred_image": "b.tif",
                "deblurred_image": "d.tif",
                "psf": "gaussian",
                "n": 3,
                "psf_param": 1.5,
                "add_noise": true,
                "mean": 0.3,
                "var": 0.2,
                "show_images": true,
                "color": false,
                "noise_policy": "legacy",
                "noise_seed": 11,
                "compression": "deflate_fast"
            }
        }"#;
        let config = DeblurConfig::from_settings_str(json, SettingsFormat::Json).unwrap();

        assert_eq!(config.psf.kind, PsfKind::Gaussian);
        assert_eq!(config.noise.policy, NoisePolicy::Legacy);
        assert_eq!(config.noise.seed, Some(11));
        assert_eq!(config.output.compression, TiffCompression::DeflateFast);
        assert!(config.show_images);
    }

    #[test]
    fn test_negative_length_is_invalid_parameter() {
        let yaml = YAML.replace("n: 7", "n: -3");
        let result = DeblurConfig::from_settings_str(&yaml, SettingsFormat::Yaml);
        assert!(matches!(result, Err(DeblurError::InvalidParameter(_))));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let yaml = YAML.replace("  psf_param: 2\n", "");
        let result = DeblurConfig::from_settings_str(&yaml, SettingsFormat::Yaml);
        assert!(matches!(result, Err(DeblurError::Config(_))));
    }

    #[test]
    fn test_unknown_kernel_kind() {
        let yaml = YAML.replace("psf: defocus", "psf: motion");
        let result = DeblurConfig::from_settings_str(&yaml, SettingsFormat::Yaml);
        assert!(matches!(result, Err(DeblurError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = DeblurConfig::from_file(file.path()).unwrap();
        assert_eq!(config.psf.length, 7);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = DeblurConfig::from_file("settings.cfg");
        assert!(matches!(result, Err(DeblurError::Config(_))));
        assert_eq!(SettingsFormat::from_path(Path::new("a.JSON")).unwrap(), SettingsFormat::Json);
    }
}
