//! Deblurring configuration types

use std::path::PathBuf;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::OutputConfig;
use crate::deblur_pipeline::noise::{NoiseParams, NoisePolicy};
use crate::deblur_pipeline::psf::PsfKind;

/// Point-spread function selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsfSpec {
    pub kind: PsfKind,
    /// Number of kernel taps
    pub length: usize,
    /// Standard deviation (Gaussian) or radius (defocus)
    pub param: f64,
}

/// Sensor noise settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Whether noise is added to the blurred image
    pub enabled: bool,
    /// Configured mean and variance
    pub params: NoiseParams,
    /// Which parameters take effect, see [`NoisePolicy`]
    pub policy: NoisePolicy,
    /// Seed for a reproducible noise field
    pub seed: Option<u64>,
}

/// Configuration for a blur / deblur run
#[derive(Debug, Clone, PartialEq)]
pub struct DeblurConfig {
    pub input_image: PathBuf,
    pub blurred_image: PathBuf,
    pub deblurred_image: PathBuf,
    pub psf: PsfSpec,
    /// Process three channels instead of one
    pub color: bool,
    pub noise: NoiseConfig,
    /// Hand the three images to the viewer when the run completes
    pub show_images: bool,
    pub output: OutputConfig,
}

impl Default for DeblurConfig {
    fn default() -> Self {
        Self {
            input_image: PathBuf::from("input.tif"),
            blurred_image: PathBuf::from("blurred.tif"),
            deblurred_image: PathBuf::from("deblurred.tif"),
            psf: PsfSpec {
                kind: PsfKind::Gaussian,
                length: 3,
                param: 1.0,
            },
            color: false,
            noise: NoiseConfig {
                enabled: false,
                params: NoiseParams {
                    mean: 0.0,
                    variance: 0.1,
                },
                policy: NoisePolicy::Configured,
                seed: None,
            },
            show_images: false,
            output: OutputConfig::default(),
        }
    }
}

impl DeblurConfig {
    pub fn builder() -> DeblurConfigBuilder {
        DeblurConfigBuilder::default()
    }

    /// Check every value the pipeline depends on.
    pub fn validate(&self) -> Result<()> {
        if self.psf.length == 0 {
            return Err(DeblurError::InvalidParameter(
                "kernel length must be positive".to_string(),
            ));
        }
        if !self.psf.param.is_finite() || self.psf.param <= 0.0 {
            return Err(DeblurError::InvalidParameter(format!(
                "kernel parameter must be a positive number, got {}",
                self.psf.param
            )));
        }

        let NoiseParams { mean, variance } = self.noise.params;
        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(DeblurError::InvalidParameter(format!(
                "noise needs a finite mean and a non-negative variance, got mean={mean}, variance={variance}"
            )));
        }

        for (name, path) in [
            ("input_image", &self.input_image),
            ("blurred_image", &self.blurred_image),
            ("deblurred_image", &self.deblurred_image),
        ] {
            if path.as_os_str().is_empty() {
                return Err(DeblurError::Config(format!("{name} path is empty")));
            }
        }
        Ok(())
    }
}

/// Builder for DeblurConfig
#[derive(Default)]
pub struct DeblurConfigBuilder {
    input_image: Option<PathBuf>,
    blurred_image: Option<PathBuf>,
    deblurred_image: Option<PathBuf>,
    psf: Option<PsfSpec>,
    color: Option<bool>,
    add_noise: Option<bool>,
    noise_params: Option<NoiseParams>,
    noise_policy: Option<NoisePolicy>,
    noise_seed: Option<Option<u64>>,
    show_images: Option<bool>,
    output: Option<OutputConfig>,
}

impl DeblurConfigBuilder {
    pub fn input_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_image = Some(path.into());
        self
    }

    pub fn blurred_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.blurred_image = Some(path.into());
        self
    }

    pub fn deblurred_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.deblurred_image = Some(path.into());
        self
    }

    pub fn psf(mut self, kind: PsfKind, length: usize, param: f64) -> Self {
        self.psf = Some(PsfSpec { kind, length, param });
        self
    }

    pub fn color(mut self, enable: bool) -> Self {
        self.color = Some(enable);
        self
    }

    pub fn add_noise(mut self, enable: bool) -> Self {
        self.add_noise = Some(enable);
        self
    }

    pub fn noise_params(mut self, mean: f64, variance: f64) -> Self {
        self.noise_params = Some(NoiseParams { mean, variance });
        self
    }

    pub fn noise_policy(mut self, policy: NoisePolicy) -> Self {
        self.noise_policy = Some(policy);
        self
    }

    pub fn noise_seed(mut self, seed: Option<u64>) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    pub fn show_images(mut self, enable: bool) -> Self {
        self.show_images = Some(enable);
        self
    }

    pub fn output(mut self, output: OutputConfig) -> Self {
        self.output = Some(output);
        self
    }

    pub fn build(self) -> DeblurConfig {
        let default = DeblurConfig::default();
        DeblurConfig {
            input_image: self.input_image.unwrap_or(default.input_image),
            blurred_image: self.blurred_image.unwrap_or(default.blurred_image),
            deblurred_image: self.deblurred_image.unwrap_or(default.deblurred_image),
            psf: self.psf.unwrap_or(default.psf),
            color: self.color.unwrap_or(default.color),
            noise: NoiseConfig {
                enabled: self.add_noise.unwrap_or(default.noise.enabled),
                params: self.noise_params.unwrap_or(default.noise.params),
                policy: self.noise_policy.unwrap_or(default.noise.policy),
                seed: self.noise_seed.unwrap_or(default.noise.seed),
            },
            show_images: self.show_images.unwrap_or(default.show_images),
            output: self.output.unwrap_or(default.output),
        }
    }
}
