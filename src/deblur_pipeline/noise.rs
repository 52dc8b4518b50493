//! Gaussian sensor noise.

use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::Image;

/// Mean used when [`NoisePolicy::Legacy`] is selected.
pub const LEGACY_NOISE_MEAN: f64 = 0.0;
/// Variance used when [`NoisePolicy::Legacy`] is selected.
pub const LEGACY_NOISE_VARIANCE: f64 = 0.1;

/// Which noise parameters take effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoisePolicy {
    /// Use the configured mean and variance
    #[default]
    Configured,
    /// Ignore the configuration and use mean 0, variance 0.1
    Legacy,
}

/// Mean and variance of the noise distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub mean: f64,
    pub variance: f64,
}

impl NoiseParams {
    /// Parameters that are actually applied under `policy`.
    pub fn resolve(self, policy: NoisePolicy) -> NoiseParams {
        match policy {
            NoisePolicy::Configured => self,
            NoisePolicy::Legacy => {
                if self.mean != LEGACY_NOISE_MEAN || self.variance != LEGACY_NOISE_VARIANCE {
                    warn!(
                        configured_mean = self.mean,
                        configured_variance = self.variance,
                        "Legacy noise policy overrides configured parameters"
                    );
                }
                NoiseParams {
                    mean: LEGACY_NOISE_MEAN,
                    variance: LEGACY_NOISE_VARIANCE,
                }
            }
        }
    }
}

/// Draws noise fields from a seeded or entropy-seeded generator
pub struct NoiseInjector {
    rng: StdRng,
}

impl NoiseInjector {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Sample a `rows × cols` field of i.i.d. normal values.
    pub fn inject(&mut self, mean: f64, variance: f64, shape: (usize, usize)) -> Result<DMatrix<f64>> {
        if !mean.is_finite() || !variance.is_finite() || variance < 0.0 {
            return Err(DeblurError::InvalidParameter(format!(
                "noise needs a finite mean and a non-negative variance, got mean={mean}, variance={variance}"
            )));
        }

        let normal = Normal::new(mean, variance.sqrt())
            .map_err(|e| DeblurError::InvalidParameter(e.to_string()))?;
        let (rows, cols) = shape;
        debug!(mean, variance, rows, cols, "Sampling noise field");
        Ok(DMatrix::from_fn(rows, cols, |_, _| normal.sample(&mut self.rng)))
    }

    /// Return `image` with one freshly sampled field added to every channel.
    pub fn apply(&mut self, image: &Image, params: NoiseParams) -> Result<Image> {
        let field = self.inject(params.mean, params.variance, image.shape())?;
        let planes = image.planes().iter().map(|plane| plane + &field).collect();
        Ok(Image::from_planes(planes))
    }
}
