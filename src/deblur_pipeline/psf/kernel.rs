//! 1-D point-spread function kernels.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};

/// Shape of the sampled point-spread function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PsfKind {
    /// Normal density, parameter is the standard deviation
    Gaussian,
    /// Uniform disk (out-of-focus lens), parameter is the radius
    Defocus,
}

/// Sampled 1-D PSF with unit sum
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    taps: Vec<f64>,
}

impl Kernel {
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Index of the tap that lands on the diagonal of the operator.
    pub fn mid(&self) -> usize {
        self.taps.len() / 2
    }

    fn normalized(mut taps: Vec<f64>, kind: PsfKind) -> Result<Self> {
        let total: f64 = taps.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(DeblurError::InvalidParameter(format!(
                "{kind:?} kernel cannot be normalized (sum of samples = {total})"
            )));
        }

        let normalize = 1.0 / total;
        taps.iter_mut().for_each(|t| *t *= normalize);
        Ok(Self { taps })
    }
}

impl PsfKind {
    /// Sample `n` taps of this PSF with shape parameter `param`.
    pub fn synthesize(self, n: usize, param: f64) -> Result<Kernel> {
        if n == 0 {
            return Err(DeblurError::InvalidParameter(
                "kernel length must be positive".to_string(),
            ));
        }
        if !param.is_finite() || param <= 0.0 {
            return Err(DeblurError::InvalidParameter(format!(
                "{self:?} parameter must be a positive number, got {param}"
            )));
        }

        let taps = match self {
            PsfKind::Gaussian => gaussian_taps(n, param),
            PsfKind::Defocus => defocus_taps(n, param),
        };
        let kernel = Kernel::normalized(taps, self)?;

        debug!(kind = ?self, n, param, taps = ?kernel.taps, "Synthesized PSF kernel");
        Ok(kernel)
    }
}

/// Samples of the normal density centred on `n / 2`.
///
/// Only the exponential profile is evaluated. The density's amplitude
/// `1 / (2πσ²)` is a common factor that normalization removes, and leaving it
/// out keeps extreme `σ` from underflowing every sample to zero.
fn gaussian_taps(n: usize, sigma: f64) -> Vec<f64> {
    let x0 = (n / 2) as f64;

    (0..n)
        .map(|x| {
            let z = (x as f64 - x0) / sigma;
            (-0.5 * z * z).exp()
        })
        .collect()
}

/// Uniform inside radius `r` of `n / 2`, zero outside.
///
/// The disk height `1 / (πr²)` is left to normalization, as for the Gaussian.
fn defocus_taps(n: usize, r: f64) -> Vec<f64> {
    let mid = (n / 2) as f64;

    (0..n)
        .map(|i| {
            let offset = (i as f64 - mid).abs();
            if offset <= r { 1.0 } else { 0.0 }
        })
        .collect()
}
