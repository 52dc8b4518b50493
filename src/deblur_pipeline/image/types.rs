//! In-memory image representation

use nalgebra::DMatrix;

use crate::deblur_pipeline::common::error::{DeblurError, Result};

/// Channel layout requested from, or produced by, the image collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Color,
}

impl ColorMode {
    pub fn from_color_flag(color: bool) -> Self {
        if color { ColorMode::Color } else { ColorMode::Grayscale }
    }

    pub fn channels(self) -> usize {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Color => 3,
        }
    }
}

/// Floating point image stored as one `rows × cols` plane per channel.
///
/// Samples are nominally in `[0, 1]`; blurring, noise and inversion may push
/// them outside that range and nothing here clamps them.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    planes: Vec<DMatrix<f64>>,
}

impl Image {
    pub fn grayscale(plane: DMatrix<f64>) -> Self {
        Self { planes: vec![plane] }
    }

    pub fn color(planes: [DMatrix<f64>; 3]) -> Result<Self> {
        let shape = planes[0].shape();
        if planes.iter().any(|p| p.shape() != shape) {
            return Err(DeblurError::ShapeMismatch(
                "color planes must share the same dimensions".to_string(),
            ));
        }
        Ok(Self { planes: planes.into() })
    }

    /// Build an image from row-major interleaved samples (`[R, G, B, R, ...]` for color).
    pub fn from_interleaved(
        width: usize,
        height: usize,
        mode: ColorMode,
        data: &[f64],
    ) -> Result<Self> {
        let channels = mode.channels();
        if data.len() != width * height * channels {
            return Err(DeblurError::ShapeMismatch(format!(
                "expected {} samples for {}x{}x{}, got {}",
                width * height * channels,
                width,
                height,
                channels,
                data.len()
            )));
        }

        let planes = (0..channels)
            .map(|k| DMatrix::from_fn(height, width, |r, c| data[(r * width + c) * channels + k]))
            .collect();
        Ok(Self { planes })
    }

    /// Row-major interleaved samples, the inverse of [`Image::from_interleaved`].
    pub fn to_interleaved(&self) -> Vec<f64> {
        let (height, width) = self.shape();
        let channels = self.channels();
        let mut data = Vec::with_capacity(width * height * channels);
        for r in 0..height {
            for c in 0..width {
                data.extend(self.planes.iter().map(|p| p[(r, c)]));
            }
        }
        data
    }

    pub(crate) fn from_planes(planes: Vec<DMatrix<f64>>) -> Self {
        Self { planes }
    }

    pub fn planes(&self) -> &[DMatrix<f64>] {
        &self.planes
    }

    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    pub fn mode(&self) -> ColorMode {
        if self.channels() == 3 { ColorMode::Color } else { ColorMode::Grayscale }
    }

    pub fn is_color(&self) -> bool {
        self.mode() == ColorMode::Color
    }

    /// `(rows, cols)` of every plane
    pub fn shape(&self) -> (usize, usize) {
        self.planes[0].shape()
    }

    pub fn height(&self) -> usize {
        self.shape().0
    }

    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// Mean absolute difference over every sample of both images.
    pub fn mean_abs_diff(&self, other: &Image) -> Result<f64> {
        if self.shape() != other.shape() || self.channels() != other.channels() {
            return Err(DeblurError::ShapeMismatch(format!(
                "cannot compare {:?}x{} with {:?}x{}",
                self.shape(),
                self.channels(),
                other.shape(),
                other.channels()
            )));
        }

        let count = (self.height() * self.width() * self.channels()) as f64;
        let total: f64 = self
            .planes
            .iter()
            .zip(&other.planes)
            .map(|(a, b)| (a - b).abs().sum())
            .sum();
        Ok(total / count)
    }
}
