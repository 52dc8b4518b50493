//! Display of pipeline images.

use tracing::info;

use crate::deblur_pipeline::common::error::Result;
use crate::deblur_pipeline::image::types::Image;

pub trait ImageViewer {
    fn show(&self, title: &str, image: &Image) -> Result<()>;
}

/// Reports sample statistics of each image instead of opening a window.
pub struct SummaryViewer;

/// Minimum, maximum and mean over all samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ImageSummary {
    pub fn of(image: &Image) -> Self {
        let planes = image.planes();
        let min = planes.iter().map(|p| p.min()).fold(f64::INFINITY, f64::min);
        let max = planes.iter().map(|p| p.max()).fold(f64::NEG_INFINITY, f64::max);
        let count: usize = planes.iter().map(|p| p.len()).sum();
        let mean = planes.iter().map(|p| p.sum()).sum::<f64>() / count as f64;
        Self { min, max, mean }
    }
}

impl ImageViewer for SummaryViewer {
    fn show(&self, title: &str, image: &Image) -> Result<()> {
        let summary = ImageSummary::of(image);
        info!(
            title,
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            "Image"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_summary() {
        let image = Image::grayscale(DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 1.0, -0.5]));
        let summary = ImageSummary::of(&image);

        assert_eq!(summary, ImageSummary { min: -0.5, max: 1.0, mean: 0.25 });
        assert!(SummaryViewer.show("Input Image", &image).is_ok());
    }
}
