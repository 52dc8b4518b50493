use crate::deblur_pipeline::common::error::Result;
use crate::deblur_pipeline::image::types::{ColorMode, Image};

/// Rec. 601 luma weights for color to grayscale conversion
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

pub trait ImageReader {
    fn read_image(&self, data: &[u8], mode: ColorMode) -> Result<Image>;
}

/// Convert interleaved samples with `source_channels` channels (1, 3 or 4)
/// to the layout `mode` expects. Alpha is dropped.
pub(crate) fn convert_channels(samples: Vec<f64>, source_channels: usize, mode: ColorMode) -> Vec<f64> {
    match (mode, source_channels) {
        (ColorMode::Grayscale, 1) | (ColorMode::Color, 3) => samples,
        (ColorMode::Grayscale, _) => samples
            .chunks_exact(source_channels)
            .map(|px| px[..3].iter().zip(LUMA_WEIGHTS).map(|(v, w)| v * w).sum())
            .collect(),
        (ColorMode::Color, 1) => samples.iter().flat_map(|&v| [v, v, v]).collect(),
        (ColorMode::Color, _) => samples
            .chunks_exact(source_channels)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
    }
}
