//! Reader for any image format the `image` crate understands.
//!
//! The container is detected from the leading bytes. TIFF input goes through
//! [`TiffImageReader`] so 16-bit samples keep their precision; everything
//! else (PNG, JPEG, BMP, ...) is decoded by the `image` crate.

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::reader::{ImageReader, convert_channels};
use crate::deblur_pipeline::image::tiff_reader::TiffImageReader;
use crate::deblur_pipeline::image::types::{ColorMode, Image};

pub struct FormatImageReader;

fn decode_error(e: image::ImageError) -> DeblurError {
    DeblurError::DecodeError(e.to_string())
}

fn samples_of(decoded: &DynamicImage) -> (usize, usize, usize, Vec<f64>) {
    if decoded.color().has_color() {
        let rgb = decoded.to_rgb32f();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let samples = rgb.into_raw().into_iter().map(f64::from).collect();
        (width, height, 3, samples)
    } else {
        let luma = decoded.to_luma32f();
        let (width, height) = (luma.width() as usize, luma.height() as usize);
        let samples = luma.into_raw().into_iter().map(f64::from).collect();
        (width, height, 1, samples)
    }
}

impl ImageReader for FormatImageReader {
    fn read_image(&self, data: &[u8], mode: ColorMode) -> Result<Image> {
        let format = image::guess_format(data).map_err(decode_error)?;
        if format == ImageFormat::Tiff {
            return TiffImageReader.read_image(data, mode);
        }

        debug!("Decoding {:?} image, {} bytes", format, data.len());
        let decoded = image::load_from_memory_with_format(data, format).map_err(decode_error)?;
        let (width, height, source_channels, samples) = samples_of(&decoded);
        debug!("Decoded image: {}x{} {:?}", width, height, decoded.color());

        let converted = convert_channels(samples, source_channels, mode);
        Image::from_interleaved(width, height, mode, &converted)
    }
}
