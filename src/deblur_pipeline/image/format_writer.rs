use std::io::{Cursor, Write};

use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::output::{ImageFileFormat, OutputConfig, denormalize};
use crate::deblur_pipeline::image::standard_tiff_writer::StandardTiffWriter;
use crate::deblur_pipeline::image::types::Image;
use crate::deblur_pipeline::image::writer::ImageWriter;

/// Writes 8-bit images in the container named by `OutputConfig::format`.
///
/// TIFF goes through [`StandardTiffWriter`] so the compression and predictor
/// settings apply; other formats are encoded by the `image` crate.
pub struct FormatImageWriter;

impl ImageWriter for FormatImageWriter {
    fn write_image(&self, image: &Image, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        if config.format == ImageFileFormat::Tiff {
            return StandardTiffWriter.write_image(image, output, config);
        }

        debug!(
            "Encoding {:?} image: {}x{}x{}",
            config.format,
            image.width(),
            image.height(),
            image.channels()
        );

        let samples: Vec<u8> = image.to_interleaved().into_iter().map(denormalize).collect();
        let (width, height) = (image.width() as u32, image.height() as u32);

        let dynamic = if image.is_color() {
            RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
        } else {
            GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
        }
        .ok_or_else(|| DeblurError::EncodeError(format!("sample count does not fit {width}x{height}")))?;

        let mut buffer = Cursor::new(Vec::new());
        dynamic
            .write_to(&mut buffer, config.format.to_image_format())
            .map_err(|e| DeblurError::EncodeError(e.to_string()))?;
        let buffer = buffer.into_inner();
        output.write_all(&buffer)?;

        debug!("{:?} encoding complete, {} bytes", config.format, buffer.len());
        Ok(())
    }
}
