use std::io::Write;
use tracing::debug;
use crate::deblur_pipeline::common::error::{Result, DeblurError};
use crate::deblur_pipeline::image::output::{denormalize, OutputConfig, TiffCompression};
use crate::deblur_pipeline::image::types::Image;
use crate::deblur_pipeline::image::writer::ImageWriter;

pub struct StandardTiffWriter;

impl ImageWriter for StandardTiffWriter {
    fn write_image(&self, image: &Image, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}x{}", image.width(), image.height(), image.channels());

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let samples: Vec<u8> = image.to_interleaved().into_iter().map(denormalize).collect();
        let (width, height) = (image.width() as u32, image.height() as u32);

        {
            let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| DeblurError::EncodeError(e.to_string()))?
                .with_compression(compression);

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => tiff::tags::Predictor::Horizontal,
                    _ => tiff::tags::Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let written = if image.is_color() {
                encoder.write_image::<tiff::encoder::colortype::RGB8>(width, height, &samples)
            } else {
                encoder.write_image::<tiff::encoder::colortype::Gray8>(width, height, &samples)
            };
            written.map_err(|e| DeblurError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
