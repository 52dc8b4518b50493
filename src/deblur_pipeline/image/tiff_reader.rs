//! TIFF image reader built on the `tiff` crate.
//!
//! Samples are normalized to `[0, 1]` by the maximum value of their bit
//! depth. Grayscale output from a color file uses the Rec. 601 luma weights;
//! color output from a grayscale file repeats the single channel.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::deblur_pipeline::common::error::{DeblurError, Result};
use crate::deblur_pipeline::image::reader::{ImageReader, convert_channels};
use crate::deblur_pipeline::image::types::{ColorMode, Image};

pub struct TiffImageReader;

fn decode_error(e: tiff::TiffError) -> DeblurError {
    DeblurError::DecodeError(e.to_string())
}

impl ImageReader for TiffImageReader {
    fn read_image(&self, data: &[u8], mode: ColorMode) -> Result<Image> {
        debug!("Decoding TIFF image, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        let (width, height) = decoder.dimensions().map_err(decode_error)?;
        let colortype = decoder.colortype().map_err(decode_error)?;
        let (width, height) = (width as usize, height as usize);

        let source_channels = match colortype {
            ColorType::Gray(8 | 16) => 1,
            ColorType::RGB(8 | 16) => 3,
            ColorType::RGBA(8 | 16) => 4,
            other => {
                return Err(DeblurError::UnsupportedFormat(format!(
                    "TIFF color type {other:?}"
                )));
            }
        };

        let samples: Vec<f64> = match decoder.read_image().map_err(decode_error)? {
            DecodingResult::U8(values) => values.iter().map(|&v| v as f64 / u8::MAX as f64).collect(),
            DecodingResult::U16(values) => values.iter().map(|&v| v as f64 / u16::MAX as f64).collect(),
            _ => {
                return Err(DeblurError::UnsupportedFormat(format!(
                    "TIFF sample format for {colortype:?}"
                )));
            }
        };

        debug!("Decoded image: {}x{} {:?}", width, height, colortype);

        if samples.len() != width * height * source_channels {
            return Err(DeblurError::DecodeError(format!(
                "expected {} samples, decoded {}",
                width * height * source_channels,
                samples.len()
            )));
        }

        let converted = convert_channels(samples, source_channels, mode);
        Image::from_interleaved(width, height, mode, &converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{TiffEncoder, colortype};

    fn encode_rgb8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer)).unwrap();
            encoder.write_image::<colortype::RGB8>(width, height, data).unwrap();
        }
        buffer
    }

    fn encode_gray16(width: u32, height: u32, data: &[u16]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer)).unwrap();
            encoder.write_image::<colortype::Gray16>(width, height, data).unwrap();
        }
        buffer
    }

    #[test]
    fn test_read_rgb_as_color() {
        let bytes = encode_rgb8(2, 1, &[255, 0, 0, 0, 51, 255]);
        let image = TiffImageReader.read_image(&bytes, ColorMode::Color).unwrap();

        assert_eq!(image.shape(), (1, 2));
        assert_eq!(image.planes()[0][(0, 0)], 1.0);
        assert_eq!(image.planes()[1][(0, 1)], 0.2);
        assert_eq!(image.planes()[2][(0, 1)], 1.0);
    }

    #[test]
    fn test_read_rgb_as_grayscale() {
        let bytes = encode_rgb8(1, 1, &[255, 255, 255]);
        let image = TiffImageReader.read_image(&bytes, ColorMode::Grayscale).unwrap();

        assert_eq!(image.channels(), 1);
        assert!((image.planes()[0][(0, 0)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_gray16() {
        let bytes = encode_gray16(2, 2, &[0, 65535, 0, 65535]);
        let image = TiffImageReader.read_image(&bytes, ColorMode::Grayscale).unwrap();

        assert_eq!(image.shape(), (2, 2));
        assert_eq!(image.planes()[0][(1, 1)], 1.0);

        let color = TiffImageReader.read_image(&bytes, ColorMode::Color).unwrap();
        assert_eq!(color.channels(), 3);
        assert_eq!(color.planes()[2][(0, 1)], 1.0);
    }

    #[test]
    fn test_garbage_input() {
        let result = TiffImageReader.read_image(b"not a tiff", ColorMode::Grayscale);
        assert!(matches!(result, Err(DeblurError::DecodeError(_))));
    }
}
