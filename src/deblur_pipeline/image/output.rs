//! Output encoding options

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deblur_pipeline::common::error::{DeblurError, Result};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Container format of an output image, picked from its file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFileFormat {
    #[default]
    Tiff,
    Png,
    Jpeg,
    Bmp,
}

impl ImageFileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| DeblurError::UnsupportedFormat(format!("{}: missing file extension", path.display())))?;

        match ext.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Ok(Self::Tiff),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            _ => Err(DeblurError::UnsupportedFormat(format!(
                "{}: unsupported image extension {ext:?}",
                path.display()
            ))),
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Tiff => image::ImageFormat::Tiff,
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// How the blurred and deblurred images are encoded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputConfig {
    /// Container format; compression and predictor only apply to TIFF
    pub format: ImageFileFormat,
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
}

/// Scale a `[0, 1]` sample to `[0, 255]`, clamping and truncating.
pub fn denormalize(sample: f64) -> u8 {
    if sample.is_nan() {
        return 0;
    }
    (sample * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(0.0), 0);
        assert_eq!(denormalize(1.0), 255);
        assert_eq!(denormalize(0.5), 127);
        assert_eq!(denormalize(-0.3), 0);
        assert_eq!(denormalize(4.2), 255);
        assert_eq!(denormalize(f64::NAN), 0);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFileFormat::from_path(Path::new("out/b.tif")).unwrap(), ImageFileFormat::Tiff);
        assert_eq!(ImageFileFormat::from_path(Path::new("b.TIFF")).unwrap(), ImageFileFormat::Tiff);
        assert_eq!(ImageFileFormat::from_path(Path::new("lena.png")).unwrap(), ImageFileFormat::Png);
        assert_eq!(ImageFileFormat::from_path(Path::new("d.JPG")).unwrap(), ImageFileFormat::Jpeg);
        assert_eq!(ImageFileFormat::from_path(Path::new("d.bmp")).unwrap(), ImageFileFormat::Bmp);

        for path in ["d.gif", "deblurred"] {
            let result = ImageFileFormat::from_path(Path::new(path));
            assert!(matches!(result, Err(DeblurError::UnsupportedFormat(_))));
        }
    }
}
