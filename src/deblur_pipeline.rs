//! PSF deblurring pipeline module
//!
//! This module blurs an image with a synthesized point-spread function,
//! optionally adds sensor noise, and recovers the image by inverting the
//! blur operator through its singular value decomposition.

pub mod blur;
pub mod common;
pub mod config;
pub mod deconvolve;
pub mod image;
pub mod noise;
pub mod pipeline;
pub mod psf;

pub use common::{
    DeblurError,
    Result,
};

pub use config::{
    DeblurConfig,
    DeblurConfigBuilder,
    SettingsFormat,
};

pub use deconvolve::InverseOperator;

pub use image::{
    ColorMode,
    FormatImageReader,
    FormatImageWriter,
    Image,
    ImageFileFormat,
    ImageReader,
    ImageViewer,
    ImageWriter,
    OutputConfig,
    StandardTiffWriter,
    SummaryViewer,
    TiffCompression,
    TiffImageReader,
};

pub use noise::{NoiseInjector, NoiseParams, NoisePolicy};

pub use pipeline::{
    DeblurOutcome,
    DeblurPipeline,
    PipelineTimings,
};

pub use psf::{Kernel, LinearOperator, Operator, PsfKind};
