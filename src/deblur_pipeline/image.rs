//! Image module
//!
//! In-memory image representation plus the reading, writing and display
//! collaborators around the deblurring core.

mod reader;
mod writer;
mod tiff_reader;
mod standard_tiff_writer;
mod format_reader;
mod format_writer;
pub mod output;
pub mod types;
pub mod viewer;

pub use reader::ImageReader;
pub use writer::ImageWriter;
pub use tiff_reader::TiffImageReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use format_reader::FormatImageReader;
pub use format_writer::FormatImageWriter;
pub use output::{ImageFileFormat, OutputConfig, TiffCompression};
pub use types::{ColorMode, Image};
pub use viewer::{ImageSummary, ImageViewer, SummaryViewer};
