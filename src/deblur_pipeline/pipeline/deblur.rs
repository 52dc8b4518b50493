use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::deblur_pipeline::{
    blur,
    common::error::{DeblurError, Result},
    config::DeblurConfig,
    deconvolve,
    image::{
        ColorMode, FormatImageReader, FormatImageWriter, Image, ImageFileFormat, ImageReader,
        ImageViewer, ImageWriter, OutputConfig, SummaryViewer,
    },
    noise::NoiseInjector,
    pipeline::timing::PipelineTimings,
    psf::Operator,
};

/// Images and diagnostics produced by one pass of the pipeline
#[derive(Debug)]
pub struct DeblurOutcome {
    pub original: Image,
    pub blurred: Image,
    pub deblurred: Image,
    /// Condition number of the blur operator
    pub condition_number: f64,
    pub timings: PipelineTimings,
}

impl DeblurOutcome {
    /// Mean absolute difference between the original and deblurred images.
    pub fn restoration_error(&self) -> Result<f64> {
        self.original.mean_abs_diff(&self.deblurred)
    }
}

pub struct DeblurPipeline<R: ImageReader, W: ImageWriter, V: ImageViewer> {
    reader: R,
    writer: W,
    viewer: V,
    config: DeblurConfig,
}

impl DeblurPipeline<FormatImageReader, FormatImageWriter, SummaryViewer> {
    pub fn new(config: DeblurConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: FormatImageReader,
            writer: FormatImageWriter,
            viewer: SummaryViewer,
            config,
        })
    }
}

impl<R: ImageReader, W: ImageWriter, V: ImageViewer> DeblurPipeline<R, W, V> {
    pub fn with_custom(reader: R, writer: W, viewer: V, config: DeblurConfig) -> Self {
        Self {
            reader,
            writer,
            viewer,
            config,
        }
    }

    fn validate_channels(&self, image: &Image) -> Result<()> {
        let expected = ColorMode::from_color_flag(self.config.color);
        if image.channels() != expected.channels() {
            return Err(DeblurError::ShapeMismatch(format!(
                "image has {} channel(s) but color = {} expects {}",
                image.channels(),
                self.config.color,
                expected.channels()
            )));
        }
        Ok(())
    }

    /// Blur `image`, optionally add noise, and invert the blur.
    #[instrument(skip(self, image), fields(rows = image.height(), cols = image.width(), channels = image.channels()))]
    pub fn process(&self, image: &Image) -> Result<DeblurOutcome> {
        let mut timings = PipelineTimings::new();
        let color = self.config.color;
        let psf = self.config.psf;

        {
            let _span = tracing::info_span!("validate_channels").entered();
            self.validate_channels(image)?;
        }

        let operator = timings.time("synthesize_psf", || {
            let _span = tracing::info_span!("synthesize_psf", kind = ?psf.kind, n = psf.length, param = psf.param).entered();
            let kernel = psf.kind.synthesize(psf.length, psf.param)?;
            Operator::build(&kernel, image.height())
        })?;

        let mut blurred = timings.time("blur", || {
            let _span = tracing::info_span!("blur").entered();
            blur::apply(&operator, image, color)
        })?;

        if self.config.noise.enabled {
            let noise = self.config.noise;
            blurred = timings.time("inject_noise", || {
                let _span = tracing::info_span!("inject_noise", policy = ?noise.policy).entered();
                let params = noise.params.resolve(noise.policy);
                NoiseInjector::new(noise.seed).apply(&blurred, params)
            })?;
        }

        let inverse = timings.time("invert_operator", || {
            let _span = tracing::info_span!("invert_operator").entered();
            deconvolve::invert(&operator)
        })?;

        let deblurred = timings.time("deblur", || {
            let _span = tracing::info_span!("deblur").entered();
            deconvolve::deconvolve(&inverse, &blurred, color)
        })?;

        info!(
            condition_number = inverse.condition_number(),
            total_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Deblurring complete"
        );
        timings.log_summary();

        Ok(DeblurOutcome {
            original: image.clone(),
            blurred,
            deblurred,
            condition_number: inverse.condition_number(),
            timings,
        })
    }

    fn encode(&self, image: &Image, config: &OutputConfig) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.writer.write_image(image, &mut buffer, config)?;
        Ok(buffer)
    }

    /// Decode, process and encode both results in memory.
    fn deblur_encoded(
        &self,
        input_data: &[u8],
        blurred_config: &OutputConfig,
        deblurred_config: &OutputConfig,
    ) -> Result<(DeblurOutcome, Vec<u8>, Vec<u8>)> {
        let image = {
            let _span = tracing::info_span!("decode_input").entered();
            self.reader
                .read_image(input_data, ColorMode::from_color_flag(self.config.color))?
        };

        let outcome = self.process(&image)?;

        let _span = tracing::info_span!("encode_outputs").entered();
        let blurred_data = self.encode(&outcome.blurred, blurred_config)?;
        let deblurred_data = self.encode(&outcome.deblurred, deblurred_config)?;
        Ok((outcome, blurred_data, deblurred_data))
    }

    fn display(&self, outcome: &DeblurOutcome) {
        if !self.config.show_images {
            return;
        }
        for (title, image) in [
            ("Input Image", &outcome.original),
            ("Blurred Image", &outcome.blurred),
            ("Deblurred Image", &outcome.deblurred),
        ] {
            if let Err(e) = self.viewer.show(title, image) {
                warn!("Failed to display {}: {}", title, e);
            }
        }
    }

    /// Decode `input_data`, process it and encode both results.
    ///
    /// Nothing is written to either output unless every stage succeeds.
    #[instrument(skip(self, input_data, blurred_output, deblurred_output), fields(input_size = input_data.len()))]
    pub fn run_bytes(
        &self,
        input_data: &[u8],
        blurred_output: &mut dyn Write,
        deblurred_output: &mut dyn Write,
    ) -> Result<DeblurOutcome> {
        let (outcome, blurred_data, deblurred_data) =
            self.deblur_encoded(input_data, &self.config.output, &self.config.output)?;

        blurred_output.write_all(&blurred_data)?;
        deblurred_output.write_all(&deblurred_data)?;

        self.display(&outcome);
        Ok(outcome)
    }

    /// Run the configured input file through the pipeline and write both outputs.
    ///
    /// Each output's format follows its file extension. Both images are staged
    /// in sibling temporary files and renamed into place only once both are
    /// fully written; on failure no output or staging file is left behind.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<DeblurOutcome> {
        let input_path = self.config.input_image.as_path();
        let blurred_path = self.config.blurred_image.as_path();
        let deblurred_path = self.config.deblurred_image.as_path();

        info!(
            input = %input_path.display(),
            blurred = %blurred_path.display(),
            deblurred = %deblurred_path.display(),
            "Deblurring file"
        );

        let output_config = |path: &Path| -> Result<OutputConfig> {
            Ok(OutputConfig {
                format: ImageFileFormat::from_path(path)?,
                ..self.config.output.clone()
            })
        };
        let blurred_config = output_config(blurred_path)?;
        let deblurred_config = output_config(deblurred_path)?;

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                DeblurError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let (outcome, blurred_data, deblurred_data) =
            self.deblur_encoded(&input_data, &blurred_config, &deblurred_config)?;

        {
            let _span = tracing::info_span!("write_output_files").entered();
            let blurred_staged = stage_file(blurred_path, &blurred_data)?;
            let deblurred_staged = stage_file(deblurred_path, &deblurred_data)?;

            commit(blurred_staged, blurred_path)?;
            if let Err(e) = commit(deblurred_staged, deblurred_path) {
                if let Err(remove_err) = std::fs::remove_file(blurred_path) {
                    warn!("Failed to remove {}: {}", blurred_path.display(), remove_err);
                }
                return Err(e);
            }
        }

        self.display(&outcome);
        Ok(outcome)
    }

    pub fn config(&self) -> &DeblurConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DeblurConfig) {
        self.config = config;
    }
}

fn output_write_error(path: &Path, e: std::io::Error) -> DeblurError {
    DeblurError::OutputWriteError(format!("{}: {}", path.display(), e))
}

/// Write `data` to a temporary file next to `path`. The file is deleted when
/// the handle is dropped without being committed.
fn stage_file(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".psf-deblur-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| output_write_error(path, e))?;
    staged.write_all(data).map_err(|e| output_write_error(path, e))?;
    staged.as_file().sync_all().map_err(|e| output_write_error(path, e))?;

    debug!(staged = %staged.path().display(), bytes = data.len(), "Staged output");
    Ok(staged)
}

fn commit(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map(|_| ())
        .map_err(|e| output_write_error(path, e.error))
}
