use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;

use psf_deblur::deblur_pipeline::{DeblurConfig, DeblurPipeline};
use psf_deblur::logger;

use tracing::{error, info};

#[derive(Debug, StructOpt)]
#[structopt(name = "psf-deblur", about = "Blur an image with a synthetic PSF and recover it by SVD inversion")]
struct Opt {
    /// Settings file (.yaml, .yml or .json)
    #[structopt(parse(from_os_str))]
    config: PathBuf,
    /// Skip the image display even when the settings ask for it
    #[structopt(long)]
    no_display: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let opt = Opt::from_args();

    info!("Starting psf-deblur...");

    let mut config = DeblurConfig::from_file(&opt.config)
        .with_context(|| format!("loading settings from {}", opt.config.display()))?;
    if opt.no_display {
        config.show_images = false;
    }

    info!(
        "PSF: {:?}, n = {}, param = {}",
        config.psf.kind, config.psf.length, config.psf.param
    );
    info!(
        "Noise: {}",
        if config.noise.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let pipeline = DeblurPipeline::new(config)?;

    match pipeline.run() {
        Ok(outcome) => {
            info!(
                condition_number = outcome.condition_number,
                restoration_error = outcome.restoration_error()?,
                "Deblurring successful!"
            );
            Ok(())
        }
        Err(e) => {
            error!("Deblurring failed: {}", e);
            Err(e.into())
        }
    }
}
