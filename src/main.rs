use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ditherlab::{
    algorithms_json,
    config::ProcessConfig,
    utils::image::{read_image, write_image},
};

#[derive(Parser)]
#[command(name = "ditherlab")]
#[command(about = "Dither images with one of the registered grayscale algorithms")]
struct Cli {
    /// JSON process config naming the algorithm and its parameters
    #[arg(required_unless_present = "list")]
    config: Option<PathBuf>,

    /// Images to process
    #[arg(required_unless_present = "list")]
    inputs: Vec<PathBuf>,

    /// Directory receiving the dithered images
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Print every algorithm and its attribute schema as JSON, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    if cli.list {
        println!("{}", algorithms_json().pretty(2));
        return Ok(());
    }

    let config_path = cli.config.context("missing config path")?;
    let config = ProcessConfig::read_config(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    info!(
        algorithm = config.strategy.name,
        inputs = cli.inputs.len(),
        output = %cli.output.display(),
        "processing"
    );

    let failures = cli
        .inputs
        .par_iter()
        .filter_map(|input| {
            process(&config, input, &cli.output)
                .inspect_err(|err| error!(input = %input.display(), "{err:#}"))
                .err()
        })
        .count();

    if failures > 0 {
        anyhow::bail!("{failures} of {} images failed", cli.inputs.len());
    }
    Ok(())
}

fn process(config: &ProcessConfig, input: &Path, output_dir: &Path) -> anyhow::Result<()> {
    let mut buffer = read_image(input).with_context(|| format!("reading {}", input.display()))?;
    config.apply(&mut buffer)?;

    let extension = config.output_format.extensions_str().first().copied().unwrap_or("png");
    let stem = input.file_stem().context("input has no file name")?;
    let target = output_dir.join(format!("{}.{extension}", stem.to_string_lossy()));
    write_image(&buffer, &target, config.output_format)
        .with_context(|| format!("writing {}", target.display()))?;

    info!(input = %input.display(), output = %target.display(), "done");
    Ok(())
}
