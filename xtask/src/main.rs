use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use ditherlab::{
    dithering::threshold::{matrices::ThresholdMatrix, void_and_cluster},
    texture::Texture,
    utils::image::write_png_luma,
};
use image::codecs::png::{CompressionType, FilterType};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for ditherlab", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every threshold matrix as a grayscale PNG under target/matrices
    GenerateMatrices {
        #[arg(long, default_value = "target/matrices")]
        out: PathBuf,
        /// Seed for the void-and-cluster build
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateMatrices { out, seed } => generate_matrices(&out, seed),
        Commands::Ci => ci(),
    }
}

fn generate_matrices(out: &Path, seed: u64) -> Result<()> {
    std::fs::create_dir_all(out)?;

    for order in 1..=6 {
        let side = 1 << order;
        save(out, &format!("bayer_{side}"), &ThresholdMatrix::bayer(side))?;
        save(out, &format!("clustered_{side}"), &ThresholdMatrix::clustered(order))?;
        save(out, &format!("dispersed_{side}"), &ThresholdMatrix::dispersed(side))?;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let blue = void_and_cluster::build(void_and_cluster::MATRIX_SIDE, 0.5, &mut rng);
    save(out, "void_and_cluster_64", &blue)?;

    println!("matrices written to {}", out.display());
    Ok(())
}

fn save(out: &Path, name: &str, matrix: &ThresholdMatrix) -> Result<()> {
    let side = matrix.side();
    let texture = Texture::from_vec(side, side, matrix.to_luma())?;
    write_png_luma(
        &texture,
        &out.join(format!("{name}.png")),
        CompressionType::Best,
        FilterType::NoFilter,
    )?;
    Ok(())
}

fn ci() -> Result<()> {
    run_command("cargo", &["fmt", "--all", "--check"])?;
    run_command(
        "cargo",
        &[
            "clippy",
            "--all-targets",
            "--all-features",
            "--",
            "-D",
            "warnings",
            "-A",
            "clippy::needless_range_loop",
        ],
    )?;
    run_command("cargo", &["build", "--all-features"])?;
    run_command("cargo", &["test", "--all-features"])?;
    Ok(())
}

fn run_command(cmd: &str, args: &[&str]) -> Result<()> {
    use std::process::Command;
    let status = Command::new(cmd).args(args).status()?;
    if !status.success() {
        anyhow::bail!("Command failed: {} {}", cmd, args.join(" "));
    }
    Ok(())
}
