use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use image_batcher::batch::BatchConverter;
use image_batcher::cli::Cli;
use image_batcher_core::pipeline::Pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = cli.to_config();
    let pipeline = Pipeline::from_config(&config).context("Invalid conversion settings")?;
    let converter = BatchConverter::new(pipeline, config.failure_policy);

    if cli.dry_run {
        return handle_dry_run(&converter, &cli);
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▓░"),
    );
    let converter = converter.with_progress(pb);

    // Batch failures are reported, never turned into a non-zero exit
    match converter.convert(&cli.input, &cli.output) {
        Ok(report) => report.print_summary(),
        Err(e) => log::error!("Error processing images: {}", e),
    }

    Ok(())
}

fn handle_dry_run(converter: &BatchConverter, cli: &Cli) -> Result<()> {
    let plan = match converter.plan(&cli.input, &cli.output) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("Error processing images: {}", e);
            return Ok(());
        }
    };

    if plan.is_empty() {
        println!("No PNG or JPEG files found in {}.", cli.input.display());
        return Ok(());
    }

    println!("[dry-run] Would process {} image(s):", plan.len());
    for (source, outputs) in &plan {
        println!("  {}", source.display());
        for out in outputs {
            println!("    → {}", out.display());
        }
    }
    Ok(())
}
