use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use release_extract::input::read_releases;
use release_extract::progress::{create_progress_bar, format_duration, log_progress, set_log_only};
use release_extract::safety::validate_output_path;
use release_extract::{Config, RawRelease, ReleaseAssembler, ReleaseMetadata};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "release-extract")]
#[command(about = "Extract canonical release metadata from storefront release descriptors")]
struct Args {
    /// JSON files with one raw release descriptor or an array of them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output JSON file
    #[arg(short, long, default_value = "releases-extracted.json")]
    output: PathBuf,

    /// TOML configuration file (defaults when absent)
    #[arg(short, long, default_value = "release-extract.toml")]
    config: PathBuf,

    #[arg(long, default_value = "0")]
    workers: usize,

    /// Hide the progress bar and log progress lines instead
    #[arg(long)]
    log_only: bool,
}

const LOG_INTERVAL: u64 = 1_000;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "release_extract=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_inputs(paths: &[PathBuf]) -> Result<Vec<RawRelease>> {
    let mut releases = Vec::new();
    for path in paths {
        let batch = read_releases(path).with_context(|| format!("Failed to read {}", path.display()))?;
        info!(path = %path.display(), releases = batch.len(), "loaded input");
        releases.extend(batch);
    }
    Ok(releases)
}

/// Assemble every release in parallel. A release that fails is logged and
/// skipped; the others are unaffected.
fn process_releases(releases: &[RawRelease], config: &Config) -> (Vec<ReleaseMetadata>, u64) {
    let assembler = ReleaseAssembler::new(config);
    let total = releases.len() as u64;
    let pb = create_progress_bar(total, "Extracting");
    let done = AtomicU64::new(0);
    let failed = AtomicU64::new(0);

    let results: Vec<Option<ReleaseMetadata>> = releases
        .par_iter()
        .map(|raw| {
            let result = match assembler.assemble(raw) {
                Ok(release) => Some(release),
                Err(err) => {
                    error!(id = %raw.id, %err, "release extraction failed");
                    failed.fetch_add(1, Ordering::Relaxed);
                    None
                }
            };
            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_position(count);
            log_progress("EXTRACT", count, total, LOG_INTERVAL);
            result
        })
        .collect();
    pb.finish_with_message("done");

    (results.into_iter().flatten().collect(), failed.into_inner())
}

fn write_output(path: &Path, releases: &[ReleaseMetadata]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, releases).context("Failed to serialize releases")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();
    set_log_only(args.log_only);

    let inputs: Vec<&Path> = args.inputs.iter().map(PathBuf::as_path).collect();
    validate_output_path(&args.output, &inputs)?;

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let config = Config::load(&args.config)
        .with_context(|| format!("Invalid configuration in {}", args.config.display()))?;

    let start = Instant::now();
    let releases = load_inputs(&args.inputs)?;
    if releases.is_empty() {
        warn!("no release descriptors in input");
    }

    let (extracted, failed) = process_releases(&releases, &config);
    write_output(&args.output, &extracted)?;

    info!(
        extracted = extracted.len(),
        failed,
        output = %args.output.display(),
        elapsed = %format_duration(start.elapsed()),
        "extraction complete"
    );
    Ok(())
}
