//! Command-line interface for generating one or more seeded layouts

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use rand::Rng;

use crate::algorithm::executor::{Layout, generate_layout};
use crate::analysis::invariants::check_layout;
use crate::analysis::statistics::LayoutStatistics;
use crate::io::configuration::{
    DEFAULT_CHUNK_COUNT, DEFAULT_CHUNK_DIMENSION, DEFAULT_EXPANSION_FACTOR,
    DEFAULT_IRREGULARITY_FACTOR, DEFAULT_OUTPUT, DEFAULT_RUNS, DEFAULT_SECONDARY_PATH_CHANCE,
    ChunkDimensions, GIF_FRAME_DELAY_MS, LayoutConfig, VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, computation_error, invalid_parameter};
use crate::io::image::export_grid_as_png;
use crate::io::progress::ProgressManager;
use crate::io::visualization::VisualizationCapture;
use crate::math::random::derive_seed;

#[derive(Parser, Debug)]
#[command(name = "chunkwalk")]
#[command(
    author,
    version,
    about = "Generate seeded chunk-by-chunk path layouts"
)]
/// Command-line arguments for the layout generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// PNG file to write (multiple runs append `_<run>` to the stem)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed text; numeric seeds are used directly, others are hashed
    ///
    /// A random integer seed is drawn when omitted.
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Number of chunks to place
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_COUNT)]
    pub chunks: usize,

    /// Chunk width in cells
    #[arg(short = 'W', long, default_value_t = DEFAULT_CHUNK_DIMENSION)]
    pub width: u32,

    /// Chunk height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_CHUNK_DIMENSION)]
    pub height: u32,

    /// Pull toward each chunk's center line, from 0 to 1
    #[arg(short, long, default_value_t = DEFAULT_EXPANSION_FACTOR)]
    pub expansion: f64,

    /// Meandering relative to the entry line, from 0 to 1
    #[arg(short, long, default_value_t = DEFAULT_IRREGULARITY_FACTOR)]
    pub irregularity: f64,

    /// Percent chance of a secondary path per chunk
    #[arg(short = 'b', long, default_value_t = DEFAULT_SECONDARY_PATH_CHANCE)]
    pub secondary_chance: f64,

    /// Number of layouts to generate with consecutive descending seeds
    #[arg(short = 'n', long, default_value_t = DEFAULT_RUNS)]
    pub runs: usize,

    /// Enable visualization output as animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Print summary statistics for every layout
    #[arg(long)]
    pub stats: bool,

    /// Check structural invariants of every layout
    #[arg(long)]
    pub verify: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet && self.runs > 1
    }

    /// Layout configuration for the given seed text
    pub fn layout_config(&self, seed: String) -> LayoutConfig {
        LayoutConfig {
            chunk_count: self.chunks,
            chunk_dimensions: ChunkDimensions::new(self.width, self.height),
            seed,
            expansion_factor: self.expansion,
            irregularity_factor: self.irregularity,
            secondary_path_chance: self.secondary_chance,
        }
    }
}

/// Seed text of every run
///
/// A single run keeps the given text as is. Several runs count down from the
/// seed's integer value: `S`, `S-1`, and so on.
///
/// # Errors
///
/// Returns `InvalidParameter` if `runs` does not fit in an `i32`
pub fn run_seeds(seed: &str, runs: usize) -> Result<Vec<String>> {
    if runs == 1 {
        return Ok(vec![seed.to_string()]);
    }
    let count = i32::try_from(runs)
        .map_err(|error| invalid_parameter("runs", &runs, &error))?;
    let base = derive_seed(seed);
    Ok((0..count)
        .map(|run| base.wrapping_sub(run).to_string())
        .collect())
}

/// Output path of one run
pub fn run_output_path(output: &Path, run: usize, runs: usize) -> PathBuf {
    if runs == 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().unwrap_or_default();
    let extension = output.extension().unwrap_or_default();
    let name = format!(
        "{}_{run}.{}",
        stem.to_string_lossy(),
        extension.to_string_lossy()
    );
    output.with_file_name(name)
}

/// GIF path accompanying a PNG output path
pub fn visualization_path(output: &Path) -> PathBuf {
    let stem = output.file_stem().unwrap_or_default();
    let name = format!("{}{VISUALIZATION_SUFFIX}.gif", stem.to_string_lossy());
    output.with_file_name(name)
}

/// Runs the requested layouts and writes their outputs
pub struct RunProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl RunProcessor {
    /// Create a new run processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate every run
    ///
    /// With several runs a failing run is reported and skipped; a single
    /// failing run is returned as the error.
    ///
    /// # Errors
    ///
    /// Returns an error if the run count is zero or exceeds `i32::MAX`, the
    /// only run fails, output
    /// cannot be written, or verification finds violations
    // Allow print for reporting a generated seed to the user
    #[allow(clippy::print_stderr)]
    pub fn process(&mut self) -> Result<()> {
        if self.cli.runs == 0 {
            return Err(invalid_parameter(
                "runs",
                &self.cli.runs,
                &"at least one run is required",
            ));
        }

        let seed = if let Some(seed) = &self.cli.seed {
            seed.clone()
        } else {
            let drawn = rand::rng().random::<i32>().to_string();
            if !self.cli.quiet {
                eprintln!("Using random seed {drawn}");
            }
            drawn
        };
        let seeds = run_seeds(&seed, self.cli.runs)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(seeds.len());
        }

        let mut failures = 0;
        for (index, seed) in seeds.into_iter().enumerate() {
            match self.process_run(index, seed) {
                Ok(()) => {}
                Err(error) if self.cli.runs == 1 => return Err(error),
                Err(error) if error.is_generation_failure() || error.is_safety_limit() => {
                    warn!("run {index} failed: {error}");
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.fail_run(index, &error.to_string());
                    }
                    failures += 1;
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }
        if failures > 0 {
            info!("{failures} of {} runs failed", self.cli.runs);
        }

        Ok(())
    }

    // Allow print for statistics requested on the command line
    #[allow(clippy::print_stdout)]
    fn process_run(&mut self, index: usize, seed: String) -> Result<()> {
        let start_time = Instant::now();
        let config = self.cli.layout_config(seed);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_run(index, derive_seed(&config.seed));
        }

        let layout = generate_layout(&config)?;

        if self.cli.verify {
            Self::verify(&layout)?;
        }

        if self.cli.stats {
            println!("seed {}:\n{}", layout.seed(), LayoutStatistics::from_layout(&layout));
        }

        let output_path = run_output_path(&self.cli.output, index, self.cli.runs);
        if layout.is_empty() {
            warn!("layout with seed {} has no chunks; nothing to export", layout.seed());
        } else {
            export_grid_as_png(&layout.world_grid(), &output_path)?;
            if self.cli.visualize {
                VisualizationCapture::from_layout(&layout)
                    .export_gif(&visualization_path(&output_path), GIF_FRAME_DELAY_MS)?;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_run(
                index,
                &format!("{} chunks", layout.len()),
                start_time.elapsed(),
            );
        }

        Ok(())
    }

    fn verify(layout: &Layout) -> Result<()> {
        let violations = check_layout(layout);
        if violations.is_empty() {
            return Ok(());
        }
        for violation in &violations {
            warn!("seed {}: {violation}", layout.seed());
        }
        Err(computation_error(
            "layout verification",
            &format!("{} invariant violations", violations.len()),
        ))
    }
}
