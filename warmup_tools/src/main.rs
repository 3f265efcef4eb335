use anyhow::Context;
use env_logger::{Env, TimestampPrecision};
use std::path::PathBuf;
use structopt::StructOpt;
use warmup_core::WarmupConfig;
use warmup_tools::{average_files, load_config, load_cover_entries, low_area_files, replay};

#[derive(Debug, StructOpt)]
#[structopt(about = "Tools for the healer warmup heuristic")]
enum Settings {
    /// Select the least hit blocks of each cover file.
    LowArea {
        /// Cover files, lists of {CoverNumber, BBAddressList} entries.
        #[structopt(long, short = "i", required = true)]
        input_files: Vec<PathBuf>,
        /// Percentage of blocks to select.
        #[structopt(long, short = "p")]
        per: f64,
        /// Directory to write the filtered files.
        #[structopt(long, short = "o")]
        output_dir: PathBuf,
    },
    /// Average the statistics of filtered files.
    Average {
        /// Filtered files produced by low-area.
        #[structopt(long, short = "i", required = true)]
        input_files: Vec<PathBuf>,
        /// File to write the averages.
        #[structopt(long, short = "o")]
        output_file: PathBuf,
    },
    /// Replay a warmup session over one cover file.
    Replay {
        /// Cover file to take the hit counts from.
        #[structopt(long, short = "i")]
        input_file: PathBuf,
        /// Warmup config in json.
        #[structopt(long, short = "c")]
        config: Option<PathBuf>,
        /// Percentage of blocks to select, overrides the config.
        #[structopt(long, short = "p")]
        per: Option<f64>,
        /// No-progress passes tolerated before denying a block, overrides the config.
        #[structopt(long, short = "t")]
        deny_threshold: Option<u32>,
        /// Scheduling rounds to run.
        #[structopt(long, short = "r", default_value = "20")]
        rounds: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_args();

    let log_env = Env::new()
        .filter_or("WARMUP_LOG", "info")
        .default_write_style_or("auto");
    env_logger::Builder::from_env(log_env)
        .format_timestamp(Some(TimestampPrecision::Seconds))
        .init();

    match settings {
        Settings::LowArea {
            input_files,
            per,
            output_dir,
        } => {
            let written = low_area_files(&input_files, per, &output_dir)?;
            log::info!("{} filtered files written to {}", written.len(), output_dir.display());
        }
        Settings::Average {
            input_files,
            output_file,
        } => {
            let averages = average_files(&input_files, &output_file)?;
            for (metric, avg) in averages.iter() {
                log::info!("{:<20}: {:.2}", metric, avg);
            }
            log::info!("results saved to {}", output_file.display());
        }
        Settings::Replay {
            input_file,
            config,
            per,
            deny_threshold,
            rounds,
        } => {
            let mut warmup_config = match config {
                Some(path) => load_config(&path)?,
                None => WarmupConfig::default(),
            };
            if let Some(per) = per {
                warmup_config.low_area_percent = per;
            }
            if let Some(t) = deny_threshold {
                warmup_config.deny_threshold = t;
            }
            let entries = load_cover_entries(&input_file)?;
            let summary = replay(&entries, warmup_config, rounds).context("replay failed")?;
            log::info!(
                "selected: {}, still selected: {}, denied in last round: {}, deny/suppressed {}/{}",
                summary.selected,
                summary.still_selected,
                summary.denied_last,
                summary.deny_list,
                summary.suppressed
            );
        }
    }
    Ok(())
}
