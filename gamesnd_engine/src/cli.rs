use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Loads sound tables into a dry-run registry and reports what it holds",
    version
)]
pub struct Args {
    /// Primary sound table (sounds.tbl)
    #[arg(long, default_value = "data/tables/sounds.tbl")]
    pub table: PathBuf,

    /// Optional JSON registry configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ignore modular *-snd.tbm tables next to the primary table
    #[arg(long)]
    pub no_modular: bool,

    /// Seed for entry selection (overrides the configuration)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the preload pass through the recording device
    #[arg(long)]
    pub preload: bool,

    /// Load the non-preloaded gameplay sounds
    #[arg(long)]
    pub gameplay: bool,

    /// Load the interface sounds
    #[arg(long)]
    pub interface: bool,

    /// Gameplay sound name to resolve (may be passed multiple times)
    #[arg(long = "resolve", value_name = "NAME")]
    pub resolve: Vec<String>,

    /// Interface sound name to resolve (may be passed multiple times)
    #[arg(long = "resolve-interface", value_name = "NAME")]
    pub resolve_interface: Vec<String>,

    /// Gameplay sound name to play (may be passed multiple times)
    #[arg(long = "play", value_name = "NAME")]
    pub play: Vec<String>,

    /// How many times to play each --play sound
    #[arg(long, default_value_t = 1)]
    pub play_count: u32,

    /// Path to write the registry report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Path to write the recorded device calls as JSON
    #[arg(long)]
    pub events_json: Option<PathBuf>,

    /// Print every sound instead of the summary counts
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct RunArgs {
    pub table: PathBuf,
    pub config: Option<PathBuf>,
    pub modular: bool,
    pub seed: Option<u64>,
    pub preload: bool,
    pub gameplay: bool,
    pub interface: bool,
    pub resolve: Vec<String>,
    pub resolve_interface: Vec<String>,
    pub play: Vec<String>,
    pub play_count: u32,
    pub report_json: Option<PathBuf>,
    pub events_json: Option<PathBuf>,
    pub verbose: bool,
}

pub fn parse() -> Result<RunArgs> {
    let args = Args::parse();
    args.into_run_args()
}

impl Args {
    fn into_run_args(self) -> Result<RunArgs> {
        if self.play_count == 0 {
            bail!("--play-count must be at least 1");
        }
        if self.play_count != 1 && self.play.is_empty() {
            bail!("--play-count requires --play");
        }

        Ok(RunArgs {
            table: self.table,
            config: self.config,
            modular: !self.no_modular,
            seed: self.seed,
            preload: self.preload,
            gameplay: self.gameplay,
            interface: self.interface,
            resolve: self.resolve,
            resolve_interface: self.resolve_interface,
            play: self.play,
            play_count: self.play_count,
            report_json: self.report_json,
            events_json: self.events_json,
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_count_is_validated() {
        let args = Args::try_parse_from(["gamesnd_engine", "--play-count", "0"]).unwrap();
        assert!(args.into_run_args().is_err());

        let args = Args::try_parse_from(["gamesnd_engine", "--play-count", "3"]).unwrap();
        assert!(args.into_run_args().is_err());

        let args =
            Args::try_parse_from(["gamesnd_engine", "--play", "Laser", "--play-count", "3", "--no-modular"])
                .unwrap();
        let run = args.into_run_args().unwrap();
        assert_eq!(run.play, ["Laser"]);
        assert_eq!(run.play_count, 3);
        assert!(!run.modular);
    }
}
