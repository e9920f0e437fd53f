//! Retouch CLI - headless batch editing
//!
//! Loads one image, runs an ordered list of edit steps through the editing
//! engine, and saves the result.
//!
//! ```text
//! retouch photo.jpg -o out.png -s grayscale -s blur=5 -s undo -s rotate=90
//! RUST_LOG=retouch_core=debug retouch photo.jpg -o out.jpg -s edges
//! ```

mod logging;
mod run;
mod step;

use std::path::PathBuf;

use clap::Parser;

use crate::step::Step;

/// Apply edit steps to an image and save the result.
#[derive(Parser, Debug)]
#[command(name = "retouch", version, about)]
pub struct Cli {
    /// Image to edit (JPEG, PNG or BMP).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the result. The format follows the extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Edit step, repeatable and applied in order: grayscale, blur=N, edges,
    /// brightness=N, contrast=F, rotate=90|180|270, flip=horizontal|vertical,
    /// resize=WxH, scale=P, undo, redo, reset.
    #[arg(short, long = "step", value_name = "STEP")]
    pub steps: Vec<Step>,

    /// JSON file with session settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of undo snapshots (overrides the config file).
    #[arg(long, value_name = "N")]
    pub history_limit: Option<usize>,

    /// JPEG quality 1-100 (overrides the config file).
    #[arg(short, long, value_name = "1-100")]
    pub quality: Option<u8>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run::run(&cli)
}
