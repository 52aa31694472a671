mod command;
mod config;
mod epalign;
mod input;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::epalign::EpAlign;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Align episode metadata with video files and print a rename script")]
pub(crate) struct Args {
    /// Optional show directory containing the video files
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// JSON file with episode metadata
    #[arg(short = 'e', long, value_hint = clap::ValueHint::FilePath, required_unless_present = "SHELL")]
    episodes: Option<PathBuf>,

    /// Alignment command to apply, for example "file+ 2" or "move 3 0"
    #[arg(short = 'c', long = "command", num_args = 1, action = clap::ArgAction::Append, name = "COMMAND")]
    commands: Vec<String>,

    /// Read alignment commands interactively from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Write the rename script to this file instead of printing it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Only include files with the given extension
    #[arg(short = 'x', long = "extension", num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extensions: Vec<String>,

    /// Include files that match the given pattern
    #[arg(short = 'n', long, num_args = 1, action = clap::ArgAction::Append, name = "INCLUDE")]
    include: Vec<String>,

    /// Exclude files that match the given pattern
    #[arg(short = 'E', long, num_args = 1, action = clap::ArgAction::Append, name = "EXCLUDE")]
    exclude: Vec<String>,

    /// Only print the alignment table without the script
    #[arg(short, long)]
    print: bool,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Enable debug prints
    #[arg(short = 'D', long)]
    debug: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        episode_align::generate_shell_completion(*shell, Args::command(), env!("CARGO_BIN_NAME"))
    } else {
        EpAlign::new(args)?.run()
    }
}
