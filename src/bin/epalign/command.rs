use std::str::FromStr;

use anyhow::{Context, Result};

use episode_align::alignment::Side;

pub const HELP: &str = "\
Commands:
  ep+ N | ep- N          grow or shrink how many files episode N spans
  file+ N | file- N      grow or shrink how many episodes file N spans
  restore ep|file N      bring back skipped episode or file N
  drag N, drop M         move file N to position M
  move N M               same as drag N followed by drop M
  reload                 read episodes and files again
  show                   print the alignment
  script                 print the rename script
  help                   print this help
  quit                   exit";

/// A single user action on the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignCommand {
    Increment(Side, usize),
    Decrement(Side, usize),
    Restore(Side, usize),
    Drag(usize),
    Drop(usize),
    Move(usize, usize),
    Reload,
    Show,
    Script,
    Help,
    Quit,
}

impl AlignCommand {
    /// True for commands that change the alignment.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Increment(..) | Self::Decrement(..) | Self::Restore(..) | Self::Drop(_) | Self::Move(..) | Self::Reload
        )
    }
}

impl FromStr for AlignCommand {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = match parts.as_slice() {
            ["ep+", index] => Self::Increment(Side::Episodes, parse_index(index)?),
            ["ep-", index] => Self::Decrement(Side::Episodes, parse_index(index)?),
            ["file+", index] => Self::Increment(Side::Files, parse_index(index)?),
            ["file-", index] => Self::Decrement(Side::Files, parse_index(index)?),
            ["restore", side, index] => Self::Restore(parse_side(side)?, parse_index(index)?),
            ["drag", index] => Self::Drag(parse_index(index)?),
            ["drop", index] => Self::Drop(parse_index(index)?),
            ["move", from, to] => Self::Move(parse_index(from)?, parse_index(to)?),
            ["reload"] => Self::Reload,
            ["show"] => Self::Show,
            ["script"] => Self::Script,
            ["help" | "?"] => Self::Help,
            ["quit" | "exit" | "q"] => Self::Quit,
            [] => anyhow::bail!("Empty command"),
            _ => anyhow::bail!("Unknown command: '{}'", input.trim()),
        };
        Ok(command)
    }
}

fn parse_index(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("Invalid index: '{value}'"))
}

fn parse_side(value: &str) -> Result<Side> {
    match value {
        "ep" | "episode" => Ok(Side::Episodes),
        "file" => Ok(Side::Files),
        _ => anyhow::bail!("Expected 'ep' or 'file', got '{value}'"),
    }
}
