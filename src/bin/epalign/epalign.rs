use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use episode_align::alignment::{AlignmentModel, Episode, Mapping};
use episode_align::reorder::ReorderController;
use episode_align::script::RenameScript;
use episode_align::{print_bold, print_error, print_warning};

use crate::Args;
use crate::command::{AlignCommand, HELP};
use crate::config::Config;
use crate::input;

/// Interactive episode to file alignment for one show directory.
#[derive(Debug)]
pub struct EpAlign {
    root: PathBuf,
    config: Config,
    controller: ReorderController,
}

impl EpAlign {
    pub fn new(args: Args) -> Result<Self> {
        let root = episode_align::resolve_input_path(args.path.as_deref())?;
        let config = Config::from_args(args)?;
        if config.debug {
            eprintln!("{config}");
            eprintln!("Root: {}", root.display());
        }
        Ok(Self {
            root,
            config,
            controller: ReorderController::new(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.load()?;

        let commands = self.config.commands.clone();
        for line in &commands {
            let command: AlignCommand = line.parse()?;
            if self.config.verbose {
                println!("{}", format!("Applying: {line}").cyan());
            }
            self.apply(command)
                .with_context(|| format!("Failed to apply command: '{line}'"))?;
        }

        if self.config.interactive {
            self.interactive()?;
        } else {
            self.print_alignment();
        }

        if self.config.dryrun {
            return Ok(());
        }
        self.write_script()
    }

    /// Read episodes and files from disk and replace the current alignment.
    fn load(&mut self) -> Result<()> {
        let episodes = input::read_episodes(&self.config.episodes)?;
        let files = input::gather_files(&self.root, &self.config)?;
        if self.config.verbose {
            println!("Loaded {} episodes and {} files", episodes.len(), files.len());
        }
        if episodes.is_empty() {
            print_warning!("No episodes found in {}", self.config.episodes.display());
        }
        if files.is_empty() {
            print_warning!("No video files found in {}", self.root.display());
        }
        self.controller.reload(episodes, files);
        Ok(())
    }

    /// Apply one command. Returns `false` when the user wants to quit.
    fn apply(&mut self, command: AlignCommand) -> Result<bool> {
        match command {
            AlignCommand::Increment(side, index) => self.controller.increment(side, index)?,
            AlignCommand::Decrement(side, index) => self.controller.decrement(side, index)?,
            AlignCommand::Restore(side, index) => self.controller.restore(side, index)?,
            AlignCommand::Drag(index) => self.controller.drag_start(index),
            AlignCommand::Drop(index) => {
                if !self.controller.drop_on(index)? && self.config.verbose {
                    println!("Nothing to move");
                }
            }
            AlignCommand::Move(from, to) => {
                self.controller.drag_start(from);
                self.controller.drop_on(to)?;
            }
            AlignCommand::Reload => self.load()?,
            AlignCommand::Show => self.print_alignment(),
            AlignCommand::Script => println!("{}", self.controller.script()),
            AlignCommand::Help => println!("{HELP}"),
            AlignCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn interactive(&mut self) -> Result<()> {
        self.print_alignment();
        println!("{HELP}");
        let stdin = io::stdin();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<AlignCommand>() {
                Ok(command) => command,
                Err(error) => {
                    print_error!("{error}");
                    continue;
                }
            };
            match self.apply(command) {
                Ok(false) => return Ok(()),
                Ok(true) => {
                    if command.is_mutation() {
                        self.print_alignment();
                    }
                }
                Err(error) => print_error!("{error}"),
            }
        }
    }

    fn print_alignment(&self) {
        let model = self.controller.model();
        print_bold!("{}", self.root.display());
        print!("{}", format_alignment(model, self.config.stacked_diff));

        if !model.skipped_episodes().is_empty() {
            print_bold!("Skipped episodes:");
            for (index, episode) in model.skipped_episodes().iter().enumerate() {
                println!("  [{index}] {}", episode_label(episode));
            }
        }
        if !model.skipped_files().is_empty() {
            print_bold!("Skipped files:");
            for (index, file) in model.skipped_files().iter().enumerate() {
                println!("  [{index}] {}", file.path());
            }
        }
    }

    fn write_script(&self) -> Result<()> {
        let script = self.controller.script();
        match &script {
            RenameScript::Unresolved(count) => {
                print_warning!("{count} file(s) have alignment errors, no rename script generated");
                println!("{script}");
            }
            RenameScript::Commands(commands) if commands.is_empty() => {
                println!("{}", "All files already have the correct name".green());
            }
            RenameScript::Commands(commands) => {
                if let Some(output) = &self.config.output {
                    fs::write(output, script.to_string())
                        .with_context(|| format!("Failed to write script: {}", output.display()))?;
                    println!(
                        "{}",
                        format!("Wrote {} commands to {}", commands.len(), output.display()).green()
                    );
                } else {
                    print_bold!("Rename script:");
                    print!("{script}");
                }
            }
        }
        Ok(())
    }
}

/// Render the alignment grid, one line per row.
///
/// Each file row is followed by a coloured diff of its current and new path,
/// or the reason it could not be mapped.
fn format_alignment(model: &AlignmentModel, stacked: bool) -> String {
    let grid = model.grid();
    let episode_columns: Vec<String> = grid
        .iter()
        .map(|row| match row.episode {
            Some(index) => format!("[{index}] {}", episode_label(&model.episodes()[index])),
            None if row.episode_continues => "|".to_string(),
            None => String::new(),
        })
        .collect();
    let width = episode_columns
        .iter()
        .map(|column| column.chars().count())
        .max()
        .unwrap_or(0);
    let row_width = grid.len().checked_ilog10().map_or(1, |digits| digits as usize + 1);

    let mut output = String::new();
    for (row, episode_column) in grid.iter().zip(&episode_columns) {
        let file = row.file.map(|index| (index, &model.files()[index]));
        let file_column = match file {
            Some((index, file)) => format!("[{index}] {}{}", file.path(), span_suffix(file.episode_span())),
            None if row.file_continues => "|".to_string(),
            None => String::new(),
        };
        output.push_str(&format!(
            "{:>row_width$}  {episode_column:<width$}  {file_column}\n",
            row.row
        ));

        if let Some((_, file)) = file {
            let indent = format!("{:>row_width$}  {:<width$}  ", "", "");
            match file.mapping() {
                Mapping::Renamed { path, .. } if path == file.path() => {
                    output.push_str(&format!("{indent}   {}\n", "unchanged".dimmed()));
                }
                Mapping::Renamed { path, .. } => {
                    let (old, new) = episode_align::color_diff(file.path(), path, stacked);
                    output.push_str(&format!("{indent}   {old}\n{indent}-> {new}\n"));
                }
                Mapping::Error(error) => {
                    output.push_str(&format!("{indent}   {}\n", error.to_string().red()));
                }
                Mapping::Unmapped => {}
            }
        }
    }
    output
}

fn episode_label(episode: &Episode) -> String {
    let name = if episode.name().is_empty() {
        String::new()
    } else {
        format!(" {}", episode.name())
    };
    format!("{}{name}{}", episode.tag(), span_suffix(episode.file_span()))
}

fn span_suffix(span: usize) -> String {
    if span > 1 { format!(" (x{span})") } else { String::new() }
}
