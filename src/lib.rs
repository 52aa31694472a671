pub mod alignment;
pub mod config;
pub mod diff;
pub mod reorder;
pub mod sanitize;
pub mod script;

use std::cmp::Ordering;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::{ColoredString, Colorize};
use itertools::Itertools;

use crate::diff::{ChangeKind, diff_chars};

/// Format bool value as a coloured string.
#[must_use]
pub fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

/// Check if entry is a hidden file or directory (starts with '.')
#[must_use]
pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    let name_bytes = entry.file_name().as_encoded_bytes();
    !name_bytes.is_empty() && name_bytes[0] == b'.'
}

/// Resolve the show directory to an absolute path.
///
/// Uses the current working directory when `path` is `None` or empty.
///
/// ```rust
/// use std::path::Path;
/// use episode_align::resolve_input_path;
///
/// let absolute_path = resolve_input_path(Some(Path::new("src"))).unwrap();
/// assert!(absolute_path.is_absolute());
/// ```
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let filepath = match path {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => env::current_dir().context("Failed to get current working directory")?,
    };
    anyhow::ensure!(
        filepath.exists(),
        "Input path does not exist or is not accessible: '{}'",
        filepath.display()
    );
    dunce::canonicalize(&filepath).with_context(|| format!("Failed to resolve path: {}", filepath.display()))
}

/// Gets the relative path from `root` using forward slashes,
/// or just the filename if the path is outside of `root`.
///
/// ```rust
/// use std::path::Path;
/// use episode_align::get_relative_path_or_filename;
///
/// let root = Path::new("/shows/Firefly");
/// let full_path = root.join("extras/pilot.mkv");
/// assert_eq!(get_relative_path_or_filename(&full_path, root), "extras/pilot.mkv");
///
/// let outside_path = Path::new("/movies/serenity.mkv");
/// assert_eq!(get_relative_path_or_filename(outside_path, root), "serenity.mkv");
/// ```
#[must_use]
pub fn get_relative_path_or_filename(full_path: &Path, root: &Path) -> String {
    match full_path.strip_prefix(root) {
        Ok(relative_path) => relative_path
            .components()
            .map(|component| os_str_to_string(component.as_os_str()))
            .join("/"),
        Err(_) => path_to_filename_string(full_path),
    }
}

/// Convert `OsStr` to String with invalid Unicode handling.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to filename string with invalid Unicode handling.
#[must_use]
pub fn path_to_filename_string(path: &Path) -> String {
    os_str_to_string(path.file_name().unwrap_or_default())
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

#[inline]
pub fn print_bold(message: &str) {
    println!("{}", message.bold());
}

#[macro_export]
macro_rules! print_bold {
    ($($arg:tt)*) => {
        $crate::print_bold(&format!($($arg)*))
    };
}

/// Create a coloured diff for the given strings.
pub fn color_diff(old: &str, new: &str, stacked: bool) -> (String, String) {
    let changes = diff_chars(old, new);
    let mut old_diff = String::new();
    let mut new_diff = String::new();

    if stacked {
        // Find the starting index of the first matching sequence for a nicer visual alignment.
        // For example:
        //   show.s01e02.the.train.job.mkv
        //       S01E02 - The Train Job.mkv
        // Instead of:
        //   show.s01e02.the.train.job.mkv
        //   S01E02 - The Train Job.mkv
        for change in changes.iter().filter(|change| change.is_unchanged()) {
            let x = &change.value;
            if x.chars().all(char::is_whitespace) || x.chars().count() < 3 {
                continue;
            }

            // Add leading whitespace so that the first matching sequence lines up.
            if let (Some(old_index), Some(new_index)) = (old.find(x.as_str()), new.find(x.as_str())) {
                match old_index.cmp(&new_index) {
                    Ordering::Greater => {
                        new_diff = " ".repeat(old_index.saturating_sub(new_index));
                    }
                    Ordering::Less => {
                        old_diff = " ".repeat(new_index.saturating_sub(old_index));
                    }
                    Ordering::Equal => {}
                }
                break;
            }
        }
    }

    for change in changes {
        let x = &change.value;
        match change.kind {
            ChangeKind::Unchanged => {
                old_diff.push_str(x);
                new_diff.push_str(x);
            }
            ChangeKind::Added => {
                if x.chars().all(char::is_whitespace) {
                    new_diff.push_str(&x.on_green().to_string());
                } else {
                    new_diff.push_str(&x.green().to_string());
                }
            }
            ChangeKind::Removed => {
                if x.chars().all(char::is_whitespace) {
                    old_diff.push_str(&x.on_red().to_string());
                } else {
                    old_diff.push_str(&x.red().to_string());
                }
            }
        }
    }

    (old_diff, new_diff)
}

/// Write a shell completion script for the binary.
///
/// Bash, fish and zsh scripts are installed under the home directory,
/// other shells get the script printed to stdout.
pub fn generate_shell_completion(shell: Shell, mut command: Command, command_name: &str) -> Result<()> {
    let Some(out_dir) = get_shell_completion_dir(shell)? else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
        return Ok(());
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create completion directory: {}", out_dir.display()))?;
    let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
    println!("Completion file generated to: {}", path.display());
    Ok(())
}

fn get_shell_completion_dir(shell: Shell) -> Result<Option<PathBuf>> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    let dir = match shell {
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Zsh => home.join(".zsh/completions"),
        _ => return Ok(None),
    };
    Ok(Some(dir))
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;
    use walkdir::WalkDir;

    #[test]
    fn test_is_hidden_file() {
        let dir = tempdir().unwrap();
        let hidden_file_path = dir.path().join(".hidden");
        File::create(hidden_file_path).unwrap();

        let entry = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().eq(".hidden"))
            .unwrap();

        assert!(is_hidden(&entry));

        let normal_file_path = dir.path().join("visible");
        File::create(normal_file_path).unwrap();

        let entry = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().eq("visible"))
            .unwrap();

        assert!(!is_hidden(&entry));
    }

    #[test]
    fn test_resolve_input_path_valid() {
        let dir = tempdir().unwrap();
        let resolved = resolve_input_path(Some(dir.path()));
        assert!(resolved.is_ok());
    }

    #[test]
    fn test_resolve_input_path_nonexistent() {
        let resolved = resolve_input_path(Some(Path::new("nonexistent")));
        assert!(resolved.is_err());
    }

    #[test]
    fn test_resolve_input_path_default() {
        let resolved = resolve_input_path(None);
        assert_eq!(resolved.unwrap(), dunce::canonicalize(env::current_dir().unwrap()).unwrap());
    }

    #[test]
    fn test_resolve_input_path_empty_uses_current_dir() {
        let resolved = resolve_input_path(Some(Path::new(""))).unwrap();
        assert_eq!(resolved, dunce::canonicalize(env::current_dir().unwrap()).unwrap());
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("shows");
        let path = root.join("Season 1").join("pilot.mkv");
        assert_eq!(get_relative_path_or_filename(&path, root), "Season 1/pilot.mkv");
    }

    #[test]
    fn test_completion_dir_for_supported_shells() {
        if dirs::home_dir().is_none() {
            return;
        }
        let zsh = get_shell_completion_dir(Shell::Zsh).unwrap().unwrap();
        assert!(zsh.ends_with(".zsh/completions"));
        assert!(get_shell_completion_dir(Shell::PowerShell).unwrap().is_none());
    }

    #[test]
    fn test_color_diff_unchanged() {
        colored::control::set_override(false);
        let (old, new) = color_diff("same.mkv", "same.mkv", false);
        assert_eq!(old, "same.mkv");
        assert_eq!(new, "same.mkv");
    }

    #[test]
    fn test_color_diff_stacked_alignment() {
        colored::control::set_override(false);
        let (old, new) = color_diff("xx Pilot.mkv", "Pilot.mkv", true);
        assert_eq!(old, "xx Pilot.mkv");
        assert_eq!(new, "   Pilot.mkv");
    }
}
