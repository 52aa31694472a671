//! Generate a shell script that renames files according to the alignment.

use std::collections::HashSet;
use std::fmt;

use crate::alignment::VideoFile;

/// Marker returned instead of a script while any file has an alignment error.
pub const UNRESOLVED_ERRORS: &str = "# Unresolved errors: fix the alignment before renaming";

/// Suffix for the intermediate name of a rename that only changes letter case.
const TEMP_SUFFIX: &str = "-temp";

/// Output of [`generate_script`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameScript {
    /// Shell commands, one per line.
    Commands(Vec<String>),
    /// Number of files with errors. No commands are produced.
    Unresolved(usize),
}

impl RenameScript {
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    /// The commands, or nothing if there are unresolved errors.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        match self {
            Self::Commands(commands) => commands,
            Self::Unresolved(_) => &[],
        }
    }
}

/// One command per line, or the unresolved marker.
impl fmt::Display for RenameScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commands(commands) => {
                for command in commands {
                    writeln!(f, "{command}")?;
                }
                Ok(())
            }
            Self::Unresolved(_) => writeln!(f, "{UNRESOLVED_ERRORS}"),
        }
    }
}

/// Build move commands for every file whose output path differs from its current path.
///
/// Season directories are created once, just before the first file moved into them.
/// Renames that only change letter case go through a temporary name so they also
/// work on case-insensitive filesystems.
#[must_use]
pub fn generate_script(files: &[VideoFile]) -> RenameScript {
    let errors = files.iter().filter(|file| file.error().is_some()).count();
    if errors > 0 {
        return RenameScript::Unresolved(errors);
    }

    let mut commands = Vec::new();
    let mut created_directories: HashSet<&str> = HashSet::new();

    for file in files {
        let Some(new_path) = file.output_path() else {
            continue;
        };
        let old_path = file.path();
        if old_path == new_path {
            continue;
        }

        if let Some((directory, _)) = new_path.rsplit_once('/')
            && created_directories.insert(directory)
        {
            commands.push(format!("mkdir -p {}", shell_quote(directory)));
        }

        if is_case_only_change(old_path, new_path) {
            let temp_path = format!("{old_path}{TEMP_SUFFIX}");
            commands.push(move_command(old_path, &temp_path));
            commands.push(move_command(&temp_path, new_path));
        } else {
            commands.push(move_command(old_path, new_path));
        }
    }

    RenameScript::Commands(commands)
}

/// True if the paths are equal except for letter case.
#[must_use]
pub fn is_case_only_change(old: &str, new: &str) -> bool {
    old != new && old.to_lowercase() == new.to_lowercase()
}

/// Quote a path for a POSIX shell, escaping characters special inside double quotes.
///
/// ```rust
/// use episode_align::script::shell_quote;
///
/// assert_eq!(shell_quote("Season 01/$5 Bill.mkv"), r#""Season 01/\$5 Bill.mkv""#);
/// ```
#[must_use]
pub fn shell_quote(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('"');
    for c in path.chars() {
        if matches!(c, '$' | '`' | '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn move_command(from: &str, to: &str) -> String {
    format!("mv -n {} {}", shell_quote(from), shell_quote(to))
}

#[cfg(test)]
mod script_tests {
    use super::*;
    use crate::alignment::{AlignmentModel, Episode};

    fn model_with(episodes: Vec<Episode>, paths: &[&str]) -> AlignmentModel {
        let files = paths
            .iter()
            .enumerate()
            .map(|(index, path)| VideoFile::new(*path, index as f64))
            .collect();
        let mut model = AlignmentModel::new();
        model.load(episodes, files);
        model
    }

    #[test]
    fn renames_into_season_directory() {
        let model = model_with(
            vec![
                Episode::numbered(1, 1, "A"),
                Episode::numbered(1, 2, "B"),
                Episode::numbered(1, 3, "C"),
            ],
            &["one.ext", "two.ext", "three.ext"],
        );
        let script = generate_script(model.files());
        assert_eq!(
            script.commands(),
            [
                r#"mkdir -p "Season 01""#,
                r#"mv -n "one.ext" "Season 01/S01E01 - A.ext""#,
                r#"mv -n "two.ext" "Season 01/S01E02 - B.ext""#,
                r#"mv -n "three.ext" "Season 01/S01E03 - C.ext""#,
            ]
        );
        let text = script.to_string();
        assert!(!text.contains(TEMP_SUFFIX));
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("C.ext\"\n"));
    }

    #[test]
    fn unchanged_paths_are_skipped() {
        let model = model_with(
            vec![Episode::numbered(1, 1, "A"), Episode::numbered(1, 2, "B")],
            &["Season 01/S01E01 - A.mkv", "b.mkv"],
        );
        let script = generate_script(model.files());
        assert_eq!(
            script.commands(),
            [
                r#"mkdir -p "Season 01""#,
                r#"mv -n "b.mkv" "Season 01/S01E02 - B.mkv""#,
            ]
        );
    }

    #[test]
    fn nothing_to_do() {
        let model = model_with(vec![Episode::numbered(1, 1, "A")], &["Season 01/S01E01 - A.mkv"]);
        let script = generate_script(model.files());
        assert!(script.commands().is_empty());
        assert_eq!(script.to_string(), "");
    }

    #[test]
    fn case_only_change_uses_temp_name() {
        let model = model_with(vec![Episode::numbered(1, 1, "A")], &["season 01/s01e01 - a.mkv"]);
        let script = generate_script(model.files());
        assert_eq!(
            script.commands(),
            [
                r#"mkdir -p "Season 01""#,
                r#"mv -n "season 01/s01e01 - a.mkv" "season 01/s01e01 - a.mkv-temp""#,
                r#"mv -n "season 01/s01e01 - a.mkv-temp" "Season 01/S01E01 - A.mkv""#,
            ]
        );
    }

    #[test]
    fn one_directory_per_season_in_first_seen_order() {
        let model = model_with(
            vec![
                Episode::numbered(1, 1, "A"),
                Episode::numbered(1, 2, "B"),
                Episode::numbered(2, 1, "C"),
            ],
            &["a.mkv", "b.mkv", "c.mkv"],
        );
        let script = generate_script(model.files());
        let mkdirs: Vec<&String> = script
            .commands()
            .iter()
            .filter(|command| command.starts_with("mkdir"))
            .collect();
        assert_eq!(mkdirs, [r#"mkdir -p "Season 01""#, r#"mkdir -p "Season 02""#]);
        assert_eq!(script.commands()[3], r#"mkdir -p "Season 02""#);
    }

    #[test]
    fn dollar_signs_are_escaped() {
        let model = model_with(vec![Episode::numbered(1, 1, "$HOME Sweet $HOME")], &["$file.mkv"]);
        let script = generate_script(model.files());
        assert_eq!(
            script.commands()[1],
            r#"mv -n "\$file.mkv" "Season 01/S01E01 - \$HOME Sweet \$HOME.mkv""#
        );
    }

    #[test]
    fn errors_block_the_whole_script() {
        let model = model_with(vec![Episode::numbered(1, 1, "A")], &["a.mkv", "b.mkv"]);
        let script = generate_script(model.files());
        assert_eq!(script, RenameScript::Unresolved(1));
        assert!(script.is_unresolved());
        assert!(script.commands().is_empty());
        assert_eq!(script.to_string().trim_end(), UNRESOLVED_ERRORS);
    }

    #[test]
    fn case_only_detection() {
        assert!(is_case_only_change("a.mkv", "A.mkv"));
        assert!(!is_case_only_change("a.mkv", "a.mkv"));
        assert!(!is_case_only_change("a.mkv", "b.mkv"));
    }

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("plain"), r#""plain""#);
        assert_eq!(shell_quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(shell_quote("back`tick`"), r#""back\`tick\`""#);
        assert_eq!(shell_quote(r"back\slash"), r#""back\\slash""#);
    }
}
