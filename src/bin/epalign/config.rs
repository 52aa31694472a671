use std::path::PathBuf;
use std::{fmt, fs};

use anyhow::Result;
use itertools::Itertools;
use serde::Deserialize;

use episode_align::print_error;

use crate::Args;

const DEFAULT_EXTENSIONS: [&str; 8] = ["avi", "m4v", "mkv", "mov", "mp4", "ts", "webm", "wmv"];

/// Config from the user config file
#[derive(Debug, Deserialize)]
struct EpAlignConfig {
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    print: bool,
    #[serde(default)]
    recurse: bool,
    #[serde(default = "default_true")]
    stacked_diff: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    epalign: EpAlignConfig,
}

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) commands: Vec<String>,
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) episodes: PathBuf,
    pub(crate) exclude: Vec<String>,
    pub(crate) extensions: Vec<String>,
    pub(crate) include: Vec<String>,
    pub(crate) interactive: bool,
    pub(crate) output: Option<PathBuf>,
    pub(crate) recurse: bool,
    pub(crate) stacked_diff: bool,
    pub(crate) verbose: bool,
}

impl Default for EpAlignConfig {
    fn default() -> Self {
        Self {
            debug: false,
            exclude: Vec::new(),
            extensions: Vec::new(),
            include: Vec::new(),
            print: false,
            recurse: false,
            stacked_diff: true,
            verbose: false,
        }
    }
}

impl EpAlignConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        episode_align::config::CONFIG_PATH
            .as_deref()
            .and_then(|path| match fs::read_to_string(path) {
                Ok(content) => Some(content),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
                Err(error) => {
                    print_error!("Error reading config file {}: {error}", path.display());
                    None
                }
            })
            .and_then(|config_string| {
                Self::from_toml_str(&config_string)
                    .map_err(|e| print_error!("{e}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.epalign)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: Args) -> Result<Self> {
        Self::from_parts(args, EpAlignConfig::get_user_config())
    }

    fn from_parts(args: Args, user_config: EpAlignConfig) -> Result<Self> {
        let Some(episodes) = args.episodes else {
            anyhow::bail!("Episode metadata file is required");
        };

        let include: Vec<String> = user_config.include.into_iter().chain(args.include).unique().collect();
        let exclude: Vec<String> = user_config.exclude.into_iter().chain(args.exclude).unique().collect();

        let mut extensions: Vec<String> = user_config
            .extensions
            .into_iter()
            .chain(args.extensions)
            .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
            .filter(|extension| !extension.is_empty())
            .unique()
            .collect();
        if extensions.is_empty() {
            extensions = DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect();
        }

        Ok(Self {
            commands: args.commands,
            debug: args.debug || user_config.debug,
            dryrun: args.print || user_config.print,
            episodes,
            exclude,
            extensions,
            include,
            interactive: args.interactive,
            output: args.output,
            recurse: args.recurse || user_config.recurse,
            stacked_diff: user_config.stacked_diff,
            verbose: args.verbose || user_config.verbose,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |name: &str, items: &[String]| {
            if items.is_empty() {
                format!("{name}: []")
            } else {
                format!("{name}:\n") + &*items.iter().map(|item| format!("    {item}")).join("\n")
            }
        };
        writeln!(f, "Config:")?;
        writeln!(f, "  episodes:    {}", self.episodes.display())?;
        writeln!(f, "  debug:       {}", episode_align::colorize_bool(self.debug))?;
        writeln!(f, "  dryrun:      {}", episode_align::colorize_bool(self.dryrun))?;
        writeln!(f, "  interactive: {}", episode_align::colorize_bool(self.interactive))?;
        writeln!(f, "  recurse:     {}", episode_align::colorize_bool(self.recurse))?;
        writeln!(f, "  stacked:     {}", episode_align::colorize_bool(self.stacked_diff))?;
        writeln!(f, "  verbose:     {}", episode_align::colorize_bool(self.verbose))?;
        writeln!(
            f,
            "  output:      \"{}\"",
            self.output.as_ref().map(|path| path.display().to_string()).unwrap_or_default()
        )?;
        writeln!(f, "  extensions:  {}", self.extensions.join(", "))?;
        writeln!(f, "  {}", list("include", &self.include))?;
        writeln!(f, "  {}", list("exclude", &self.exclude))?;
        writeln!(f, "  {}", list("commands", &self.commands))
    }
}

const fn default_true() -> bool {
    true
}
