use std::fmt;
use std::path::Path;

/// Episode metadata from the metadata source.
///
/// Occupies `file_span` consecutive rows of the alignment grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub(crate) season: u32,
    pub(crate) number: u32,
    pub(crate) name: String,
    pub(crate) order: f64,
    pub(crate) file_span: usize,
    pub(crate) row: usize,
}

/// A local video file to be renamed.
///
/// Occupies `episode_span` consecutive rows of the alignment grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) order: f64,
    pub(crate) extension: String,
    pub(crate) episode_span: usize,
    pub(crate) row: usize,
    pub(crate) mapping: Mapping,
}

/// Result of aligning a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mapping {
    /// Not aligned yet, or the file is in the skipped pool.
    #[default]
    Unmapped,
    Renamed {
        name: String,
        path: String,
    },
    Error(AlignmentError),
}

/// Reasons a file could not be given an output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentError {
    /// No episode left for the file.
    MissingSource,
    /// A multi-episode file covers an episode that is split over several files.
    Overlap,
    /// A multi-episode file covers episodes from more than one season.
    MultipleSeasons,
}

/// Which sequence of the alignment an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Episodes,
    Files,
}

impl Episode {
    #[must_use]
    pub fn new(season: u32, number: u32, name: impl Into<String>, order: f64) -> Self {
        Self {
            season,
            number,
            name: name.into(),
            order,
            file_span: 1,
            row: 0,
        }
    }

    /// Episode with the ordering key derived from season and episode number.
    #[must_use]
    pub fn numbered(season: u32, number: u32, name: impl Into<String>) -> Self {
        Self::new(season, number, name, default_order(season, number))
    }

    #[must_use]
    pub const fn season(&self) -> u32 {
        self.season
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn order(&self) -> f64 {
        self.order
    }

    #[must_use]
    pub const fn file_span(&self) -> usize {
        self.file_span
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Season and episode tag, for example `S01E02`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}{}", season_tag(self.season), episode_tag(self.number))
    }
}

impl VideoFile {
    /// Create a file from its relative path.
    ///
    /// The extension suffix includes the leading dot, or is empty when the file has none.
    #[must_use]
    pub fn new(path: impl Into<String>, order: f64) -> Self {
        let path = path.into();
        let file_path = Path::new(&path);
        let name = crate::path_to_filename_string(file_path);
        let extension = file_path
            .extension()
            .map(|ext| format!(".{}", crate::os_str_to_string(ext)))
            .unwrap_or_default();
        Self {
            name,
            path,
            order,
            extension,
            episode_span: 1,
            row: 0,
            mapping: Mapping::Unmapped,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn order(&self) -> f64 {
        self.order
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub const fn episode_span(&self) -> usize {
        self.episode_span
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    #[must_use]
    pub fn output_name(&self) -> Option<&str> {
        match &self.mapping {
            Mapping::Renamed { name, .. } => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn output_path(&self) -> Option<&str> {
        match &self.mapping {
            Mapping::Renamed { path, .. } => Some(path),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<AlignmentError> {
        match self.mapping {
            Mapping::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingSource => "no episode left for this file",
            Self::Overlap => "multi-file episode inside a multi-episode file",
            Self::MultipleSeasons => "episodes span multiple seasons",
        };
        write!(f, "{message}")
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Episodes => write!(f, "episode"),
            Self::Files => write!(f, "file"),
        }
    }
}

/// Ordering key used when the metadata source does not provide one.
#[must_use]
pub fn default_order(season: u32, number: u32) -> f64 {
    f64::from(season) * 10_000.0 + f64::from(number)
}

#[must_use]
pub fn season_tag(season: u32) -> String {
    format!("S{season:02}")
}

#[must_use]
pub fn episode_tag(number: u32) -> String {
    format!("E{number:02}")
}

#[must_use]
pub fn season_directory(season: u32) -> String {
    format!("Season {season:02}")
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn video_file_extension_includes_dot() {
        let file = VideoFile::new("Show/show.s01e01.mkv", 1.0);
        assert_eq!(file.name(), "show.s01e01.mkv");
        assert_eq!(file.extension(), ".mkv");
        assert_eq!(file.path(), "Show/show.s01e01.mkv");
        assert_eq!(file.mapping(), &Mapping::Unmapped);
    }

    #[test]
    fn video_file_without_extension() {
        let file = VideoFile::new("README", 1.0);
        assert_eq!(file.extension(), "");
    }

    #[test]
    fn episode_tags() {
        let episode = Episode::numbered(1, 5, "Five");
        assert_eq!(episode.tag(), "S01E05");
        assert_eq!(Episode::numbered(12, 104, "Long").tag(), "S12E104");
        assert_eq!(season_directory(3), "Season 03");
    }

    #[test]
    fn default_order_sorts_by_season_first() {
        assert!(default_order(1, 999) < default_order(2, 1));
        assert!(default_order(1, 1) < default_order(1, 2));
    }
}
