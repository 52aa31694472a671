use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use episode_align::alignment::{Episode, VideoFile, default_order};
use episode_align::{get_relative_path_or_filename, is_hidden, path_to_filename_string};

use crate::config::Config;

/// Matches `S01E02`, `s1.e2` or `1x02` style episode markers.
static RE_EPISODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:s(?P<season>\d{1,3})[ ._-]?e(?P<episode>\d{1,4})|\b(?P<alt_season>\d{1,2})x(?P<alt_episode>\d{2,3})\b)")
        .expect("Failed to compile episode marker regex")
});

/// Episode entry in the metadata JSON file.
#[derive(Debug, Deserialize)]
struct EpisodeRecord {
    season: u32,
    episode: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    order: Option<f64>,
}

/// Read episode metadata from a JSON file.
pub fn read_episodes(path: &Path) -> Result<Vec<Episode>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read episode file: {}", path.display()))?;
    parse_episodes(&content).with_context(|| format!("Invalid episode file: {}", path.display()))
}

/// Parse a JSON array of episode records.
pub fn parse_episodes(json: &str) -> Result<Vec<Episode>> {
    let records: Vec<EpisodeRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .map(|record| {
            let order = record
                .order
                .unwrap_or_else(|| default_order(record.season, record.episode));
            Episode::new(record.season, record.episode, record.name.trim(), order)
        })
        .collect())
}

/// Ordering key from the first episode marker in a file name.
pub fn file_order(name: &str) -> Option<f64> {
    let captures = RE_EPISODE_MARKER.captures(name)?;
    let season = captures.name("season").or_else(|| captures.name("alt_season"))?;
    let episode = captures.name("episode").or_else(|| captures.name("alt_episode"))?;
    let season: u32 = season.as_str().parse().ok()?;
    let episode: u32 = episode.as_str().parse().ok()?;
    Some(default_order(season, episode))
}

/// Collect video files under `root` matching the configured filters.
///
/// Files are sorted by their episode marker, files without one come last in name order.
pub fn gather_files(root: &Path, config: &Config) -> Result<Vec<VideoFile>> {
    let max_depth = if config.recurse { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
    {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path_to_filename_string(path);
        if !is_video_file(&name, &config.extensions) {
            continue;
        }
        let lowercase_name = name.to_lowercase();
        if !config.include.is_empty()
            && !config
                .include
                .iter()
                .any(|pattern| lowercase_name.contains(&pattern.to_lowercase()))
        {
            continue;
        }
        if config
            .exclude
            .iter()
            .any(|pattern| lowercase_name.contains(&pattern.to_lowercase()))
        {
            if config.verbose {
                println!("Excluding file: {name}");
            }
            continue;
        }

        let order = file_order(&name).unwrap_or(f64::INFINITY);
        files.push(VideoFile::new(get_relative_path_or_filename(path, root), order));
    }

    files.sort_by(|a, b| a.order().total_cmp(&b.order()).then_with(|| a.name().cmp(b.name())));
    Ok(files)
}

fn is_video_file(name: &str, extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
        .is_some_and(|extension| extensions.contains(&extension))
}

#[cfg(test)]
mod input_tests {
    use super::*;

    use std::fs::File;
    use std::path::PathBuf;

    use tempfile::tempdir;

    fn config() -> Config {
        Config {
            commands: Vec::new(),
            debug: false,
            dryrun: false,
            episodes: PathBuf::from("episodes.json"),
            exclude: Vec::new(),
            extensions: vec!["mkv".to_string(), "mp4".to_string()],
            include: Vec::new(),
            interactive: false,
            output: None,
            recurse: false,
            stacked_diff: true,
            verbose: false,
        }
    }

    #[test]
    fn parses_episode_records() {
        let episodes = parse_episodes(
            r#"[
                {"season": 1, "episode": 2, "name": " Second "},
                {"season": 1, "episode": 1, "name": "First", "order": 0.5},
                {"season": 2, "episode": 1}
            ]"#,
        )
        .unwrap();
        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].name(), "Second");
        assert!((episodes[0].order() - 10_002.0).abs() < f64::EPSILON);
        assert!((episodes[1].order() - 0.5).abs() < f64::EPSILON);
        assert_eq!(episodes[2].name(), "");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_episodes(r#"{"season": 1}"#).is_err());
        assert!(parse_episodes(r#"[{"name": "No numbers"}]"#).is_err());
    }

    #[test]
    fn episode_markers() {
        assert_eq!(file_order("Show.S01E02.720p.mkv"), Some(default_order(1, 2)));
        assert_eq!(file_order("show s2.e10 title.mkv"), Some(default_order(2, 10)));
        assert_eq!(file_order("Show - 3x07 - Title.mkv"), Some(default_order(3, 7)));
        assert_eq!(file_order("Show 1920x1080.mkv"), None);
        assert_eq!(file_order("Extras.mkv"), None);
    }

    #[test]
    fn gathers_and_sorts_video_files() {
        let dir = tempdir().unwrap();
        for name in ["b.s01e02.mkv", "a.s01e10.mp4", "c.s01e01.mkv", "notes.txt", "extra.mkv", ".hidden.s01e03.mkv"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("d.s01e04.mkv")).unwrap();

        let files = gather_files(dir.path(), &config()).unwrap();
        let names: Vec<&str> = files.iter().map(VideoFile::name).collect();
        assert_eq!(names, ["c.s01e01.mkv", "b.s01e02.mkv", "a.s01e10.mp4", "extra.mkv"]);

        let mut recursive = config();
        recursive.recurse = true;
        recursive.exclude = vec!["EXTRA".to_string()];
        let files = gather_files(dir.path(), &recursive).unwrap();
        let paths: Vec<&str> = files.iter().map(VideoFile::path).collect();
        assert_eq!(paths, ["c.s01e01.mkv", "b.s01e02.mkv", "sub/d.s01e04.mkv", "a.s01e10.mp4"]);
    }

    #[test]
    fn include_filter() {
        let dir = tempdir().unwrap();
        for name in ["show.s01e01.mkv", "other.s01e01.mkv"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let mut config = config();
        config.include = vec!["Show".to_string()];
        let files = gather_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "show.s01e01.mkv");
    }
}
