use std::cmp::Ordering;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::alignment::types::{AlignmentError, Episode, Mapping, Side, VideoFile};
use crate::alignment::types::{episode_tag, season_directory, season_tag};
use crate::sanitize::sanitize_filename;

/// Episodes and files placed on a shared grid of rows.
///
/// Every row index is the prefix sum of the spans before it in the same sequence,
/// so an episode split over two files occupies two rows,
/// and a file containing two episodes occupies two rows.
/// All mutating operations recompute rows and output names before returning.
#[derive(Debug, Default)]
pub struct AlignmentModel {
    episodes: Vec<Episode>,
    files: Vec<VideoFile>,
    skipped_episodes: Vec<Episode>,
    skipped_files: Vec<VideoFile>,
    loaded: bool,
}

/// One row of the alignment grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridRow {
    pub row: usize,
    /// Index of the active episode starting on this row.
    pub episode: Option<usize>,
    /// Index of the active file starting on this row.
    pub file: Option<usize>,
    /// An episode from an earlier row still spans this row.
    pub episode_continues: bool,
    /// A file from an earlier row still spans this row.
    pub file_continues: bool,
}

impl AlignmentModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all data with freshly loaded episodes and files.
    ///
    /// Both sequences are sorted by their ordering key, spans reset to one
    /// and the skipped pools cleared.
    pub fn load(&mut self, mut episodes: Vec<Episode>, mut files: Vec<VideoFile>) {
        for episode in &mut episodes {
            episode.file_span = 1;
        }
        for file in &mut files {
            file.episode_span = 1;
        }
        episodes.sort_by(|a, b| compare_order(a.order, b.order));
        files.sort_by(|a, b| compare_order(a.order, b.order));

        self.episodes = episodes;
        self.files = files;
        self.skipped_episodes.clear();
        self.skipped_files.clear();
        self.loaded = true;
        self.recompute();
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    #[must_use]
    pub fn files(&self) -> &[VideoFile] {
        &self.files
    }

    #[must_use]
    pub fn skipped_episodes(&self) -> &[Episode] {
        &self.skipped_episodes
    }

    #[must_use]
    pub fn skipped_files(&self) -> &[VideoFile] {
        &self.skipped_files
    }

    /// True if any active file could not be mapped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|file| file.error().is_some())
    }

    /// Number of rows needed to show both sequences side by side.
    #[must_use]
    pub fn row_count(&self) -> usize {
        let episode_rows: usize = self.episodes.iter().map(|episode| episode.file_span).sum();
        let file_rows: usize = self.files.iter().map(|file| file.episode_span).sum();
        episode_rows.max(file_rows)
    }

    /// Grid rows with the episode and file that start on each row.
    #[must_use]
    pub fn grid(&self) -> Vec<GridRow> {
        let mut rows: Vec<GridRow> = (0..self.row_count())
            .map(|row| GridRow {
                row,
                ..GridRow::default()
            })
            .collect();
        for (index, episode) in self.episodes.iter().enumerate() {
            rows[episode.row].episode = Some(index);
            for row in &mut rows[episode.row + 1..episode.row + episode.file_span] {
                row.episode_continues = true;
            }
        }
        for (index, file) in self.files.iter().enumerate() {
            rows[file.row].file = Some(index);
            for row in &mut rows[file.row + 1..file.row + file.episode_span] {
                row.file_continues = true;
            }
        }
        rows
    }

    /// Change the span of an active episode or file by `delta`.
    ///
    /// A span dropping below one moves the item to its skipped pool.
    ///
    /// # Errors
    /// Returns an error if there is no active item at `index`.
    pub fn adjust_span(&mut self, side: Side, index: usize, delta: isize) -> Result<()> {
        self.ensure_loaded()?;
        match side {
            Side::Episodes => {
                let episode = self
                    .episodes
                    .get_mut(index)
                    .with_context(|| format!("No {side} at index {index}"))?;
                let span = episode.file_span as isize + delta;
                if span < 1 {
                    let mut episode = self.episodes.remove(index);
                    episode.file_span = 1;
                    episode.row = 0;
                    insert_sorted(&mut self.skipped_episodes, episode, Episode::order);
                } else {
                    episode.file_span = span as usize;
                }
            }
            Side::Files => {
                let file = self
                    .files
                    .get_mut(index)
                    .with_context(|| format!("No {side} at index {index}"))?;
                let span = file.episode_span as isize + delta;
                if span < 1 {
                    let mut file = self.files.remove(index);
                    file.episode_span = 1;
                    file.row = 0;
                    file.mapping = Mapping::Unmapped;
                    insert_sorted(&mut self.skipped_files, file, VideoFile::order);
                } else {
                    file.episode_span = span as usize;
                }
            }
        }
        self.recompute();
        Ok(())
    }

    /// Change how many files the episode at `index` is split across.
    ///
    /// # Errors
    /// Returns an error if there is no active episode at `index`.
    pub fn adjust_episode_span(&mut self, index: usize, delta: isize) -> Result<()> {
        self.adjust_span(Side::Episodes, index, delta)
    }

    /// Change how many episodes the file at `index` contains.
    ///
    /// # Errors
    /// Returns an error if there is no active file at `index`.
    pub fn adjust_file_span(&mut self, index: usize, delta: isize) -> Result<()> {
        self.adjust_span(Side::Files, index, delta)
    }

    /// Move an item from a skipped pool back into its active sequence with span one.
    ///
    /// # Errors
    /// Returns an error if the pool has no item at `index`.
    pub fn restore_from_skipped(&mut self, side: Side, index: usize) -> Result<()> {
        self.ensure_loaded()?;
        match side {
            Side::Episodes => {
                anyhow::ensure!(
                    index < self.skipped_episodes.len(),
                    "No skipped {side} at index {index}"
                );
                let mut episode = self.skipped_episodes.remove(index);
                episode.file_span = 1;
                insert_sorted(&mut self.episodes, episode, Episode::order);
            }
            Side::Files => {
                anyhow::ensure!(index < self.skipped_files.len(), "No skipped {side} at index {index}");
                let mut file = self.skipped_files.remove(index);
                file.episode_span = 1;
                insert_sorted(&mut self.files, file, VideoFile::order);
            }
        }
        self.recompute();
        Ok(())
    }

    /// Move the file at `from` to position `to`, shifting the files in between by one.
    ///
    /// # Errors
    /// Returns an error if either index is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_loaded()?;
        let len = self.files.len();
        anyhow::ensure!(from < len, "No file at index {from}");
        anyhow::ensure!(to < len, "Cannot move file to index {to}, only {len} files");
        match from.cmp(&to) {
            Ordering::Less => self.files[from..=to].rotate_left(1),
            Ordering::Greater => self.files[to..=from].rotate_right(1),
            Ordering::Equal => {}
        }
        self.recompute();
        Ok(())
    }

    /// Recalculate row positions and the output name or error of every active file.
    pub fn recompute(&mut self) {
        let mut row = 0;
        for episode in &mut self.episodes {
            episode.row = row;
            row += episode.file_span;
        }

        let mut cursor = 0;
        let mut row = 0;
        for file in &mut self.files {
            file.row = row;
            file.mapping = map_file(&self.episodes, &mut cursor, row, file.episode_span, &file.extension);
            row += file.episode_span;
        }
    }

    fn ensure_loaded(&self) -> Result<()> {
        anyhow::ensure!(self.loaded, "No episodes or files loaded");
        Ok(())
    }
}

/// Resolve the file occupying `span` rows starting at `row`.
///
/// `cursor` points at the first episode that may still cover a row and only moves forward.
fn map_file(episodes: &[Episode], cursor: &mut usize, row: usize, span: usize, extension: &str) -> Mapping {
    skip_to_row(episodes, cursor, row);
    let Some(first) = episodes.get(*cursor) else {
        return Mapping::Error(AlignmentError::MissingSource);
    };

    if span == 1 {
        let part = (first.file_span != 1).then(|| format!(" - pt{}", row - first.row + 1));
        let title = format!("{} - {}{}", first.tag(), first.name, part.unwrap_or_default());
        return renamed(first.season, &title, extension);
    }

    let mut covered = Vec::with_capacity(span);
    let mut index = *cursor;
    for offset in 0..span {
        skip_to_row(episodes, &mut index, row + offset);
        let Some(episode) = episodes.get(index) else {
            return Mapping::Error(AlignmentError::MissingSource);
        };
        if episode.file_span != 1 {
            return Mapping::Error(AlignmentError::Overlap);
        }
        if episode.season != first.season {
            return Mapping::Error(AlignmentError::MultipleSeasons);
        }
        covered.push(episode);
    }

    let tags: String = covered.iter().map(|episode| episode_tag(episode.number)).collect();
    let names = covered.iter().map(|episode| episode.name.as_str()).join(" - ");
    let title = format!("{}{tags} - {names}", season_tag(first.season));
    renamed(first.season, &title, extension)
}

/// Advance `cursor` past episodes that end at or before `row`.
fn skip_to_row(episodes: &[Episode], cursor: &mut usize, row: usize) {
    while episodes
        .get(*cursor)
        .is_some_and(|episode| episode.row + episode.file_span <= row)
    {
        *cursor += 1;
    }
}

fn renamed(season: u32, title: &str, extension: &str) -> Mapping {
    let name = format!("{}{extension}", sanitize_filename(title));
    let path = format!("{}/{name}", season_directory(season));
    Mapping::Renamed { name, path }
}

fn compare_order(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Insert after all items with an equal or lower ordering key.
fn insert_sorted<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> f64) {
    let order = key(&item);
    let position = items
        .iter()
        .position(|existing| compare_order(key(existing), order) == Ordering::Greater)
        .unwrap_or(items.len());
    items.insert(position, item);
}
