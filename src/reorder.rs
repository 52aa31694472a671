//! Translate user gestures into alignment model operations.

use anyhow::Result;

use crate::alignment::{AlignmentModel, Episode, Side, VideoFile};
use crate::script::{RenameScript, generate_script};

/// Owns the alignment model and applies user events to it.
///
/// Construct one instance and hand references to the presentation layer.
/// Every method leaves the model fully recomputed.
#[derive(Debug, Default)]
pub struct ReorderController {
    model: AlignmentModel,
    drag_origin: Option<usize>,
}

impl ReorderController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn model(&self) -> &AlignmentModel {
        &self.model
    }

    /// Replace all data. Any drag in progress is cancelled.
    pub fn reload(&mut self, episodes: Vec<Episode>, files: Vec<VideoFile>) {
        self.drag_origin = None;
        self.model.load(episodes, files);
    }

    /// Increase the span of an active item by one.
    ///
    /// # Errors
    /// Returns an error if there is no active item at `index`.
    pub fn increment(&mut self, side: Side, index: usize) -> Result<()> {
        self.model.adjust_span(side, index, 1)
    }

    /// Decrease the span of an active item by one, skipping it when the span reaches zero.
    ///
    /// # Errors
    /// Returns an error if there is no active item at `index`.
    pub fn decrement(&mut self, side: Side, index: usize) -> Result<()> {
        self.model.adjust_span(side, index, -1)
    }

    /// Bring a skipped item back into the alignment.
    ///
    /// # Errors
    /// Returns an error if the skipped pool has no item at `index`.
    pub fn restore(&mut self, side: Side, index: usize) -> Result<()> {
        self.model.restore_from_skipped(side, index)
    }

    /// Remember the file where a drag started.
    pub const fn drag_start(&mut self, index: usize) {
        self.drag_origin = Some(index);
    }

    #[must_use]
    pub const fn drag_origin(&self) -> Option<usize> {
        self.drag_origin
    }

    /// Finish a drag by dropping onto file `index`.
    ///
    /// Returns `false` without touching the model when no drag was started
    /// or the file was dropped onto itself.
    ///
    /// # Errors
    /// Returns an error if either index is out of range.
    pub fn drop_on(&mut self, index: usize) -> Result<bool> {
        let Some(origin) = self.drag_origin.take() else {
            return Ok(false);
        };
        if origin == index {
            return Ok(false);
        }
        self.model.reorder(origin, index)?;
        Ok(true)
    }

    /// Rename script for the current state.
    #[must_use]
    pub fn script(&self) -> RenameScript {
        generate_script(self.model.files())
    }
}
