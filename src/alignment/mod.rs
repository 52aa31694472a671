//! Span-based alignment of episodes to video files.
//!
//! Episodes and files are kept in two ordered sequences, each item spanning one
//! or more rows of a shared grid. Recomputing the alignment walks both
//! sequences row by row and gives every file either an output name or an error.

mod model;
mod types;

pub use model::{AlignmentModel, GridRow};
pub use types::{AlignmentError, Episode, Mapping, Side, VideoFile};
pub use types::{default_order, episode_tag, season_directory, season_tag};
