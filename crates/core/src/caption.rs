//! Seam for caption search. The search heuristic itself lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::region::CroppedTable;

/// Default minimum spacing between lines treated as separate.
pub const DEFAULT_CAPTION_LINE_SPACING: f64 = 2.5;

/// Text found directly above and below a table.
///
/// Serialized as `[above, below]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Captions {
    pub above: String,
    pub below: String,
}

impl Captions {
    pub fn new(above: impl Into<String>, below: impl Into<String>) -> Self {
        Self {
            above: above.into(),
            below: below.into(),
        }
    }
}

impl From<(String, String)> for Captions {
    fn from((above, below): (String, String)) -> Self {
        Self { above, below }
    }
}

impl From<Captions> for (String, String) {
    fn from(captions: Captions) -> Self {
        (captions.above, captions.below)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionOptions {
    /// Search margin around the table in page units; positive grows the search area.
    pub margin: Option<f64>,
    pub line_spacing: f64,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            margin: None,
            line_spacing: DEFAULT_CAPTION_LINE_SPACING,
        }
    }
}

pub trait CaptionFinder {
    fn find_captions(
        &self,
        table: &CroppedTable<'_>,
        options: &CaptionOptions,
    ) -> Result<Captions, BoxError>;
}
