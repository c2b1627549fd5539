//! Table regions on document pages.
//!
//! A [`TableDetector`] renders a page, hands it to a detection model and turns every accepted
//! detection into a [`CroppedTable`]. A table knows its page, rectangle, score and label,
//! and derives on demand:
//! - a cropped image with optional margin and padding, turned upright if the table is rotated
//! - the words that belong to it, in page or table-local coordinates
//! - its text, with lines rebuilt from word positions
//! - a robust estimate of its text height
//!
//! Tables serialize to a [`TableRecord`] and restore from one given the same page.

pub mod caption;
pub mod config;
pub mod detector;
pub mod error;
pub mod record;
pub mod region;
pub mod render;
pub mod rotation;
pub mod text;

pub use caption::{CaptionFinder, CaptionOptions, Captions};
pub use config::{DetectorConfig, DetectorConfigOverride};
pub use detector::{REFERENCE_DPI, TableDetector};
pub use error::{BoxError, TableError, TableResult};
pub use record::TableRecord;
pub use region::{CoordinateFrame, CroppedTable, DEFAULT_SMALLEST_TEXT_HEIGHT, WordSelection};
pub use render::{Margin, Padding, RenderOptions, RenderParams, Sides};
pub use rotation::Rotation;
pub use text::{DEFAULT_Y_GAP, position_words};

pub use tabcrop_layout as layout;
pub use tabcrop_page as page;
