//! Page capability consumed by table detection and cropping.
//!
//! This crate provides:
//! - Geometry value types: [`Rect`] and positioned [`Word`]s, both in page units
//! - The [`Page`] trait: render a region at a given dpi, list words in reading order
//! - [`RasterPage`], a pre-rendered page bitmap with its word list
//! - [`ImageOnlyPage`], a bare image with no text layer
//!
//! Notes:
//! - Page units follow PDF convention: 72 units per inch, origin at the top-left corner.
//!   Rendering at 72 dpi therefore yields one pixel per page unit.
//! - Words are expected in reading order (left to right, top to bottom). Nothing downstream
//!   re-sorts them.

pub mod error;
pub mod geometry;
pub mod image_only;
pub mod raster;
pub mod word;

use std::borrow::Cow;

use image::DynamicImage;

pub use error::{PageError, PageResult};
pub use geometry::Rect;
pub use image_only::ImageOnlyPage;
pub use raster::RasterPage;
pub use word::Word;

/// Dots per inch at which one pixel equals one page unit.
pub const NATIVE_DPI: u32 = 72;

/// A single document page that can be rasterized and queried for text.
pub trait Page {
    /// Renders `rect` (page units), or the whole page when `None`, at `dpi`.
    ///
    /// The scale factor relative to page units is `dpi / 72`. Implementations do not clamp:
    /// a region that leaves the page is an error.
    fn image(&self, dpi: u32, rect: Option<Rect>) -> PageResult<DynamicImage>;

    /// Every word on the page, in reading order.
    fn positions_and_text(&self) -> Cow<'_, [Word]>;

    fn filename(&self) -> &str;

    /// Page index as assigned by the owning document. Passed through unchanged.
    fn page_number(&self) -> usize;
}
