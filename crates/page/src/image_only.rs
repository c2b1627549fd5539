use std::borrow::Cow;

use image::DynamicImage;

use crate::error::PageResult;
use crate::geometry::Rect;
use crate::raster::RasterPage;
use crate::word::Word;
use crate::Page;

/// Filename reported for pages that were built from a bare image.
pub const IMAGE_ONLY_FILENAME: &str = "image";

/// A page consisting of a single image and no text layer.
///
/// The image is taken to be rendered at 72 dpi, so one pixel is one page unit.
#[derive(Debug, Clone)]
pub struct ImageOnlyPage {
    raster: RasterPage,
}

impl ImageOnlyPage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            raster: RasterPage::at_native_dpi(IMAGE_ONLY_FILENAME, 0, image),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.raster.bounds()
    }

    pub fn source_image(&self) -> &DynamicImage {
        self.raster.bitmap()
    }
}

impl Page for ImageOnlyPage {
    fn image(&self, dpi: u32, rect: Option<Rect>) -> PageResult<DynamicImage> {
        self.raster.image(dpi, rect)
    }

    fn positions_and_text(&self) -> Cow<'_, [Word]> {
        Cow::Borrowed(&[])
    }

    fn filename(&self) -> &str {
        IMAGE_ONLY_FILENAME
    }

    fn page_number(&self) -> usize {
        0
    }
}
