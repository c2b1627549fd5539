//! Page backed by an already-rendered bitmap.

use std::borrow::Cow;

use image::DynamicImage;
use image::imageops::FilterType;
use snafu::ensure;

use crate::error::{EmptyCropSnafu, InvalidDpiSnafu, OutOfBoundsSnafu, PageResult};
use crate::geometry::Rect;
use crate::word::Word;
use crate::{NATIVE_DPI, Page};

/// A page whose bitmap was rendered ahead of time at `render_dpi`.
///
/// Crops are cut from the stored bitmap and resampled to the requested dpi, so asking for a
/// higher dpi than the bitmap was rendered at upsamples rather than adding detail.
#[derive(Debug, Clone)]
pub struct RasterPage {
    filename: String,
    page_number: usize,
    bitmap: DynamicImage,
    render_dpi: u32,
    words: Vec<Word>,
}

impl RasterPage {
    pub fn new(
        filename: impl Into<String>,
        page_number: usize,
        bitmap: DynamicImage,
        render_dpi: u32,
    ) -> PageResult<Self> {
        ensure!(
            render_dpi > 0,
            InvalidDpiSnafu {
                stage: "create-raster-page",
                dpi: render_dpi,
            }
        );

        Ok(Self {
            filename: filename.into(),
            page_number,
            bitmap,
            render_dpi,
            words: Vec::new(),
        })
    }

    /// Bitmap rendered at 72 dpi: one pixel per page unit.
    pub fn at_native_dpi(
        filename: impl Into<String>,
        page_number: usize,
        bitmap: DynamicImage,
    ) -> Self {
        Self {
            filename: filename.into(),
            page_number,
            bitmap,
            render_dpi: NATIVE_DPI,
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// Full page extent in page units.
    pub fn bounds(&self) -> Rect {
        let scale = self.pixels_per_unit();
        Rect::new(
            0.0,
            0.0,
            self.bitmap.width() as f64 / scale,
            self.bitmap.height() as f64 / scale,
        )
    }

    pub fn bitmap(&self) -> &DynamicImage {
        &self.bitmap
    }

    pub fn render_dpi(&self) -> u32 {
        self.render_dpi
    }

    fn pixels_per_unit(&self) -> f64 {
        self.render_dpi as f64 / NATIVE_DPI as f64
    }
}

impl Page for RasterPage {
    fn image(&self, dpi: u32, rect: Option<Rect>) -> PageResult<DynamicImage> {
        ensure!(
            dpi > 0,
            InvalidDpiSnafu {
                stage: "render-raster-page",
                dpi,
            }
        );

        let bounds = self.bounds();
        let rect = rect.unwrap_or(bounds);
        ensure!(
            bounds.contains(&rect),
            OutOfBoundsSnafu {
                stage: "crop-raster-page",
                rect,
                bounds,
            }
        );

        let source = rect.scale(self.pixels_per_unit());
        let x0 = source.xmin.floor().max(0.0) as u32;
        let y0 = source.ymin.floor().max(0.0) as u32;
        let x1 = (source.xmax.ceil() as u32).min(self.bitmap.width());
        let y1 = (source.ymax.ceil() as u32).min(self.bitmap.height());

        let target_scale = dpi as f64 / NATIVE_DPI as f64;
        let target_width = (rect.width() * target_scale).round() as u32;
        let target_height = (rect.height() * target_scale).round() as u32;
        ensure!(
            x1 > x0 && y1 > y0 && target_width > 0 && target_height > 0,
            EmptyCropSnafu {
                stage: "crop-raster-page",
                rect,
            }
        );

        let cropped = self.bitmap.crop_imm(x0, y0, x1 - x0, y1 - y0);
        if cropped.width() == target_width && cropped.height() == target_height {
            return Ok(cropped);
        }

        tracing::trace!(
            "resampling {}x{} crop to {}x{} for {} dpi",
            cropped.width(),
            cropped.height(),
            target_width,
            target_height,
            dpi
        );
        Ok(cropped.resize_exact(target_width, target_height, FilterType::Triangle))
    }

    fn positions_and_text(&self) -> Cow<'_, [Word]> {
        Cow::Borrowed(&self.words)
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn page_number(&self) -> usize {
        self.page_number
    }
}
