//! Crop rendering parameters: resolution, margin (page units, before rasterizing)
//! and padding (blank pixels, after rasterizing).

use image::imageops;
use image::{DynamicImage, Rgba, RgbaImage};
use tabcrop_page::{NATIVE_DPI, Rect};

/// Margin used by [`Margin::Auto`], in page units on every side.
pub const AUTO_MARGIN: f64 = 30.0;

/// [`Padding::Auto`] pads each side by this fraction of the larger scaled dimension.
pub const AUTO_PADDING_RATIO: f64 = 0.1;

const PADDING_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Per-side amounts in `(left, top, right, bottom)` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides<T> {
    pub left: T,
    pub top: T,
    pub right: T,
    pub bottom: T,
}

impl<T: Copy> Sides<T> {
    pub const fn new(left: T, top: T, right: T, bottom: T) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Blank border added around the rasterized crop.
///
/// Structure-recognition models do noticeably worse when content touches the image edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Padding {
    #[default]
    None,
    /// 10% of the larger of the scaled width and height, on every side.
    Auto,
    Explicit(Sides<u32>),
}

impl Padding {
    /// Pixel padding for a crop of `rect` rendered at `dpi`.
    pub fn resolve(&self, rect: &Rect, dpi: u32) -> Sides<u32> {
        match self {
            Self::None => Sides::uniform(0),
            Self::Auto => {
                let scale = dpi as f64 / NATIVE_DPI as f64;
                let larger = (rect.width() * scale).max(rect.height() * scale);
                Sides::uniform((larger * AUTO_PADDING_RATIO) as u32)
            }
            Self::Explicit(sides) => *sides,
        }
    }
}

/// Extra page content around the detected box, captured before rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Margin {
    #[default]
    None,
    /// [`AUTO_MARGIN`] on every side.
    Auto,
    Explicit(Sides<f64>),
}

impl Margin {
    pub fn resolve(&self) -> Option<Sides<f64>> {
        match self {
            Self::None => None,
            Self::Auto => Some(Sides::uniform(AUTO_MARGIN)),
            Self::Explicit(sides) => Some(*sides),
        }
    }
}

/// What a caller asks [`crate::CroppedTable::image`] for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub padding: Padding,
    pub margin: Margin,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: NATIVE_DPI,
            padding: Padding::None,
            margin: Margin::None,
        }
    }
}

impl RenderOptions {
    pub fn at_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Resolves `Auto` variants against the table rectangle.
    pub fn resolve(&self, rect: &Rect) -> RenderParams {
        RenderParams {
            dpi: self.dpi,
            padding: self.padding.resolve(rect, self.dpi),
            margin: self.margin.resolve(),
        }
    }
}

/// Concrete parameters a cached crop was produced with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub dpi: u32,
    pub padding: Sides<u32>,
    pub margin: Option<Sides<f64>>,
}

impl RenderParams {
    /// The page area to rasterize: `rect` grown by the margin.
    pub fn crop_rect(&self, rect: &Rect) -> Rect {
        match self.margin {
            Some(margin) => rect.expand(margin.left, margin.top, margin.right, margin.bottom),
            None => *rect,
        }
    }
}

pub(crate) fn pad_image(image: &DynamicImage, padding: Sides<u32>) -> DynamicImage {
    if padding == Sides::uniform(0) {
        return image.clone();
    }

    let mut canvas = RgbaImage::from_pixel(
        image.width() + padding.left + padding.right,
        image.height() + padding.top + padding.bottom,
        PADDING_FILL,
    );
    imageops::replace(
        &mut canvas,
        &image.to_rgba8(),
        padding.left as i64,
        padding.top as i64,
    );
    DynamicImage::ImageRgba8(canvas)
}
