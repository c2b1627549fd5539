//! Detected table regions and everything derived from them on demand.

use std::cell::{OnceCell, RefCell};
use std::fmt;

use image::DynamicImage;
use snafu::{ResultExt, ensure};
use tabcrop_page::{ImageOnlyPage, Page, Rect, Word};

use crate::caption::{CaptionFinder, CaptionOptions, Captions};
use crate::error::{CaptionSearchSnafu, InvariantViolationSnafu, RenderSnafu, TableResult};
use crate::record::TableRecord;
use crate::render::{RenderOptions, RenderParams, pad_image};
use crate::rotation::Rotation;
use crate::text::{DEFAULT_Y_GAP, position_words};

/// Heights at or below this are treated as glyph artifacts by word-height estimation.
pub const DEFAULT_SMALLEST_TEXT_HEIGHT: f64 = 0.1;

/// Median word height is scaled by this so row grouping errs towards splitting rows.
const WORD_HEIGHT_FACTOR: f64 = 0.95;

/// Which coordinates [`CroppedTable::text_positions`] reports words in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateFrame {
    /// Unchanged page coordinates.
    #[default]
    Page,
    /// Origin at the table's top-left corner, axes aligned with the upright table.
    TableLocal,
}

/// Which words [`CroppedTable::text_positions`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordSelection {
    /// Words whose box touches or overlaps the table.
    #[default]
    Inside,
    /// Every other word on the page.
    Outside,
}

#[derive(Debug, Clone)]
struct CachedImage {
    image: DynamicImage,
    params: RenderParams,
}

/// Derived state filled in lazily. Writes are last-call-wins and unsynchronized; the table
/// is `!Sync`.
#[derive(Debug, Default)]
struct RegionCache {
    image: RefCell<Option<CachedImage>>,
    word_height: OnceCell<Option<f64>>,
    captions: RefCell<Option<Captions>>,
}

/// A table found on a page: its rectangle, detection score and label, plus an optional
/// quarter-turn rotation.
///
/// `rotation` is `None` for a level table and `Some` for a rotated one, including
/// `Some(Rotation::Deg0)`. Only rotated tables write an angle into their record. `rect`
/// always stays in the page's own coordinates.
///
/// The table borrows its page; the page's owner decides how long it lives.
pub struct CroppedTable<'p> {
    page: &'p dyn Page,
    rect: Rect,
    confidence_score: f32,
    label: i64,
    rotation: Option<Rotation>,
    cache: RegionCache,
}

impl<'p> CroppedTable<'p> {
    pub fn new(page: &'p dyn Page, rect: Rect, confidence_score: f32, label: i64) -> Self {
        Self {
            page,
            rect,
            confidence_score,
            label,
            rotation: None,
            cache: RegionCache::default(),
        }
    }

    /// A rotated table. `angle` must be 0, 90, 180 or 270 degrees counter-clockwise.
    pub fn rotated(
        page: &'p dyn Page,
        rect: Rect,
        confidence_score: f32,
        angle: i64,
        label: i64,
    ) -> TableResult<Self> {
        let rotation = Rotation::from_degrees(angle)?;
        Ok(Self::with_rotation(page, rect, confidence_score, rotation, label))
    }

    pub fn with_rotation(
        page: &'p dyn Page,
        rect: Rect,
        confidence_score: f32,
        rotation: Rotation,
        label: i64,
    ) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::new(page, rect, confidence_score, label)
        }
    }

    /// Treats an already-cropped table image as a whole table, skipping detection.
    ///
    /// The rect covers the full image, the score is 1.0 and the label 0. The image is
    /// cached as if rendered at 72 dpi with no padding or margin.
    pub fn from_image_only(page: &'p ImageOnlyPage) -> Self {
        let rect = page.bounds();
        let table = Self::new(page, rect, 1.0, 0);
        *table.cache.image.borrow_mut() = Some(CachedImage {
            image: page.source_image().clone(),
            params: RenderOptions::default().resolve(&rect),
        });
        table
    }

    /// Restores a table from its record. A record with an angle becomes a rotated table.
    ///
    /// Captions stored in the record are restored into the caption cache.
    pub fn from_record(record: &TableRecord, page: &'p dyn Page) -> TableResult<Self> {
        if record.file != page.filename() || record.page_no != page.page_number() {
            tracing::warn!(
                "restoring table recorded for {} page {} onto {} page {}",
                record.file,
                record.page_no,
                page.filename(),
                page.page_number()
            );
        }

        let table = match record.angle {
            Some(angle) => Self::rotated(
                page,
                record.bbox,
                record.confidence_score,
                angle,
                record.label,
            )?,
            None => Self::new(page, record.bbox, record.confidence_score, record.label),
        };
        *table.cache.captions.borrow_mut() = record.captions.clone();
        Ok(table)
    }

    pub fn to_record(&self) -> TableRecord {
        TableRecord {
            file: self.page.filename().to_string(),
            page_no: self.page.page_number(),
            bbox: self.rect,
            confidence_score: self.confidence_score,
            label: self.label,
            angle: self.rotation.map(|rotation| rotation.degrees()),
            captions: self.cache.captions.borrow().clone(),
        }
    }

    pub fn page(&self) -> &'p dyn Page {
        self.page
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bbox(&self) -> [f64; 4] {
        self.rect.bbox()
    }

    pub fn confidence_score(&self) -> f32 {
        self.confidence_score
    }

    pub fn label(&self) -> i64 {
        self.label
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    /// Renders the table crop.
    ///
    /// The margin grows the crop area on the page before rasterizing; the padding adds
    /// white pixels afterwards. A rotated table is then turned upright, with the canvas
    /// resized so no corner is clipped. A call with the same resolved parameters as the
    /// last one returns the cached image; otherwise the new result replaces the cache.
    pub fn image(&self, options: &RenderOptions) -> TableResult<DynamicImage> {
        let params = options.resolve(&self.rect);
        if let Some(cached) = self.cache.image.borrow().as_ref()
            && cached.params == params
        {
            tracing::trace!("reusing cached image for table {:?}", self.rect);
            return Ok(cached.image.clone());
        }

        let crop_rect = params.crop_rect(&self.rect);

        tracing::trace!(
            "rendering table {:?} at {} dpi from page area {:?}",
            self.rect,
            params.dpi,
            crop_rect
        );
        let raw = self
            .page
            .image(params.dpi, Some(crop_rect))
            .context(RenderSnafu {
                stage: "render-table-crop",
            })?;

        let padded = pad_image(&raw, params.padding);
        let image = match self.rotation {
            Some(rotation) => rotation.upright_image(&padded),
            None => padded,
        };

        *self.cache.image.borrow_mut() = Some(CachedImage {
            image: image.clone(),
            params,
        });
        Ok(image)
    }

    /// The image from the most recent [`CroppedTable::image`] call, if any.
    pub fn cached_image(&self) -> Option<DynamicImage> {
        self.cache
            .image
            .borrow()
            .as_ref()
            .map(|cached| cached.image.clone())
    }

    /// Parameters of the most recent [`CroppedTable::image`] call, if any.
    pub fn last_render(&self) -> Option<RenderParams> {
        self.cache.image.borrow().as_ref().map(|cached| cached.params)
    }

    /// Words on the page that belong to this table, or with [`WordSelection::Outside`]
    /// every word that does not.
    ///
    /// A word belongs to the table if its box touches the table rectangle at all, even if
    /// it is not fully contained. In [`CoordinateFrame::TableLocal`] the table's top-left
    /// corner becomes the origin and, for a rotated table, boxes are mapped into the
    /// upright table.
    pub fn text_positions(&self, frame: CoordinateFrame, selection: WordSelection) -> Vec<Word> {
        let outside = selection == WordSelection::Outside;
        let words = self.page.positions_and_text();
        let selected = words
            .iter()
            .filter(|word| word.rect().intersects(&self.rect) != outside);

        match frame {
            CoordinateFrame::Page => selected.cloned().collect(),
            CoordinateFrame::TableLocal => selected.map(|word| self.to_table_local(word)).collect(),
        }
    }

    fn to_table_local(&self, word: &Word) -> Word {
        let shifted = word.translate(-self.rect.xmin, -self.rect.ymin);
        match self.rotation {
            Some(rotation) => shifted.with_rect(rotation.upright_box(
                shifted.rect(),
                self.rect.width(),
                self.rect.height(),
            )),
            None => shifted,
        }
    }

    /// The table's words as lines of text. See [`position_words`].
    pub fn text(&self) -> String {
        let words = self.text_positions(CoordinateFrame::Page, WordSelection::Inside);
        position_words(&words, DEFAULT_Y_GAP)
    }

    /// Estimated height of ordinary text in the table: 0.95 times the median height of
    /// words taller than `smallest_supported_text_height`.
    ///
    /// Returns `Ok(None)` when no word qualifies. Computed once; later calls return the
    /// first result whatever threshold they pass.
    pub fn predicted_word_height(
        &self,
        smallest_supported_text_height: f64,
    ) -> TableResult<Option<f64>> {
        if let Some(cached) = self.cache.word_height.get() {
            return Ok(*cached);
        }

        let mut heights: Vec<f64> = self
            .text_positions(CoordinateFrame::TableLocal, WordSelection::Inside)
            .iter()
            .map(Word::height)
            .filter(|height| *height > smallest_supported_text_height)
            .collect();
        let estimate = median(&mut heights).map(|median| WORD_HEIGHT_FACTOR * median);

        if let Some(height) = estimate {
            ensure!(
                height > 0.0,
                InvariantViolationSnafu {
                    stage: "predict-word-height",
                    details: format!(
                        "word height estimate {height} for table {:?} is not positive",
                        self.rect
                    ),
                }
            );
        }

        let _ = self.cache.word_height.set(estimate);
        Ok(estimate)
    }

    /// Looks for captions around the table using `finder`.
    ///
    /// Only calls with default options are cached.
    pub fn captions(
        &self,
        finder: &dyn CaptionFinder,
        options: &CaptionOptions,
    ) -> TableResult<Captions> {
        let cacheable = *options == CaptionOptions::default();
        if cacheable && let Some(cached) = self.cached_captions() {
            tracing::trace!("reusing cached captions for table {:?}", self.rect);
            return Ok(cached);
        }

        let captions = finder
            .find_captions(self, options)
            .context(CaptionSearchSnafu {
                stage: "find-table-captions",
            })?;
        if cacheable {
            *self.cache.captions.borrow_mut() = Some(captions.clone());
        }
        Ok(captions)
    }

    pub fn cached_captions(&self) -> Option<Captions> {
        self.cache.captions.borrow().clone()
    }
}

impl fmt::Debug for CroppedTable<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CroppedTable")
            .field("file", &self.page.filename())
            .field("page_no", &self.page.page_number())
            .field("rect", &self.rect)
            .field("confidence_score", &self.confidence_score)
            .field("label", &self.label)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
