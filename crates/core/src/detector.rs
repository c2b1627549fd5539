use snafu::ResultExt;
use tabcrop_layout::{Detection, TableClass, TableDetectionModel};
use tabcrop_page::{NATIVE_DPI, Page, Rect};

use crate::config::{DetectorConfig, DetectorConfigOverride};
use crate::error::{DetectionSnafu, RenderSnafu, TableResult};
use crate::region::CroppedTable;
use crate::rotation::Rotation;

/// Resolution pages are rendered at for detection. At 72 dpi model pixels are page units,
/// so boxes need no rescaling.
pub const REFERENCE_DPI: u32 = NATIVE_DPI;

/// Finds tables on pages with a [`TableDetectionModel`].
pub struct TableDetector<M> {
    model: M,
    config: DetectorConfig,
}

impl<M: TableDetectionModel> TableDetector<M> {
    pub fn new(model: M, config: DetectorConfig) -> TableResult<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn with_default_config(model: M) -> Self {
        Self {
            model,
            config: DetectorConfig::default(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Detects tables on `page` with the detector's own config.
    pub fn detect<'p>(&self, page: &'p dyn Page) -> TableResult<Vec<CroppedTable<'p>>> {
        self.run(page, &self.config)
    }

    /// Detects tables with `overrides` applied on top of the detector's config for this
    /// call only.
    pub fn detect_with<'p>(
        &self,
        page: &'p dyn Page,
        overrides: &DetectorConfigOverride,
    ) -> TableResult<Vec<CroppedTable<'p>>> {
        let config = self.config.merged(overrides);
        config.validate()?;
        self.run(page, &config)
    }

    fn run<'p>(
        &self,
        page: &'p dyn Page,
        config: &DetectorConfig,
    ) -> TableResult<Vec<CroppedTable<'p>>> {
        let image = page.image(REFERENCE_DPI, None).context(RenderSnafu {
            stage: "render-page-for-detection",
        })?;

        // The model applies the threshold itself; its output is taken as-is.
        let detections = self
            .model
            .detect(&image, config.detector_base_threshold)
            .context(DetectionSnafu {
                stage: "run-table-detection-model",
            })?;

        tracing::debug!(
            "detected {} tables on {} page {} at threshold {}",
            detections.len(),
            page.filename(),
            page.page_number(),
            config.detector_base_threshold
        );
        Ok(detections
            .into_iter()
            .map(|detection| table_from_detection(page, detection))
            .collect())
    }
}

fn table_from_detection(page: &dyn Page, detection: Detection) -> CroppedTable<'_> {
    let rect = Rect::from_bbox(detection.bbox.to_page_coords(REFERENCE_DPI));
    match detection.class() {
        TableClass::RotatedTable => CroppedTable::with_rotation(
            page,
            rect,
            detection.score,
            Rotation::Deg90,
            detection.label,
        ),
        TableClass::Table | TableClass::Other(_) => {
            CroppedTable::new(page, rect, detection.score, detection.label)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use image::{DynamicImage, Rgba, RgbaImage};
    use tabcrop_layout::{BoundingBox, LayoutError, LayoutResult, PrecomputedDetections};
    use tabcrop_page::{PageError, PageResult, RasterPage, Word};

    use super::*;
    use crate::error::TableError;
    use crate::render::RenderOptions;

    fn sample_page() -> RasterPage {
        let bitmap = RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]));
        RasterPage::new("invoice.pdf", 0, DynamicImage::ImageRgba8(bitmap), 72)
            .unwrap()
            .with_words(vec![
                Word::new(15.0, 15.0, 40.0, 25.0, "Item"),
                Word::new(60.0, 15.0, 90.0, 25.0, "Price"),
                Word::new(15.0, 35.0, 40.0, 45.0, "Tea"),
                Word::new(60.0, 35.0, 75.0, 45.0, "3"),
            ])
    }

    fn detection(bbox: [f64; 4], score: f32, label: i64) -> Detection {
        Detection::new(BoundingBox::from(bbox), score, label)
    }

    struct BrokenModel;

    impl TableDetectionModel for BrokenModel {
        fn detect(&self, _image: &DynamicImage, _threshold: f32) -> LayoutResult<Vec<Detection>> {
            Err(LayoutError::inference("forward", "weights not loaded"))
        }
    }

    /// Checks that it receives the reference-resolution page render.
    struct SizeCheckingModel {
        expected: (u32, u32),
    }

    impl TableDetectionModel for SizeCheckingModel {
        fn detect(&self, image: &DynamicImage, _threshold: f32) -> LayoutResult<Vec<Detection>> {
            assert_eq!((image.width(), image.height()), self.expected);
            Ok(Vec::new())
        }
    }

    #[test]
    fn single_table_end_to_end() {
        let page = sample_page();
        let model =
            PrecomputedDetections::new(vec![detection([10.0, 10.0, 110.0, 60.0], 0.95, 0)]);
        let detector = TableDetector::with_default_config(model);

        let tables = detector.detect(&page).unwrap();
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.rect(), Rect::new(10.0, 10.0, 110.0, 60.0));
        assert_eq!(table.confidence_score(), 0.95);
        assert_eq!(table.label(), 0);
        assert_eq!(table.rotation(), None);
        assert_eq!(table.text(), "Item Price\nTea 3");

        let native = table.image(&RenderOptions::default()).unwrap();
        let doubled = table.image(&RenderOptions::at_dpi(144)).unwrap();
        assert_eq!(doubled.width(), native.width() * 2);
        assert_eq!(doubled.height(), native.height() * 2);
    }

    #[test]
    fn label_one_becomes_quarter_turned_table() {
        let page = sample_page();
        let model = PrecomputedDetections::new(vec![
            detection([120.0, 5.0, 180.0, 95.0], 0.97, 1),
            detection([10.0, 10.0, 110.0, 60.0], 0.95, 0),
            detection([0.0, 0.0, 5.0, 5.0], 0.92, 4),
        ]);
        let detector = TableDetector::with_default_config(model);

        let tables = detector.detect(&page).unwrap();
        assert_eq!(tables.len(), 3);

        assert_eq!(tables[0].rotation(), Some(Rotation::Deg90));
        assert_eq!(tables[0].label(), 1);
        assert_eq!(tables[0].to_record().angle, Some(90));

        assert_eq!(tables[1].rotation(), None);
        assert_eq!(tables[1].label(), 0);

        assert_eq!(tables[2].rotation(), None);
        assert_eq!(tables[2].label(), 4);
    }

    #[test]
    fn threshold_override_applies_to_one_call() {
        let page = sample_page();
        let model = PrecomputedDetections::new(vec![
            detection([10.0, 10.0, 110.0, 60.0], 0.95, 0),
            detection([120.0, 10.0, 190.0, 60.0], 0.6, 0),
        ]);
        let detector = TableDetector::with_default_config(model);

        let relaxed = detector
            .detect_with(&page, &DetectorConfigOverride::with_threshold(0.5))
            .unwrap();
        assert_eq!(relaxed.len(), 2);

        assert_eq!(detector.detect(&page).unwrap().len(), 1);
        assert_eq!(detector.config().detector_base_threshold, 0.9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let model = PrecomputedDetections::default();
        let config = DetectorConfig {
            detector_base_threshold: -0.1,
        };
        assert!(matches!(
            TableDetector::new(model, config),
            Err(TableError::InvalidConfig { .. })
        ));

        let page = sample_page();
        let detector = TableDetector::with_default_config(PrecomputedDetections::default());
        assert!(matches!(
            detector.detect_with(&page, &DetectorConfigOverride::with_threshold(2.0)),
            Err(TableError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn model_failure_propagates() {
        let page = sample_page();
        let detector = TableDetector::with_default_config(BrokenModel);
        assert!(matches!(
            detector.detect(&page),
            Err(TableError::Detection { .. })
        ));
    }

    #[test]
    fn model_sees_page_at_reference_resolution() {
        let bitmap = RgbaImage::from_pixel(400, 200, Rgba([255, 255, 255, 255]));
        let page = RasterPage::new("scan.pdf", 1, DynamicImage::ImageRgba8(bitmap), 144).unwrap();
        let detector = TableDetector::with_default_config(SizeCheckingModel {
            expected: (200, 100),
        });
        assert!(detector.detect(&page).unwrap().is_empty());
    }

    #[test]
    fn page_render_failure_propagates() {
        struct BlankPage;

        impl Page for BlankPage {
            fn image(&self, dpi: u32, _rect: Option<Rect>) -> PageResult<DynamicImage> {
                Err(PageError::InvalidDpi {
                    stage: "render-blank-page",
                    dpi,
                })
            }

            fn positions_and_text(&self) -> Cow<'_, [Word]> {
                Cow::Owned(Vec::new())
            }

            fn filename(&self) -> &str {
                "blank"
            }

            fn page_number(&self) -> usize {
                0
            }
        }

        let detector = TableDetector::with_default_config(PrecomputedDetections::default());
        assert!(matches!(
            detector.detect(&BlankPage),
            Err(TableError::Render { .. })
        ));
    }
}
