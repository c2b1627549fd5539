use std::path::Path;

use image::DynamicImage;
use snafu::ResultExt;

use crate::TableDetectionModel;
use crate::error::{LayoutResult, ParseDetectionsSnafu, ReadDetectionsSnafu};
use crate::types::Detection;

/// Replays detections captured from an earlier model run.
///
/// The image is ignored; the threshold is applied the same way a live model's
/// post-processing would apply it.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetections {
    detections: Vec<Detection>,
}

impl PrecomputedDetections {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Parses a JSON array of `{ "bbox": [..], "score": .., "label": .. }` objects.
    pub fn from_json(raw: &str) -> LayoutResult<Self> {
        let detections = serde_json::from_str(raw).context(ParseDetectionsSnafu {
            stage: "parse-precomputed-detections",
        })?;
        Ok(Self::new(detections))
    }

    pub fn load(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).context(ReadDetectionsSnafu {
            stage: "read-precomputed-detections",
            path: path.to_path_buf(),
        })?;
        Self::from_json(&raw)
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl TableDetectionModel for PrecomputedDetections {
    fn detect(&self, _image: &DynamicImage, threshold: f32) -> LayoutResult<Vec<Detection>> {
        let kept: Vec<Detection> = self
            .detections
            .iter()
            .filter(|detection| detection.score >= threshold)
            .cloned()
            .collect();

        tracing::debug!(
            "replayed {} of {} stored detections at threshold {}",
            kept.len(),
            self.detections.len(),
            threshold
        );
        Ok(kept)
    }
}
