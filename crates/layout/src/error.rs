use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LayoutError {
    #[snafu(display("table detection model failed: {details}"))]
    Inference {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("failed to read detections from {}", path.display()))]
    ReadDetections {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to parse detections JSON"))]
    ParseDetections {
        stage: &'static str,
        source: serde_json::Error,
    },
}

impl LayoutError {
    /// For model implementations outside this crate to report a failed forward pass.
    pub fn inference(stage: &'static str, details: impl Into<String>) -> Self {
        Self::Inference {
            stage,
            details: details.into(),
        }
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;
