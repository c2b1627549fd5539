use snafu::Snafu;
use tabcrop_layout::LayoutError;
use tabcrop_page::PageError;

/// Boxed error returned by caption finders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TableError {
    #[snafu(display("unsupported table rotation of {angle} degrees; expected 0, 90, 180 or 270"))]
    InvalidAngle { stage: &'static str, angle: i64 },
    #[snafu(display("failed to render page image at {stage}"))]
    Render {
        stage: &'static str,
        source: PageError,
    },
    #[snafu(display("table detection model failed at {stage}"))]
    Detection {
        stage: &'static str,
        source: LayoutError,
    },
    #[snafu(display("caption search failed at {stage}"))]
    CaptionSearch {
        stage: &'static str,
        source: BoxError,
    },
    #[snafu(display("table invariant violation: {details}"))]
    InvariantViolation {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("invalid detector configuration: {details}"))]
    InvalidConfig {
        stage: &'static str,
        details: String,
    },
    #[snafu(display("failed to load detector configuration"))]
    LoadConfig {
        stage: &'static str,
        source: figment::Error,
    },
    #[snafu(display("failed to encode table record"))]
    EncodeRecord {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to decode table record"))]
    DecodeRecord {
        stage: &'static str,
        source: serde_json::Error,
    },
}

pub type TableResult<T> = Result<T, TableError>;
