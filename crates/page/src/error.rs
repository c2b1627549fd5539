use snafu::Snafu;

use crate::geometry::Rect;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PageError {
    #[snafu(display("page cannot be rendered at {dpi} dpi"))]
    InvalidDpi { stage: &'static str, dpi: u32 },
    #[snafu(display("requested region {rect:?} falls outside page bounds {bounds:?}"))]
    OutOfBounds {
        stage: &'static str,
        rect: Rect,
        bounds: Rect,
    },
    #[snafu(display("requested region {rect:?} rasterizes to an empty bitmap"))]
    EmptyCrop { stage: &'static str, rect: Rect },
}

pub type PageResult<T> = Result<T, PageError>;
