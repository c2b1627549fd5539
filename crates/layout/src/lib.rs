//! Table detection model interface.
//!
//! The model itself (preprocessing, network, box decoding) is a black box: it receives a page
//! bitmap and reports boxes, scores and labels. This crate fixes that contract and ships
//! [`PrecomputedDetections`] for replaying stored model output.

pub mod error;
pub mod precomputed;
pub mod types;

use image::DynamicImage;

pub use error::{LayoutError, LayoutResult};
pub use precomputed::PrecomputedDetections;
pub use types::{BoundingBox, Detection, TableClass};

/// A model that finds tables in a rendered page.
pub trait TableDetectionModel {
    /// Detects tables in `image`, keeping only detections scoring at least `threshold`.
    ///
    /// Boxes are in pixel coordinates of `image`. Output order is the model's own.
    fn detect(&self, image: &DynamicImage, threshold: f32) -> LayoutResult<Vec<Detection>>;
}

impl<M: TableDetectionModel + ?Sized> TableDetectionModel for &M {
    fn detect(&self, image: &DynamicImage, threshold: f32) -> LayoutResult<Vec<Detection>> {
        (**self).detect(image, threshold)
    }
}

impl<M: TableDetectionModel + ?Sized> TableDetectionModel for Box<M> {
    fn detect(&self, image: &DynamicImage, threshold: f32) -> LayoutResult<Vec<Detection>> {
        (**self).detect(image, threshold)
    }
}
