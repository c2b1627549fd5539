//! Quarter-turn rotations between page orientation and upright table orientation.
//!
//! An angle of 90 means a 90 degree counter-clockwise turn, applied to a level table,
//! reproduces what is on the page. Making the table upright therefore rotates by the
//! negative angle.

use image::DynamicImage;
use tabcrop_page::Rect;

use crate::error::{InvalidAngleSnafu, TableResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(angle: i64) -> TableResult<Self> {
        match angle {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => InvalidAngleSnafu {
                stage: "parse-table-rotation",
                angle,
            }
            .fail(),
        }
    }

    pub fn degrees(&self) -> i64 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// The rotation that undoes this one: `(360 - angle) mod 360`.
    pub fn inverse(&self) -> Self {
        match self {
            Self::Deg0 => Self::Deg0,
            Self::Deg90 => Self::Deg270,
            Self::Deg180 => Self::Deg180,
            Self::Deg270 => Self::Deg90,
        }
    }

    /// Width and height of a `width` x `height` frame after it is made upright.
    pub fn upright_size(&self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Self::Deg0 | Self::Deg180 => (width, height),
            Self::Deg90 | Self::Deg270 => (height, width),
        }
    }

    /// Maps a box from a `width` x `height` frame (origin at its top-left) into the upright
    /// frame, matching what [`Rotation::upright_image`] does to pixels.
    pub fn upright_box(&self, bbox: Rect, width: f64, height: f64) -> Rect {
        let Rect {
            xmin: x0,
            ymin: y0,
            xmax: x1,
            ymax: y1,
        } = bbox;

        match self {
            Self::Deg0 => bbox,
            Self::Deg90 => Rect::new(height - y1, x0, height - y0, x1),
            Self::Deg180 => Rect::new(width - x1, height - y1, width - x0, height - y0),
            Self::Deg270 => Rect::new(y0, width - x1, y1, width - x0),
        }
    }

    /// Rotates by the negative angle; quarter turns swap the canvas dimensions so
    /// nothing is clipped.
    pub fn upright_image(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::Deg0 => image.clone(),
            Self::Deg90 => image.rotate90(),
            Self::Deg180 => image.rotate180(),
            Self::Deg270 => image.rotate270(),
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = crate::error::TableError;

    fn try_from(angle: i64) -> TableResult<Self> {
        Self::from_degrees(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use image::{Rgba, RgbaImage};

    const EPSILON: f64 = 1e-9;

    fn assert_rect_close(actual: Rect, expected: Rect) {
        for (a, e) in actual.bbox().iter().zip(expected.bbox()) {
            assert!((a - e).abs() < EPSILON, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn only_quarter_turns_are_accepted() {
        for angle in [0, 90, 180, 270] {
            assert_eq!(Rotation::from_degrees(angle).unwrap().degrees(), angle);
        }
        for angle in [-90, 45, 360, 1] {
            assert!(matches!(
                Rotation::from_degrees(angle),
                Err(TableError::InvalidAngle { .. })
            ));
        }
    }

    #[test]
    fn quarter_turn_matches_reference_formula() {
        let (width, height) = (200.0, 100.0);
        let bbox = Rect::new(10.0, 20.0, 30.0, 25.0);

        assert_eq!(
            Rotation::Deg90.upright_box(bbox, width, height),
            Rect::new(75.0, 10.0, 80.0, 30.0)
        );
        assert_eq!(
            Rotation::Deg180.upright_box(bbox, width, height),
            Rect::new(170.0, 75.0, 190.0, 80.0)
        );
        assert_eq!(
            Rotation::Deg270.upright_box(bbox, width, height),
            Rect::new(20.0, 170.0, 25.0, 190.0)
        );
    }

    #[test]
    fn transform_then_inverse_is_identity() {
        let (width, height) = (173.5, 61.25);
        let boxes = [
            Rect::new(0.0, 0.0, 173.5, 61.25),
            Rect::new(12.5, 3.0, 40.0, 11.75),
            Rect::new(100.0, 50.0, 100.0, 60.0),
            Rect::new(170.0, 0.5, 173.0, 61.0),
        ];

        for rotation in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
            let (upright_width, upright_height) = rotation.upright_size(width, height);
            for bbox in boxes {
                let turned = rotation.upright_box(bbox, width, height);
                let back = rotation
                    .inverse()
                    .upright_box(turned, upright_width, upright_height);
                assert_rect_close(back, bbox);
            }
        }
    }

    #[test]
    fn transformed_boxes_stay_inside_upright_frame() {
        let (width, height) = (80.0, 30.0);
        let bbox = Rect::new(5.0, 5.0, 20.0, 12.0);
        for rotation in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
            let (w, h) = rotation.upright_size(width, height);
            let frame = Rect::new(0.0, 0.0, w, h);
            assert!(frame.contains(&rotation.upright_box(bbox, width, height)));
        }
    }

    #[test]
    fn image_rotation_agrees_with_box_transform() {
        // One red pixel at (x=1, y=0) in a 4x2 image.
        let mut pixels = RgbaImage::from_pixel(4, 2, Rgba([255, 255, 255, 255]));
        pixels.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let image = DynamicImage::ImageRgba8(pixels);
        let marker = Rect::new(1.0, 0.0, 2.0, 1.0);

        for rotation in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
            let upright = rotation.upright_image(&image).to_rgba8();
            let (w, h) = rotation.upright_size(4.0, 2.0);
            assert_eq!((upright.width() as f64, upright.height() as f64), (w, h));

            let moved = rotation.upright_box(marker, 4.0, 2.0);
            let pixel = upright.get_pixel(moved.xmin as u32, moved.ymin as u32);
            assert_eq!(*pixel, Rgba([255, 0, 0, 255]), "{rotation:?}");
        }
    }
}
