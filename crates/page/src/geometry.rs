use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page units (1/72 inch) with a top-left origin.
///
/// Serialized as the plain `[xmin, ymin, xmax, ymax]` array used by persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Rect {
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub const fn from_bbox(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }

    pub const fn bbox(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Zero width or zero height. Legal, but detectors never produce one.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Overlap test that counts shared edges and corners as intersecting.
    ///
    /// Word inclusion at table borders depends on this being boundary-inclusive.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    /// True if `other` lies entirely inside `self`, edges included.
    pub fn contains(&self, other: &Rect) -> bool {
        self.xmin <= other.xmin
            && self.ymin <= other.ymin
            && self.xmax >= other.xmax
            && self.ymax >= other.ymax
    }

    /// Grows each side outward by the given amount. Negative values shrink.
    pub fn expand(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect::new(
            self.xmin - left,
            self.ymin - top,
            self.xmax + right,
            self.ymax + bottom,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.xmin + dx, self.ymin + dy, self.xmax + dx, self.ymax + dy)
    }

    pub fn scale(&self, factor: f64) -> Rect {
        Rect::new(
            self.xmin * factor,
            self.ymin * factor,
            self.xmax * factor,
            self.ymax * factor,
        )
    }
}

impl From<[f64; 4]> for Rect {
    fn from(bbox: [f64; 4]) -> Self {
        Self::from_bbox(bbox)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(rect: Rect) -> Self {
        rect.bbox()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_intersect() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 20.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 15.0, 15.0);

        assert!(left.intersects(&right));
        assert!(left.intersects(&corner));
    }

    #[test]
    fn separated_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.5, 0.0, 20.0, 10.0);
        let c = Rect::new(0.0, 10.01, 10.0, 20.0);

        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersection_is_symmetric() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 15.0, 15.0),
            Rect::new(10.0, 0.0, 20.0, 10.0),
            Rect::new(30.0, 30.0, 30.0, 40.0),
            Rect::new(-5.0, -5.0, 0.0, 0.0),
            Rect::new(2.0, 2.0, 3.0, 3.0),
        ];

        for a in &rects {
            for b in &rects {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn degenerate_rect_is_legal() {
        let line = Rect::new(5.0, 0.0, 5.0, 10.0);
        assert!(line.is_degenerate());
        assert_eq!(line.width(), 0.0);
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).intersects(&line));
    }

    #[test]
    fn contains_includes_edges() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new(10.0, 10.0, 100.0, 50.0)));
        assert!(!outer.contains(&Rect::new(-1.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn expand_applies_each_side() {
        let rect = Rect::new(40.0, 40.0, 60.0, 50.0).expand(30.0, 20.0, 10.0, 0.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 70.0, 50.0));
    }

    #[test]
    fn serializes_as_bbox_array() {
        let rect = Rect::new(1.5, 2.0, 3.0, 4.25);
        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, "[1.5,2.0,3.0,4.25]");
        assert_eq!(serde_json::from_str::<Rect>(&json).unwrap(), rect);
    }
}
