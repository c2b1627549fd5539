use serde::{Deserialize, Serialize};

/// Page units per inch; a model fed a 72 dpi render reports boxes directly in page units.
const PAGE_UNITS_PER_INCH: f64 = 72.0;

/// One detection reported by a table detection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Pixel coordinates in the image the model was given.
    pub bbox: BoundingBox,
    pub score: f32,
    /// Raw class id from the model. See [`TableClass`] for how it is read.
    pub label: i64,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: f32, label: i64) -> Self {
        Self { bbox, score, label }
    }

    pub fn class(&self) -> TableClass {
        TableClass::from_label(self.label)
    }
}

/// How a detection label is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// Label 0: a table level with the page.
    Table,
    /// Label 1: a table turned 90 degrees counter-clockwise on the page.
    RotatedTable,
    /// Anything else, carried through untouched.
    Other(i64),
}

impl TableClass {
    pub fn from_label(label: i64) -> Self {
        match label {
            0 => Self::Table,
            1 => Self::RotatedTable,
            other => Self::Other(other),
        }
    }

    pub fn label(&self) -> i64 {
        match self {
            Self::Table => 0,
            Self::RotatedTable => 1,
            Self::Other(label) => *label,
        }
    }
}

/// Corner-form box `[xmin, ymin, xmax, ymax]` in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Converts to page units, given the dpi the detected image was rendered at.
    pub fn to_page_coords(&self, dpi: u32) -> [f64; 4] {
        let scale = PAGE_UNITS_PER_INCH / dpi as f64;
        [
            self.xmin * scale,
            self.ymin * scale,
            self.xmax * scale,
            self.ymax * scale,
        ]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax]
    }
}
