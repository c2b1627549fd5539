use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A positioned word: `(x0, y0, x1, y1, text)` in page units.
///
/// Serialized as a five-element array so word dumps stay compact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(f64, f64, f64, f64, String)",
    into = "(f64, f64, f64, f64, String)"
)]
pub struct Word {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub text: String,
}

impl Word {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, text: impl Into<String>) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            text: text.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Same text, box replaced.
    pub fn with_rect(&self, rect: Rect) -> Word {
        Word::new(rect.xmin, rect.ymin, rect.xmax, rect.ymax, self.text.clone())
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Word {
        self.with_rect(self.rect().translate(dx, dy))
    }
}

impl From<(f64, f64, f64, f64, String)> for Word {
    fn from((x0, y0, x1, y1, text): (f64, f64, f64, f64, String)) -> Self {
        Self::new(x0, y0, x1, y1, text)
    }
}

impl From<Word> for (f64, f64, f64, f64, String) {
    fn from(word: Word) -> Self {
        (word.x0, word.y0, word.x1, word.y1, word.text)
    }
}
