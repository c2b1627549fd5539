use tabcrop_page::Word;

/// Vertical jump, in page units, between consecutive word bottoms that starts a new line.
pub const DEFAULT_Y_GAP: f64 = 3.0;

/// Joins words into text, breaking lines on vertical jumps.
///
/// Words must already be in reading order. A word whose bottom edge differs from the
/// previous word's bottom by at least `y_gap` starts a new line; otherwise it is joined
/// with a single space. Column breaks are not detected.
pub fn position_words<'a, I>(words: I, y_gap: f64) -> String
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut words = words.into_iter();
    let Some(first) = words.next() else {
        return String::new();
    };

    let mut lines = first.text.clone();
    let mut prev_bottom = first.y1;
    for word in words {
        if (word.y1 - prev_bottom).abs() >= y_gap {
            lines.push('\n');
        } else {
            lines.push(' ');
        }
        lines.push_str(&word.text);
        prev_bottom = word.y1;
    }

    lines
}
