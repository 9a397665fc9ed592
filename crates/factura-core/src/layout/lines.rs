use crate::extraction::WordToken;

/// Maximum vertical distance (PDF points) between a word and the line anchor.
pub const LINE_TOLERANCE: f32 = 5.0;

/// An ordered run of words judged to lie on the same visual row.
#[derive(Debug, Clone)]
pub struct Line {
    pub words: Vec<WordToken>,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Average font size of the line's words.
    pub fn avg_size(&self) -> f32 {
        let sum: f32 = self.words.iter().map(|w| w.size).sum();
        sum / self.words.len() as f32
    }

    pub fn any_bold(&self) -> bool {
        self.words.iter().any(|w| w.bold)
    }
}

/// Group a page's words into visual lines.
///
/// Words are sorted by `(top, x0)`, top-to-bottom then left-to-right, and
/// clustered in a single greedy pass. A word joins the current line while its
/// `top` stays within [`LINE_TOLERANCE`] of the line's *anchor* (the `top` of
/// the first word assigned to that line). The anchor is never recomputed as a
/// running mean, so adjacent-pair chaining beyond the tolerance starts a new
/// line instead of stretching the current one.
pub fn cluster_lines(words: &[WordToken]) -> Vec<Line> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut sorted = words.to_vec();
    sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));

    let mut lines = Vec::new();
    let mut current: Vec<WordToken> = Vec::new();
    let mut anchor_top = sorted[0].top;

    for word in sorted {
        if (word.top - anchor_top).abs() > LINE_TOLERANCE {
            lines.push(Line {
                words: std::mem::take(&mut current),
            });
            anchor_top = word.top;
        }
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(Line { words: current });
    }

    lines
}
