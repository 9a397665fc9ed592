use super::lines::Line;
use crate::extraction::WordToken;

/// A line's average size must exceed the page's common size by this factor
/// to count as a title (bold lines are titles regardless of size).
pub const TITLE_RATIO: f32 = 1.3;

/// Factor above the common size that marks a line as emphasized.
pub const EMPHASIS_RATIO: f32 = 1.1;

/// Visual prominence of a reconstructed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Title,
    Emphasis,
    Body,
}

/// The page's dominant font size: the statistical mode over all word sizes.
///
/// When several sizes are equally frequent the smallest of them wins. Sizes
/// are scanned in ascending order and a candidate must beat the current best
/// count strictly, so the result is deterministic for identical input.
pub fn common_font_size(words: &[WordToken]) -> Option<f32> {
    if words.is_empty() {
        return None;
    }

    let mut sizes: Vec<f32> = words.iter().map(|w| w.size).collect();
    sizes.sort_by(f32::total_cmp);

    let mut best_size = sizes[0];
    let mut best_count = 0usize;
    let mut run_size = sizes[0];
    let mut run_count = 0usize;

    for size in sizes {
        if size == run_size {
            run_count += 1;
        } else {
            run_size = size;
            run_count = 1;
        }
        if run_count > best_count {
            best_count = run_count;
            best_size = run_size;
        }
    }

    Some(best_size)
}

/// Classify a line's role relative to the page's common font size.
pub fn classify_line(line: &Line, common_size: f32) -> LineRole {
    let avg = line.avg_size();
    if avg > common_size * TITLE_RATIO || line.any_bold() {
        LineRole::Title
    } else if avg > common_size * EMPHASIS_RATIO {
        LineRole::Emphasis
    } else {
        LineRole::Body
    }
}
