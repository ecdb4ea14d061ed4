use serde::Serialize;

use crate::text_metrics::TextMeasure;

pub const ELLIPSIS: &str = "\u{2026}";

/// Text as it will be drawn, with its measured advance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedText {
    pub text: String,
    pub advance: f32,
    pub truncated: bool,
}

/// Fits `text` into `max_width` pixels, truncating at the end with an ellipsis.
///
/// Returns the longest code-point prefix that still fits once the ellipsis is
/// appended. When not even a bare ellipsis fits, the result is empty so the
/// width bound always holds. The advance is measured on the final string.
pub fn fit_text<M: TextMeasure + ?Sized>(
    text: &str,
    measurer: &M,
    font_size: f32,
    max_width: f32,
) -> FittedText {
    let advance = measurer.advance_width(text, font_size);
    if advance <= max_width {
        return FittedText {
            text: text.to_string(),
            advance,
            truncated: false,
        };
    }

    let fits = |prefix: &str| -> Option<String> {
        let candidate = format!("{prefix}{ELLIPSIS}");
        (measurer.advance_width(&candidate, font_size) <= max_width).then_some(candidate)
    };

    // Byte offsets of every proper prefix, shortest first.
    let cuts: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
    let Some(mut best) = fits("") else {
        tracing::trace!(max_width, "ellipsis alone does not fit");
        return FittedText {
            text: String::new(),
            advance: 0.0,
            truncated: true,
        };
    };

    // Advances grow with the prefix, so the fitting cuts form a leading run.
    let (mut lo, mut hi) = (1usize, cuts.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match fits(&text[..cuts[mid]]) {
            Some(candidate) => {
                best = candidate;
                lo = mid + 1;
            }
            None => hi = mid,
        }
    }

    FittedText {
        advance: measurer.advance_width(&best, font_size),
        text: best,
        truncated: true,
    }
}
