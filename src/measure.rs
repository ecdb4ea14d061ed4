use crate::config::TagConfig;
use crate::geometry::{Insets, IntSize};
use crate::tag::Tag;
use crate::text_metrics::TextMeasure;

/// Sizing constraint handed down by the host for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    Exactly(i32),
    AtMost(i32),
    Unspecified,
}

impl MeasureSpec {
    pub fn resolve(self, desired: i32) -> i32 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(limit) => desired.min(limit),
            MeasureSpec::Unspecified => desired,
        }
    }
}

/// Intrinsic size of the view for `tag`, before host constraints.
pub fn desired_size<M: TextMeasure + ?Sized>(
    tag: &Tag,
    padding: Insets,
    config: &TagConfig,
    measurer: &M,
    text_height: f32,
) -> IntSize {
    let advance = measurer.advance_width(&tag.text, config.text_size);
    let width = padding.horizontal() as f32 + 2.0 * (config.margin + config.pad_h) + advance;
    let height = padding.vertical() as f32 + 2.0 * (config.margin + config.pad_v) + text_height;
    IntSize::new(width as i32, height as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::MonospaceMeasurer;

    #[test]
    fn desired_size_adds_margins_and_padding() {
        let measurer = MonospaceMeasurer::new(0.9375);
        let size = desired_size(
            &Tag::new("alert", 2),
            Insets::new(1, 2, 3, 4),
            &TagConfig::default(),
            &measurer,
            64.0,
        );
        assert_eq!(size, IntSize::new(4 + 600 + 300, 6 + 460 + 64));
    }

    #[test]
    fn fractional_sizes_truncate() {
        let measurer = MonospaceMeasurer::new(0.01);
        let size = desired_size(
            &Tag::new("ab", 0),
            Insets::default(),
            &TagConfig::default(),
            &measurer,
            10.7,
        );
        assert_eq!(size, IntSize::new(601, 470));
    }

    #[test]
    fn specs_resolve_per_axis() {
        assert_eq!(MeasureSpec::Exactly(50).resolve(900), 50);
        assert_eq!(MeasureSpec::Exactly(950).resolve(900), 950);
        assert_eq!(MeasureSpec::AtMost(500).resolve(900), 500);
        assert_eq!(MeasureSpec::AtMost(1000).resolve(900), 900);
        assert_eq!(MeasureSpec::Unspecified.resolve(900), 900);
    }
}
