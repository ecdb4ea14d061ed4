use serde::Serialize;

use crate::canvas::{Canvas, PaintStyle, Shadow, StyleOverride, TextStyle};
use crate::config::TagConfig;
use crate::error::{Result, TagError};
use crate::fit::{FittedText, fit_text};
use crate::geometry::{Insets, IntRect, IntSize, Point, Rect};
use crate::layout::BoundsCache;
use crate::measure::{MeasureSpec, desired_size};
use crate::tag::{Tag, TagState};
use crate::text_metrics::{FontMetrics, TextMeasure};
use crate::theme::Theme;

/// The tag text is always drawn upside down.
pub const ROTATION_DEGREES: f32 = 180.0;

/// Geometry of one draw pass. Recomputed on every draw, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagPass {
    pub bounds: IntRect,
    pub tag_rect: Rect,
    pub background: IntRect,
    pub text_rect: Rect,
    pub pivot: Point,
    pub max_text_width: f32,
    pub text: FittedText,
    pub text_origin: Point,
    pub level: u32,
}

/// A single leveled tag label driven by a host through measure, layout and draw.
#[derive(Debug, Clone)]
pub struct TagView<M> {
    config: TagConfig,
    theme: Theme,
    measurer: M,
    padding: Insets,
    metrics: FontMetrics,
    base_style: TextStyle,
    state: TagState,
    bounds: BoundsCache,
    needs_layout: bool,
    needs_redraw: bool,
}

impl<M: TextMeasure> TagView<M> {
    pub fn new(config: TagConfig, theme: Theme, measurer: M) -> Self {
        let metrics = measurer.font_metrics(config.text_size);
        let base_style = TextStyle::base(&config);
        Self {
            config,
            theme,
            measurer,
            padding: Insets::default(),
            metrics,
            base_style,
            state: TagState::Unset,
            bounds: BoundsCache::default(),
            needs_layout: true,
            needs_redraw: true,
        }
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn text_height(&self) -> f32 {
        self.metrics.line_height()
    }

    pub fn text_baseline(&self) -> f32 {
        self.metrics.baseline()
    }

    /// Outer bounds from the most recent layout.
    pub fn bounds(&self) -> IntRect {
        self.bounds.bounds()
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_padding(&mut self, padding: Insets) {
        if self.padding == padding {
            return;
        }
        self.padding = padding;
        self.bounds.invalidate();
        self.needs_layout = true;
        self.needs_redraw = true;
    }

    /// Replaces the current tag. Geometry is recomputed on the next host pass.
    pub fn set_tag(&mut self, text: impl Into<String>, level: u32) {
        let tag = Tag::new(text, level);
        tracing::debug!(text = %tag.text, level = tag.level, "tag set");
        self.state = TagState::Set(tag);
        self.needs_redraw = true;
        self.needs_layout = true;
    }

    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Result<IntSize> {
        let TagState::Set(tag) = &self.state else {
            return Err(TagError::InvalidState);
        };
        let desired = desired_size(
            tag,
            self.padding,
            &self.config,
            &self.measurer,
            self.text_height(),
        );
        Ok(IntSize::new(
            width.resolve(desired.width),
            height.resolve(desired.height),
        ))
    }

    /// Lays the view out at `assigned`. Returns whether the bounds changed.
    pub fn layout(&mut self, assigned: IntRect) -> bool {
        self.needs_layout = false;
        let changed = self.bounds.update(assigned, self.padding);
        if changed {
            tracing::debug!(?assigned, bounds = ?self.bounds.bounds(), "bounds recomputed");
        }
        changed
    }

    /// Computes the draw pass against the current bounds without drawing.
    pub fn plan(&self) -> TagPass {
        let config = &self.config;
        let bounds = self.bounds.bounds();
        let outer = bounds.to_rect();

        let top_left = outer.top_left().offset(config.margin, config.margin);
        let body_height = (2.0 * config.pad_v + self.text_height())
            .min(outer.height() - 2.0 * config.margin)
            .max(0.0);

        let max_text_width = outer.width() - 2.0 * config.margin - 2.0 * config.pad_h;
        let text = fit_text(
            self.state.text(),
            &self.measurer,
            config.text_size,
            max_text_width,
        );
        let body_width = 2.0 * config.pad_h + text.advance;

        let tag_rect = Rect::from_origin_size(top_left, body_width, body_height);
        let text_rect = tag_rect.inset(config.pad_h, config.pad_v);
        let text_origin = Point::new(
            top_left.x.trunc() + config.pad_h,
            top_left.y.trunc() + config.pad_v + self.text_baseline(),
        );

        TagPass {
            bounds,
            tag_rect,
            background: tag_rect.round(),
            text_rect,
            pivot: text_rect.center(),
            max_text_width,
            text,
            text_origin,
            level: self.state.level(),
        }
    }

    /// Draws the tag: background, then clipped, rotated, shadowed text.
    /// Clip and rotation are restored before returning.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> TagPass {
        let pass = self.plan();
        tracing::trace!(
            tag_rect = ?pass.tag_rect,
            text = %pass.text.text,
            truncated = pass.text.truncated,
            "drawing tag"
        );

        let appearance = self.theme.appearance_for_level(pass.level);
        canvas.draw_appearance(appearance, pass.background, pass.level);

        canvas.save();
        canvas.clip_rect(pass.text_rect);
        canvas.rotate(ROTATION_DEGREES, pass.pivot);
        let style = self.base_style.with_override(&StyleOverride {
            paint: Some(PaintStyle::Fill),
            shadow: Some(Shadow::from(&self.config.shadow)),
        });
        canvas.draw_text(&pass.text.text, pass.text_origin, &style);
        canvas.restore();

        self.needs_redraw = false;
        pass
    }
}
