use serde::Serialize;

use crate::config::{ShadowConfig, TagConfig};
use crate::geometry::{IntRect, Point, Rect};
use crate::theme::Appearance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaintStyle {
    Stroke,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shadow {
    pub blur: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: String,
}

impl From<&ShadowConfig> for Shadow {
    fn from(config: &ShadowConfig) -> Self {
        Self {
            blur: config.blur,
            dx: config.dx,
            dy: config.dy,
            color: config.color.clone(),
        }
    }
}

impl Shadow {
    /// Gaussian sigma equivalent to a blur radius.
    pub fn sigma(&self) -> f32 {
        if self.blur > 0.0 {
            self.blur * 0.57735 + 0.5
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub color: String,
    pub anti_alias: bool,
    pub paint: PaintStyle,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    /// Resting style of a view: outlined, no shadow.
    pub fn base(config: &TagConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_size: config.text_size,
            color: config.text_color.clone(),
            anti_alias: config.anti_alias,
            paint: PaintStyle::Stroke,
            shadow: None,
        }
    }

    pub fn with_override(&self, style: &StyleOverride) -> Self {
        let mut merged = self.clone();
        if let Some(paint) = style.paint {
            merged.paint = paint;
        }
        if let Some(shadow) = &style.shadow {
            merged.shadow = Some(shadow.clone());
        }
        merged
    }
}

/// Per-draw changes applied on top of an immutable base style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub paint: Option<PaintStyle>,
    pub shadow: Option<Shadow>,
}

/// Drawing surface a tag view renders onto.
///
/// `save`/`restore` bracket clip and transform state; everything set after a
/// `save` is undone by the matching `restore`.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn clip_rect(&mut self, rect: Rect);
    fn rotate(&mut self, degrees: f32, pivot: Point);
    fn draw_appearance(&mut self, appearance: &Appearance, bounds: IntRect, level: u32);
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Save,
    Restore,
    ClipRect(Rect),
    Rotate {
        degrees: f32,
        pivot: Point,
    },
    Appearance {
        name: String,
        bounds: IntRect,
        level: u32,
    },
    Text {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

/// Canvas that keeps every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn save_depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.depth = 0;
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClipRect(rect));
    }

    fn rotate(&mut self, degrees: f32, pivot: Point) {
        self.ops.push(DrawOp::Rotate { degrees, pivot });
    }

    fn draw_appearance(&mut self, appearance: &Appearance, bounds: IntRect, level: u32) {
        self.ops.push(DrawOp::Appearance {
            name: appearance.name.clone(),
            bounds,
            level,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }
}
