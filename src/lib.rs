pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod draw_dump;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod layout;
pub mod measure;
pub mod render;
pub mod tag;
pub mod text_metrics;
pub mod theme;
pub mod view;

pub use canvas::{Canvas, DrawOp, PaintStyle, RecordingCanvas, Shadow, TextStyle};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, TagConfig, load_config};
pub use error::TagError;
pub use fit::{ELLIPSIS, FittedText, fit_text};
pub use geometry::{Insets, IntRect, IntSize, Point, Rect};
pub use measure::MeasureSpec;
pub use render::{RenderedTag, SvgCanvas, render_svg, render_tag};
pub use tag::{Tag, TagState};
pub use text_metrics::{CalibratedMeasurer, FontMeasurer, FontMetrics, MonospaceMeasurer, TextMeasure};
pub use theme::{Appearance, Theme};
pub use view::{TagPass, TagView};
