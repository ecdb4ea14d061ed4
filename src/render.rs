use crate::canvas::{Canvas, PaintStyle, Shadow, TextStyle};
use crate::config::Config;
use crate::geometry::{IntRect, IntSize, Point, Rect};
use crate::measure::MeasureSpec;
use crate::tag::Tag;
use crate::text_metrics::TextMeasure;
use crate::theme::Appearance;
use crate::view::{TagPass, TagView};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: i32,
    height: i32,
    defs: String,
    body: String,
    open_groups: usize,
    saves: Vec<usize>,
    next_id: usize,
}

impl SvgCanvas {
    pub fn new(width: i32, height: i32, background: &str) -> Self {
        let mut body = String::new();
        let _ = write!(
            body,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background)
        );
        Self {
            width: width.max(0),
            height: height.max(0),
            defs: String::new(),
            body,
            open_groups: 0,
            saves: Vec::new(),
            next_id: 0,
        }
    }

    pub fn finish(mut self) -> String {
        self.close_groups(0);
        let (width, height) = (self.width, self.height);
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        );
        if !self.defs.is_empty() {
            let _ = write!(svg, "<defs>{}</defs>", self.defs);
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn open_group(&mut self, attrs: &str) {
        let _ = write!(self.body, "<g {attrs}>");
        self.open_groups += 1;
    }

    fn close_groups(&mut self, keep: usize) {
        while self.open_groups > keep {
            self.body.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    fn shadow_filter(&mut self, shadow: &Shadow) -> String {
        let id = self.next_id("tag-shadow-");
        let _ = write!(
            self.defs,
            "<filter id=\"{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feDropShadow dx=\"{:.2}\" dy=\"{:.2}\" stdDeviation=\"{:.2}\" flood-color=\"{}\" flood-opacity=\"1\"/></filter>",
            shadow.dx,
            shadow.dy,
            shadow.sigma(),
            escape_xml(&shadow.color)
        );
        id
    }
}

impl Canvas for SvgCanvas {
    fn save(&mut self) {
        self.saves.push(self.open_groups);
    }

    fn restore(&mut self) {
        if let Some(keep) = self.saves.pop() {
            self.close_groups(keep);
        }
    }

    fn clip_rect(&mut self, rect: Rect) {
        let id = self.next_id("tag-clip-");
        let _ = write!(
            self.defs,
            "<clipPath id=\"{id}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
            rect.left,
            rect.top,
            rect.width().max(0.0),
            rect.height().max(0.0)
        );
        self.open_group(&format!("clip-path=\"url(#{id})\""));
    }

    fn rotate(&mut self, degrees: f32, pivot: Point) {
        self.open_group(&format!(
            "transform=\"rotate({degrees} {:.2} {:.2})\"",
            pivot.x, pivot.y
        ));
    }

    fn draw_appearance(&mut self, appearance: &Appearance, bounds: IntRect, level: u32) {
        let _ = write!(
            self.body,
            "<rect class=\"tag-{}\" data-level=\"{level}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            escape_xml(&appearance.name),
            bounds.left,
            bounds.top,
            bounds.width().max(0),
            bounds.height().max(0),
            appearance.corner_radius,
            appearance.corner_radius,
            escape_xml(&appearance.fill),
            escape_xml(&appearance.stroke),
            appearance.stroke_width
        );
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        let filter = match &style.shadow {
            Some(shadow) => format!(" filter=\"url(#{})\"", self.shadow_filter(shadow)),
            None => String::new(),
        };
        let color = escape_xml(&style.color);
        let paint = match style.paint {
            PaintStyle::Fill => format!("fill=\"{color}\""),
            PaintStyle::Stroke => format!("fill=\"none\" stroke=\"{color}\""),
        };
        let rendering = if style.anti_alias {
            "geometricPrecision"
        } else {
            "optimizeSpeed"
        };
        let _ = write!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" {paint} text-rendering=\"{rendering}\"{filter}>{}</text>",
            origin.x,
            origin.y,
            escape_xml(&style.font_family),
            style.font_size,
            escape_xml(text)
        );
    }
}

#[derive(Debug, Clone)]
pub struct RenderedTag {
    pub size: IntSize,
    pub pass: TagPass,
    pub svg: String,
}

/// Renders `tag` the way a host would: measure, lay out at the resolved size,
/// then draw onto an SVG canvas of that size.
pub fn render_tag<M: TextMeasure>(tag: &Tag, config: &Config, measurer: M) -> Result<RenderedTag> {
    let mut view = TagView::new(config.tag.clone(), config.theme.clone(), measurer)
        .with_padding(config.render.padding);
    view.set_tag(tag.text.clone(), tag.level);

    let spec = |fixed: Option<i32>| fixed.map_or(MeasureSpec::Unspecified, MeasureSpec::Exactly);
    let size = view.measure(spec(config.render.width), spec(config.render.height))?;
    view.layout(IntRect::from_size(size.width, size.height));

    let svg = render_svg(&mut view, size, &config.render.background);
    let pass = view.plan();
    Ok(RenderedTag { size, pass, svg })
}

pub fn render_svg<M: TextMeasure>(view: &mut TagView<M>, size: IntSize, background: &str) -> String {
    let mut canvas = SvgCanvas::new(size.width, size.height, background);
    view.draw(&mut canvas);
    canvas.finish()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| crate::error::TagError::Render("failed to allocate pixmap".to_string()))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
