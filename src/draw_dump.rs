use crate::geometry::{IntSize, Rect};
use crate::tag::Tag;
use crate::view::TagPass;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct DrawDump {
    pub text: String,
    pub level: u32,
    pub width: i32,
    pub height: i32,
    pub bounds: [i32; 4],
    pub tag_rect: [f32; 4],
    pub background: [i32; 4],
    pub text_rect: [f32; 4],
    pub pivot: [f32; 2],
    pub text_origin: [f32; 2],
    pub max_text_width: f32,
    pub fitted_text: String,
    pub fitted_advance: f32,
    pub truncated: bool,
}

impl DrawDump {
    pub fn from_pass(tag: &Tag, size: IntSize, pass: &TagPass) -> Self {
        let edges = |rect: &Rect| [rect.left, rect.top, rect.right, rect.bottom];
        DrawDump {
            text: tag.text.clone(),
            level: tag.level,
            width: size.width,
            height: size.height,
            bounds: [
                pass.bounds.left,
                pass.bounds.top,
                pass.bounds.right,
                pass.bounds.bottom,
            ],
            tag_rect: edges(&pass.tag_rect),
            background: [
                pass.background.left,
                pass.background.top,
                pass.background.right,
                pass.background.bottom,
            ],
            text_rect: edges(&pass.text_rect),
            pivot: [pass.pivot.x, pass.pivot.y],
            text_origin: [pass.text_origin.x, pass.text_origin.y],
            max_text_width: pass.max_text_width,
            fitted_text: pass.text.text.clone(),
            fitted_advance: pass.text.advance,
            truncated: pass.text.truncated,
        }
    }
}

pub fn write_draw_dump(path: &Path, tag: &Tag, size: IntSize, pass: &TagPass) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = DrawDump::from_pass(tag, size, pass);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
