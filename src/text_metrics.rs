use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use ttf_parser::Face;

static FONT_CACHE: Lazy<Mutex<FontCache>> = Lazy::new(|| Mutex::new(FontCache::new()));

/// Vertical font metrics in y-down pixels. `ascent` is negative (above the
/// baseline), `descent` positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl FontMetrics {
    pub fn baseline(&self) -> f32 {
        self.leading - self.ascent
    }

    pub fn line_height(&self) -> f32 {
        self.descent + self.baseline()
    }
}

pub trait TextMeasure {
    fn advance_width(&self, text: &str, font_size: f32) -> f32;
    fn font_metrics(&self, font_size: f32) -> FontMetrics;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).advance_width(text, font_size)
    }

    fn font_metrics(&self, font_size: f32) -> FontMetrics {
        (**self).font_metrics(font_size)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).advance_width(text, font_size)
    }

    fn font_metrics(&self, font_size: f32) -> FontMetrics {
        (**self).font_metrics(font_size)
    }
}

#[derive(Debug, Clone)]
pub struct FontMeasurer {
    family: String,
}

impl FontMeasurer {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn is_resolved(&self) -> bool {
        with_face(&self.family, |_| ()).is_some()
    }
}

impl TextMeasure for FontMeasurer {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() || font_size <= 0.0 {
            return 0.0;
        }
        with_face(&self.family, |face| face.measure_width(text, font_size))
            .unwrap_or_else(|| CalibratedMeasurer.advance_width(text, font_size))
    }

    fn font_metrics(&self, font_size: f32) -> FontMetrics {
        with_face(&self.family, |face| face.metrics(font_size))
            .unwrap_or_else(|| CalibratedMeasurer.font_metrics(font_size))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalibratedMeasurer;

impl TextMeasure for CalibratedMeasurer {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(char_width_factor)
            .sum::<f32>()
            * font_size
    }

    fn font_metrics(&self, font_size: f32) -> FontMetrics {
        FontMetrics {
            ascent: -0.928 * font_size,
            descent: 0.244 * font_size,
            leading: 0.0,
        }
    }
}

/// Every code point advances by `advance` em. Deterministic, so geometry built
/// on it can be checked exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl MonospaceMeasurer {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            ascent: -0.75,
            descent: 0.25,
            leading: 0.0,
        }
    }
}

impl TextMeasure for MonospaceMeasurer {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().filter(|ch| *ch != '\n').count() as f32 * self.advance * font_size
    }

    fn font_metrics(&self, font_size: f32) -> FontMetrics {
        FontMetrics {
            ascent: self.ascent * font_size,
            descent: self.descent * font_size,
            leading: self.leading * font_size,
        }
    }
}

fn with_face<R>(family: &str, f: impl FnOnce(&mut FontFace) -> R) -> Option<R> {
    let mut guard = lock_recovering(&*FONT_CACHE);
    guard.face(family).map(f)
}

// Cached faces are never left half-built, so a poisoned lock is still usable.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("font cache lock poisoned, recovering");
        poisoned.into_inner()
    })
}

struct FontCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl FontCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn face(&mut self, font_family: &str) -> Option<&mut FontFace> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            if face.is_none() {
                tracing::debug!(family = %key, "no font face resolved");
            }
            self.faces.insert(key.clone(), face);
        }
        self.faces.get_mut(&key).and_then(Option::as_mut)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut families: Vec<Family<'_>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            let family = match raw.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(raw),
            };
            families.push(family);
        }
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
            tracing::debug!(faces = self.db.len(), "loaded system fonts");
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
            .flatten()
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        let units_per_em = face.units_per_em().max(1);
        let ascender = face.ascender();
        let descender = face.descender();
        let line_gap = face.line_gap();
        Some(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            line_gap,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn scale(&self, font_size: f32) -> f32 {
        font_size / self.units_per_em as f32
    }

    fn metrics(&self, font_size: f32) -> FontMetrics {
        let scale = self.scale(font_size);
        FontMetrics {
            ascent: -(self.ascender as f32) * scale,
            descent: (-(self.descender as f32) * scale).max(0.0),
            leading: (self.line_gap as f32 * scale).max(0.0),
        }
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> f32 {
        let scale = self.scale(font_size);
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.as_bytes() {
                if *byte == b'\n' {
                    continue;
                }
                match self.ascii_advances[*byte as usize] {
                    0 => width += fallback,
                    advance => width += advance as f32 * scale,
                }
            }
            return width;
        }

        let mut face: Option<Face<'_>> = None;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = match self.advance_cache.get(&ch) {
                Some(cached) => *cached,
                None => {
                    if face.is_none() {
                        face = Face::parse(&self.data, self.index).ok();
                    }
                    let value = face.as_ref().and_then(|parsed| {
                        parsed
                            .glyph_index(ch)
                            .and_then(|id| parsed.glyph_hor_advance(id))
                    });
                    self.advance_cache.insert(ch, value);
                    value
                }
            };
            match advance {
                Some(advance) => width += advance as f32 * scale,
                None => width += fallback,
            }
        }
        width
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        '\u{2026}' => 0.964,
        'A' => 0.652,
        'B' => 0.648,
        'C' => 0.734,
        'D' => 0.723,
        'E' => 0.594,
        'F' => 0.575,
        'G' | 'H' => 0.742,
        'I' => 0.272,
        'J' => 0.557,
        'K' => 0.648,
        'L' => 0.559,
        'M' => 0.903,
        'N' => 0.763,
        'O' => 0.754,
        'P' => 0.623,
        'Q' => 0.755,
        'R' => 0.637,
        'S' => 0.633,
        'T' => 0.599,
        'U' => 0.746,
        'V' => 0.661,
        'W' => 0.958,
        'X' => 0.655,
        'Y' => 0.646,
        'Z' => 0.621,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'q' => 0.585,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'u' => 0.585,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        '0' => 0.613,
        '1' => 0.396,
        '2'..='9' => 0.605,
        '@' | '#' | '%' | '&' => 0.946,
        _ => 0.568,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_never_exceeds_line_height() {
        for metrics in [
            CalibratedMeasurer.font_metrics(64.0),
            MonospaceMeasurer::new(0.5).font_metrics(64.0),
        ] {
            assert!(metrics.baseline() <= metrics.line_height());
        }
    }

    #[test]
    fn monospace_metrics_are_exact() {
        let metrics = MonospaceMeasurer::new(0.9375).font_metrics(64.0);
        assert_eq!(metrics.baseline(), 48.0);
        assert_eq!(metrics.line_height(), 64.0);
    }

    #[test]
    fn monospace_counts_code_points() {
        let measurer = MonospaceMeasurer::new(0.5);
        assert_eq!(measurer.advance_width("héllo", 10.0), 25.0);
        assert_eq!(measurer.advance_width("", 10.0), 0.0);
    }

    #[test]
    fn calibrated_widths_are_proportional() {
        let narrow = CalibratedMeasurer.advance_width("iiii", 16.0);
        let wide = CalibratedMeasurer.advance_width("MMMM", 16.0);
        assert!(narrow < wide);
    }

    #[test]
    fn font_measurer_always_answers() {
        let measurer = FontMeasurer::new("definitely-not-a-font-family-name");
        assert!(measurer.advance_width("alert", 64.0) > 0.0);
        assert_eq!(measurer.advance_width("", 64.0), 0.0);
        let metrics = measurer.font_metrics(64.0);
        assert!(metrics.baseline() <= metrics.line_height());
    }

    #[test]
    fn unknown_family_is_unresolved() {
        let measurer = FontMeasurer::new("definitely-not-a-font-family-name");
        assert!(!measurer.is_resolved());
        assert_eq!(measurer.family(), "definitely-not-a-font-family-name");
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let cache = std::sync::Arc::new(Mutex::new(vec![1u8]));
        let held = cache.clone();
        let _ = std::thread::spawn(move || {
            let _guard = held.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert!(cache.is_poisoned());
        let guard = lock_recovering(&cache);
        assert_eq!(*guard, vec![1u8]);
    }
}
