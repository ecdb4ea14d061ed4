use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static FALLBACK_APPEARANCE: Lazy<Appearance> = Lazy::new(|| Appearance {
    name: "plain".to_string(),
    fill: "#FFFFFF".to_string(),
    stroke: "#000000".to_string(),
    stroke_width: 4.0,
    corner_radius: 0.0,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub name: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

impl Appearance {
    fn new(name: &str, fill: &str, stroke: &str) -> Self {
        Self {
            name: name.to_string(),
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            stroke_width: 8.0,
            corner_radius: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub levels: Vec<Appearance>,
}

impl Theme {
    pub fn leveled() -> Self {
        Self {
            levels: vec![
                Appearance::new("info", "#E3F2FD", "#64B5F6"),
                Appearance::new("notice", "#E8F5E9", "#66BB6A"),
                Appearance::new("warning", "#FFF8E1", "#FFB300"),
                Appearance::new("alert", "#FFEBEE", "#E53935"),
            ],
        }
    }

    pub fn outline() -> Self {
        let levels = ["#9E9E9E", "#616161", "#424242", "#212121"]
            .iter()
            .enumerate()
            .map(|(idx, stroke)| Appearance {
                name: format!("level{idx}"),
                fill: "none".to_string(),
                stroke: (*stroke).to_string(),
                stroke_width: 4.0 + 2.0 * idx as f32,
                corner_radius: 0.0,
            })
            .collect();
        Self { levels }
    }

    pub fn appearance_for_level(&self, level: u32) -> &Appearance {
        let Some(last) = self.levels.len().checked_sub(1) else {
            tracing::warn!(level, "appearance table is empty");
            return &FALLBACK_APPEARANCE;
        };
        let idx = level as usize;
        if idx > last {
            tracing::warn!(level, clamped = last, "tag level out of range");
        }
        &self.levels[idx.min(last)]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::leveled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_index_in_order() {
        let theme = Theme::leveled();
        assert_eq!(theme.appearance_for_level(0).name, "info");
        assert_eq!(theme.appearance_for_level(3).name, "alert");
    }

    #[test]
    fn out_of_range_level_clamps() {
        let theme = Theme::leveled();
        assert_eq!(theme.appearance_for_level(42).name, "alert");
    }

    #[test]
    fn empty_table_falls_back() {
        let theme = Theme { levels: Vec::new() };
        assert_eq!(theme.appearance_for_level(1).name, "plain");
    }
}
