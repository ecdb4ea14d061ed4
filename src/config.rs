use crate::error::{Result, TagError};
use crate::geometry::Insets;
use crate::theme::{Appearance, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowConfig {
    pub blur: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: String,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            blur: 6.0,
            dx: 15.0,
            dy: 17.0,
            color: "#00FF00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagConfig {
    pub margin: f32,
    pub pad_h: f32,
    pub pad_v: f32,
    pub text_size: f32,
    pub text_color: String,
    pub font_family: String,
    pub anti_alias: bool,
    pub shadow: ShadowConfig,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            margin: 200.0,
            pad_h: 100.0,
            pad_v: 30.0,
            text_size: 64.0,
            text_color: "#0000FF".to_string(),
            font_family: "Roboto, \"Droid Sans\", sans-serif".to_string(),
            anti_alias: true,
            shadow: ShadowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub padding: Insets,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            padding: Insets::default(),
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tag: TagConfig,
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    margin: Option<f32>,
    pad_h: Option<f32>,
    pad_v: Option<f32>,
    text_size: Option<f32>,
    text_color: Option<String>,
    font_family: Option<String>,
    anti_alias: Option<bool>,
    shadow: Option<ShadowConfigFile>,
    theme: Option<String>,
    levels: Option<Vec<Appearance>>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ShadowConfigFile {
    blur: Option<f32>,
    dx: Option<f32>,
    dy: Option<f32>,
    color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<i32>,
    height: Option<i32>,
    padding: Option<i32>,
    background: Option<String>,
}

/// Loads a config file over the defaults. Plain JSON is tried first, then JSON5.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = parse_config_file(&contents).map_err(|message| TagError::Config {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(apply_config_file(config, parsed))
}

pub fn parse_config(contents: &str) -> std::result::Result<Config, String> {
    parse_config_file(contents).map(|parsed| apply_config_file(Config::default(), parsed))
}

fn parse_config_file(contents: &str) -> std::result::Result<ConfigFile, String> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|json5_err| format!("{json_err}; as JSON5: {json5_err}")),
    }
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(v) = parsed.margin {
        config.tag.margin = v;
    }
    if let Some(v) = parsed.pad_h {
        config.tag.pad_h = v;
    }
    if let Some(v) = parsed.pad_v {
        config.tag.pad_v = v;
    }
    if let Some(v) = parsed.text_size {
        config.tag.text_size = v;
    }
    if let Some(v) = parsed.text_color {
        config.tag.text_color = v;
    }
    if let Some(v) = parsed.font_family {
        config.tag.font_family = v;
    }
    if let Some(v) = parsed.anti_alias {
        config.tag.anti_alias = v;
    }
    if let Some(shadow) = parsed.shadow {
        if let Some(v) = shadow.blur {
            config.tag.shadow.blur = v;
        }
        if let Some(v) = shadow.dx {
            config.tag.shadow.dx = v;
        }
        if let Some(v) = shadow.dy {
            config.tag.shadow.dy = v;
        }
        if let Some(v) = shadow.color {
            config.tag.shadow.color = v;
        }
    }

    match parsed.theme.as_deref() {
        Some("outline") => config.theme = Theme::outline(),
        Some("leveled") | Some("default") => config.theme = Theme::leveled(),
        Some(other) => tracing::warn!(theme = other, "unknown theme, keeping default"),
        None => {}
    }
    if let Some(levels) = parsed.levels {
        config.theme.levels = levels;
    }

    if let Some(render) = parsed.render {
        if render.width.is_some() {
            config.render.width = render.width;
        }
        if render.height.is_some() {
            config.render.height = render.height;
        }
        if let Some(v) = render.padding {
            config.render.padding = Insets::uniform(v);
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constant_table() {
        let config = TagConfig::default();
        assert_eq!(config.margin, 200.0);
        assert_eq!(config.pad_h, 100.0);
        assert_eq!(config.pad_v, 30.0);
        assert_eq!(config.text_size, 64.0);
        assert_eq!(config.text_color, "#0000FF");
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = parse_config(r#"{"margin": 20, "shadow": {"color": "red"}}"#).unwrap();
        assert_eq!(config.tag.margin, 20.0);
        assert_eq!(config.tag.pad_h, 100.0);
        assert_eq!(config.tag.shadow.color, "red");
        assert_eq!(config.tag.shadow.blur, 6.0);
    }

    #[test]
    fn accepts_json5() {
        let config = parse_config("{ padH: 12, theme: 'outline', render: { padding: 8 }, }").unwrap();
        assert_eq!(config.tag.pad_h, 12.0);
        assert_eq!(config.theme, Theme::outline());
        assert_eq!(config.render.padding, Insets::uniform(8));
    }

    #[test]
    fn custom_levels_replace_theme() {
        let config = parse_config(
            r##"{"levels": [{"name": "only", "fill": "#000", "stroke": "#fff", "strokeWidth": 1, "cornerRadius": 0}]}"##,
        )
        .unwrap();
        assert_eq!(config.theme.levels.len(), 1);
        assert_eq!(config.theme.appearance_for_level(5).name, "only");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_config("margin = 3").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/tagview.json"))).unwrap_err();
        assert!(matches!(err, TagError::Io(_)));
    }
}
