use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub text: String,
    pub level: u32,
}

impl Tag {
    pub fn new(text: impl Into<String>, level: u32) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Whether a tag has been assigned yet. There is no way back to `Unset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagState {
    #[default]
    Unset,
    Set(Tag),
}

impl TagState {
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            TagState::Unset => None,
            TagState::Set(tag) => Some(tag),
        }
    }

    /// Text to draw; an unset tag draws as empty text.
    pub fn text(&self) -> &str {
        match self {
            TagState::Unset => "",
            TagState::Set(tag) => tag.text.as_str(),
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            TagState::Unset => 0,
            TagState::Set(tag) => tag.level,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, TagState::Set(_))
    }
}
