//! Symbolic characteristic values.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    UltraLight,
    ExtraLight,
    Light,
    SemiLight,
    #[default]
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    UltraBold,
}

impl FontWeight {
    /// The 100-900 weight scale used by font matchers.
    pub fn numeric_value(&self) -> u16 {
        match self {
            FontWeight::UltraLight => 100,
            FontWeight::ExtraLight => 200,
            FontWeight::Light => 300,
            FontWeight::SemiLight => 350,
            FontWeight::Medium => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
            FontWeight::UltraBold => 900,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontPosture {
    #[default]
    Upright,
    Oblique,
    BackSlantedOblique,
    Italic,
    BackSlantedItalic,
}

/// Alignment of lines within a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadding {
    #[default]
    Start,
    End,
    Center,
    Justify,
    SpreadInside,
    SpreadOutside,
    PageInside,
    PageOutside,
}

/// Alignment of display areas within their container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayAlignment {
    #[default]
    Start,
    End,
    Center,
    Inside,
    Outside,
}

/// Line-breaking treatment of record ends and whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lines {
    #[default]
    Wrap,
    Asis,
    AsisWrap,
    AsisTruncate,
    None,
}
