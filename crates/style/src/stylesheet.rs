//! Styles and named style collections.

use crate::parsers::{StyleParseError, parse_characteristic, parse_declarations};
use galley_fot::Characteristic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// An ordered list of characteristic assignments attached to a flow object.
///
/// Later assignments of the same characteristic win. A style deserializes
/// either from a list of `{"name": .., "value": ..}` records or from a
/// declaration string such as `"font-size: 12pt; quadding: center"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StyleRepr", into = "StyleRepr")]
pub struct Style {
    characteristics: Vec<Characteristic>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StyleRepr {
    Declarations(String),
    List(Vec<Characteristic>),
}

impl TryFrom<StyleRepr> for Style {
    type Error = StyleParseError;

    fn try_from(repr: StyleRepr) -> Result<Self, Self::Error> {
        match repr {
            StyleRepr::Declarations(text) => text.parse(),
            StyleRepr::List(characteristics) => Ok(Style { characteristics }),
        }
    }
}

impl From<Style> for StyleRepr {
    fn from(style: Style) -> Self {
        StyleRepr::List(style.characteristics)
    }
}

impl FromStr for Style {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let characteristics = parse_declarations(s)?
            .into_iter()
            .map(|(name, value)| parse_characteristic(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Style { characteristics })
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, characteristic: Characteristic) -> Self {
        self.characteristics.push(characteristic);
        self
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty()
    }

    /// The effective assignment of the named characteristic in this style.
    pub fn get(&self, name: &str) -> Option<&Characteristic> {
        self.characteristics.iter().rev().find(|c| c.name() == name)
    }
}

impl From<Vec<Characteristic>> for Style {
    fn from(characteristics: Vec<Characteristic>) -> Self {
        Style { characteristics }
    }
}

/// Named styles, shared between rules by reference count.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stylesheet {
    #[serde(default)]
    pub styles: HashMap<String, Arc<Style>>,
}

impl Stylesheet {
    /// Loads a stylesheet from a JSON object mapping style names to styles.
    pub fn from_json(json: &str) -> Result<Self, StyleParseError> {
        let styles: HashMap<String, Arc<Style>> = serde_json::from_str(json)?;
        log::debug!("Loaded stylesheet with {} named styles", styles.len());
        Ok(Stylesheet { styles })
    }

    /// Looks up a style by name.
    pub fn get_style(&self, name: &str) -> Option<&Arc<Style>> {
        self.styles.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, style: Style) -> Arc<Style> {
        let style = Arc::new(style);
        self.styles.insert(name.into(), style.clone());
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_types::{LengthSpec, Quadding};

    #[test]
    fn later_assignment_wins() {
        let style = Style::new()
            .with(Characteristic::FontSize(10.0))
            .with(Characteristic::FontSize(14.0));
        assert_eq!(style.get("font-size"), Some(&Characteristic::FontSize(14.0)));
        assert_eq!(style.get("quadding"), None);
    }

    #[test]
    fn parses_declaration_string() {
        let style: Style = "font-size: 12pt; start-indent: 1in".parse().unwrap();
        assert_eq!(
            style.characteristics(),
            &[
                Characteristic::FontSize(12.0),
                Characteristic::StartIndent(LengthSpec::pt(72.0)),
            ]
        );
    }

    #[test]
    fn stylesheet_accepts_both_style_forms() {
        let json = r##"{
            "title": "font-size: 18pt; quadding: center",
            "body": [{"name": "font-size", "value": 10.0}]
        }"##;
        let sheet = Stylesheet::from_json(json).unwrap();
        let title = sheet.get_style("title").unwrap();
        assert_eq!(
            title.get("quadding"),
            Some(&Characteristic::Quadding(Quadding::Center))
        );
        assert_eq!(sheet.get_style("body").unwrap().characteristics().len(), 1);
    }

    #[test]
    fn stylesheet_reports_bad_declarations() {
        let err = Stylesheet::from_json(r#"{"x": "font-size: huge"}"#).unwrap_err();
        assert!(matches!(err, StyleParseError::Json(_)));
    }
}
