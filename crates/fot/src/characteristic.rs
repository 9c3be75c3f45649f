//! Inherited characteristics, as values.
//!
//! Every variant corresponds to exactly one `set_*` operation of
//! [`FotBuilder`]; [`Characteristic::apply`] performs that call. Styles are
//! lists of these, and the recorder stores setter calls as these.

use crate::builder::FotBuilder;
use galley_types::{Color, DisplayAlignment, FontPosture, FontWeight, LengthSpec, Lines, Quadding};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "kebab-case")]
pub enum Characteristic {
    FontSize(f32),
    FontFamilyName(String),
    FontWeight(FontWeight),
    FontPosture(FontPosture),
    Color(Color),
    BackgroundColor(Option<Color>),
    StartIndent(LengthSpec),
    EndIndent(LengthSpec),
    FirstLineStartIndent(LengthSpec),
    LineSpacing(LengthSpec),
    Quadding(Quadding),
    DisplayAlignment(DisplayAlignment),
    Lines(Lines),
    Hyphenate(bool),
    Language(Option<String>),
    Country(Option<String>),
    PositionPointShift(LengthSpec),
    LineThickness(f32),
    PageWidth(f32),
    PageHeight(f32),
    LeftMargin(f32),
    RightMargin(f32),
    TopMargin(f32),
    BottomMargin(f32),
    HeaderMargin(f32),
    FooterMargin(f32),
}

impl Characteristic {
    /// The DSSSL characteristic name.
    pub fn name(&self) -> &'static str {
        match self {
            Characteristic::FontSize(_) => "font-size",
            Characteristic::FontFamilyName(_) => "font-family-name",
            Characteristic::FontWeight(_) => "font-weight",
            Characteristic::FontPosture(_) => "font-posture",
            Characteristic::Color(_) => "color",
            Characteristic::BackgroundColor(_) => "background-color",
            Characteristic::StartIndent(_) => "start-indent",
            Characteristic::EndIndent(_) => "end-indent",
            Characteristic::FirstLineStartIndent(_) => "first-line-start-indent",
            Characteristic::LineSpacing(_) => "line-spacing",
            Characteristic::Quadding(_) => "quadding",
            Characteristic::DisplayAlignment(_) => "display-alignment",
            Characteristic::Lines(_) => "lines",
            Characteristic::Hyphenate(_) => "hyphenate?",
            Characteristic::Language(_) => "language",
            Characteristic::Country(_) => "country",
            Characteristic::PositionPointShift(_) => "position-point-shift",
            Characteristic::LineThickness(_) => "line-thickness",
            Characteristic::PageWidth(_) => "page-width",
            Characteristic::PageHeight(_) => "page-height",
            Characteristic::LeftMargin(_) => "left-margin",
            Characteristic::RightMargin(_) => "right-margin",
            Characteristic::TopMargin(_) => "top-margin",
            Characteristic::BottomMargin(_) => "bottom-margin",
            Characteristic::HeaderMargin(_) => "header-margin",
            Characteristic::FooterMargin(_) => "footer-margin",
        }
    }

    /// Issues the matching setter on `sink`.
    pub fn apply(&self, sink: &mut dyn FotBuilder) {
        match self {
            Characteristic::FontSize(v) => sink.set_font_size(*v),
            Characteristic::FontFamilyName(v) => sink.set_font_family_name(v),
            Characteristic::FontWeight(v) => sink.set_font_weight(*v),
            Characteristic::FontPosture(v) => sink.set_font_posture(*v),
            Characteristic::Color(v) => sink.set_color(*v),
            Characteristic::BackgroundColor(v) => sink.set_background_color(*v),
            Characteristic::StartIndent(v) => sink.set_start_indent(*v),
            Characteristic::EndIndent(v) => sink.set_end_indent(*v),
            Characteristic::FirstLineStartIndent(v) => sink.set_first_line_start_indent(*v),
            Characteristic::LineSpacing(v) => sink.set_line_spacing(*v),
            Characteristic::Quadding(v) => sink.set_quadding(*v),
            Characteristic::DisplayAlignment(v) => sink.set_display_alignment(*v),
            Characteristic::Lines(v) => sink.set_lines(*v),
            Characteristic::Hyphenate(v) => sink.set_hyphenate(*v),
            Characteristic::Language(v) => sink.set_language(v.as_deref()),
            Characteristic::Country(v) => sink.set_country(v.as_deref()),
            Characteristic::PositionPointShift(v) => sink.set_position_point_shift(*v),
            Characteristic::LineThickness(v) => sink.set_line_thickness(*v),
            Characteristic::PageWidth(v) => sink.set_page_width(*v),
            Characteristic::PageHeight(v) => sink.set_page_height(*v),
            Characteristic::LeftMargin(v) => sink.set_left_margin(*v),
            Characteristic::RightMargin(v) => sink.set_right_margin(*v),
            Characteristic::TopMargin(v) => sink.set_top_margin(*v),
            Characteristic::BottomMargin(v) => sink.set_bottom_margin(*v),
            Characteristic::HeaderMargin(v) => sink.set_header_margin(*v),
            Characteristic::FooterMargin(v) => sink.set_footer_margin(*v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_tagged_json() {
        let json = r##"[
            {"name": "font-size", "value": 12.0},
            {"name": "quadding", "value": "center"},
            {"name": "color", "value": "#336699"},
            {"name": "start-indent", "value": {"length": 10.0}}
        ]"##;
        let chars: Vec<Characteristic> = serde_json::from_str(json).unwrap();
        assert_eq!(chars[0], Characteristic::FontSize(12.0));
        assert_eq!(chars[1], Characteristic::Quadding(Quadding::Center));
        assert_eq!(chars[2], Characteristic::Color(Color::rgb(0x33, 0x66, 0x99)));
        assert_eq!(chars[3], Characteristic::StartIndent(LengthSpec::pt(10.0)));
        assert_eq!(chars[1].name(), "quadding");
    }
}
