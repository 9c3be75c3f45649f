//! nom parsers for the textual declaration form of a style.
//!
//! A declaration list reads like `font-size: 12pt; quadding: center;
//! start-indent: 1in`. Names are DSSSL characteristic names; values are
//! lengths with an optional unit, `#RRGGBB` colors, `#t`/`#f` booleans or
//! symbolic keywords.

use galley_fot::Characteristic;
use galley_types::{Color, LengthSpec};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till, take_while_m_n, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, separated_pair, terminated};
use nom::{IResult, Parser};
use serde::de::{DeserializeOwned, IntoDeserializer, value::StrDeserializer};
use thiserror::Error;

/// Errors that can occur while reading a style.
#[derive(Error, Debug)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown characteristic '{0}'")]
    UnknownCharacteristic(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Invalid stylesheet JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 10, |c: char| c.is_ascii_digit()).parse(input)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(digits, opt(pair(char('.'), digits)))),
                recognize(pair(char('.'), digits)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("pt"), |_| 1.0),
        map(tag_no_case("pc"), |_| 12.0),
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("in"), |_| 72.0),
        map(tag_no_case("cm"), |_| 72.0 / 2.54),
        map(tag_no_case("mm"), |_| 72.0 / 25.4),
    ))
    .parse(input)
}

/// Parses a length in points, e.g. `12pt`, `1in`, `10mm`; a bare number is points.
pub fn parse_points(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, factor) = opt(parse_unit).parse(input)?;
    Ok((input, value * factor.unwrap_or(1.0)))
}

/// Parses a length that may carry a display-size term: `2pt`, `2pt + 0.5ds`.
pub fn parse_length_spec(input: &str) -> IResult<&str, LengthSpec> {
    let (input, length) = parse_points(input)?;
    let (input, factor) = opt(map(
        pair(
            ws(char('+')),
            terminated(parse_f32, tag_no_case("ds")),
        ),
        |(_, f)| f,
    ))
    .parse(input)?;
    Ok((
        input,
        LengthSpec {
            length,
            display_size_factor: factor.unwrap_or(0.0),
        },
    ))
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '?').parse(input)
}

fn parse_declaration(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        ws(parse_name),
        char(':'),
        map(take_till(|c: char| c == ';'), str::trim),
    )
    .parse(input)
}

/// Splits a declaration list into `(name, value)` pairs.
pub fn parse_declarations(input: &str) -> Result<Vec<(&str, &str)>, StyleParseError> {
    let mut parser = all_consuming(terminated(
        separated_list0(char(';'), parse_declaration),
        pair(opt(char(';')), multispace0),
    ));
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    parser
        .parse(trimmed)
        .map(|(_, decls)| decls)
        .map_err(|e| StyleParseError::Parse(format!("'{}': {}", input, e)))
}

fn invalid(property: &str, value: &str) -> StyleParseError {
    StyleParseError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

fn complete<'a, T>(
    property: &str,
    value: &'a str,
    parser: impl Fn(&'a str) -> IResult<&'a str, T>,
) -> Result<T, StyleParseError> {
    match all_consuming(ws(parser)).parse(value) {
        Ok((_, v)) => Ok(v),
        Err(_) => Err(invalid(property, value)),
    }
}

fn keyword<T: DeserializeOwned>(property: &str, value: &str) -> Result<T, StyleParseError> {
    let de: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
    T::deserialize(de).map_err(|_| invalid(property, value))
}

fn boolean(property: &str, value: &str) -> Result<bool, StyleParseError> {
    match value {
        "#t" | "true" => Ok(true),
        "#f" | "false" => Ok(false),
        _ => Err(invalid(property, value)),
    }
}

fn optional_string(value: &str) -> Option<String> {
    match value {
        "#f" | "none" => None,
        v => Some(v.trim_matches('"').to_string()),
    }
}

/// Converts one declaration into a typed characteristic.
pub fn parse_characteristic(name: &str, value: &str) -> Result<Characteristic, StyleParseError> {
    let points = |v| complete(name, v, parse_points);
    let length = |v| complete(name, v, parse_length_spec);
    let color = |v: &str| Color::parse_hex(v).map_err(|_| invalid(name, v));
    let c = match name {
        "font-size" => Characteristic::FontSize(points(value)?),
        "font-family-name" => Characteristic::FontFamilyName(value.trim_matches('"').to_string()),
        "font-weight" => Characteristic::FontWeight(keyword(name, value)?),
        "font-posture" => Characteristic::FontPosture(keyword(name, value)?),
        "color" => Characteristic::Color(color(value)?),
        "background-color" => Characteristic::BackgroundColor(match value {
            "#f" | "none" => None,
            v => Some(color(v)?),
        }),
        "start-indent" => Characteristic::StartIndent(length(value)?),
        "end-indent" => Characteristic::EndIndent(length(value)?),
        "first-line-start-indent" => Characteristic::FirstLineStartIndent(length(value)?),
        "line-spacing" => Characteristic::LineSpacing(length(value)?),
        "quadding" => Characteristic::Quadding(keyword(name, value)?),
        "display-alignment" => Characteristic::DisplayAlignment(keyword(name, value)?),
        "lines" => Characteristic::Lines(keyword(name, value)?),
        "hyphenate?" | "hyphenate" => Characteristic::Hyphenate(boolean(name, value)?),
        "language" => Characteristic::Language(optional_string(value)),
        "country" => Characteristic::Country(optional_string(value)),
        "position-point-shift" => Characteristic::PositionPointShift(length(value)?),
        "line-thickness" => Characteristic::LineThickness(points(value)?),
        "page-width" => Characteristic::PageWidth(points(value)?),
        "page-height" => Characteristic::PageHeight(points(value)?),
        "left-margin" => Characteristic::LeftMargin(points(value)?),
        "right-margin" => Characteristic::RightMargin(points(value)?),
        "top-margin" => Characteristic::TopMargin(points(value)?),
        "bottom-margin" => Characteristic::BottomMargin(points(value)?),
        "header-margin" => Characteristic::HeaderMargin(points(value)?),
        "footer-margin" => Characteristic::FooterMargin(points(value)?),
        other => return Err(StyleParseError::UnknownCharacteristic(other.to_string())),
    };
    Ok(c)
}
