use serde::{Deserialize, Deserializer, Serialize, de};
use std::hash::{Hash, Hasher};

/// A device RGB color, the only color space the core passes through.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.hash(state);
        self.g.hash(state);
        self.b.hash(state);
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from DSSSL-style unit components in `0.0..=1.0`.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    /// Parses `#RGB` or `#RRGGBB`.
    pub fn parse_hex(s: &str) -> Result<Color, String> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with #, got: {}", s))?;
        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: {}", s));
        }
        let digit = |range: &str| {
            u8::from_str_radix(range, 16).map_err(|e| format!("Invalid color component '{}': {}", range, e))
        };
        match hex.len() {
            3 => {
                let mut parts = [0u8; 3];
                for (slot, c) in parts.iter_mut().zip(hex.chars()) {
                    *slot = digit(&c.to_string().repeat(2))?;
                }
                Ok(Color::rgb(parts[0], parts[1], parts[2]))
            }
            6 => Ok(Color::rgb(
                digit(&hex[0..2])?,
                digit(&hex[2..4])?,
                digit(&hex[4..6])?,
            )),
            n => Err(format!("Invalid hex color length: expected 3 or 6, got {}", n)),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Hex(String),
            Rgb { r: u8, g: u8, b: u8 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Hex(s) => Self::parse_hex(&s).map_err(de::Error::custom),
            ColorDef::Rgb { r, g, b } => Ok(Color { r, g, b }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::parse_hex("#f00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse_hex("#0080ff").unwrap(), Color::rgb(0, 128, 255));
        assert!(Color::parse_hex("0080ff").is_err());
        assert!(Color::parse_hex("#12345").is_err());
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert!(Color::parse_hex("#aééa").is_err());
        assert!(Color::parse_hex("#aé").is_err());
    }

    #[test]
    fn unit_components_are_clamped() {
        assert_eq!(Color::from_unit(1.5, 0.0, -1.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_unit(0.5, 0.5, 0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn deserializes_from_hex_or_map() {
        let a: Color = serde_json::from_str("\"#fff\"").unwrap();
        let b: Color = serde_json::from_str(r#"{"r":255,"g":255,"b":255}"#).unwrap();
        assert_eq!(a, Color::WHITE);
        assert_eq!(a, b);
    }
}
