use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Color must start with '#', got '{0}'")]
    MissingHash(String),
    #[error("Color must have 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex digits in color '{0}'")]
    InvalidDigits(String),
}

impl FromStr for Rgba {
    type Err = ColorError;

    /// Accepts `#rrggbb` and `#rrggbbaa`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(value.to_string()))?;

        if !matches!(digits.len(), 6 | 8) {
            return Err(ColorError::InvalidLength(digits.len()));
        }

        let channel = |index: usize| {
            digits
                .get(index..index + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::InvalidDigits(value.to_string()))
        };

        let alpha = match digits.len() {
            8 => channel(6)?,
            _ => 255,
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod color_tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("#ffffff", Rgba::WHITE)]
    #[case("#000000", Rgba::BLACK)]
    #[case("#4c8c4a", Rgba::rgb(0x4c, 0x8c, 0x4a))]
    #[case("#4C8C4A80", Rgba::new(0x4c, 0x8c, 0x4a, 0x80))]
    #[case(" #102030 ", Rgba::rgb(0x10, 0x20, 0x30))]
    fn test_parse(#[case] input: &str, #[case] expected: Rgba) {
        assert_eq!(input.parse::<Rgba>(), Ok(expected));
    }

    #[rstest]
    #[case("ffffff", ColorError::MissingHash("ffffff".to_string()))]
    #[case("#fff", ColorError::InvalidLength(3))]
    #[case("#gg0000", ColorError::InvalidDigits("#gg0000".to_string()))]
    fn test_parse_errors(#[case] input: &str, #[case] expected: ColorError) {
        assert_eq!(input.parse::<Rgba>(), Err(expected));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgba::rgb(0x4c, 0x8c, 0x4a).to_string(), "#4c8c4a");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
    }
}
