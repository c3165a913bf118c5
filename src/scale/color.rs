//! Color values for choropleth rendering.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parse CSS `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 if hex.is_ascii() => hex.chars().flat_map(|c| [c, c]).collect(),
                6 if hex.is_ascii() => hex.to_string(),
                _ => bail!("[scale::color] invalid hex color {s:?}"),
            };
            let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16)
                .with_context(|| format!("[scale::color] invalid hex color {s:?}"));
            return Ok(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? });
        }

        let inner = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| anyhow!("[scale::color] unsupported color {s:?}"))?;
        let channels = inner.split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("[scale::color] invalid rgb() channels in {s:?}"))?;
        match channels[..] {
            [r, g, b] => Ok(Rgb { r, g, b }),
            _ => bail!("[scale::color] rgb() needs three channels: {s:?}"),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self { color.to_string() }
}

/// Sequential green-blue ramp, light to dark.
pub const DEFAULT_PALETTE: [Rgb; 5] = [
    Rgb { r: 240, g: 249, b: 232 },
    Rgb { r: 186, g: 228, b: 188 },
    Rgb { r: 123, g: 204, b: 196 },
    Rgb { r:  67, g: 162, b: 202 },
    Rgb { r:   8, g: 104, b: 172 },
];

/// Neutral gray (#ccc) for regions without data.
pub const NO_DATA_COLOR: Rgb = Rgb { r: 204, g: 204, b: 204 };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_css_forms() {
        assert_eq!("#ccc".parse::<Rgb>().unwrap(), NO_DATA_COLOR);
        assert_eq!("#0868ac".parse::<Rgb>().unwrap(), DEFAULT_PALETTE[4]);
        assert_eq!("rgb(123, 204, 196)".parse::<Rgb>().unwrap(), DEFAULT_PALETTE[2]);
        assert!("#12".parse::<Rgb>().is_err());
        assert!("rgb(1,2)".parse::<Rgb>().is_err());
        assert!("blue".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_css() {
        assert_eq!(DEFAULT_PALETTE[0].to_string(), "rgb(240,249,232)");
    }
}
