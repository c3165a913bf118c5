use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of five-year age bands, the last one open-ended.
pub const AGE_BAND_COUNT: usize = 18;

/// Five-year age band: 0 is "0-4", 17 is "85+".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgeBand(u8);

impl AgeBand {
    /// Band for a position in the fixed sequence.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < AGE_BAND_COUNT).then_some(Self(index as u8))
    }

    #[inline] pub fn index(&self) -> usize { self.0 as usize }

    /// Lower bound in years.
    #[inline] pub fn start(&self) -> u32 { self.0 as u32 * 5 }

    /// All bands, youngest first.
    pub fn all() -> impl DoubleEndedIterator<Item = AgeBand> + ExactSizeIterator {
        (0..AGE_BAND_COUNT as u8).map(AgeBand)
    }

    /// Parse labels such as "0-4", "0–4", "15 - 19 Years", "85+" or "85 Years and over".
    /// The band is taken from the leading number, which must be a multiple of five.
    pub fn parse(label: &str) -> Option<Self> {
        let digits: String = label.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        let start: u32 = digits.parse().ok()?;
        if start % 5 != 0 { return None }
        Self::from_index((start / 5) as usize)
    }

    pub fn label(&self) -> String {
        if self.index() == AGE_BAND_COUNT - 1 { format!("{}+", self.start()) }
        else { format!("{}-{}", self.start(), self.start() + 4) }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.label()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        let bands: Vec<_> = AgeBand::all().collect();
        assert_eq!(bands.len(), AGE_BAND_COUNT);
        assert_eq!(bands[0].label(), "0-4");
        assert_eq!(bands[16].label(), "80-84");
        assert_eq!(bands[17].label(), "85+");
    }

    #[test]
    fn parse_variants() {
        assert_eq!(AgeBand::parse("0-4"), AgeBand::from_index(0));
        assert_eq!(AgeBand::parse("15 - 19 Years"), AgeBand::from_index(3));
        assert_eq!(AgeBand::parse("85+"), AgeBand::from_index(17));
        assert_eq!(AgeBand::parse("85 Years and over"), AgeBand::from_index(17));
        assert_eq!(AgeBand::parse("90+"), None);
        assert_eq!(AgeBand::parse("7-9"), None);
        assert_eq!(AgeBand::parse("Total"), None);
    }
}
