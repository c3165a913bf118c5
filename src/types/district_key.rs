use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Stable key for a district (territorial authority code, e.g. "076").
/// Keep the original code text (with leading zeros) but avoid repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictKey(Arc<str>);

impl DistrictKey {
    /// Create a key from raw code text, trimming surrounding whitespace.
    pub fn new(code: &str) -> Self { Self(Arc::from(code.trim())) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// Key safe for use as an SVG/CSS class or id token.
    pub fn css_token(&self) -> String {
        self.0.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for DistrictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for DistrictKey {
    fn from(code: &str) -> Self { Self::new(code) }
}

/// District selection driving the population view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Selection {
    /// The nationwide aggregate.
    #[default]
    All,
    District(DistrictKey),
}

impl Selection {
    /// Parse user input; empty input or "ALL" (any case) selects the aggregate.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") { Selection::All }
        else { Selection::District(DistrictKey::new(input)) }
    }

    #[inline]
    pub fn district(&self) -> Option<&DistrictKey> {
        match self {
            Selection::All => None,
            Selection::District(key) => Some(key),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("ALL"),
            Selection::District(key) => write!(f, "{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_trims_and_keeps_leading_zeros() {
        let key = DistrictKey::new(" 007 ");
        assert_eq!(key.as_str(), "007");
        assert_eq!(key, DistrictKey::from("007"));
    }

    #[test]
    fn serializes_as_plain_code() {
        let key = DistrictKey::new("007");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""007""#);
        assert_eq!(serde_json::from_str::<DistrictKey>(r#""007""#).unwrap(), key);
        assert_eq!(serde_json::to_string(&Selection::District(key)).unwrap(), r#"{"District":"007"}"#);
    }

    #[test]
    fn css_token_replaces_unsafe_chars() {
        assert_eq!(DistrictKey::new("a b/c").css_token(), "a_b_c");
    }

    #[test]
    fn selection_parse() {
        assert_eq!(Selection::parse(""), Selection::All);
        assert_eq!(Selection::parse("all"), Selection::All);
        assert_eq!(Selection::parse("076"), Selection::District(DistrictKey::new("076")));
        assert_eq!(Selection::parse("076").to_string(), "076");
    }
}
