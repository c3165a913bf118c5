use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How values of an attribute are written in legends and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    Percentage, // stored as a fraction in [0, 1]
    Currency,
    RawCount,
}

/// The selectable demographic attributes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeId {
    PctNoTel,
    PctSpkMao,
    MaSpkOnMa,
    PctMaRelig,
    MedIncMao,
    MedIncome,
    PctMaori,
    #[serde(rename = "Total_Pop")]
    TotalPop,
}

/// Number of attributes in the catalog.
pub const ATTRIBUTE_COUNT: usize = 8;

impl AttributeId {
    /// Column name in the attribute source.
    pub fn to_str(&self) -> &'static str {
        match self {
            AttributeId::PctNoTel => "PctNoTel",
            AttributeId::PctSpkMao => "PctSpkMao",
            AttributeId::MaSpkOnMa => "MaSpkOnMa",
            AttributeId::PctMaRelig => "PctMaRelig",
            AttributeId::MedIncMao => "MedIncMao",
            AttributeId::MedIncome => "MedIncome",
            AttributeId::PctMaori => "PctMaori",
            AttributeId::TotalPop => "Total_Pop",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AttributeId::PctNoTel => "% Without Telecommunications",
            AttributeId::PctSpkMao => "% Who Speak Maori",
            AttributeId::MaSpkOnMa => "% of Maori Who Only Speak Maori",
            AttributeId::PctMaRelig => "% Who Practice Maori Religion",
            AttributeId::MedIncMao => "$ Maori Median Income ($)",
            AttributeId::MedIncome => "Median Income ($)",
            AttributeId::PctMaori => "% Maori",
            AttributeId::TotalPop => "Total Population",
        }
    }

    pub fn format_kind(&self) -> FormatKind {
        match self {
            AttributeId::MedIncMao | AttributeId::MedIncome => FormatKind::Currency,
            AttributeId::TotalPop => FormatKind::RawCount,
            _ => FormatKind::Percentage,
        }
    }

    /// Position of this attribute in the catalog.
    #[inline] pub fn index(&self) -> usize { *self as usize }

    /// Catalog order; the first entry is the initial attribute.
    pub fn order() -> [AttributeId; ATTRIBUTE_COUNT] {
        [
            AttributeId::PctNoTel,
            AttributeId::PctSpkMao,
            AttributeId::MaSpkOnMa,
            AttributeId::PctMaRelig,
            AttributeId::MedIncMao,
            AttributeId::MedIncome,
            AttributeId::PctMaori,
            AttributeId::TotalPop,
        ]
    }
}

impl Default for AttributeId {
    fn default() -> Self { AttributeId::order()[0] }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute {0:?}")]
pub struct UnknownAttribute(pub String);

impl FromStr for AttributeId {
    type Err = UnknownAttribute;

    /// Accepts the column name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AttributeId::order().into_iter()
            .find(|attr| attr.to_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAttribute(s.to_string()))
    }
}

/// One value slot per catalog attribute; `None` marks missing data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeValues([Option<f64>; ATTRIBUTE_COUNT]);

impl AttributeValues {
    pub fn new(values: [Option<f64>; ATTRIBUTE_COUNT]) -> Self { Self(values) }

    #[inline] pub fn get(&self, attribute: AttributeId) -> Option<f64> { self.0[attribute.index()] }

    /// Store a value, dropping non-finite input as missing.
    #[inline]
    pub fn set(&mut self, attribute: AttributeId, value: Option<f64>) {
        self.0[attribute.index()] = value.filter(|v| v.is_finite());
    }

    /// Number of slots holding a value.
    pub fn present(&self) -> usize { self.0.iter().filter(|v| v.is_some()).count() }
}
