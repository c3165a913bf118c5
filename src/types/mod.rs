mod age_band;
mod attribute;
mod district_key;

pub use age_band::{AgeBand, AGE_BAND_COUNT};
pub use attribute::{AttributeId, AttributeValues, FormatKind, UnknownAttribute, ATTRIBUTE_COUNT};
pub use district_key::{DistrictKey, Selection};
