//! Color scales for the choropleth, bar chart and legend.

mod color;
mod mapping;

pub use color::{Rgb, DEFAULT_PALETTE, NO_DATA_COLOR};
pub use mapping::{ColorMapping, ScalePolicy};
