//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `csv` - attribute and population tables
//! - `geojson` - district boundaries as a FeatureCollection
//! - `topojson` - district boundaries as a Topology
//! - `svg` - the rendered atlas document
//!
//! `load` reads the three sources concurrently into a [`Dataset`](crate::data::Dataset).

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod load;
pub(crate) mod svg;
pub(crate) mod topojson;

pub use load::{load_dataset, read_attributes, read_geometry, read_population, SourcePaths};
