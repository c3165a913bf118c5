//! In-memory records and the join between the attribute and geometry sources.

mod dataset;
mod district;
mod geometry;
mod join;
mod population;

pub use dataset::Dataset;
pub use district::{AttributeRecord, DistrictRecord};
pub use geometry::{bounds, EnrichedGeometryRecord, GeometryRecord};
pub use join::{join, join_with_report, JoinReport};
pub use population::{PopulationAgeRecord, PopulationSelection, PopulationTable};
