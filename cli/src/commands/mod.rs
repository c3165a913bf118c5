pub mod attributes;
pub mod inspect;
pub mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use nzatlas::{load_dataset, AtlasConfig, Event, InteractionController, Selection, SourcePaths};

use crate::cli::{Cli, ViewArgs};

/// Read the configuration named on the command line, or the defaults.
pub fn load_config(cli: &Cli) -> Result<AtlasConfig> {
    match &cli.config {
        Some(path) if path.exists() => AtlasConfig::from_path(path)
            .with_context(|| format!("[config] failed to read {}", path.display())),
        Some(path) => {
            log::warn!("[config] {} not found; using defaults", path.display());
            Ok(AtlasConfig::default())
        }
        None => Ok(AtlasConfig::default()),
    }
}

/// Load the three sources and apply the requested attribute and district.
pub fn build_controller(config: AtlasConfig, args: &ViewArgs) -> Result<InteractionController> {
    let paths = SourcePaths {
        geometry: args.geometry.clone(),
        attributes: args.attributes.clone(),
        population: args.population.clone(),
    };
    let dataset = load_dataset(&paths, &config)?;

    let report = dataset.join_report();
    if !report.is_clean() {
        log::warn!(
            "[load] {} regions without attributes, {} attribute rows without a region",
            report.unmatched_geometries.len(),
            report.unmatched_records.len(),
        );
    }

    let mut controller = InteractionController::new(Arc::new(dataset), config);
    if let Some(attribute) = &args.attribute {
        controller.handle_attribute_input(attribute);
    }
    if let Some(district) = &args.district {
        controller.handle(Event::DistrictSelect(Selection::parse(district)));
    }
    Ok(controller)
}
