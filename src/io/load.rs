//! Loading the three input sources as one unit.

use std::{fs, path::{Path, PathBuf}, sync::mpsc, thread, time::{Duration, Instant}};

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    config::{AtlasConfig, SourceConfig},
    data::{Dataset, DistrictRecord, GeometryRecord, PopulationAgeRecord, PopulationTable},
    error::{AtlasError, AtlasResult, SourceKind},
    io::{csv, geojson::read_geojson_value, topojson::read_topojson_value},
    types::DistrictKey,
};

/// Locations of the three input sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub geometry: PathBuf,
    pub attributes: PathBuf,
    pub population: PathBuf,
}

/// Read the geometry source: a GeoJSON FeatureCollection or a TopoJSON Topology.
pub fn read_geometry(path: &Path, sources: &SourceConfig) -> Result<Vec<GeometryRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::load] Failed to open {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("[io::load] Failed to parse JSON in {}", path.display()))?;
    match value["type"].as_str() {
        Some("Topology") => read_topojson_value(&value, sources),
        _ => read_geojson_value(&value, sources),
    }
}

/// Read the attribute source.
pub fn read_attributes(path: &Path, sources: &SourceConfig) -> Result<Vec<DistrictRecord>> {
    csv::read_district_records(&csv::read_csv(path)?, sources)
}

/// Read the population source.
pub fn read_population(path: &Path, sources: &SourceConfig) -> Result<Vec<PopulationAgeRecord>> {
    csv::read_population_records(&csv::read_csv(path)?, sources)
}

enum Loaded {
    Geometry(Result<Vec<GeometryRecord>>),
    Attributes(Result<Vec<DistrictRecord>>),
    Population(Result<Vec<PopulationAgeRecord>>),
}

type LoadJob = Box<dyn FnOnce() -> Loaded + Send + 'static>;

/// Load all three sources concurrently and join them. Fails as soon as any
/// source fails, or when the configured timeout elapses; no partial dataset is
/// ever returned.
pub fn load_dataset(paths: &SourcePaths, config: &AtlasConfig) -> AtlasResult<Dataset> {
    let sources = &config.sources;
    let jobs = vec![
        (SourceKind::Geometry, job(&paths.geometry, sources, |p, s| Loaded::Geometry(read_geometry(p, s)))),
        (SourceKind::Attributes, job(&paths.attributes, sources, |p, s| Loaded::Attributes(read_attributes(p, s)))),
        (SourceKind::Population, job(&paths.population, sources, |p, s| Loaded::Population(read_population(p, s)))),
    ];
    run_loaders(jobs, config.load_timeout(), DistrictKey::new(&config.sources.aggregate_key))
}

fn job(path: &Path, sources: &SourceConfig, read: fn(&Path, &SourceConfig) -> Loaded) -> LoadJob {
    let (path, sources) = (path.to_path_buf(), sources.clone());
    Box::new(move || {
        debug!("[io::load] reading {}", path.display());
        read(&path, &sources)
    })
}

/// Run one loader thread per job and collect their results until every source
/// has arrived, one fails, or `timeout` elapses.
fn run_loaders(jobs: Vec<(SourceKind, LoadJob)>, timeout: Duration, aggregate: DistrictKey) -> AtlasResult<Dataset> {
    let started = Instant::now();
    let deadline = started + timeout;
    let (tx, rx) = mpsc::channel::<Loaded>();

    let mut pending = Vec::with_capacity(jobs.len());
    for (kind, job) in jobs {
        spawn_loader(kind, &tx, job)?;
        pending.push(kind);
    }
    drop(tx);

    let (mut geometries, mut districts, mut population) = (None, None, None);
    while !pending.is_empty() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let loaded = rx.recv_timeout(remaining).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => {
                warn!("[io::load] still waiting for {} after {timeout:?}", list(&pending));
                AtlasError::LoadTimeout(timeout)
            }
            // Every sender is gone, so every pending loader died.
            mpsc::RecvTimeoutError::Disconnected => AtlasError::load(pending[0],
                anyhow!("[io::load] loader for {} exited without a result", list(&pending))),
        })?;

        let kind = match loaded {
            Loaded::Geometry(r) => {
                geometries = Some(r.map_err(|e| AtlasError::load(SourceKind::Geometry, e))?);
                SourceKind::Geometry
            }
            Loaded::Attributes(r) => {
                districts = Some(r.map_err(|e| AtlasError::load(SourceKind::Attributes, e))?);
                SourceKind::Attributes
            }
            Loaded::Population(r) => {
                population = Some(r.map_err(|e| AtlasError::load(SourceKind::Population, e))?);
                SourceKind::Population
            }
        };
        pending.retain(|&k| k != kind);
    }

    let missing = [
        (SourceKind::Geometry, geometries.is_none()),
        (SourceKind::Attributes, districts.is_none()),
        (SourceKind::Population, population.is_none()),
    ];
    let (Some(geometries), Some(districts), Some(population)) = (geometries, districts, population) else {
        let missing: Vec<_> = missing.iter().filter(|(_, m)| *m).map(|(k, _)| *k).collect();
        return Err(AtlasError::load(missing[0], anyhow!("[io::load] no loader for {}", list(&missing))));
    };

    info!("[io::load] {} geometries, {} attribute rows, {} population rows in {:?}",
        geometries.len(), districts.len(), population.len(), started.elapsed());

    let table = PopulationTable::new(population, aggregate);
    Ok(Dataset::new(geometries, districts, table))
}

fn list(kinds: &[SourceKind]) -> String {
    kinds.iter().map(SourceKind::to_string).collect::<Vec<_>>().join(", ")
}

fn spawn_loader(kind: SourceKind, tx: &mpsc::Sender<Loaded>, job: LoadJob) -> AtlasResult<()> {
    let tx = tx.clone();
    thread::Builder::new()
        .name(format!("load-{kind}"))
        .spawn(move || {
            // The receiver is gone only after a timeout or another failure.
            let _ = tx.send(job());
        })
        .map(|_| ())
        .map_err(|e| AtlasError::load(kind, anyhow!(e).context("[io::load] Failed to spawn loader thread")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(kind: SourceKind) -> (SourceKind, LoadJob) {
        let job: LoadJob = match kind {
            SourceKind::Geometry => Box::new(|| Loaded::Geometry(Ok(Vec::new()))),
            SourceKind::Attributes => Box::new(|| Loaded::Attributes(Ok(Vec::new()))),
            SourceKind::Population => Box::new(|| Loaded::Population(Ok(Vec::new()))),
        };
        (kind, job)
    }

    fn run(jobs: Vec<(SourceKind, LoadJob)>, timeout: Duration) -> AtlasResult<Dataset> {
        run_loaders(jobs, timeout, DistrictKey::new("ALL"))
    }

    #[test]
    fn collects_every_source() {
        let jobs = vec![ok(SourceKind::Geometry), ok(SourceKind::Attributes), ok(SourceKind::Population)];
        let dataset = run(jobs, Duration::from_secs(5)).unwrap();
        assert!(dataset.regions().is_empty());
    }

    #[test]
    fn slow_source_times_out() {
        let slow: LoadJob = Box::new(|| {
            thread::sleep(Duration::from_secs(2));
            Loaded::Geometry(Ok(Vec::new()))
        });
        let jobs = vec![(SourceKind::Geometry, slow), ok(SourceKind::Attributes), ok(SourceKind::Population)];

        let started = Instant::now();
        match run(jobs, Duration::from_millis(50)) {
            Err(AtlasError::LoadTimeout(timeout)) => assert_eq!(timeout, Duration::from_millis(50)),
            other => panic!("expected a timeout, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn dead_loaders_are_all_reported() {
        let dead = |kind: SourceKind| -> (SourceKind, LoadJob) { (kind, Box::new(|| -> Loaded { panic!("loader crashed") })) };
        let jobs = vec![dead(SourceKind::Geometry), ok(SourceKind::Attributes), dead(SourceKind::Population)];

        let err = run(jobs, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AtlasError::LoadFailure { source_kind: SourceKind::Geometry, .. }));
        assert!(err.to_string().contains("loader for geometry, population exited without a result"), "{err}");
    }

    #[test]
    fn missing_job_is_a_load_failure() {
        let jobs = vec![ok(SourceKind::Geometry), ok(SourceKind::Population)];
        let err = run(jobs, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AtlasError::LoadFailure { source_kind: SourceKind::Attributes, .. }));
    }
}
