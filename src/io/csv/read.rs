//! CSV reading operations.

use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result};
use log::{debug, warn};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, StringChunked}};

use crate::{
    config::SourceConfig,
    data::{DistrictRecord, PopulationAgeRecord},
    types::{AgeBand, AttributeId, AttributeValues, DistrictKey},
};

/// Reads a CSV file from `path` into a Polars DataFrame with every column as text.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    read_csv_bytes(&bytes)
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Read DataFrame from CSV bytes, every column as text.
/// Numbers are parsed per cell so that empty or malformed cells become "no data"
/// rather than failing the whole column.
pub(crate) fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0));

    CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")
}

/// Get a text column by name.
fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .with_context(|| format!("[io::csv::read] missing column {name:?}"))?
        .str()
        .with_context(|| format!("[io::csv::read] column {name:?} is not text"))
}

/// Parse a numeric cell; empty, non-numeric and non-finite cells are `None`.
pub(crate) fn parse_number(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() { return None }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read attribute rows: key, display name and one column per catalog attribute.
pub(crate) fn read_district_records(df: &DataFrame, sources: &SourceConfig) -> Result<Vec<DistrictRecord>> {
    let keys = text_column(df, &sources.key_column)?;
    let names = text_column(df, &sources.name_column)?;
    let columns = AttributeId::order().into_iter()
        .map(|attr| Ok((attr, text_column(df, attr.to_str())?)))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(key) = keys.get(row).map(str::trim).filter(|k| !k.is_empty()) else {
            warn!("[io::csv::read] attribute row {row} has no {}; skipped", sources.key_column);
            continue;
        };

        let mut values = AttributeValues::default();
        for (attr, column) in &columns {
            let value = parse_number(column.get(row));
            if value.is_none() { debug!("[io::csv::read] {key}: no value for {attr}") }
            values.set(*attr, value);
        }

        let name = names.get(row).unwrap_or(key);
        records.push(DistrictRecord::new(DistrictKey::new(key), name.trim(), values));
    }

    debug!("[io::csv::read] {} attribute rows", records.len());
    Ok(records)
}

/// Read population rows: key, age band, male and female counts.
/// Rows with an unknown band (e.g. totals) or unreadable counts are skipped.
pub(crate) fn read_population_records(df: &DataFrame, sources: &SourceConfig) -> Result<Vec<PopulationAgeRecord>> {
    let keys = text_column(df, &sources.key_column)?;
    let bands = text_column(df, &sources.age_column)?;
    let males = text_column(df, &sources.male_column)?;
    let females = text_column(df, &sources.female_column)?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let key = keys.get(row).map(str::trim).unwrap_or_default();
        let band_label = bands.get(row).unwrap_or_default();
        let Some(band) = AgeBand::parse(band_label) else {
            debug!("[io::csv::read] population row {row}: unrecognised age band {band_label:?}; skipped");
            continue;
        };
        let (Some(male), Some(female)) = (parse_number(males.get(row)), parse_number(females.get(row))) else {
            warn!("[io::csv::read] population row {row} ({key} {band}): unreadable counts; skipped");
            continue;
        };
        if key.is_empty() {
            warn!("[io::csv::read] population row {row} has no {}; skipped", sources.key_column);
            continue;
        }
        records.push(PopulationAgeRecord { key: DistrictKey::new(key), band, male, female });
    }

    debug!("[io::csv::read] {} population rows", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTRIBUTES: &str = "\
TA2014,TA2014_NAM,PctNoTel,PctSpkMao,MaSpkOnMa,PctMaRelig,MedIncMao,MedIncome,PctMaori,Total_Pop
001,Far North District,0.05,0.2,0.01,0.02,20000,24000,0.44,55000
002,Whangarei District,0,,0.01,0.02,21000,27000,n/a,77000
,Nameless,1,1,1,1,1,1,1,1
";

    #[test]
    fn reads_attribute_rows() {
        let df = read_csv_bytes(ATTRIBUTES.as_bytes()).unwrap();
        let records = read_district_records(&df, &SourceConfig::default()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].key.as_str(), "001");
        assert_eq!(&*records[0].name, "Far North District");
        assert_eq!(records[0].values.get(AttributeId::TotalPop), Some(55000.0));

        // A literal zero is a value; blank and malformed cells are missing.
        assert_eq!(records[1].values.get(AttributeId::PctNoTel), Some(0.0));
        assert_eq!(records[1].values.get(AttributeId::PctSpkMao), None);
        assert_eq!(records[1].values.get(AttributeId::PctMaori), None);
    }

    #[test]
    fn missing_attribute_column_fails() {
        let df = read_csv_bytes(b"TA2014,TA2014_NAM,PctNoTel\n001,A,0.1\n").unwrap();
        assert!(read_district_records(&df, &SourceConfig::default()).is_err());
    }

    #[test]
    fn reads_population_rows() {
        let csv = "\
TA2014,AgeGroup,Male,Female
ALL,0-4,150000,140000
ALL,Total,2000000,2100000
001,85+,300,450
001,5-9,x,1
";
        let df = read_csv_bytes(csv.as_bytes()).unwrap();
        let records = read_population_records(&df, &SourceConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.as_str(), "ALL");
        assert_eq!(records[1].band, AgeBand::from_index(17).unwrap());
        assert_eq!(records[1].female, 450.0);
    }

    #[test]
    fn keys_keep_leading_zeros() {
        let csv = "TA2014,AgeGroup,Male,Female\n007,0-4,1,2\n";
        let df = read_csv_bytes(csv.as_bytes()).unwrap();
        let records = read_population_records(&df, &SourceConfig::default()).unwrap();
        assert_eq!(records[0].key.as_str(), "007");
    }

    #[test]
    fn parse_number_cases() {
        assert_eq!(parse_number(Some(" 1.5 ")), Some(1.5));
        assert_eq!(parse_number(Some("0")), Some(0.0));
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(None), None);
    }
}
