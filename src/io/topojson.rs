//! TopoJSON geometry reading: shared arcs, optional quantization transform.

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::{debug, warn};
use serde_json::Value;

use crate::{config::SourceConfig, data::GeometryRecord, io::geojson::feature_record};

/// Quantization transform: position = quantized * scale + translate.
#[derive(Debug, Clone, Copy)]
struct Transform {
    scale: (f64, f64),
    translate: (f64, f64),
}

/// Read every Polygon/MultiPolygon geometry of every object in a Topology.
/// Objects are visited in name order.
pub(crate) fn read_topojson_value(value: &Value, sources: &SourceConfig) -> Result<Vec<GeometryRecord>> {
    let transform = parse_transform(&value["transform"])?;
    let arcs = value["arcs"].as_array()
        .ok_or_else(|| anyhow!("[io::topojson] topology has no arcs array"))?
        .iter().enumerate()
        .map(|(i, arc)| decode_arc(arc, transform).with_context(|| format!("[io::topojson] arc {i}")))
        .collect::<Result<Vec<_>>>()?;

    let objects = value["objects"].as_object()
        .ok_or_else(|| anyhow!("[io::topojson] topology has no objects"))?;

    let mut records = Vec::new();
    for (name, object) in objects {
        let geometries: Vec<&Value> = match object["type"].as_str() {
            Some("GeometryCollection") => object["geometries"].as_array().map(|g| g.iter().collect()).unwrap_or_default(),
            _ => vec![object],
        };
        debug!("[io::topojson] object {name:?}: {} geometries", geometries.len());

        for geometry in geometries {
            let index = records.len();
            let shape = match geometry["type"].as_str() {
                Some("Polygon") => MultiPolygon(vec![
                    polygon(geometry["arcs"].as_array(), &arcs)
                        .with_context(|| format!("[io::topojson] {name}[{index}]"))?
                ]),
                Some("MultiPolygon") => geometry["arcs"].as_array()
                    .ok_or_else(|| anyhow!("[io::topojson] {name}[{index}]: MultiPolygon without arcs"))?
                    .iter()
                    .map(|p| polygon(p.as_array(), &arcs))
                    .collect::<Result<Vec<_>>>()
                    .map(MultiPolygon)
                    .with_context(|| format!("[io::topojson] {name}[{index}]"))?,
                None => {
                    warn!("[io::topojson] {name}[{index}] has no geometry");
                    MultiPolygon(vec![])
                }
                Some(other) => bail!("[io::topojson] {name}[{index}]: unsupported geometry type {other:?}"),
            };
            records.push(feature_record(index, geometry["properties"].as_object(), shape, sources));
        }
    }
    Ok(records)
}

fn parse_transform(value: &Value) -> Result<Option<Transform>> {
    if value.is_null() { return Ok(None) }
    let pair = |v: &Value| -> Result<(f64, f64)> {
        match (v[0].as_f64(), v[1].as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => bail!("[io::topojson] transform needs numeric [x, y] pairs"),
        }
    };
    Ok(Some(Transform { scale: pair(&value["scale"])?, translate: pair(&value["translate"])? }))
}

/// Decode one arc to absolute positions. With a transform, positions are
/// delta-encoded quantized integers.
fn decode_arc(arc: &Value, transform: Option<Transform>) -> Result<Vec<Coord<f64>>> {
    let positions = arc.as_array().ok_or_else(|| anyhow!("arc is not an array"))?;
    let (mut x, mut y) = (0.0, 0.0);
    positions.iter()
        .map(|p| {
            let (px, py) = match (p[0].as_f64(), p[1].as_f64()) {
                (Some(px), Some(py)) => (px, py),
                _ => bail!("invalid arc position"),
            };
            Ok(match transform {
                Some(t) => {
                    x += px;
                    y += py;
                    Coord { x: x * t.scale.0 + t.translate.0, y: y * t.scale.1 + t.translate.1 }
                }
                None => Coord { x: px, y: py },
            })
        })
        .collect()
}

/// Assemble a polygon from rings of arc indices.
fn polygon(rings: Option<&Vec<Value>>, arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.ok_or_else(|| anyhow!("polygon without arcs"))?
        .iter()
        .map(|ring| self::ring(ring, arcs));
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Concatenate arcs into a ring. Index `!i` (negative) means arc `i` reversed;
/// the first point of each following arc repeats the previous end and is dropped.
fn ring(indices: &Value, arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>> {
    let indices = indices.as_array().ok_or_else(|| anyhow!("ring is not an array of arc indices"))?;
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for index in indices {
        let index = index.as_i64().ok_or_else(|| anyhow!("arc index must be an integer"))?;
        let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(arc_index).ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| anyhow!("arc index {index} out of range"))?;

        let skip = usize::from(!coords.is_empty());
        if reversed {
            coords.extend(arc.iter().rev().skip(skip).copied());
        } else {
            coords.extend(arc.iter().skip(skip).copied());
        }
    }
    Ok(LineString(coords))
}

#[cfg(test)]
mod tests {
    use geo::{Area, CoordsIter};
    use serde_json::json;

    use super::*;

    fn topology() -> Value {
        // Two unit squares sharing the edge x = 1; arc 0 is the shared edge.
        json!({
            "type": "Topology",
            "arcs": [
                [[1.0, 0.0], [1.0, 1.0]],
                [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
                [[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]
            ],
            "objects": {
                "districts": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0, 1]], "properties": { "TA2014": "001", "TA2014_NAM": "West" } },
                        { "type": "MultiPolygon", "arcs": [[[2, -1]]], "properties": { "TA2014": "002", "TA2014_NAM": "East" } },
                        { "type": null, "properties": { "TA2014": "003" } }
                    ]
                }
            }
        })
    }

    #[test]
    fn decodes_shared_arcs() {
        let records = read_topojson_value(&topology(), &SourceConfig::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key.as_str(), "001");
        assert_eq!(&*records[1].name, "East");

        let west = &records[0].shape.0[0];
        assert_eq!(west.exterior().coords_count(), 5);
        assert!((west.unsigned_area() - 1.0).abs() < 1e-12);

        let east = &records[1].shape.0[0];
        assert_eq!(east.exterior().0.first(), east.exterior().0.last());
        assert!((east.unsigned_area() - 1.0).abs() < 1e-12);

        assert!(records[2].shape.0.is_empty());
    }

    #[test]
    fn applies_quantized_transform() {
        let value = json!({
            "type": "Topology",
            "transform": { "scale": [0.5, 0.25], "translate": [170.0, -45.0] },
            "arcs": [[[0, 0], [2, 0], [0, 4], [-2, -4]]],
            "objects": { "a": { "type": "Polygon", "arcs": [[0]], "properties": { "TA2014": "001" } } }
        });
        let records = read_topojson_value(&value, &SourceConfig::default()).unwrap();
        let coords: Vec<_> = records[0].shape.0[0].exterior().0.clone();
        assert_eq!(coords[0], Coord { x: 170.0, y: -45.0 });
        assert_eq!(coords[1], Coord { x: 171.0, y: -45.0 });
        assert_eq!(coords[2], Coord { x: 171.0, y: -44.0 });
        assert_eq!(coords[3], Coord { x: 170.0, y: -45.0 });
    }

    #[test]
    fn rejects_out_of_range_arc() {
        let value = json!({
            "type": "Topology",
            "arcs": [[[0.0, 0.0], [1.0, 1.0]]],
            "objects": { "a": { "type": "Polygon", "arcs": [[5]] } }
        });
        assert!(read_topojson_value(&value, &SourceConfig::default()).is_err());
    }
}
