//! The full atlas document: map, legend, ranked bars and population pyramid.

use std::io::Write;

use anyhow::Result;
use log::debug;

use crate::{
    io::svg::{
        escape, graticule_lines, graticule_outline, line_to_path, multipolygon_to_path,
        write_svg_footer, write_svg_header, write_svg_styles, MapProjection,
    },
    types::Selection,
    view::{describe, layout_bars, legend_entries, region_fills, InteractionController, PYRAMID_OPACITY},
};

const LEGEND_ROW: f64 = 20.0;
const LEGEND_SWATCH: f64 = 18.0;
/// Room under the pyramid for the age band labels.
const AGE_LABEL_HEIGHT: f64 = 20.0;

/// Write the document for the controller's current state. The map sits on the
/// left; bars, pyramid and legend are stacked on the right.
pub(crate) fn write_document<W: Write>(writer: &mut W, controller: &InteractionController) -> Result<()> {
    let config = controller.config();
    let (map, chart, pyramid) = (&config.map, &config.chart, &config.pyramid);
    let legend_height = LEGEND_ROW * (controller.state().mapping.palette().len() + 1) as f64;

    let right = map.width;
    let pyramid_top = chart.height;
    let legend_top = pyramid_top + pyramid.title_offset + pyramid.height + AGE_LABEL_HEIGHT;
    let width = map.width + chart.width.max(pyramid.width);
    let height = map.height.max(legend_top + legend_height);

    write_svg_header(writer, width, height)?;
    write_svg_styles(writer, config.colors.highlight)?;

    writeln!(writer, r#"<g class="map">"#)?;
    write_map(writer, controller)?;
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g class="chart" transform="translate({right},0)">"#)?;
    write_bars(writer, controller)?;
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g class="pyramid" transform="translate({right},{pyramid_top})">"#)?;
    write_pyramid(writer, controller)?;
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<g class="legend" transform="translate({right},{legend_top})">"#)?;
    write_legend(writer, controller)?;
    writeln!(writer, "</g>")?;

    write_svg_footer(writer)?;
    writer.flush()?;
    Ok(())
}

/// Graticule, then one path per region in geometry order.
fn write_map<W: Write>(writer: &mut W, controller: &InteractionController) -> Result<()> {
    let dataset = controller.dataset();
    let config = &controller.config().map;
    let regions = dataset.regions();
    let shapes: Vec<_> = regions.iter().map(|r| r.shape()).collect();

    let (Some(projection), Some(extent)) = (MapProjection::fit(&shapes, config)?, dataset.bounds()) else {
        debug!("[io::svg] no geometry to draw");
        return Ok(());
    };

    let outline = projection.project_line(&graticule_outline(extent, config.graticule_step))?;
    writeln!(writer, r#"<path class="background" d="{}Z"/>"#, line_to_path(&outline))?;
    for line in graticule_lines(extent, config.graticule_step) {
        writeln!(writer, r#"<path class="graticule" d="{}"/>"#, line_to_path(&projection.project_line(&line)?))?;
    }

    let attribute = controller.state().attribute;
    for (region, fill) in regions.iter().zip(region_fills(regions, controller.state())) {
        let path = multipolygon_to_path(&projection.project_shape(region.shape())?);
        writeln!(writer, r#"<path class="region {}" d="{}" style="fill:{}"><title>{}</title></path>"#,
            escape(&fill.key.css_token()),
            path,
            fill.fill,
            escape(&describe(&fill.name, fill.value, attribute)),
        )?;
    }
    Ok(())
}

/// Title with the attribute label, then the ranked bars.
fn write_bars<W: Write>(writer: &mut W, controller: &InteractionController) -> Result<()> {
    let state = controller.state();
    let viewport = &controller.config().chart;
    writeln!(writer, r#"<text class="title" x="{}" y="{}">{}</text>"#,
        viewport.width / 2.0,
        viewport.title_offset / 2.0,
        escape(state.attribute.label()),
    )?;

    for bar in layout_bars(controller.dataset().districts(), state, viewport) {
        let g = &bar.geometry;
        writeln!(writer, r#"<rect class="bar {}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" style="fill:{}"><title>{}</title></rect>"#,
            escape(&bar.key.css_token()),
            g.x, g.y, g.width, g.height,
            g.fill,
            escape(&describe(&bar.name, bar.value, state.attribute)),
        )?;
    }
    Ok(())
}

/// Title band, then overlapping male and female series with band labels
/// underneath. Bars span the full viewport height below the title.
fn write_pyramid<W: Write>(writer: &mut W, controller: &InteractionController) -> Result<()> {
    let viewport = &controller.config().pyramid;
    let layout = controller.pyramid();
    let title = match &layout.selection {
        Selection::All => "All districts".to_string(),
        Selection::District(key) => controller.dataset().name_of(key).unwrap_or(key.as_str()).to_string(),
    };
    writeln!(writer, r#"<text class="title" x="{}" y="{}">Population by age: {}</text>"#,
        viewport.width / 2.0,
        viewport.title_offset / 2.0,
        escape(&title),
    )?;

    writeln!(writer, r#"<g class="bars" transform="translate(0,{})">"#, viewport.title_offset)?;
    for (series, bars) in [("male", &layout.male_bars), ("female", &layout.female_bars)] {
        for bar in bars {
            let g = &bar.geometry;
            writeln!(writer, r#"<rect class="{series}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" style="fill:{};fill-opacity:{PYRAMID_OPACITY}"><title>{}: {:.0} {series}</title></rect>"#,
                g.x, g.y, g.width, g.height, g.fill, bar.band, bar.count,
            )?;
        }
    }

    for (bar, label) in layout.male_bars.iter().zip(&layout.age_labels) {
        let g = &bar.geometry;
        writeln!(writer, r#"<text class="age" x="{:.3}" y="{}">{}</text>"#,
            g.x + g.width / 2.0,
            viewport.height + AGE_LABEL_HEIGHT - 6.0,
            label,
        )?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, controller: &InteractionController) -> Result<()> {
    let state = controller.state();
    for (i, entry) in legend_entries(&state.mapping, state.attribute).iter().enumerate() {
        let y = i as f64 * LEGEND_ROW;
        writeln!(writer, r#"<rect x="0" y="{y}" width="{LEGEND_SWATCH}" height="{LEGEND_SWATCH}" style="fill:{}"/>"#, entry.fill)?;
        writeln!(writer, r#"<text class="label" x="{}" y="{}">{}</text>"#,
            LEGEND_SWATCH + 6.0,
            y + LEGEND_SWATCH - 5.0,
            escape(&entry.label),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::{
        config::AtlasConfig,
        data::{Dataset, DistrictRecord, GeometryRecord, PopulationAgeRecord, PopulationTable},
        io::svg::SvgStringWriter,
        types::{AgeBand, AttributeId, AttributeValues, DistrictKey},
        view::Event,
    };

    fn controller() -> InteractionController {
        let shape = |x: f64| MultiPolygon(vec![polygon![(x: x, y: -41.0), (x: x + 1.0, y: -41.0), (x: x + 1.0, y: -40.0), (x: x, y: -40.0)]]);
        let geometries = vec![
            GeometryRecord::new("001".into(), "Far North & Co", shape(173.0)),
            GeometryRecord::new("002".into(), "Whangarei", shape(174.0)),
            GeometryRecord::new("999".into(), "Unmatched", shape(175.0)),
        ];
        let districts = ["001", "002"].iter().enumerate()
            .map(|(i, key)| {
                let mut values = AttributeValues::default();
                values.set(AttributeId::PctNoTel, Some(0.1 * (i + 1) as f64));
                DistrictRecord::new((*key).into(), &format!("District {key}"), values)
            })
            .collect();
        let population: Vec<_> = AgeBand::all()
            .flat_map(|band| [
                PopulationAgeRecord { key: "ALL".into(), band, male: 10.0, female: 12.0 },
                PopulationAgeRecord { key: "001".into(), band, male: 1.0, female: 2.0 },
            ])
            .collect();
        let dataset = Dataset::new(geometries, districts, PopulationTable::new(population, DistrictKey::new("ALL")));
        InteractionController::new(Arc::new(dataset), AtlasConfig::default())
    }

    fn render(controller: &InteractionController) -> String {
        let mut writer = SvgStringWriter::new();
        write_document(&mut writer, controller).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn draws_every_region_and_bar() {
        let svg = render(&controller());
        assert_eq!(svg.matches(r#"<path class="region "#).count(), 3);
        assert_eq!(svg.matches(r#"<rect class="bar "#).count(), 2);
        assert!(svg.contains("Far North &amp; Co has 10% % Without Telecommunications"));
        // The unmatched region is drawn with the no-data fill.
        assert!(svg.contains("Unmatched has no data"));
        assert!(svg.contains("fill:rgb(204,204,204)"));
        assert!(svg.contains(r#"class="graticule""#));
        assert!(svg.contains(">No data</text>"));
    }

    #[test]
    fn titles_follow_state() {
        let mut controller = controller();
        let svg = render(&controller);
        assert!(svg.contains(">% Without Telecommunications</text>"));
        assert!(svg.contains(">Population by age: All districts</text>"));

        controller.handle(Event::AttributeChange(AttributeId::TotalPop));
        controller.handle(Event::DistrictSelect(Selection::District("001".into())));
        let svg = render(&controller);
        assert!(svg.contains(">Total Population</text>"));
        assert!(svg.contains(">Population by age: District 001</text>"));
        assert_eq!(svg.matches(r#"<rect class="male""#).count(), 18);
        assert_eq!(svg.matches(r#"<rect class="female""#).count(), 18);
        assert!(svg.contains(">85+</text>"));
    }

    #[test]
    fn pyramid_bars_sit_below_the_title() {
        let controller = controller();
        let config = controller.config();
        let svg = render(&controller);

        let pyramid_top = config.chart.height;
        assert!(svg.contains(&format!(r#"<g class="pyramid" transform="translate({},{pyramid_top})">"#, config.map.width)));
        assert!(svg.contains(&format!(r#"<g class="bars" transform="translate(0,{})">"#, config.pyramid.title_offset)));

        // Female counts are the largest in the aggregate rows, so those bars fill the viewport.
        let full = format!(r#"y="0.000" width="{:.3}" height="{:.3}""#,
            controller.pyramid().female_bars[0].geometry.width, config.pyramid.height);
        assert!(svg.contains(&full));

        let legend_top = pyramid_top + config.pyramid.title_offset + config.pyramid.height + AGE_LABEL_HEIGHT;
        assert!(svg.contains(&format!(r#"<g class="legend" transform="translate({},{legend_top})">"#, config.map.width)));
    }
}
