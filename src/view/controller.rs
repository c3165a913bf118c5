use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::AtlasConfig,
    data::{AttributeRecord, Dataset},
    types::{AgeBand, AttributeId, DistrictKey, Selection},
    view::{
        bars, choropleth, legend, overlay::{place_overlay, Overlay, OverlayKey, OverlayRegistry}, pyramid,
        state::build_mapping, PyramidLayout, RankedBar, RegionFill, ViewState,
    },
};

/// The views a controller can recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    Choropleth,
    RankedBars,
    Legend,
    Pyramid,
    Overlays,
}

impl ViewKind {
    pub fn all() -> [ViewKind; 5] {
        [ViewKind::Choropleth, ViewKind::RankedBars, ViewKind::Legend, ViewKind::Pyramid, ViewKind::Overlays]
    }
}

/// Element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PointerTarget {
    Region(DistrictKey),
    Bar(DistrictKey),
    /// A pyramid bar, keyed by the population key it was drawn from
    /// (`PyramidLayout::key`).
    PyramidBar(DistrictKey, AgeBand),
}

/// User input the controller reacts to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    AttributeChange(AttributeId),
    DistrictSelect(Selection),
    PointerEnter { target: PointerTarget, pointer: (f64, f64) },
    PointerMove { target: PointerTarget, pointer: (f64, f64) },
    PointerLeave { target: PointerTarget },
}

impl Event {
    /// Views that must be recomputed after this event.
    pub fn affected_views(&self) -> &'static [ViewKind] {
        match self {
            Event::AttributeChange(_) => &[ViewKind::Choropleth, ViewKind::RankedBars, ViewKind::Legend],
            Event::DistrictSelect(_) => &[ViewKind::Pyramid],
            Event::PointerEnter { .. } | Event::PointerMove { .. } | Event::PointerLeave { .. } => &[ViewKind::Overlays],
        }
    }
}

/// Freshly computed output of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewUpdate {
    Choropleth(Vec<RegionFill>),
    RankedBars(Vec<RankedBar>),
    Legend(Vec<String>),
    Pyramid(PyramidLayout),
    Overlays(Vec<Overlay>),
}

impl ViewUpdate {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewUpdate::Choropleth(_) => ViewKind::Choropleth,
            ViewUpdate::RankedBars(_) => ViewKind::RankedBars,
            ViewUpdate::Legend(_) => ViewKind::Legend,
            ViewUpdate::Pyramid(_) => ViewKind::Pyramid,
            ViewUpdate::Overlays(_) => ViewKind::Overlays,
        }
    }
}

/// Owns the view state for a session and is its only writer. Events are
/// handled one at a time; every view is recomputed from the state and the
/// immutable dataset.
#[derive(Debug, Clone)]
pub struct InteractionController {
    dataset: Arc<Dataset>,
    config: AtlasConfig,
    state: ViewState,
    overlays: OverlayRegistry,
}

impl InteractionController {
    pub fn new(dataset: Arc<Dataset>, config: AtlasConfig) -> Self {
        let state = ViewState::initial(dataset.districts(), &config.colors);
        info!("[controller] initial attribute {}, selection {}", state.attribute, state.selection);
        Self { dataset, config, state, overlays: OverlayRegistry::new() }
    }

    #[inline] pub fn state(&self) -> &ViewState { &self.state }
    #[inline] pub fn dataset(&self) -> &Dataset { &self.dataset }
    #[inline] pub fn config(&self) -> &AtlasConfig { &self.config }
    #[inline] pub fn overlays(&self) -> &OverlayRegistry { &self.overlays }

    /// Apply an event and return the recomputed views it affects.
    pub fn handle(&mut self, event: Event) -> Vec<ViewUpdate> {
        debug!("[controller] {event:?}");
        let affected = event.affected_views();
        match event {
            Event::AttributeChange(attribute) => self.set_attribute(attribute),
            Event::DistrictSelect(selection) => self.set_selection(selection),
            Event::PointerEnter { target, pointer } => self.pointer_enter(target, pointer),
            Event::PointerMove { target, pointer } => self.pointer_move(target, pointer),
            Event::PointerLeave { target } => {
                let key = self.overlay_key(&target);
                self.overlays.leave(&key);
            }
        }
        affected.iter().map(|&kind| self.compute(kind)).collect()
    }

    /// Attribute change from free-form input. Unknown names keep the current
    /// attribute and recompute nothing.
    pub fn handle_attribute_input(&mut self, input: &str) -> Vec<ViewUpdate> {
        match input.parse::<AttributeId>() {
            Ok(attribute) => self.handle(Event::AttributeChange(attribute)),
            Err(e) => {
                warn!("[controller] {e}; keeping {}", self.state.attribute);
                Vec::new()
            }
        }
    }

    /// Every view, for an initial render.
    pub fn render_all(&self) -> Vec<ViewUpdate> {
        ViewKind::all().into_iter().map(|kind| self.compute(kind)).collect()
    }

    /// Recompute one view from the current state.
    pub fn compute(&self, kind: ViewKind) -> ViewUpdate {
        match kind {
            ViewKind::Choropleth => ViewUpdate::Choropleth(choropleth::fills(self.dataset.regions(), &self.state)),
            ViewKind::RankedBars => ViewUpdate::RankedBars(bars::layout(self.dataset.districts(), &self.state, &self.config.chart)),
            ViewKind::Legend => ViewUpdate::Legend(legend::labels(&self.state.mapping, self.state.attribute)),
            ViewKind::Pyramid => ViewUpdate::Pyramid(self.pyramid()),
            ViewKind::Overlays => ViewUpdate::Overlays(self.overlays.iter().cloned().collect()),
        }
    }

    pub fn pyramid(&self) -> PyramidLayout {
        let selection = self.dataset.population().select(&self.state.selection);
        pyramid::layout(&selection, &self.config.pyramid)
    }

    fn set_attribute(&mut self, attribute: AttributeId) {
        self.state.mapping = build_mapping(attribute, self.dataset.districts(), &self.config.colors);
        self.state.attribute = attribute;
        info!("[controller] attribute -> {attribute}");
    }

    fn set_selection(&mut self, selection: Selection) {
        self.state.selection = if self.dataset.population().contains(&selection) {
            selection
        } else {
            warn!("[controller] no population rows for {selection}; showing all districts");
            Selection::All
        };
        info!("[controller] selection -> {}", self.state.selection);
    }

    fn pointer_enter(&mut self, target: PointerTarget, pointer: (f64, f64)) {
        let Some(text) = self.overlay_text(&target) else {
            debug!("[controller] nothing to show for {target:?}");
            return;
        };
        let (x, y) = place_overlay(pointer, self.viewport_of(&target), &self.config.overlay);
        let key = self.overlay_key(&target);
        self.overlays.enter(Overlay { key, text, x, y });
    }

    fn pointer_move(&mut self, target: PointerTarget, pointer: (f64, f64)) {
        let position = place_overlay(pointer, self.viewport_of(&target), &self.config.overlay);
        let key = self.overlay_key(&target);
        if !self.overlays.move_to(&key, position) {
            self.pointer_enter(target, pointer);
        }
    }

    fn overlay_key(&self, target: &PointerTarget) -> OverlayKey {
        match target {
            PointerTarget::Region(key) | PointerTarget::Bar(key) => OverlayKey::District(key.clone()),
            PointerTarget::PyramidBar(key, band) => OverlayKey::AgeBand(key.clone(), *band),
        }
    }

    fn viewport_of(&self, target: &PointerTarget) -> (f64, f64) {
        match target {
            PointerTarget::Region(_) => (self.config.map.width, self.config.map.height),
            PointerTarget::Bar(_) => (self.config.chart.width, self.config.chart.height),
            PointerTarget::PyramidBar(..) => (self.config.pyramid.width, self.config.pyramid.height),
        }
    }

    fn overlay_text(&self, target: &PointerTarget) -> Option<String> {
        let attribute = self.state.attribute;
        match target {
            PointerTarget::Region(key) => self.dataset.regions().iter()
                .find(|r| r.key() == key)
                .map(|r| describe(r.name(), r.value(attribute), attribute)),
            PointerTarget::Bar(key) => self.dataset.districts().iter()
                .find(|d| d.key() == key)
                .map(|d| describe(d.name(), d.value(attribute), attribute)),
            PointerTarget::PyramidBar(key, band) => self.dataset.population().get(key, *band)
                .map(|r| format!("{}: {:.0} male, {:.0} female", band, r.male, r.female)),
        }
    }
}

/// Info label text, e.g. "Auckland has 12.5% % Maori".
pub(crate) fn describe(name: &str, value: Option<f64>, attribute: AttributeId) -> String {
    let value = value
        .map(|v| legend::format_value(v, attribute.format_kind()))
        .unwrap_or_else(|| "no data".to_string());
    format!("{name} has {value} {}", attribute.label())
}
