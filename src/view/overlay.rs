use std::collections::BTreeMap;

use serde::Serialize;

use crate::{config::OverlayConfig, types::{AgeBand, DistrictKey}};

/// Identity of a hover overlay. At most one overlay exists per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OverlayKey {
    /// A map region or ranked bar.
    District(DistrictKey),
    /// A pyramid bar of the given population key.
    AgeBand(DistrictKey, AgeBand),
}

/// A transient info label near the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub key: OverlayKey,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Position of an overlay's top-left corner for a pointer position.
/// The overlay sits right of and above the pointer, flips to the left/up near
/// the right/bottom edges, and is finally clamped inside the viewport.
pub fn place_overlay(pointer: (f64, f64), viewport: (f64, f64), config: &OverlayConfig) -> (f64, f64) {
    let (width, height) = (viewport.0.max(0.0), viewport.1.max(0.0));
    let px = if pointer.0.is_finite() { pointer.0.clamp(0.0, width) } else { 0.0 };
    let py = if pointer.1.is_finite() { pointer.1.clamp(0.0, height) } else { 0.0 };

    let x = if px < width - config.edge_x { px + config.offset_x } else { px - config.flipped_x };
    let y = if py - config.offset_y < height - config.edge_y { py - config.offset_y } else { py - config.flipped_y };

    (
        x.clamp(0.0, (width - config.width).max(0.0)),
        y.clamp(0.0, (height - config.height).max(0.0)),
    )
}

/// Active hover overlays keyed by target, so a leave removes exactly the
/// overlay its enter created.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    overlays: BTreeMap<OverlayKey, Overlay>,
}

impl OverlayRegistry {
    pub fn new() -> Self { Self::default() }

    /// Show an overlay, replacing any existing overlay with the same key.
    pub fn enter(&mut self, overlay: Overlay) {
        self.overlays.insert(overlay.key.clone(), overlay);
    }

    /// Move an existing overlay. Returns false if no overlay has this key.
    pub fn move_to(&mut self, key: &OverlayKey, position: (f64, f64)) -> bool {
        match self.overlays.get_mut(key) {
            Some(overlay) => {
                (overlay.x, overlay.y) = position;
                true
            }
            None => false,
        }
    }

    /// Remove the overlay for `key`, if any.
    pub fn leave(&mut self, key: &OverlayKey) -> Option<Overlay> {
        self.overlays.remove(key)
    }

    #[inline] pub fn get(&self, key: &OverlayKey) -> Option<&Overlay> { self.overlays.get(key) }
    #[inline] pub fn len(&self) -> usize { self.overlays.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.overlays.is_empty() }
    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Overlay> { self.overlays.values() }
}
