//! Applies a layer keep-set and the street road-class filter to a decoded tile.

use crate::vector_tile::{TileFeature, TileLayer, VectorTile};
use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashSet};

/// The set of layer names retained for a run.
pub type KeepSet = BTreeSet<String>;

/// The only layer whose features are filtered individually.
pub const STREETS_LAYER: &str = "streets";

lazy_static! {
	/// Road classes kept in the `streets` layer. Everything else (motorways,
	/// footways, steps, ...) is dropped as unroutable for the target vehicles.
	pub static ref STREET_KINDS: HashSet<&'static str> = HashSet::from([
		"track",
		"path",
		"service",
		"unclassified",
		"residential",
		"tertiary",
		"secondary",
		"primary",
		"trunk",
		"living_street",
		"pedestrian",
		"taxiway",
		"busway",
	]);
}

/// Drops layers not in `keep` and filters `streets` features by road class.
///
/// Returns whether the tile changed; an unchanged tile must not be
/// re-encoded, so the caller can skip the database write.
pub fn thin_tile(tile: &mut VectorTile, keep: &KeepSet) -> bool {
	let mut modified = false;

	tile.layers.retain(|layer| {
		let retained = keep.contains(&layer.name);
		modified |= !retained;
		retained
	});

	for layer in &mut tile.layers {
		if layer.name == STREETS_LAYER {
			modified |= filter_street_features(layer);
		}
	}

	modified
}

fn filter_street_features(layer: &mut TileLayer) -> bool {
	let features = std::mem::take(&mut layer.features);
	let count_before = features.len();

	let kept: Vec<TileFeature> = features
		.into_iter()
		.filter(|feature| keep_street_feature(layer, feature))
		.collect();

	let changed = kept.len() != count_before;
	layer.features = kept;
	changed
}

/// A street feature is dropped only when its `kind` tag decodes to a string
/// outside the whitelist. Malformed or out-of-range tags keep the feature:
/// parse uncertainty must never cause data loss.
fn keep_street_feature(layer: &TileLayer, feature: &TileFeature) -> bool {
	let Some(tags) = layer.decoded_tags(feature) else {
		return true;
	};

	for (key, value) in tags {
		if key == "kind" {
			if let Some(kind) = value.as_str() {
				return STREET_KINDS.contains(kind);
			}
		}
	}

	true
}
