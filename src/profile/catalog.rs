//! The fixed catalog of layer names a source archive may contain.

use crate::transform::KeepSet;

/// Known layers, with human descriptions for profile editors.
pub const LAYER_CATALOG: &[(&str, &str)] = &[
	("addresses", "House numbers"),
	("aerialways", "Cable cars and ski lifts"),
	("boundaries", "Administrative boundaries"),
	("boundary_labels", "Labels for administrative boundaries"),
	("bridges", "Bridge outlines"),
	("buildings", "Building footprints"),
	("dam_lines", "Dams drawn as lines"),
	("ferries", "Ferry routes"),
	("land", "Land cover"),
	("ocean", "Ocean polygons"),
	("pier_lines", "Piers drawn as lines"),
	("pier_polygons", "Piers drawn as polygons"),
	("place_labels", "City, town and village labels"),
	("pois", "Points of interest"),
	("public_transport", "Public transport stops"),
	("sites", "Site perimeters (schools, hospitals, ...)"),
	("streets", "Street centerlines"),
	("street_labels", "Street name labels"),
	("street_labels_points", "Label points for short streets"),
	("street_polygons", "Pedestrian squares and wide roads as polygons"),
	("streets_polygons_labels", "Labels for street polygons"),
	("water_lines", "Rivers and streams"),
	("water_lines_labels", "Labels for rivers and streams"),
	("water_polygons", "Lakes and wide rivers"),
	("water_polygons_labels", "Labels for water polygons"),
];

/// Layers a freshly seeded default profile does NOT keep.
pub const DEFAULT_NOT_KEPT: &[&str] = &[
	"addresses",
	"aerialways",
	"boundaries",
	"boundary_labels",
	"bridges",
	"buildings",
	"dam_lines",
	"ferries",
	"ocean",
	"pier_lines",
	"pier_polygons",
	"place_labels",
	"pois",
	"public_transport",
	"street_polygons",
	"street_labels_points",
	"streets_polygons_labels",
	"sites",
	"water_lines",
	"water_lines_labels",
	"water_polygons_labels",
];

/// The catalog minus [`DEFAULT_NOT_KEPT`]: the seed keep-set.
pub fn default_keep_set() -> KeepSet {
	LAYER_CATALOG
		.iter()
		.map(|(name, _)| name.to_string())
		.filter(|name| !DEFAULT_NOT_KEPT.contains(&name.as_str()))
		.collect()
}

pub fn is_known_layer(name: &str) -> bool {
	LAYER_CATALOG.iter().any(|(known, _)| *known == name)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_kept_entries_exist_in_the_catalog() {
		for name in DEFAULT_NOT_KEPT {
			assert!(is_known_layer(name), "{name} is not a catalog layer");
		}
	}

	#[test]
	fn seed_keep_set() {
		let keep = default_keep_set();
		assert_eq!(
			keep.iter().map(String::as_str).collect::<Vec<_>>(),
			vec!["land", "street_labels", "streets", "water_polygons"]
		);
	}
}
