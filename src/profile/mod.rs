//! Named layer selections and their SQLite-backed store.

mod catalog;
mod store;

pub use catalog::{default_keep_set, is_known_layer, DEFAULT_NOT_KEPT, LAYER_CATALOG};
pub use store::ProfileStore;

use crate::transform::KeepSet;

/// Stable id of the seeded default profile.
pub const SEED_PROFILE_ID: &str = "default";

/// Name of the seeded default profile.
pub const SEED_PROFILE_NAME: &str = "Default";

/// A named set of layers to keep during processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
	pub id: String,
	pub name: String,
	pub layers_to_keep: KeepSet,
	pub is_default: bool,
}

impl Profile {
	pub fn new(id: &str, name: &str, layers_to_keep: KeepSet) -> Profile {
		Profile {
			id: id.to_string(),
			name: name.to_string(),
			layers_to_keep,
			is_default: false,
		}
	}

	/// Serializes the keep-set for the store (comma-separated, empty allowed).
	pub(crate) fn layers_as_text(&self) -> String {
		self
			.layers_to_keep
			.iter()
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(",")
	}

	/// Parses a comma-separated layer list (empty entries are ignored).
	pub fn layers_from_text(text: &str) -> KeepSet {
		text
			.split(',')
			.filter(|name| !name.is_empty())
			.map(str::to_string)
			.collect()
	}
}

/// Errors surfaced by the profile store.
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
	#[error("a profile named {0:?} already exists")]
	NameConflict(String),

	#[error("profile {0:?} not found")]
	NotFound(String),

	#[error("profile store error: {0}")]
	Db(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layers_text_round_trip() {
		let profile = Profile::new("p1", "Test", Profile::layers_from_text("streets,land"));
		assert_eq!(profile.layers_as_text(), "land,streets");
		assert_eq!(
			Profile::layers_from_text(&profile.layers_as_text()),
			profile.layers_to_keep
		);
	}

	#[test]
	fn empty_layers_text() {
		assert!(Profile::layers_from_text("").is_empty());
		assert_eq!(Profile::new("p1", "Test", KeepSet::new()).layers_as_text(), "");
	}
}
