use super::{default_keep_set, Profile, ProfileError, SEED_PROFILE_ID, SEED_PROFILE_NAME};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, ProfileError>;

/// SQLite-backed store of [`Profile`]s.
///
/// A single table keyed by id; name uniqueness is case-insensitive. The
/// store is externally synchronized: operations are internally consistent
/// but callers serialize access.
pub struct ProfileStore {
	connection: Connection,
}

impl ProfileStore {
	pub fn open(path: &Path) -> Result<ProfileStore> {
		Self::setup(Connection::open(path)?)
	}

	pub fn open_in_memory() -> Result<ProfileStore> {
		Self::setup(Connection::open_in_memory()?)
	}

	fn setup(connection: Connection) -> Result<ProfileStore> {
		connection.execute(
			"CREATE TABLE IF NOT EXISTS profiles (
				id TEXT PRIMARY KEY,
				name TEXT NOT NULL UNIQUE COLLATE NOCASE,
				layers_to_keep TEXT NOT NULL,
				is_default INTEGER NOT NULL DEFAULT 0
			)",
			[],
		)?;
		Ok(ProfileStore { connection })
	}

	/// All profiles, ordered by name.
	pub fn list(&self) -> Result<Vec<Profile>> {
		let mut stmt = self.connection.prepare(
			"SELECT id, name, layers_to_keep, is_default FROM profiles ORDER BY name COLLATE NOCASE ASC",
		)?;
		let profiles = stmt
			.query_map([], row_to_profile)?
			.collect::<std::result::Result<Vec<_>, _>>()?;
		Ok(profiles)
	}

	pub fn get(&self, id: &str) -> Result<Profile> {
		self
			.connection
			.query_row(
				"SELECT id, name, layers_to_keep, is_default FROM profiles WHERE id = ?1",
				[id],
				row_to_profile,
			)
			.optional()?
			.ok_or_else(|| ProfileError::NotFound(id.to_string()))
	}

	/// The unique default profile.
	///
	/// A non-empty store that lost its default (the default was deleted)
	/// repairs itself here by promoting the first profile by name. Returns
	/// `NotFound` only for an empty store.
	pub fn get_default(&mut self) -> Result<Profile> {
		let default = self
			.connection
			.query_row(
				"SELECT id, name, layers_to_keep, is_default FROM profiles WHERE is_default = 1",
				[],
				row_to_profile,
			)
			.optional()?;

		if let Some(profile) = default {
			return Ok(profile);
		}

		let first = self.list()?.into_iter().next();
		match first {
			Some(profile) => {
				info!("no default profile, promoting {:?}", profile.name);
				self.set_default(&profile.id)?;
				self.get(&profile.id)
			}
			None => Err(ProfileError::NotFound("default".to_string())),
		}
	}

	pub fn insert(&mut self, profile: &Profile) -> Result<()> {
		self.check_name_conflict(&profile.name, Some(profile.id.as_str()))?;

		let tx = self.connection.transaction()?;
		if profile.is_default {
			tx.execute("UPDATE profiles SET is_default = 0", [])?;
		}
		tx.execute(
			"INSERT INTO profiles (id, name, layers_to_keep, is_default) VALUES (?1, ?2, ?3, ?4)",
			params![
				profile.id,
				profile.name,
				profile.layers_as_text(),
				profile.is_default
			],
		)?;
		tx.commit()?;
		Ok(())
	}

	/// Replaces the profile with the same id.
	pub fn update(&mut self, profile: &Profile) -> Result<()> {
		self.check_name_conflict(&profile.name, Some(profile.id.as_str()))?;

		let tx = self.connection.transaction()?;
		if profile.is_default {
			tx.execute("UPDATE profiles SET is_default = 0", [])?;
		}
		let changed = tx.execute(
			"UPDATE profiles SET name = ?2, layers_to_keep = ?3, is_default = ?4 WHERE id = ?1",
			params![
				profile.id,
				profile.name,
				profile.layers_as_text(),
				profile.is_default
			],
		)?;
		tx.commit()?;

		if changed == 0 {
			return Err(ProfileError::NotFound(profile.id.clone()));
		}
		Ok(())
	}

	pub fn delete(&mut self, id: &str) -> Result<()> {
		let changed = self.connection.execute("DELETE FROM profiles WHERE id = ?1", [id])?;
		if changed == 0 {
			return Err(ProfileError::NotFound(id.to_string()));
		}
		Ok(())
	}

	/// Atomically moves the default flag onto `id`.
	pub fn set_default(&mut self, id: &str) -> Result<()> {
		let tx = self.connection.transaction()?;
		tx.execute("UPDATE profiles SET is_default = 0", [])?;
		let changed = tx.execute("UPDATE profiles SET is_default = 1 WHERE id = ?1", [id])?;
		tx.commit()?;

		if changed == 0 {
			return Err(ProfileError::NotFound(id.to_string()));
		}
		Ok(())
	}

	/// Startup repair: guarantees a usable default profile.
	///
	/// Seeds the store when empty; reseeds the default's layer set when it
	/// is empty (an empty keep-set would drop every layer of every tile).
	pub fn ensure_valid_default(&mut self) -> Result<()> {
		match self.get_default() {
			Ok(mut profile) => {
				if profile.layers_to_keep.is_empty() {
					info!("default profile {:?} keeps no layers, reseeding", profile.name);
					profile.layers_to_keep = default_keep_set();
					self.update(&profile)?;
				}
				Ok(())
			}
			Err(ProfileError::NotFound(_)) => {
				info!("profile store is empty, seeding {:?}", SEED_PROFILE_NAME);
				let mut seed = Profile::new(SEED_PROFILE_ID, SEED_PROFILE_NAME, default_keep_set());
				seed.is_default = true;
				self.insert(&seed)
			}
			Err(error) => Err(error),
		}
	}

	fn check_name_conflict(&self, name: &str, excluding_id: Option<&str>) -> Result<()> {
		let conflict: Option<String> = self
			.connection
			.query_row(
				"SELECT id FROM profiles WHERE name = ?1 COLLATE NOCASE AND id != ?2",
				params![name, excluding_id.unwrap_or("")],
				|row| row.get(0),
			)
			.optional()?;

		match conflict {
			Some(_) => Err(ProfileError::NameConflict(name.to_string())),
			None => Ok(()),
		}
	}
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
	Ok(Profile {
		id: row.get(0)?,
		name: row.get(1)?,
		layers_to_keep: Profile::layers_from_text(&row.get::<_, String>(2)?),
		is_default: row.get::<_, i64>(3)? != 0,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::KeepSet;

	fn store_with(names: &[&str]) -> ProfileStore {
		let mut store = ProfileStore::open_in_memory().unwrap();
		for name in names {
			store
				.insert(&Profile::new(
					&name.to_lowercase(),
					name,
					Profile::layers_from_text("streets"),
				))
				.unwrap();
		}
		store
	}

	#[test]
	fn list_orders_by_name() {
		let store = store_with(&["Zebra", "alpha", "Mango"]);
		let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
		assert_eq!(names, vec!["alpha", "Mango", "Zebra"]);
	}

	#[test]
	fn get_unknown_id_is_not_found() {
		let store = store_with(&[]);
		assert!(matches!(store.get("nope"), Err(ProfileError::NotFound(_))));
	}

	#[test]
	fn insert_rejects_case_insensitive_name_conflict() {
		let mut store = store_with(&["Touring"]);
		let result = store.insert(&Profile::new("other", "TOURING", KeepSet::new()));
		assert!(matches!(result, Err(ProfileError::NameConflict(_))));
	}

	#[test]
	fn update_allows_keeping_own_name() {
		let mut store = store_with(&["Touring"]);
		let mut profile = store.get("touring").unwrap();
		profile.layers_to_keep = Profile::layers_from_text("land,streets");
		store.update(&profile).unwrap();
		assert_eq!(store.get("touring").unwrap().layers_to_keep.len(), 2);
	}

	#[test]
	fn update_unknown_id_is_not_found() {
		let mut store = store_with(&[]);
		let result = store.update(&Profile::new("ghost", "Ghost", KeepSet::new()));
		assert!(matches!(result, Err(ProfileError::NotFound(_))));
	}

	#[test]
	fn set_default_moves_the_flag() {
		let mut store = store_with(&["One", "Two"]);
		store.set_default("one").unwrap();
		store.set_default("two").unwrap();

		let defaults: Vec<String> = store
			.list()
			.unwrap()
			.into_iter()
			.filter(|p| p.is_default)
			.map(|p| p.id)
			.collect();
		assert_eq!(defaults, vec!["two"]);
	}

	#[test]
	fn get_default_repairs_after_delete() {
		let mut store = store_with(&["One", "Two"]);
		store.set_default("two").unwrap();
		store.delete("two").unwrap();

		let repaired = store.get_default().unwrap();
		assert_eq!(repaired.id, "one");
		assert!(repaired.is_default);
	}

	#[test]
	fn get_default_on_empty_store_is_not_found() {
		let mut store = store_with(&[]);
		assert!(matches!(store.get_default(), Err(ProfileError::NotFound(_))));
	}

	#[test]
	fn ensure_valid_default_seeds_empty_store() {
		let mut store = store_with(&[]);
		store.ensure_valid_default().unwrap();

		let seeded = store.get_default().unwrap();
		assert_eq!(seeded.id, SEED_PROFILE_ID);
		assert_eq!(seeded.name, SEED_PROFILE_NAME);
		assert!(!seeded.layers_to_keep.is_empty());
	}

	#[test]
	fn ensure_valid_default_reseeds_empty_keep_set() {
		let mut store = store_with(&[]);
		let mut profile = Profile::new("p1", "Empty", KeepSet::new());
		profile.is_default = true;
		store.insert(&profile).unwrap();

		store.ensure_valid_default().unwrap();

		let repaired = store.get_default().unwrap();
		assert_eq!(repaired.id, "p1");
		assert_eq!(repaired.layers_to_keep, default_keep_set());
	}

	#[test]
	fn at_most_one_default_after_inserts() {
		let mut store = store_with(&[]);
		for (id, name) in [("a", "A"), ("b", "B")] {
			let mut profile = Profile::new(id, name, Profile::layers_from_text("streets"));
			profile.is_default = true;
			store.insert(&profile).unwrap();
		}

		let defaults = store.list().unwrap().into_iter().filter(|p| p.is_default).count();
		assert_eq!(defaults, 1);
	}
}
