use super::driver::SlimError;
use crate::{types::Blob, vector_tile::VectorTile};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;

/// What `probe` reports about an archive.
#[derive(Debug)]
pub struct ArchiveInfo {
	pub tile_count: u64,
	pub zoom_range: Option<(i64, i64)>,
	/// Layer name and feature count of the first decodable tile.
	pub sample_layers: Vec<(String, usize)>,
}

/// Inspects an archive read-only: tile count, zoom range, and the layer
/// inventory of a sample tile.
pub fn probe_archive(path: &Path) -> Result<ArchiveInfo, SlimError> {
	let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

	let tiles: Option<String> = connection
		.query_row(
			"SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tiles'",
			[],
			|row| row.get(0),
		)
		.optional()?;
	if tiles.is_none() {
		return Err(SlimError::NotAnMbtiles(path.to_path_buf()));
	}

	let tile_count: u64 = connection.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;

	let zoom_range = match connection.query_row("SELECT MIN(zoom_level), MAX(zoom_level) FROM tiles", [], |row| {
		Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, Option<i64>>(1)?))
	})? {
		(Some(min), Some(max)) => Some((min, max)),
		_ => None,
	};

	Ok(ArchiveInfo {
		tile_count,
		zoom_range,
		sample_layers: sample_layers(&connection)?,
	})
}

/// Decodes the first readable tile; corrupt rows are skipped, as during a run.
fn sample_layers(connection: &Connection) -> Result<Vec<(String, usize)>, SlimError> {
	let mut stmt = connection.prepare("SELECT tile_data FROM tiles LIMIT 20")?;
	let blobs = stmt
		.query_map([], |row| Ok(Blob::from(row.get::<_, Vec<u8>>(0)?)))?
		.collect::<Result<Vec<_>, _>>()?;

	for blob in blobs {
		if let Ok(tile) = VectorTile::from_gzip_blob(&blob) {
			return Ok(
				tile
					.layers
					.iter()
					.map(|layer| (layer.name.clone(), layer.features.len()))
					.collect(),
			);
		}
	}

	Ok(Vec::new())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vector_tile::{GeomType, TileFeature, TileLayer};
	use anyhow::Result;
	use assert_fs::TempDir;
	use rusqlite::params;
	use std::path::PathBuf;

	fn create_archive(dir: &TempDir, tiles: &[(i64, i64, i64, Vec<u8>)]) -> Result<PathBuf> {
		let path = dir.path().join("probe.mbtiles");
		let connection = Connection::open(&path)?;
		connection.execute(
			"CREATE TABLE tiles (
				zoom_level INTEGER NOT NULL,
				tile_column INTEGER NOT NULL,
				tile_row INTEGER NOT NULL,
				tile_data BLOB NOT NULL,
				PRIMARY KEY (zoom_level, tile_column, tile_row)
			)",
			(),
		)?;
		for (z, x, y, data) in tiles {
			connection.execute(
				"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
				params![z, x, y, data],
			)?;
		}
		Ok(path)
	}

	fn encode_tile(layer_names: &[&str]) -> Vec<u8> {
		let tile = VectorTile {
			layers: layer_names
				.iter()
				.map(|name| TileLayer {
					name: name.to_string(),
					features: vec![TileFeature {
						id: Some(1),
						tag_ids: vec![],
						geom_type: GeomType::Point,
						geom_data: Blob::from(&[0x09, 0x02, 0x02]),
					}],
					keys: vec![],
					values: vec![],
					extent: 4096,
					version: 2,
				})
				.collect(),
		};
		tile.to_gzip_blob().unwrap().into_vec()
	}

	#[test]
	fn empty_archive_has_no_zoom_range() -> Result<()> {
		let dir = TempDir::new()?;
		let path = create_archive(&dir, &[])?;

		let info = probe_archive(&path)?;

		assert_eq!(info.tile_count, 0);
		assert_eq!(info.zoom_range, None);
		assert!(info.sample_layers.is_empty());
		Ok(())
	}

	#[test]
	fn populated_archive() -> Result<()> {
		let dir = TempDir::new()?;
		let path = create_archive(
			&dir,
			&[
				(5, 1, 2, encode_tile(&["land", "streets"])),
				(7, 10, 20, encode_tile(&["land"])),
				(12, 100, 200, encode_tile(&["land"])),
			],
		)?;

		let info = probe_archive(&path)?;

		assert_eq!(info.tile_count, 3);
		assert_eq!(info.zoom_range, Some((5, 12)));
		assert_eq!(
			info.sample_layers,
			vec![("land".to_string(), 1), ("streets".to_string(), 1)]
		);
		Ok(())
	}

	#[test]
	fn corrupt_leading_tiles_are_skipped() -> Result<()> {
		let dir = TempDir::new()?;
		let path = create_archive(
			&dir,
			&[
				(5, 0, 0, Vec::new()),
				(5, 1, 0, vec![0xDE, 0xAD, 0xBE, 0xEF]),
				(5, 2, 0, encode_tile(&["water_polygons"])),
			],
		)?;

		let info = probe_archive(&path)?;

		assert_eq!(info.tile_count, 3);
		assert_eq!(info.sample_layers, vec![("water_polygons".to_string(), 1)]);
		Ok(())
	}

	#[test]
	fn archive_of_only_corrupt_tiles_has_no_sample() -> Result<()> {
		let dir = TempDir::new()?;
		let path = create_archive(&dir, &[(5, 0, 0, Vec::new())])?;

		let info = probe_archive(&path)?;

		assert_eq!(info.zoom_range, Some((5, 5)));
		assert!(info.sample_layers.is_empty());
		Ok(())
	}

	#[test]
	fn rejects_database_without_tiles_table() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("notes.sqlite");
		let connection = Connection::open(&path)?;
		connection.execute("CREATE TABLE notes (body TEXT)", ())?;
		drop(connection);

		let result = probe_archive(&path);

		assert!(matches!(result, Err(SlimError::NotAnMbtiles(_))));
		Ok(())
	}
}
