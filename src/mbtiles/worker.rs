use crate::{
	transform::{thin_tile, KeepSet},
	types::Blob,
	vector_tile::VectorTile,
};
use anyhow::Result;
use futures::{stream, StreamExt};
use log::warn;
use std::{fmt, sync::Arc};

/// Primary key of a row in the `tiles` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
	pub zoom_level: i64,
	pub tile_column: i64,
	pub tile_row: i64,
}

impl fmt::Display for TileKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.zoom_level, self.tile_column, self.tile_row)
	}
}

/// Per-tile result of a batch run.
pub enum TileOutcome {
	/// Nothing to write back: the tile decodes but the keep-set changed nothing.
	Unchanged,
	/// The re-encoded payload to write back.
	Rewritten(Blob),
	/// Decode or re-encode failed; the row is left byte-identical.
	Failed,
}

/// Runs decode → thin → encode for a batch of rows, fanned out over all
/// cores. Per-tile failures are non-fatal: archives in the wild contain
/// sporadic empty or corrupt blobs, and one of them must never abort a run.
pub async fn process_batch(batch: Vec<(TileKey, Blob)>, keep: Arc<KeepSet>) -> Vec<(TileKey, TileOutcome)> {
	stream::iter(batch)
		.map(|(key, blob)| {
			let keep = Arc::clone(&keep);
			tokio::spawn(async move { (key, process_tile(&blob, &keep)) })
		})
		.buffer_unordered(num_cpus::get())
		.map(|joined| {
			let (key, result) = joined.expect("tile worker panicked");
			match result {
				Ok(Some(blob)) => (key, TileOutcome::Rewritten(blob)),
				Ok(None) => (key, TileOutcome::Unchanged),
				Err(error) => {
					warn!("tile {key} left unchanged: {error:#}");
					(key, TileOutcome::Failed)
				}
			}
		})
		.collect()
		.await
}

fn process_tile(blob: &Blob, keep: &KeepSet) -> Result<Option<Blob>> {
	let mut tile = VectorTile::from_gzip_blob(blob)?;

	if !thin_tile(&mut tile, keep) {
		return Ok(None);
	}

	Ok(Some(tile.to_gzip_blob()?))
}
