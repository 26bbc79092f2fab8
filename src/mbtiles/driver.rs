use super::{
	cancel::CancelToken,
	worker::{process_batch, TileKey, TileOutcome},
};
use crate::{progress::ProgressSink, transform::KeepSet, types::Blob};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

/// Rows read per driver iteration. Bounds in-flight memory to one batch of
/// payloads and keeps progress granular without drowning SQLite in
/// per-row transactions.
pub const BATCH_SIZE: usize = 100;

const MB: usize = 1024 * 1024;

/// Fatal errors of an archive run. Per-tile decode failures are not here:
/// they are swallowed, logged, and counted in [`RunSummary`].
#[derive(thiserror::Error, Debug)]
pub enum SlimError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("{0:?} is not an MBTiles archive: it has no tiles table")]
	NotAnMbtiles(PathBuf),

	#[error("database error: {0}")]
	Db(#[from] rusqlite::Error),

	#[error("the run was cancelled")]
	Cancelled,
}

/// Counters reported after a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
	pub processed: u64,
	pub modified: u64,
	pub decode_failures: u64,
}

/// Rewrites `input` into `output`, keeping only the layers in `keep` and the
/// whitelisted road classes of the `streets` layer.
///
/// All work happens on a staged copy (`<input>.temp`); the source file is
/// never written. On any failure or cancellation the staged copy is deleted
/// and no output appears. On success the result is moved under `output`
/// atomically and the staged copy is removed.
pub async fn slim_archive(
	input: &Path,
	output: &Path,
	keep: &KeepSet,
	progress: &mut dyn ProgressSink,
	cancel: &CancelToken,
) -> Result<RunSummary, SlimError> {
	let stage = stage_path(input);

	info!("staging {input:?} to {stage:?}");
	fs::copy(input, &stage)?;

	let result = run_pipeline(&stage, input, output, keep, progress, cancel).await;

	match &result {
		Ok(summary) => info!(
			"finished: processed={} modified={} decode_failures={}",
			summary.processed, summary.modified, summary.decode_failures
		),
		Err(_) => {
			// the connection is closed by now; drop the staged copy
			let _ = fs::remove_file(&stage);
		}
	}

	result
}

async fn run_pipeline(
	stage: &Path,
	input: &Path,
	output: &Path,
	keep: &KeepSet,
	progress: &mut dyn ProgressSink,
	cancel: &CancelToken,
) -> Result<RunSummary, SlimError> {
	let mut connection = Connection::open(stage)?;
	connection.pragma_update(None, "temp_store", "memory")?;
	connection.pragma_update(None, "mmap_size", 256 * MB)?;

	validate(&connection, input)?;

	let total: u64 = connection.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
	info!("{total} tiles to process");
	progress.report(0.0);

	let keep = Arc::new(keep.clone());
	let mut summary = RunSummary::default();

	loop {
		if cancel.is_cancelled() {
			return Err(SlimError::Cancelled);
		}

		let batch = read_batch(&connection, summary.processed)?;
		if batch.is_empty() {
			break;
		}
		let batch_len = batch.len() as u64;

		let results = process_batch(batch, Arc::clone(&keep)).await;

		let mut rewritten: Vec<(TileKey, Blob)> = Vec::new();
		for (key, outcome) in results {
			match outcome {
				TileOutcome::Unchanged => {}
				TileOutcome::Rewritten(blob) => rewritten.push((key, blob)),
				TileOutcome::Failed => summary.decode_failures += 1,
			}
		}

		// one transaction per batch, skipped entirely when nothing changed
		if !rewritten.is_empty() {
			summary.modified += rewritten.len() as u64;
			write_batch(&mut connection, &rewritten)?;
		}

		summary.processed += batch_len;
		debug!("batch done, {}/{total} tiles", summary.processed);
		progress.report(summary.processed as f64 / total.max(1) as f64);
	}

	if cancel.is_cancelled() {
		return Err(SlimError::Cancelled);
	}

	// without the vacuum, dropped layers only free logical pages and the
	// file does not shrink
	info!("compacting the staged database");
	connection.execute("VACUUM", [])?;
	drop(connection);

	if cancel.is_cancelled() {
		return Err(SlimError::Cancelled);
	}

	info!("publishing to {output:?}");
	publish(stage, output)?;
	progress.report(1.0);

	Ok(summary)
}

/// The staged working copy lives next to the source.
fn stage_path(input: &Path) -> PathBuf {
	let mut path = input.as_os_str().to_os_string();
	path.push(".temp");
	PathBuf::from(path)
}

fn validate(connection: &Connection, input: &Path) -> Result<(), SlimError> {
	let tiles: Option<String> = connection
		.query_row(
			"SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tiles'",
			[],
			|row| row.get(0),
		)
		.optional()?;

	match tiles {
		Some(_) => Ok(()),
		None => Err(SlimError::NotAnMbtiles(input.to_path_buf())),
	}
}

/// Pagination over `tiles` is stable: the run updates rows but never inserts
/// or deletes any, so LIMIT/OFFSET walks each row exactly once.
fn read_batch(connection: &Connection, offset: u64) -> Result<Vec<(TileKey, Blob)>, rusqlite::Error> {
	let mut stmt = connection
		.prepare("SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles LIMIT ?1 OFFSET ?2")?;

	let rows = stmt
		.query_map(params![BATCH_SIZE as i64, offset as i64], |row| {
			Ok((
				TileKey {
					zoom_level: row.get(0)?,
					tile_column: row.get(1)?,
					tile_row: row.get(2)?,
				},
				Blob::from(row.get::<_, Vec<u8>>(3)?),
			))
		})?
		.collect::<Result<Vec<_>, _>>()?;

	Ok(rows)
}

fn write_batch(connection: &mut Connection, rewritten: &[(TileKey, Blob)]) -> Result<(), rusqlite::Error> {
	let tx = connection.transaction()?;
	{
		let mut stmt = tx.prepare(
			"UPDATE tiles SET tile_data = ?1 WHERE zoom_level = ?2 AND tile_column = ?3 AND tile_row = ?4",
		)?;
		for (key, blob) in rewritten {
			stmt.execute(params![
				blob.as_slice(),
				key.zoom_level,
				key.tile_column,
				key.tile_row
			])?;
		}
	}
	tx.commit()
}

/// The output path may be on another filesystem, so the stage is copied, not
/// renamed. The copy lands in a `.part` file next to the final path first;
/// the rename makes the finished output appear atomically.
fn publish(stage: &Path, output: &Path) -> std::io::Result<()> {
	let mut part = output.as_os_str().to_os_string();
	part.push(".part");
	let part = PathBuf::from(part);

	if let Err(error) = fs::copy(stage, &part).and_then(|_| fs::rename(&part, output)) {
		let _ = fs::remove_file(&part);
		return Err(error);
	}

	fs::remove_file(stage)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stage_path_appends_temp() {
		assert_eq!(
			stage_path(Path::new("/maps/region.mbtiles")),
			Path::new("/maps/region.mbtiles.temp")
		);
	}
}
