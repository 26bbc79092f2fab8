use super::layer::TileLayer;
use crate::{
	io::{ValueReader, ValueWriter},
	types::Blob,
	utils::{compress_gzip, decompress_gzip},
};
use anyhow::{bail, ensure, Context, Result};

/// A decoded vector tile: an ordered list of layers (MVT `Tile` message).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<TileLayer>,
}

impl VectorTile {
	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = ValueReader::new(blob.as_slice());

		let mut tile = VectorTile::default();
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => tile.layers.push(
					TileLayer::read(
						&mut reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for layer")?,
					)
					.context("Failed to read layer")?,
				),
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriter::new();

		for layer in &self.layers {
			writer.write_pbf_key(3, 2)?;
			writer
				.write_pbf_blob(&layer.to_blob().context("Failed to encode layer")?)
				.context("Failed to write layer")?;
		}

		Ok(writer.into_blob())
	}

	/// Decodes a gzip-framed MVT payload as stored in an MBTiles row.
	pub fn from_gzip_blob(blob: &Blob) -> Result<VectorTile> {
		ensure!(!blob.is_empty(), "empty tile payload");
		let raw = decompress_gzip(blob).context("Failed to decompress tile payload")?;
		VectorTile::from_blob(&raw).context("Failed to decode vector tile")
	}

	/// Encodes and gzip-compresses for storage in an MBTiles row.
	pub fn to_gzip_blob(&self) -> Result<Blob> {
		compress_gzip(&self.to_blob().context("Failed to encode vector tile")?)
	}

	pub fn find_layer(&self, name: &str) -> Option<&TileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}
}
