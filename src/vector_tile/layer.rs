use super::{feature::TileFeature, value::TileValue};
use crate::{
	io::{ValueReader, ValueWriter},
	types::Blob,
};
use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;

/// A named layer (MVT `Layer` message).
///
/// `keys` and `values` are the shared property tables; features reference
/// them by index. The tables are kept exactly as decoded: entries may become
/// unreferenced when features are dropped, but rebuilding the tables would
/// invalidate the tag indices of every remaining feature.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
	pub name: String,
	pub features: Vec<TileFeature>,
	pub keys: Vec<String>,
	pub values: Vec<TileValue>,
	pub extent: u32,
	pub version: u32,
}

impl TileLayer {
	pub fn read(reader: &mut ValueReader<'_>) -> Result<TileLayer> {
		let mut name = None;
		let mut features = Vec::new();
		let mut keys = Vec::new();
		let mut values = Vec::new();
		let mut extent = 4096;
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => features.push(
					TileFeature::read(
						&mut reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?,
					)
					.context("Failed to read feature")?,
				),
				(3, 2) => keys.push(reader.read_pbf_string().context("Failed to read property key")?),
				(4, 2) => values.push(
					TileValue::read(
						&mut reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for value")?,
					)
					.context("Failed to read property value")?,
				),
				(5, 0) => extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)?,
				(15, 0) => version = u32::try_from(reader.read_varint().context("Failed to read version")?)?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(TileLayer {
			name: name.ok_or_else(|| anyhow!("layer name is required"))?,
			features,
			keys,
			values,
			extent,
			version,
		})
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriter::new();

		writer.write_pbf_key(1, 2)?;
		writer
			.write_pbf_string(&self.name)
			.context("Failed to write layer name")?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to encode feature")?)
				.context("Failed to write feature")?;
		}

		for key in &self.keys {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in &self.values {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to encode property value")?)
				.context("Failed to write property value")?;
		}

		if self.extent != 4096 {
			writer.write_pbf_key(5, 0)?;
			writer
				.write_varint(u64::from(self.extent))
				.context("Failed to write extent")?;
		}

		// version is a required field in MVT v2
		writer.write_pbf_key(15, 0)?;
		writer
			.write_varint(u64::from(self.version))
			.context("Failed to write version")?;

		Ok(writer.into_blob())
	}

	/// The key/value table entries referenced by a feature's tags, decoded as
	/// (key, value) pairs. `None` when the tag list is malformed or any index
	/// is out of range.
	pub fn decoded_tags<'a>(&'a self, feature: &TileFeature) -> Option<Vec<(&'a str, &'a TileValue)>> {
		if feature.tag_ids.len() % 2 != 0 {
			return None;
		}

		feature
			.tag_ids
			.iter()
			.tuples()
			.map(|(&key_id, &value_id)| {
				let key = self.keys.get(key_id as usize)?;
				let value = self.values.get(value_id as usize)?;
				Some((key.as_str(), value))
			})
			.collect()
	}
}
