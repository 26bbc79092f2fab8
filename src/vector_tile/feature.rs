use super::geometry_type::GeomType;
use crate::{
	io::{ValueReader, ValueWriter},
	types::Blob,
};
use anyhow::{bail, Context, Result};

/// A single feature (MVT `Feature` message).
///
/// `tag_ids` alternates key index / value index into the owning layer's
/// tables. `geom_data` is the raw geometry command stream, carried through
/// unparsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl TileFeature {
	pub fn read(reader: &mut ValueReader<'_>) -> Result<TileFeature> {
		let mut feature = TileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => feature.id = Some(reader.read_varint().context("Failed to read feature id")?),
				(2, 2) => {
					feature.tag_ids = reader
						.read_pbf_packed_uint32()
						.context("Failed to read feature tags")?
				}
				(3, 0) => {
					feature.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?)
				}
				(4, 2) => {
					feature.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(feature)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriter::new();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0)?;
			writer.write_varint(id).context("Failed to write feature id")?;
		}

		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write feature tags")?;
		}

		writer.write_pbf_key(3, 0)?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geom_data.is_empty() {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&self.geom_data)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn example_feature() -> TileFeature {
		TileFeature {
			id: Some(7),
			tag_ids: vec![0, 1],
			geom_type: GeomType::LineString,
			// MoveTo(2,2) -- opaque to the codec
			geom_data: Blob::from(&[0x09, 0x04, 0x04]),
		}
	}

	#[test]
	fn to_blob() -> Result<()> {
		let blob = example_feature().to_blob()?;
		assert_eq!(
			blob.as_slice(),
			&[
				0x08, 0x07, // id: 7
				0x12, 0x02, 0x00, 0x01, // tags: [0, 1]
				0x18, 0x02, // type: LineString
				0x22, 0x03, 0x09, 0x04, 0x04, // geometry
			]
		);
		Ok(())
	}

	#[test]
	fn round_trip() -> Result<()> {
		let feature = example_feature();
		let blob = feature.to_blob()?;
		let mut reader = ValueReader::new(blob.as_slice());
		assert_eq!(TileFeature::read(&mut reader)?, feature);
		Ok(())
	}

	#[test]
	fn geometry_bytes_survive_verbatim() -> Result<()> {
		// an intentionally bogus command stream must pass through untouched
		let mut feature = example_feature();
		feature.geom_data = Blob::from(&[0xFF, 0x00, 0x13, 0x37]);

		let blob = feature.to_blob()?;
		let mut reader = ValueReader::new(blob.as_slice());
		assert_eq!(TileFeature::read(&mut reader)?.geom_data, feature.geom_data);
		Ok(())
	}

	#[test]
	fn optional_fields_are_omitted() -> Result<()> {
		let feature = TileFeature::default();
		let blob = feature.to_blob()?;
		// only the geometry type survives for an empty feature
		assert_eq!(blob.as_slice(), &[0x18, 0x00]);
		Ok(())
	}
}
