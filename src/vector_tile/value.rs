use crate::{
	io::{ValueReader, ValueWriter},
	types::Blob,
};
use anyhow::{anyhow, bail, Context, Result};

/// A property value (MVT `Value` message).
///
/// All seven wire variants stay distinct so that re-encoding an untouched
/// value reproduces the variant it arrived with.
#[derive(Clone, Debug, PartialEq)]
pub enum TileValue {
	String(String),
	Float(f32),
	Double(f64),
	Int(i64),
	UInt(u64),
	SInt(i64),
	Bool(bool),
}

impl TileValue {
	/// The string content, if this is the string variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			TileValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn read(reader: &mut ValueReader<'_>) -> Result<TileValue> {
		let mut value: Option<TileValue> = None;

		while reader.has_remaining() {
			value = Some(match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => TileValue::String(reader.read_pbf_string().context("Failed to read string value")?),
				(2, 5) => TileValue::Float(reader.read_f32().context("Failed to read float value")?),
				(3, 1) => TileValue::Double(reader.read_f64().context("Failed to read double value")?),
				(4, 0) => TileValue::Int(reader.read_varint().context("Failed to read int value")? as i64),
				(5, 0) => TileValue::UInt(reader.read_varint().context("Failed to read uint value")?),
				(6, 0) => TileValue::SInt(reader.read_svarint().context("Failed to read sint value")?),
				(7, 0) => TileValue::Bool(reader.read_varint().context("Failed to read bool value")? != 0),
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			})
		}

		value.ok_or_else(|| anyhow!("value message contains no variant"))
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriter::new();

		match self {
			TileValue::String(s) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			TileValue::Float(f) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*f).context("Failed to write float value")?;
			}
			TileValue::Double(f) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			TileValue::Int(i) => {
				writer.write_pbf_key(4, 0)?;
				writer.write_varint(*i as u64).context("Failed to write int value")?;
			}
			TileValue::UInt(u) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*u).context("Failed to write uint value")?;
			}
			TileValue::SInt(i) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*i).context("Failed to write sint value")?;
			}
			TileValue::Bool(b) => {
				writer.write_pbf_key(7, 0)?;
				writer
					.write_varint(u64::from(*b))
					.context("Failed to write bool value")?;
			}
		}

		Ok(writer.into_blob())
	}
}

impl From<&str> for TileValue {
	fn from(s: &str) -> Self {
		TileValue::String(s.to_string())
	}
}
