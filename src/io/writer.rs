use crate::types::Blob;
use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

/// Writes protobuf wire-format values into an in-memory buffer.
pub struct ValueWriter {
	cursor: Cursor<Vec<u8>>,
}

impl ValueWriter {
	#[must_use]
	pub fn new() -> ValueWriter {
		ValueWriter {
			cursor: Cursor::new(Vec::new()),
		}
	}

	#[must_use]
	pub fn into_blob(self) -> Blob {
		Blob::from(self.cursor.into_inner())
	}

	pub fn write_varint(&mut self, mut value: u64) -> Result<()> {
		while value >= 0x80 {
			self.cursor.write_u8(((value as u8) & 0x7F) | 0x80)?;
			value >>= 7;
		}
		self.cursor.write_u8(value as u8)?;
		Ok(())
	}

	/// Writes a zigzag-encoded signed varint.
	pub fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	pub fn write_f32(&mut self, value: f32) -> Result<()> {
		Ok(self.cursor.write_f32::<LittleEndian>(value)?)
	}

	pub fn write_f64(&mut self, value: f64) -> Result<()> {
		Ok(self.cursor.write_f64::<LittleEndian>(value)?)
	}

	pub fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type))
			.context("Failed to write PBF key")
	}

	pub fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self
			.write_varint(blob.len())
			.context("Failed to write varint for blob length")?;
		std::io::Write::write_all(&mut self.cursor, blob.as_slice())?;
		Ok(())
	}

	pub fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self
			.write_varint(text.len() as u64)
			.context("Failed to write varint for string length")?;
		std::io::Write::write_all(&mut self.cursor, text.as_bytes())?;
		Ok(())
	}

	pub fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let mut packed = ValueWriter::new();
		for &value in data {
			packed
				.write_varint(u64::from(value))
				.context("Failed to write packed uint32 entry")?;
		}
		self
			.write_pbf_blob(&packed.into_blob())
			.context("Failed to write packed uint32 blob")
	}
}

impl Default for ValueWriter {
	fn default() -> Self {
		Self::new()
	}
}
