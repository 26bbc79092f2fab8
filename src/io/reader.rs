use crate::types::Blob;
use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Reads protobuf wire-format values from a byte slice.
pub struct ValueReader<'a> {
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a> ValueReader<'a> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReader<'a> {
		ValueReader {
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.len
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn remaining(&self) -> u64 {
		self.len - self.cursor.position()
	}

	pub fn has_remaining(&self) -> bool {
		self.remaining() > 0
	}

	pub fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.cursor.read_u8()?;
			value |= ((byte as u64) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("varint too long");
			}
		}
		Ok(value)
	}

	/// Reads a zigzag-encoded signed varint.
	pub fn read_svarint(&mut self) -> Result<i64> {
		let value = self.read_varint()? as i64;
		Ok((value >> 1) ^ -(value & 1))
	}

	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(self.cursor.read_f32::<LittleEndian>()?)
	}

	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(self.cursor.read_f64::<LittleEndian>()?)
	}

	pub fn read_blob(&mut self, length: u64) -> Result<Blob> {
		let mut blob = Blob::new_sized(length as usize);
		self.cursor.read_exact(blob.as_mut_slice())?;
		Ok(blob)
	}

	pub fn read_string(&mut self, length: u64) -> Result<String> {
		let mut vec = vec![0u8; length as usize];
		self.cursor.read_exact(&mut vec)?;
		Ok(String::from_utf8(vec)?)
	}

	/// Reads a field key, returning `(field_number, wire_type)`.
	pub fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		Ok(((value >> 3) as u32, (value & 0x07) as u8))
	}

	/// Reads a length prefix and returns a reader limited to that many bytes.
	pub fn get_pbf_sub_reader(&mut self) -> Result<ValueReader<'a>> {
		let length = self
			.read_varint()
			.context("Failed to read varint for sub-reader length")?;

		let start = self.cursor.position();
		let end = start + length;
		if end > self.len {
			bail!("sub-reader length exceeds remaining data");
		}
		self.cursor.set_position(end);

		let slice: &'a [u8] = *self.cursor.get_ref();
		Ok(ValueReader::new(&slice[start as usize..end as usize]))
	}

	pub fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let mut reader = self
			.get_pbf_sub_reader()
			.context("Failed to get PBF sub-reader for packed uint32")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			values.push(reader.read_varint().context("Failed to read packed uint32 entry")? as u32);
		}
		Ok(values)
	}

	pub fn read_pbf_string(&mut self) -> Result<String> {
		let length = self.read_varint().context("Failed to read varint for string length")?;
		self.read_string(length).context("Failed to read PBF string")
	}

	pub fn read_pbf_blob(&mut self) -> Result<Blob> {
		let length = self.read_varint().context("Failed to read varint for blob length")?;
		self.read_blob(length).context("Failed to read PBF blob")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_varint() {
		let mut reader = ValueReader::new(&[0xAC, 0x02]);
		assert_eq!(reader.read_varint().unwrap(), 300);
	}

	#[test]
	fn read_varint_too_long() {
		let mut reader = ValueReader::new(&[0x80; 12]);
		assert!(reader.read_varint().is_err());
	}

	#[test]
	fn read_svarint() {
		let mut reader = ValueReader::new(&[0x96, 0x01]);
		assert_eq!(reader.read_svarint().unwrap(), 75);

		let mut reader = ValueReader::new(&[0x95, 0x01]);
		assert_eq!(reader.read_svarint().unwrap(), -75);
	}

	#[test]
	fn read_f32() {
		let mut reader = ValueReader::new(&[0x00, 0x00, 0x80, 0x3F]);
		assert_eq!(reader.read_f32().unwrap(), 1.0);
	}

	#[test]
	fn read_f64() {
		let mut reader = ValueReader::new(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F]);
		assert_eq!(reader.read_f64().unwrap(), 1.0);
	}

	#[test]
	fn read_pbf_key() {
		let mut reader = ValueReader::new(&[0x08]);
		assert_eq!(reader.read_pbf_key().unwrap(), (1, 0));
	}

	#[test]
	fn read_pbf_string() {
		let mut reader = ValueReader::new(&[0x05, b'h', b'e', b'l', b'l', b'o']);
		assert_eq!(reader.read_pbf_string().unwrap(), "hello");
	}

	#[test]
	fn read_pbf_blob() {
		let mut reader = ValueReader::new(&[0x03, 0x01, 0x02, 0x03]);
		assert_eq!(reader.read_pbf_blob().unwrap().as_slice(), &[0x01, 0x02, 0x03]);
	}

	#[test]
	fn read_pbf_packed_uint32() {
		let mut reader = ValueReader::new(&[0x05, 0x64, 0x96, 0x01, 0xAC, 0x02]);
		assert_eq!(reader.read_pbf_packed_uint32().unwrap(), vec![100, 150, 300]);
	}

	#[test]
	fn sub_reader_is_bounded() {
		let mut reader = ValueReader::new(&[0x03, 0x01, 0x02, 0x03, 0x04]);
		let mut sub = reader.get_pbf_sub_reader().unwrap();
		assert_eq!(sub.len(), 3);
		assert_eq!(sub.read_varint().unwrap(), 1);
		assert_eq!(sub.read_varint().unwrap(), 2);
		assert_eq!(sub.read_varint().unwrap(), 3);
		assert!(!sub.has_remaining());
		// parent reader continues after the sub-slice
		assert_eq!(reader.read_varint().unwrap(), 4);
	}

	#[test]
	fn sub_reader_out_of_bounds() {
		let mut reader = ValueReader::new(&[0x05, 0x01]);
		assert!(reader.get_pbf_sub_reader().is_err());
	}
}
