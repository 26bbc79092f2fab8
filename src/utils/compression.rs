//! GZIP framing for tile payloads.
//!
//! MBTiles stores MVT payloads gzip-compressed. The compression level on
//! re-encode is a free choice; `best()` favors the archive-size use case.

use crate::types::Blob;
use anyhow::{Context, Result};
use flate2::bufread::{GzDecoder, GzEncoder};
use std::io::Read;

/// Compresses a blob with GZIP.
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), flate2::Compression::best());
	let mut compressed = Vec::new();
	encoder
		.read_to_end(&mut compressed)
		.context("Failed to compress data using Gzip")?;
	Ok(Blob::from(compressed))
}

/// Decompresses a GZIP-framed blob.
pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed = Vec::new();
	decoder
		.read_to_end(&mut decompressed)
		.context("Failed to decompress data using Gzip")?;
	Ok(Blob::from(decompressed))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip() -> Result<()> {
		let data = Blob::from((0u32..1000).flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>());
		let compressed = compress_gzip(&data)?;
		assert_ne!(compressed, data);
		assert_eq!(decompress_gzip(&compressed)?, data);
		Ok(())
	}

	#[test]
	fn rejects_garbage() {
		assert!(decompress_gzip(&Blob::from(&[0x00, 0x01, 0x02, 0x03])).is_err());
	}
}
