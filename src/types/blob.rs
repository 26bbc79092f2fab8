//! A thin wrapper around `Vec<u8>` used for tile payloads and protobuf fragments.

use std::fmt::Debug;

/// An owned byte buffer.
///
/// Tile payloads, compressed or not, travel through the pipeline as `Blob`s.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a zero-filled `Blob` of the given size.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	#[must_use]
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.0
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(vec: Vec<u8>) -> Self {
		Blob(vec)
	}
}

impl From<&[u8]> for Blob {
	fn from(slice: &[u8]) -> Self {
		Blob(slice.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(slice: &[u8; N]) -> Self {
		Blob(slice.to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({} bytes)", self.0.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn construction() {
		assert!(Blob::new_empty().is_empty());
		assert_eq!(Blob::new_sized(3).as_slice(), &[0, 0, 0]);
		assert_eq!(Blob::from(vec![1, 2, 3]).len(), 3);
	}

	#[test]
	fn round_trip_vec() {
		let vec = vec![0u8, 1, 2, 3];
		assert_eq!(Blob::from(vec.clone()).into_vec(), vec);
	}

	#[test]
	fn debug_shows_length() {
		assert_eq!(format!("{:?}", Blob::from(&[1u8, 2, 3])), "Blob(3 bytes)");
	}
}
