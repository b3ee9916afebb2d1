//! `.TRN` transition table support.
//!
//! A transition table is a 256-byte palette-index remap: byte `i` is the
//! index that replaces `i`. Monster and player graphics use them to recolour
//! sprites without extra frames. They are applied to a [`Palette`] at render
//! time with [`Palette::remap`].
//!
//! [`Palette`]: crate::file::Palette
//! [`Palette::remap`]: crate::file::Palette::remap

use std::path::Path;

use crate::file::TrFileError;

/// 256-entry palette index remap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
	table: [u8; 256],
}

impl Transition {
	/// Size of a `.TRN` file in bytes
	pub const FILE_SIZE: usize = 256;

	/// Returns the identity table.
	pub fn identity() -> Self {
		let mut table = [0u8; 256];
		for (i, v) in table.iter_mut().enumerate() {
			*v = i as u8;
		}
		Self {
			table,
		}
	}

	/// Loads a transition table from a file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		Self::from_bytes(&data).map_err(|e| e.in_file(path))
	}

	/// Loads a transition table from exactly 256 bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TrFileError> {
		let table: [u8; 256] = data.try_into().map_err(|_| TrFileError::MalformedTransition {
			len: data.len(),
		})?;
		Ok(Self {
			table,
		})
	}

	/// Returns the replacement index for `index`.
	#[inline]
	pub fn get(&self, index: u8) -> u8 {
		self.table[index as usize]
	}

	/// Returns the raw table.
	pub fn as_bytes(&self) -> &[u8; 256] {
		&self.table
	}
}

impl Default for Transition {
	fn default() -> Self {
		Self::identity()
	}
}
