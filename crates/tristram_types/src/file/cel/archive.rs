//! Multi-image CEL/CL2 archives.

use std::{fmt, path::Path};

use crate::file::{FileType, TrFileError};

use super::{File, constants::OFFSET_SIZE, read_u32};

/// An archive of `N` sub-image containers (usually one per facing direction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
	images: Vec<File>,
}

impl Archive {
	/// Opens and splits an archive file.
	pub fn open(path: impl AsRef<Path>, nimgs: usize, header_len: usize) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		let file_type = FileType::from_name(&path.to_string_lossy());
		Self::parse(&data, nimgs, header_len, file_type).map_err(|e| e.in_file(path))
	}

	/// Splits an archive from a byte slice.
	pub fn from_bytes(data: &[u8], nimgs: usize, header_len: usize) -> Result<Self, TrFileError> {
		Self::parse(data, nimgs, header_len, FileType::Cel)
	}

	/// Splits an archive into its sub-image containers.
	///
	/// Sub-image `k` spans `[base[k], base[k+1])`; the last one runs to the end
	/// of the data. Offsets inside each sub-image are relative to its base. A
	/// zero-length span is a sub-image with no frames.
	pub fn parse(data: &[u8], nimgs: usize, header_len: usize, file_type: FileType) -> Result<Self, TrFileError> {
		let table_len = nimgs * OFFSET_SIZE;
		if data.len() < table_len {
			return Err(TrFileError::truncated(file_type, table_len, data.len()));
		}

		let mut bases: Vec<usize> = (0..nimgs).map(|k| read_u32(data, k * OFFSET_SIZE) as usize).collect();
		bases.push(data.len());

		let mut images = Vec::with_capacity(nimgs);
		for (k, pair) in bases.windows(2).enumerate() {
			let (start, end) = (pair[0], pair[1]);
			if start < table_len || start > end {
				return Err(TrFileError::invalid_offset(
					file_type,
					k * OFFSET_SIZE,
					format!("sub-image {k} spans {start:#x}..{end:#x}"),
				));
			}
			// Trailing directions may be absent
			if start == end {
				images.push(File::empty(header_len, file_type));
				continue;
			}
			let image = File::parse(data[start..end].to_vec(), header_len, file_type).map_err(|e| match e {
				TrFileError::InvalidOffsetTable {
					file_type,
					offset,
					reason,
				} => TrFileError::invalid_offset(file_type, start + offset, format!("sub-image {k}: {reason}")),
				other => other,
			})?;
			images.push(image);
		}

		log::debug!(
			"Split {} archive: {} sub-images, {} frames",
			file_type,
			images.len(),
			images.iter().map(File::frame_count).sum::<usize>()
		);

		Ok(Self {
			images,
		})
	}

	/// Returns the number of sub-images.
	pub fn len(&self) -> usize {
		self.images.len()
	}

	/// Returns `true` if the archive holds no sub-images.
	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}

	/// Gets a sub-image container by index.
	pub fn image(&self, index: usize) -> Option<&File> {
		self.images.get(index)
	}

	/// Returns all sub-image containers.
	pub fn images(&self) -> &[File] {
		&self.images
	}

	/// Iterates over the sub-image containers.
	pub fn iter(&self) -> std::slice::Iter<'_, File> {
		self.images.iter()
	}

	/// Consumes the archive, returning its sub-image containers.
	pub fn into_images(self) -> Vec<File> {
		self.images
	}

	/// Serializes the archive: the base table followed by every sub-image.
	pub fn to_bytes(&self) -> Vec<u8> {
		let bodies: Vec<Vec<u8>> = self.images.iter().map(File::to_bytes).collect();
		let mut base = self.images.len() * OFFSET_SIZE;
		let mut out = Vec::with_capacity(base + bodies.iter().map(Vec::len).sum::<usize>());
		for body in &bodies {
			out.extend_from_slice(&(base as u32).to_le_bytes());
			base += body.len();
		}
		for body in &bodies {
			out.extend_from_slice(body);
		}
		out
	}
}

impl From<Vec<File>> for Archive {
	fn from(images: Vec<File>) -> Self {
		Self {
			images,
		}
	}
}

impl<'a> IntoIterator for &'a Archive {
	type Item = &'a File;
	type IntoIter = std::slice::Iter<'a, File>;

	fn into_iter(self) -> Self::IntoIter {
		self.images.iter()
	}
}

impl fmt::Display for Archive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "archive: {} sub-images", self.images.len())
	}
}
