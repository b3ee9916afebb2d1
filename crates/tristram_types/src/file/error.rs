//! Error types for file format parsing and rendering.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Kind of file an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.PAL` palette file
	Pal,
	/// `.TRN` transition table
	Trn,
	/// `.CEL` frame container or archive
	Cel,
	/// `.CL2` frame container or archive
	Cl2,
	/// `.MIN` dungeon piece table
	Min,
	/// `.TIL` tile table
	Til,
	/// Asset metadata registry document
	Registry,
}

impl FileType {
	/// Guesses the file type from a file name's extension.
	///
	/// Anything that is not recognised is treated as a CEL file.
	pub fn from_name(name: &str) -> Self {
		let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
		match ext.as_str() {
			"pal" => Self::Pal,
			"trn" => Self::Trn,
			"cl2" => Self::Cl2,
			"min" => Self::Min,
			"til" => Self::Til,
			"toml" => Self::Registry,
			_ => Self::Cel,
		}
	}
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Pal => "PAL",
			Self::Trn => "TRN",
			Self::Cel => "CEL",
			Self::Cl2 => "CL2",
			Self::Min => "MIN",
			Self::Til => "TIL",
			Self::Registry => "registry",
		};
		f.write_str(name)
	}
}

/// Unified error type for every format handled by `tristram_types`.
#[derive(Debug, Error)]
pub enum TrFileError {
	/// Short name or path absent from the metadata registry
	#[error("Unknown asset: {name}")]
	AssetUnknown {
		/// Name that was looked up
		name: String,
	},

	/// Palette file is not exactly 768 bytes
	#[error("Malformed palette: expected 768 bytes, got {len} bytes")]
	MalformedPalette {
		/// Actual length of the palette data
		len: usize,
	},

	/// Transition table is not exactly 256 bytes
	#[error("Malformed transition table: expected 256 bytes, got {len} bytes")]
	MalformedTransition {
		/// Actual length of the transition data
		len: usize,
	},

	/// File is shorter than its offset table or a declared range
	#[error("Truncated {file_type} data: expected at least {expected} bytes, got {actual} bytes")]
	TruncatedContainer {
		/// Kind of file being parsed
		file_type: FileType,
		/// Number of bytes required
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// Offsets are not non-decreasing or point outside the file
	#[error("Invalid {file_type} offset table at byte {offset:#x}: {reason}")]
	InvalidOffsetTable {
		/// Kind of file being parsed
		file_type: FileType,
		/// Byte offset of the offending table entry
		offset: usize,
		/// What is wrong with the entry
		reason: String,
	},

	/// Frame type code outside 0-6
	#[error("Unknown frame type code: {0}")]
	UnknownFrameType(u8),

	/// Frame payload does not decode to the declared dimensions
	#[error("Malformed frame {frame} at payload byte {offset:#x}: {reason}")]
	MalformedFrame {
		/// Frame index within its container
		frame: usize,
		/// Byte offset within the pixel payload
		offset: usize,
		/// What went wrong
		reason: &'static str,
	},

	/// `.MIN` file name does not select a known block layout
	#[error("Unsupported MIN layout for {name}; expected one of l1-l4.min or town.min")]
	UnsupportedMinLayout {
		/// File name that was inspected
		name: String,
	},

	/// Dungeon piece block references a frame the level CEL does not have
	#[error("Frame index {index} out of range (total frames: {count})")]
	FrameOutOfRange {
		/// 1-based frame index stored in the block
		index: usize,
		/// Number of decoded level frames available
		count: usize,
	},

	/// Tile references a dungeon piece that does not exist
	#[error("Dungeon piece {index} out of range (total pieces: {count})")]
	PieceOutOfRange {
		/// 0-based piece index stored in the tile
		index: usize,
		/// Number of pieces available
		count: usize,
	},

	/// Tile index past the end of a `.TIL` file
	#[error("Tile {index} out of range (total tiles: {count})")]
	TileOutOfRange {
		/// 0-based tile index requested
		index: usize,
		/// Number of tiles available
		count: usize,
	},

	/// Registry document could not be parsed or is inconsistent
	#[error("Invalid asset registry: {0}")]
	Registry(String),

	/// Image encoding or buffer error
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),

	/// Error annotated with the path of the asset that caused it
	#[error("{}: {source}", path.display())]
	InFile {
		/// Offending asset path
		path: PathBuf,
		/// Underlying error
		#[source]
		source: Box<TrFileError>,
	},
}

impl TrFileError {
	/// Creates a [`TrFileError::TruncatedContainer`] error.
	pub fn truncated(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::TruncatedContainer {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates a [`TrFileError::InvalidOffsetTable`] error.
	pub fn invalid_offset(file_type: FileType, offset: usize, reason: impl Into<String>) -> Self {
		Self::InvalidOffsetTable {
			file_type,
			offset,
			reason: reason.into(),
		}
	}

	/// Creates a [`TrFileError::MalformedFrame`] error.
	pub fn malformed_frame(frame: usize, offset: usize, reason: &'static str) -> Self {
		Self::MalformedFrame {
			frame,
			offset,
			reason,
		}
	}

	/// Attaches the offending asset path.
	///
	/// Errors that already carry a path are returned unchanged.
	pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
		match self {
			Self::InFile {
				..
			} => self,
			other => Self::InFile {
				path: path.into(),
				source: Box::new(other),
			},
		}
	}

	/// Returns the innermost error, looking through path annotations.
	pub fn root(&self) -> &Self {
		match self {
			Self::InFile {
				source,
				..
			} => source.root(),
			other => other,
		}
	}
}
