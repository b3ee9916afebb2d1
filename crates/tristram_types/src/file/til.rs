//! `.TIL` tile tables.
//!
//! A tile groups four dungeon pieces into one isometric diamond. The file is a
//! packed array of little-endian `u16` words, four per tile, in the order
//! `top`, `right`, `left`, `bottom`; each is a 0-based index into the pieces
//! of the matching `.MIN` file.
//!
//! Rendering places the pieces on a `2·pw × (ph + 32)` canvas:
//!
//! ```text
//!           +------+
//!           | top  |              top     (pw/2, 0)
//!    +------+------+------+       left    (0, 16)
//!    | left |bottom| right|       right   (pw, 16)
//!    +------+------+------+       bottom  (pw/2, 32)
//! ```
//!
//! Later pieces are drawn over earlier ones with alpha blending, in the order
//! top, left, right, bottom.

use std::{fmt, path::Path};

use image::{RgbaImage, imageops};

use crate::file::{FileType, TrFileError};

/// Size in bytes of one tile record
pub const TILE_SIZE: usize = 8;

/// Four dungeon piece indices forming one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
	/// Piece drawn at the top of the diamond
	pub top: u16,
	/// Piece drawn on the right
	pub right: u16,
	/// Piece drawn on the left
	pub left: u16,
	/// Piece drawn at the bottom of the diamond
	pub bottom: u16,
}

impl Tile {
	/// Parses a tile from its 8-byte record.
	pub fn from_bytes(data: [u8; TILE_SIZE]) -> Self {
		let word = |i: usize| u16::from_le_bytes([data[2 * i], data[2 * i + 1]]);
		Self {
			top: word(0),
			right: word(1),
			left: word(2),
			bottom: word(3),
		}
	}

	/// Serializes the tile to its 8-byte record.
	pub fn to_bytes(&self) -> [u8; TILE_SIZE] {
		let mut out = [0u8; TILE_SIZE];
		for (i, w) in [self.top, self.right, self.left, self.bottom].into_iter().enumerate() {
			out[2 * i..2 * i + 2].copy_from_slice(&w.to_le_bytes());
		}
		out
	}

	/// Renders the tile from rendered dungeon pieces.
	///
	/// All pieces are assumed to share the size of the top piece.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::PieceOutOfRange`] if an index is past the end of
	/// `pieces`.
	pub fn render(&self, pieces: &[RgbaImage]) -> Result<RgbaImage, TrFileError> {
		let piece = |index: u16| {
			pieces.get(usize::from(index)).ok_or(TrFileError::PieceOutOfRange {
				index: usize::from(index),
				count: pieces.len(),
			})
		};
		let top = piece(self.top)?;
		let left = piece(self.left)?;
		let right = piece(self.right)?;
		let bottom = piece(self.bottom)?;

		let (pw, ph) = top.dimensions();
		let mut canvas = RgbaImage::new(2 * pw, ph + 32);
		let half = i64::from(pw / 2);

		imageops::overlay(&mut canvas, top, half, 0);
		imageops::overlay(&mut canvas, left, 0, 16);
		imageops::overlay(&mut canvas, right, i64::from(pw), 16);
		imageops::overlay(&mut canvas, bottom, half, 32);

		Ok(canvas)
	}
}

impl fmt::Display for Tile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "tile [top {}, right {}, left {}, bottom {}]", self.top, self.right, self.left, self.bottom)
	}
}

/// A parsed `.TIL` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
	tiles: Vec<Tile>,
}

impl File {
	/// Opens a `.TIL` file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		Self::from_bytes(&data).map_err(|e| e.in_file(path))
	}

	/// Parses `.TIL` data.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::TruncatedContainer`] if the data ends inside a tile.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TrFileError> {
		let remainder = data.len() % TILE_SIZE;
		if remainder != 0 {
			return Err(TrFileError::truncated(FileType::Til, data.len() - remainder + TILE_SIZE, data.len()));
		}

		let tiles: Vec<Tile> = data
			.chunks_exact(TILE_SIZE)
			.map(|chunk| {
				let mut record = [0u8; TILE_SIZE];
				record.copy_from_slice(chunk);
				Tile::from_bytes(record)
			})
			.collect();

		log::debug!("Parsed TIL file: {} tiles", tiles.len());

		Ok(Self {
			tiles,
		})
	}

	/// Serializes all tiles back to `.TIL` layout.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.tiles.iter().flat_map(Tile::to_bytes).collect()
	}

	/// Returns the number of tiles.
	pub fn len(&self) -> usize {
		self.tiles.len()
	}

	/// Returns `true` if the file holds no tiles.
	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	/// Gets a tile by its 0-based index.
	pub fn tile(&self, index: usize) -> Option<&Tile> {
		self.tiles.get(index)
	}

	/// Returns all tiles.
	pub fn tiles(&self) -> &[Tile] {
		&self.tiles
	}

	/// Renders the tile at `index` from rendered dungeon pieces.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::TileOutOfRange`] for a bad tile index and
	/// [`TrFileError::PieceOutOfRange`] for a bad piece reference.
	pub fn render_tile(&self, index: usize, pieces: &[RgbaImage]) -> Result<RgbaImage, TrFileError> {
		self.tile(index)
			.ok_or(TrFileError::TileOutOfRange {
				index,
				count: self.tiles.len(),
			})?
			.render(pieces)
	}
}

impl From<Vec<Tile>> for File {
	fn from(tiles: Vec<Tile>) -> Self {
		Self {
			tiles,
		}
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TIL file: {} tiles", self.tiles.len())
	}
}
