//! `.MIN` dungeon piece tables.
//!
//! A dungeon piece is a 64-pixel-wide column of 32×32 blocks, two blocks per
//! row. Each block references one frame of the level CEL (`l1.cel`,
//! `town.cel`, ...) or is empty.
//!
//! # File Structure
//!
//! The file is a packed array of little-endian `u16` block words, 10 or 16
//! per piece depending on the level:
//!
//! | File                       | Blocks | Piece size |
//! |----------------------------|--------|------------|
//! | `l1.min`, `l2.min`, `l3.min` | 10   | 64×160     |
//! | `l4.min`, `town.min`       | 16     | 64×256     |
//!
//! Block word layout:
//!
//! ```text
//! bit  15    14-12       11-0
//!      -     frame type  frame index (1-based, 0 = empty block)
//! ```
//!
//! Block `b` of a piece sits in column `b % 2` and row `b / 2`, row 0 at the top.
//!
//! The frame type bits are the pixel encoding of the referenced level frame
//! (see [`FrameType`]). [`decode_level_frames`] uses them to decode a level
//! CEL, which the registry alone cannot type.

use std::{
	collections::{BTreeMap, btree_map::Entry},
	fmt,
	path::Path,
};

use image::{RgbaImage, imageops};

use crate::{
	file::{FileType, Palette, TrFileError, cel},
	registry::AssetMeta,
};

use super::cel::{BLOCK_SIZE, FrameType};

/// Width of a rendered dungeon piece
pub const PIECE_WIDTH: u32 = 2 * BLOCK_SIZE;

/// Number of blocks per dungeon piece, selected by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinLayout {
	/// 10 blocks (`l1.min` - `l3.min`)
	Blocks10,
	/// 16 blocks (`l4.min`, `town.min`)
	Blocks16,
}

impl MinLayout {
	/// Picks the layout from a `.MIN` file name or path.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::UnsupportedMinLayout`] for any other file name.
	pub fn from_name(name: &str) -> Result<Self, TrFileError> {
		let normalized = name.replace('\\', "/").to_ascii_lowercase();
		let file_name = normalized.rsplit('/').next().unwrap_or_default();
		match file_name {
			"l1.min" | "l2.min" | "l3.min" => Ok(Self::Blocks10),
			"l4.min" | "town.min" => Ok(Self::Blocks16),
			_ => Err(TrFileError::UnsupportedMinLayout {
				name: name.to_string(),
			}),
		}
	}

	/// Returns the number of blocks per piece.
	pub const fn blocks(self) -> usize {
		match self {
			Self::Blocks10 => 10,
			Self::Blocks16 => 16,
		}
	}

	/// Returns the byte size of one piece.
	pub const fn piece_size(self) -> usize {
		self.blocks() * 2
	}

	/// Returns the `(width, height)` of a rendered piece.
	pub const fn piece_dimensions(self) -> (u32, u32) {
		(PIECE_WIDTH, BLOCK_SIZE * (self.blocks() as u32 / 2))
	}
}

/// One 32×32 cell of a dungeon piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block(u16);

impl Block {
	/// Wraps a raw block word.
	pub const fn new(word: u16) -> Self {
		Self(word)
	}

	/// Returns the raw block word.
	pub const fn raw(self) -> u16 {
		self.0
	}

	/// Returns the 1-based level frame index (0 = empty block).
	pub const fn frame_index(self) -> usize {
		(self.0 & 0x0FFF) as usize
	}

	/// Returns the 3-bit frame type code.
	pub const fn frame_type_code(self) -> u8 {
		((self.0 >> 12) & 0x7) as u8
	}

	/// Returns the frame type of the referenced level frame.
	pub fn frame_type(self) -> Result<FrameType, TrFileError> {
		FrameType::try_from(self.frame_type_code())
	}

	/// Returns `true` for a block that draws nothing.
	pub const fn is_empty(self) -> bool {
		self.frame_index() == 0
	}
}

/// A column of blocks, listed top row first, left block first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonPiece {
	blocks: Vec<Block>,
}

impl DungeonPiece {
	/// Returns the blocks of the piece.
	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// Renders the piece from decoded level frames.
	///
	/// `level_frames[i]` is the frame referenced by block index `i + 1`. Blocks
	/// are pasted with source-copy semantics; empty blocks stay transparent.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::FrameOutOfRange`] if a block references a frame
	/// past the end of `level_frames`.
	pub fn render(&self, level_frames: &[RgbaImage]) -> Result<RgbaImage, TrFileError> {
		let rows = self.blocks.len().div_ceil(2) as u32;
		let mut canvas = RgbaImage::new(PIECE_WIDTH, BLOCK_SIZE * rows);

		for (b, block) in self.blocks.iter().enumerate() {
			if block.is_empty() {
				continue;
			}
			let frame = level_frames.get(block.frame_index() - 1).ok_or(TrFileError::FrameOutOfRange {
				index: block.frame_index(),
				count: level_frames.len(),
			})?;
			let x = (b % 2) as u32 * BLOCK_SIZE;
			let y = (b / 2) as u32 * BLOCK_SIZE;
			imageops::replace(&mut canvas, frame, i64::from(x), i64::from(y));
		}
		Ok(canvas)
	}
}

/// A parsed `.MIN` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	layout: MinLayout,
	pieces: Vec<DungeonPiece>,
}

impl File {
	/// Opens a `.MIN` file; the layout is chosen by its file name.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let layout = MinLayout::from_name(&path.to_string_lossy()).map_err(|e| e.in_file(path))?;
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		Self::from_bytes(&data, layout).map_err(|e| e.in_file(path))
	}

	/// Parses `.MIN` data with an explicit layout.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::TruncatedContainer`] if the data ends inside a piece.
	pub fn from_bytes(data: &[u8], layout: MinLayout) -> Result<Self, TrFileError> {
		let piece_size = layout.piece_size();
		let remainder = data.len() % piece_size;
		if remainder != 0 {
			return Err(TrFileError::truncated(FileType::Min, data.len() - remainder + piece_size, data.len()));
		}

		let pieces: Vec<DungeonPiece> = data
			.chunks_exact(piece_size)
			.map(|chunk| DungeonPiece {
				blocks: chunk.chunks_exact(2).map(|w| Block::new(u16::from_le_bytes([w[0], w[1]]))).collect(),
			})
			.collect();

		log::debug!("Parsed MIN file: {} pieces of {} blocks", pieces.len(), layout.blocks());

		Ok(Self {
			layout,
			pieces,
		})
	}

	/// Returns the block layout.
	pub fn layout(&self) -> MinLayout {
		self.layout
	}

	/// Returns the number of pieces.
	pub fn len(&self) -> usize {
		self.pieces.len()
	}

	/// Returns `true` if the file holds no pieces.
	pub fn is_empty(&self) -> bool {
		self.pieces.is_empty()
	}

	/// Gets a piece by its 0-based index.
	pub fn piece(&self, index: usize) -> Option<&DungeonPiece> {
		self.pieces.get(index)
	}

	/// Returns all pieces.
	pub fn pieces(&self) -> &[DungeonPiece] {
		&self.pieces
	}

	/// Returns the largest level frame index referenced by any block.
	pub fn max_frame_index(&self) -> usize {
		self.pieces.iter().flat_map(|p| p.blocks.iter()).copied().map(Block::frame_index).max().unwrap_or(0)
	}

	/// Collects the frame type of every referenced level frame, keyed by
	/// 0-based frame index.
	///
	/// When blocks disagree on a frame's type the first one wins.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::UnknownFrameType`] for a type code of 7.
	pub fn frame_types(&self) -> Result<BTreeMap<usize, FrameType>, TrFileError> {
		let mut types = BTreeMap::new();
		for block in self.pieces.iter().flat_map(|p| p.blocks.iter()).filter(|b| !b.is_empty()) {
			let ty = block.frame_type()?;
			let index = block.frame_index() - 1;
			match types.entry(index) {
				Entry::Vacant(slot) => {
					slot.insert(ty);
				}
				Entry::Occupied(slot) if *slot.get() != ty => {
					log::warn!("Level frame {} typed both {} and {}; keeping {}", index, slot.get(), ty, slot.get());
				}
				Entry::Occupied(_) => {}
			}
		}
		Ok(types)
	}

	/// Renders the piece at `index`.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::PieceOutOfRange`] for a bad piece index and
	/// [`TrFileError::FrameOutOfRange`] for a bad block reference.
	pub fn render_piece(&self, index: usize, level_frames: &[RgbaImage]) -> Result<RgbaImage, TrFileError> {
		self.piece(index)
			.ok_or(TrFileError::PieceOutOfRange {
				index,
				count: self.pieces.len(),
			})?
			.render(level_frames)
	}

	/// Renders every piece in order.
	pub fn render_all(&self, level_frames: &[RgbaImage]) -> Result<Vec<RgbaImage>, TrFileError> {
		self.pieces.iter().map(|p| p.render(level_frames)).collect()
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "MIN file: {} pieces of {} blocks", self.pieces.len(), self.layout.blocks())
	}
}

/// Decodes every frame of a level CEL using the frame types recorded in its
/// `.MIN` file.
///
/// Frames no block references fall back to the registry classifier.
pub fn decode_level_frames(
	level_cel: &cel::File,
	meta: &AssetMeta,
	min: &File,
	palette: &Palette,
) -> Result<Vec<RgbaImage>, TrFileError> {
	let types = min.frame_types()?;
	log::debug!(
		"Decoding {} level frames of {} ({} typed by MIN)",
		level_cel.frame_count(),
		meta.short_name(),
		types.len()
	);

	level_cel
		.iter()
		.map(|frame| {
			let ty = types.get(&frame.index()).copied().unwrap_or_else(|| meta.frame_type(frame.index()));
			cel::decode_frame_as(ty, meta, frame.index(), frame.pixel_data()?, palette)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::cel::Side;

	fn words(blocks: &[u16]) -> Vec<u8> {
		blocks.iter().flat_map(|w| w.to_le_bytes()).collect()
	}

	fn solid(index: u8) -> RgbaImage {
		RgbaImage::from_pixel(BLOCK_SIZE, BLOCK_SIZE, image::Rgba([index, index, index, 255]))
	}

	#[test]
	fn test_layout_from_name() {
		assert_eq!(MinLayout::from_name("levels/l1data/l1.min").unwrap(), MinLayout::Blocks10);
		assert_eq!(MinLayout::from_name("L3.MIN").unwrap(), MinLayout::Blocks10);
		assert_eq!(MinLayout::from_name("levels\\towndata\\town.min").unwrap(), MinLayout::Blocks16);
		assert_eq!(MinLayout::from_name("l4.min").unwrap().piece_dimensions(), (64, 256));
		assert_eq!(MinLayout::Blocks10.piece_dimensions(), (64, 160));
		assert!(matches!(MinLayout::from_name("l5.min"), Err(TrFileError::UnsupportedMinLayout { .. })));
	}

	#[test]
	fn test_block_bits() {
		let block = Block::new(0x4123);
		assert_eq!(block.frame_index(), 0x123);
		assert_eq!(block.frame_type_code(), 4);
		assert_eq!(block.frame_type().unwrap(), FrameType::IsoTrapezoid(Side::Left));
		assert!(!block.is_empty());

		// Bit 15 is not part of the type
		assert_eq!(Block::new(0x8000 | 0x1001).frame_type_code(), 1);
		assert!(Block::new(0x3000).is_empty());
	}

	#[test]
	fn test_parse_pieces() {
		let mut data = words(&[1, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
		data.extend(words(&[0x1003; 10]));
		let min = File::from_bytes(&data, MinLayout::Blocks10).unwrap();

		assert_eq!(min.len(), 2);
		assert_eq!(min.piece(0).unwrap().blocks().len(), 10);
		assert_eq!(min.piece(1).unwrap().blocks()[9].frame_index(), 3);
		assert_eq!(min.max_frame_index(), 3);
	}

	#[test]
	fn test_partial_piece_rejected() {
		let data = words(&[1; 15]);
		assert!(matches!(
			File::from_bytes(&data, MinLayout::Blocks10),
			Err(TrFileError::TruncatedContainer {
				file_type: FileType::Min,
				expected: 40,
				actual: 30,
			})
		));
	}

	#[test_log::test]
	fn test_frame_types() {
		let data = words(&[0x0001, 0x2002, 0x5002, 0, 0x1003, 0, 0, 0, 0, 0]);
		let min = File::from_bytes(&data, MinLayout::Blocks10).unwrap();
		let types = min.frame_types().unwrap();

		assert_eq!(types.len(), 3);
		assert_eq!(types[&0], FrameType::Plain);
		assert_eq!(types[&1], FrameType::IsoTriangle(Side::Left));
		assert_eq!(types[&2], FrameType::Sprite);

		let bad = File::from_bytes(&words(&[0x7001; 10]), MinLayout::Blocks10).unwrap();
		assert!(matches!(bad.frame_types(), Err(TrFileError::UnknownFrameType(7))));
	}

	#[test]
	fn test_render_piece_layout() {
		// Row 0: frames 1, 2; row 4: empty, frame 3
		let data = words(&[1, 2, 0, 0, 0, 0, 0, 0, 0, 3]);
		let min = File::from_bytes(&data, MinLayout::Blocks10).unwrap();
		let frames = [solid(10), solid(20), solid(30)];

		let image = min.render_piece(0, &frames).unwrap();
		assert_eq!(image.dimensions(), (64, 160));
		assert_eq!(image.get_pixel(0, 0).0, [10, 10, 10, 255]);
		assert_eq!(image.get_pixel(63, 31).0, [20, 20, 20, 255]);
		assert_eq!(image.get_pixel(0, 32).0, [0, 0, 0, 0]);
		assert_eq!(image.get_pixel(10, 150).0, [0, 0, 0, 0]);
		assert_eq!(image.get_pixel(40, 150).0, [30, 30, 30, 255]);
	}

	#[test]
	fn test_render_replaces_pixels() {
		// A transparent frame must clear what is underneath, not blend
		let data = words(&[1; 16]);
		let min = File::from_bytes(&data, MinLayout::Blocks16).unwrap();
		let clear = RgbaImage::new(BLOCK_SIZE, BLOCK_SIZE);
		let image = min.render_piece(0, &[clear]).unwrap();
		assert_eq!(image.dimensions(), (64, 256));
		assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
	}

	#[test]
	fn test_render_errors() {
		let min = File::from_bytes(&words(&[4; 10]), MinLayout::Blocks10).unwrap();
		assert!(matches!(
			min.render_piece(0, &[solid(1)]),
			Err(TrFileError::FrameOutOfRange {
				index: 4,
				count: 1
			})
		));
		assert!(matches!(
			min.render_piece(1, &[]),
			Err(TrFileError::PieceOutOfRange {
				index: 1,
				count: 1
			})
		));
	}

	#[test]
	fn test_decode_level_frames() {
		// Frame 0 is typed by the MIN as a left triangle; frame 1 is unreferenced
		// and falls back to the registry type (plain).
		let mut tri = Vec::new();
		for r in 0..32u32 {
			let skip = if r < 16 {
				30 - 2 * r
			} else {
				2 * (r - 15)
			};
			if skip & 2 != 0 {
				tri.extend_from_slice(&[0, 0]);
			}
			tri.extend(std::iter::repeat_n(5u8, (32 - skip) as usize));
		}
		let plain = vec![6u8; 1024];
		let level = cel::File::from_frames(&[tri, plain], 0);
		let meta = AssetMeta::new("levels/l1data/l1.cel", 32, 32, FrameType::Plain);
		let min = File::from_bytes(&words(&[0x2001, 0, 0, 0, 0, 0, 0, 0, 0, 0]), MinLayout::Blocks10).unwrap();

		let frames = decode_level_frames(&level, &meta, &min, &Palette::grayscale()).unwrap();
		assert_eq!(frames.len(), 2);
		assert_eq!(frames[0].get_pixel(0, 31).0, [0, 0, 0, 0]);
		assert_eq!(frames[0].get_pixel(31, 31).0, [5, 5, 5, 255]);
		assert!(frames[1].pixels().all(|p| p.0 == [6, 6, 6, 255]));
	}
}
