//! `.CEL` / `.CL2` frame container support.
//!
//! CEL and CL2 files store a sequence of palette-indexed frames. The files carry
//! no dimensions and no pixel encoding; both come from the asset
//! [`registry`](crate::registry).
//!
//! # Container Structure
//!
//! ```text
//! Offset  Size             Field
//! ------  ---------------  ------------------------------------------------
//! 0x00    4                nframes (u32, little-endian)
//! 0x04    4 × (nframes+1)  frame offsets (u32, little-endian); the last
//!                          offset is the end of the container
//! ...     variable         frame payloads
//! ```
//!
//! Frame `i` occupies `[offset[i], offset[i+1])`. The first offset always
//! points right behind the offset table: `offset[0] == 4 × (nframes + 2)`.
//! Some assets start every frame with a fixed-size header (commonly 10 bytes)
//! that is skipped before pixel decoding.
//!
//! # Archive Structure
//!
//! Archives bundle several containers (usually one per facing direction):
//!
//! ```text
//! Offset  Size   Field
//! ------  -----  --------------------------------------------------------
//! 0x00    4 × N  sub-image base offsets (u32, little-endian), N = nimgs
//! ...            sub-image containers; offsets inside each are relative
//!                to its base
//! ```
//!
//! # Usage Examples
//!
//! ```no_run
//! use tristram_types::file::{Palette, cel};
//! use tristram_types::registry::Registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::builtin()?;
//! let meta = registry.get("p8bulbs.cel")?;
//! let palette = Palette::from_file("levels/towndata/town.pal")?;
//!
//! let file = cel::File::open("ctrlpan/p8bulbs.cel", meta.header_len())?;
//! for frame in file.iter() {
//!     let image = cel::decode_frame(meta, frame.index(), frame.pixel_data()?, &palette)?;
//!     println!("{}: {}x{}", frame, image.width(), image.height());
//! }
//! # Ok(())
//! # }
//! ```

mod archive;
mod decode;
mod frame;


use std::{fmt, path::Path};

use image::RgbaImage;

use crate::{
	file::{FileType, Palette, TrFileError},
	registry::AssetMeta,
};

pub use archive::Archive;
pub use decode::{BLOCK_SIZE, TRAPEZOID_FRAME_SIZE, TRIANGLE_FRAME_SIZE, decode};
pub use frame::{Frame, FrameType, Side};

/// Container constants.
pub mod constants {
	/// Size of the frame count field
	pub const COUNT_SIZE: usize = 4;

	/// Size of one offset table entry
	pub const OFFSET_SIZE: usize = 4;

	/// Returns the offset of the first frame for a given frame count.
	#[inline]
	pub const fn first_frame_offset(nframes: usize) -> usize {
		OFFSET_SIZE * (nframes + 2)
	}
}

/// A split frame container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	raw: Vec<u8>,
	offsets: Vec<u32>,
	header_len: usize,
	file_type: FileType,
}

impl File {
	/// Opens and splits a container file.
	///
	/// # Errors
	///
	/// Returns an error, annotated with `path`, if the file cannot be read or
	/// its offset table is invalid.
	pub fn open(path: impl AsRef<Path>, header_len: usize) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		let file_type = FileType::from_name(&path.to_string_lossy());
		Self::parse(data, header_len, file_type).map_err(|e| e.in_file(path))
	}

	/// Returns a container with zero frames.
	pub(crate) fn empty(header_len: usize, file_type: FileType) -> Self {
		Self {
			raw: Vec::new(),
			offsets: Vec::new(),
			header_len,
			file_type,
		}
	}

	/// Splits a container from a byte slice.
	pub fn from_bytes(data: &[u8], header_len: usize) -> Result<Self, TrFileError> {
		Self::parse(data.to_vec(), header_len, FileType::Cel)
	}

	/// Splits a container, taking ownership of its bytes.
	///
	/// The buffer must hold at least the frame count; an empty buffer is
	/// truncated.
	pub fn parse(raw: Vec<u8>, header_len: usize, file_type: FileType) -> Result<Self, TrFileError> {
		if raw.len() < constants::COUNT_SIZE {
			return Err(TrFileError::truncated(file_type, constants::COUNT_SIZE, raw.len()));
		}
		let nframes = read_u32(&raw, 0) as usize;

		let table_end = constants::first_frame_offset(nframes);
		if raw.len() < table_end {
			return Err(TrFileError::truncated(file_type, table_end, raw.len()));
		}

		let offsets: Vec<u32> = (0..=nframes)
			.map(|i| read_u32(&raw, constants::COUNT_SIZE + i * constants::OFFSET_SIZE))
			.collect();

		if offsets[0] as usize != table_end {
			return Err(TrFileError::invalid_offset(
				file_type,
				constants::COUNT_SIZE,
				format!("first frame at {:#x}, expected {:#x}", offsets[0], table_end),
			));
		}
		for (i, pair) in offsets.windows(2).enumerate() {
			if pair[1] < pair[0] {
				return Err(TrFileError::invalid_offset(
					file_type,
					constants::COUNT_SIZE + (i + 1) * constants::OFFSET_SIZE,
					format!("offset {:#x} precedes {:#x}", pair[1], pair[0]),
				));
			}
		}
		let end = offsets[nframes] as usize;
		if end > raw.len() {
			return Err(TrFileError::invalid_offset(
				file_type,
				constants::COUNT_SIZE + nframes * constants::OFFSET_SIZE,
				format!("end offset {:#x} beyond file length {:#x}", end, raw.len()),
			));
		}
		if end < raw.len() {
			log::trace!("{} container has {} trailing bytes", file_type, raw.len() - end);
		}

		log::debug!("Split {} container: {} frames, {} bytes", file_type, nframes, raw.len());

		Ok(Self {
			raw,
			offsets,
			header_len,
			file_type,
		})
	}

	/// Builds a container from raw frame payloads (headers included).
	pub fn from_frames<B: AsRef<[u8]>>(frames: &[B], header_len: usize) -> Self {
		let nframes = frames.len();
		let mut raw = Vec::new();
		raw.extend_from_slice(&(nframes as u32).to_le_bytes());

		let mut offset = constants::first_frame_offset(nframes);
		let mut offsets = Vec::with_capacity(nframes + 1);
		offsets.push(offset as u32);
		for frame in frames {
			offset += frame.as_ref().len();
			offsets.push(offset as u32);
		}
		for o in &offsets {
			raw.extend_from_slice(&o.to_le_bytes());
		}
		for frame in frames {
			raw.extend_from_slice(frame.as_ref());
		}

		Self {
			raw,
			offsets,
			header_len,
			file_type: FileType::Cel,
		}
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.offsets.len().saturating_sub(1)
	}

	/// Returns `true` if the container holds no frames.
	pub fn is_empty(&self) -> bool {
		self.frame_count() == 0
	}

	/// Returns the declared per-frame header length.
	pub fn header_len(&self) -> usize {
		self.header_len
	}

	/// Returns the kind of file the container was read from.
	pub fn file_type(&self) -> FileType {
		self.file_type
	}

	/// Returns the frame offset table (`frame_count + 1` entries).
	pub fn offsets(&self) -> &[u32] {
		&self.offsets
	}

	/// Gets a frame by index.
	pub fn frame(&self, index: usize) -> Option<Frame<'_>> {
		let start = *self.offsets.get(index)? as usize;
		let end = *self.offsets.get(index + 1)? as usize;
		Some(Frame::new(index, start, &self.raw[start..end], self.header_len))
	}

	/// Returns an iterator over all frames.
	pub fn iter(&self) -> FrameIterator<'_> {
		FrameIterator {
			file: self,
			current_index: 0,
		}
	}

	/// Decodes every frame with the asset's registry metadata.
	pub fn decode_all(&self, meta: &AssetMeta, palette: &Palette) -> Result<Vec<RgbaImage>, TrFileError> {
		self.iter().map(|frame| decode_frame(meta, frame.index(), frame.pixel_data()?, palette)).collect()
	}

	/// Serializes the container back to bytes.
	///
	/// Bytes past the last frame are not kept.
	pub fn to_bytes(&self) -> Vec<u8> {
		let frames: Vec<&[u8]> = self.iter().map(|f| f.raw()).collect();
		Self::from_frames(&frames, self.header_len).raw
	}

	/// Returns the underlying bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.raw
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} container: {} frames, {} bytes", self.file_type, self.frame_count(), self.raw.len())
	}
}

/// Iterator over frames in a container.
#[derive(Debug, Clone)]
pub struct FrameIterator<'a> {
	file: &'a File,
	current_index: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
	type Item = Frame<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let frame = self.file.frame(self.current_index)?;
		self.current_index += 1;
		Some(frame)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.file.frame_count() - self.current_index;
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for FrameIterator<'_> {}

impl<'a> IntoIterator for &'a File {
	type Item = Frame<'a>;
	type IntoIter = FrameIterator<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Decodes one frame's pixel payload using the asset's registry metadata.
///
/// The effective size is the per-frame override when present, else the
/// asset default; the frame type comes from the asset's classifier.
pub fn decode_frame(
	meta: &AssetMeta,
	index: usize,
	pixels: &[u8],
	palette: &Palette,
) -> Result<RgbaImage, TrFileError> {
	decode_frame_as(meta.frame_type(index), meta, index, pixels, palette)
}

/// Decodes one frame with an explicit frame type, bypassing the classifier.
pub fn decode_frame_as(
	frame_type: FrameType,
	meta: &AssetMeta,
	index: usize,
	pixels: &[u8],
	palette: &Palette,
) -> Result<RgbaImage, TrFileError> {
	let (width, height) = meta.frame_size(index);
	log::trace!("Decoding {} frame {} as {} ({}x{})", meta.short_name(), index, frame_type, width, height);
	decode(frame_type, pixels, width, height, palette).map_err(|e| match e {
		TrFileError::MalformedFrame {
			offset,
			reason,
			..
		} => TrFileError::malformed_frame(index, offset, reason),
		other => other,
	})
}

/// Reads a little-endian `u32`; the caller guarantees `data.len() >= at + 4`.
#[inline]
pub(crate) fn read_u32(data: &[u8], at: usize) -> u32 {
	u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
