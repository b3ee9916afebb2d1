//! CEL frame structures.
//!
//! A [`Frame`] is a borrowed view of one frame's bytes inside a container.
//! [`FrameType`] selects the pixel encoding used to turn those bytes into an
//! RGBA raster.

use std::fmt;

use serde::Deserialize;

use crate::file::TrFileError;

/// Which half of an isometric block carries pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	/// Transparent area on the left, opaque run right-aligned
	Left,
	/// Opaque run left-aligned, transparent area on the right
	Right,
}

/// Pixel encoding of a single frame.
///
/// The numeric codes (0-6) are the ones stored in the asset registry and in
/// `.MIN` block words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum FrameType {
	/// Code 0: `width × height` raw palette indices, bottom row first
	Plain,
	/// Code 1: per-row literal / transparent runs, bottom row first
	Sprite,
	/// Codes 2 and 3: 32×32 isometric triangle
	IsoTriangle(Side),
	/// Codes 4 and 5: 32×32 isometric trapezoid
	IsoTrapezoid(Side),
	/// Code 6: `.CL2` run-length encoding with fill runs
	RleSprite,
}

impl FrameType {
	/// Returns the numeric frame type code.
	pub const fn code(self) -> u8 {
		match self {
			Self::Plain => 0,
			Self::Sprite => 1,
			Self::IsoTriangle(Side::Left) => 2,
			Self::IsoTriangle(Side::Right) => 3,
			Self::IsoTrapezoid(Side::Left) => 4,
			Self::IsoTrapezoid(Side::Right) => 5,
			Self::RleSprite => 6,
		}
	}

	/// Returns `true` for the fixed 32×32 isometric level encodings.
	pub const fn is_isometric(self) -> bool {
		matches!(self, Self::IsoTriangle(_) | Self::IsoTrapezoid(_))
	}
}

impl TryFrom<u8> for FrameType {
	type Error = TrFileError;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		Ok(match code {
			0 => Self::Plain,
			1 => Self::Sprite,
			2 => Self::IsoTriangle(Side::Left),
			3 => Self::IsoTriangle(Side::Right),
			4 => Self::IsoTrapezoid(Side::Left),
			5 => Self::IsoTrapezoid(Side::Right),
			6 => Self::RleSprite,
			other => return Err(TrFileError::UnknownFrameType(other)),
		})
	}
}

impl fmt::Display for FrameType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Plain => "plain",
			Self::Sprite => "sprite",
			Self::IsoTriangle(Side::Left) => "left triangle",
			Self::IsoTriangle(Side::Right) => "right triangle",
			Self::IsoTrapezoid(Side::Left) => "left trapezoid",
			Self::IsoTrapezoid(Side::Right) => "right trapezoid",
			Self::RleSprite => "rle sprite",
		};
		write!(f, "{} (type {})", name, self.code())
	}
}

/// One frame of a CEL/CL2 container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
	index: usize,
	offset: usize,
	raw: &'a [u8],
	header_len: usize,
}

impl<'a> Frame<'a> {
	pub(crate) fn new(index: usize, offset: usize, raw: &'a [u8], header_len: usize) -> Self {
		Self {
			index,
			offset,
			raw,
			header_len,
		}
	}

	/// Returns the 0-based index of the frame inside its container.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Returns the byte offset of the frame inside its container.
	#[inline]
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Returns the raw payload, including the frame header.
	#[inline]
	pub fn raw(&self) -> &'a [u8] {
		self.raw
	}

	/// Returns the declared frame header length.
	#[inline]
	pub fn header_len(&self) -> usize {
		self.header_len
	}

	/// Returns `true` when the frame holds no pixel data past its header.
	pub fn is_empty(&self) -> bool {
		self.raw.len() <= self.header_len
	}

	/// Returns the pixel payload: the raw payload minus its header bytes.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::MalformedFrame`] if the payload is shorter than
	/// the declared header.
	pub fn pixel_data(&self) -> Result<&'a [u8], TrFileError> {
		self.raw.get(self.header_len..).ok_or(TrFileError::malformed_frame(
			self.index,
			self.raw.len(),
			"payload shorter than frame header",
		))
	}
}

impl fmt::Display for Frame<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "frame #{} @ {:#x} ({} bytes)", self.index, self.offset, self.raw.len())
	}
}
