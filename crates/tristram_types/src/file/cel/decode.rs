//! CEL / CL2 frame decoders.
//!
//! ## Overview
//!
//! Every frame is a stream of palette indices describing the image from the
//! bottom row upwards. The decoders write each row straight into its final
//! (top-down) position of an [`RgbaImage`], so no flip pass is needed.
//! Untouched pixels stay `[0, 0, 0, 0]` (transparent).
//!
//! ## Encodings
//!
//! | Code | Name            | Payload                                               |
//! |------|-----------------|-------------------------------------------------------|
//! | 0    | plain           | `width × height` raw indices                          |
//! | 1    | sprite          | per-row runs: `n > 0` literal, `n < 0` transparent    |
//! | 2, 3 | iso triangle    | fixed 32×32 silhouette, 544 bytes                     |
//! | 4, 5 | iso trapezoid   | fixed 32×32 silhouette, 800 bytes                     |
//! | 6    | rle sprite      | CL2 runs with fill opcodes, rows wrap                 |
//!
//! ### Sprite runs (type 1)
//!
//! A signed control byte `n`. `n > 0` copies the next `n` bytes; `n < 0` skips
//! `-n` pixels. A run never continues onto the next row.
//!
//! ### Isometric blocks (types 2-5)
//!
//! Row `r` (counted from the bottom) has `t(r)` transparent pixels:
//!
//! - `r < 16`: `t = 30 - 2r`
//! - `r ≥ 16`: triangles `t = 2(r - 15)`, trapezoids `t = 0`
//!
//! The remaining `32 - t` pixels are stored verbatim. When `t & 2` is set the
//! row carries two alignment bytes: in front of the pixels for the left
//! variants (opaque run flush right), behind them for the right variants
//! (opaque run flush left).
//!
//! ### CL2 runs (type 6)
//!
//! Control byte `c`:
//!
//! - `0x01..=0x7F`: skip `c` transparent pixels
//! - `0x80..=0xBE`: `n = 256 - c` (`66..=128`), repeat the next byte `n - 65` times
//! - `0xBF..=0xFF`: `n = 256 - c` (`1..=65`), copy `n` literal bytes
//!
//! Pixels form one continuous stream, so runs may wrap onto the next row.
//! These ranges are the game engine's CL2 encoding: positive bytes skip and
//! the upper range copies literals, the reverse of the sprite convention.

use image::RgbaImage;

use crate::file::{Palette, TrFileError};

use super::frame::{FrameType, Side};

/// Edge length of isometric level blocks
pub const BLOCK_SIZE: u32 = 32;

/// Byte size of an isometric triangle frame (types 2 and 3)
pub const TRIANGLE_FRAME_SIZE: usize = 544;

/// Byte size of an isometric trapezoid frame (types 4 and 5)
pub const TRAPEZOID_FRAME_SIZE: usize = 800;

const EXHAUSTED: &str = "payload exhausted";

/// Decodes a frame's pixel payload into a `width × height` RGBA raster.
///
/// The frame index of a returned [`TrFileError::MalformedFrame`] is 0; callers
/// that know the index (such as [`decode_frame`](super::decode_frame)) fill it
/// in.
///
/// # Errors
///
/// Returns [`TrFileError::MalformedFrame`] if the payload ends early, a run
/// overshoots its row or the frame, or an isometric frame is not 32×32.
pub fn decode(
	frame_type: FrameType,
	pixels: &[u8],
	width: u32,
	height: u32,
	palette: &Palette,
) -> Result<RgbaImage, TrFileError> {
	let mut canvas = Canvas::new(width, height, palette);
	if pixels.is_empty() {
		return Ok(canvas.image);
	}

	match frame_type {
		FrameType::Plain => canvas.plain(pixels)?,
		FrameType::Sprite => canvas.sprite(pixels)?,
		FrameType::IsoTriangle(side) => canvas.isometric(pixels, side, Shape::Triangle)?,
		FrameType::IsoTrapezoid(side) => canvas.isometric(pixels, side, Shape::Trapezoid)?,
		FrameType::RleSprite => canvas.rle(pixels)?,
	}

	Ok(canvas.image)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
	Triangle,
	Trapezoid,
}

impl Shape {
	/// Transparent pixels in row `r` (0 = bottom).
	const fn transparent_len(self, r: u32) -> u32 {
		if r < 16 {
			30 - 2 * r
		} else {
			match self {
				Self::Triangle => 2 * (r - 15),
				Self::Trapezoid => 0,
			}
		}
	}
}

/// Bottom-up writer over the output raster.
struct Canvas<'p> {
	image: RgbaImage,
	palette: &'p Palette,
	width: u32,
	height: u32,
}

impl<'p> Canvas<'p> {
	fn new(width: u32, height: u32, palette: &'p Palette) -> Self {
		Self {
			image: RgbaImage::new(width, height),
			palette,
			width,
			height,
		}
	}

	/// Writes palette index `index` at column `x` of row `r` counted from the bottom.
	#[inline]
	fn put(&mut self, x: u32, r: u32, index: u8) {
		let y = self.height - 1 - r;
		self.image.put_pixel(x, y, self.palette.rgba(index));
	}

	fn plain(&mut self, data: &[u8]) -> Result<(), TrFileError> {
		let total = self.width as usize * self.height as usize;
		let src = data.get(..total).ok_or(malformed(data.len(), EXHAUSTED))?;

		if self.width == 0 {
			return Ok(());
		}
		for (r, row) in src.chunks_exact(self.width as usize).enumerate() {
			for (x, &index) in row.iter().enumerate() {
				self.put(x as u32, r as u32, index);
			}
		}
		Ok(())
	}

	fn sprite(&mut self, data: &[u8]) -> Result<(), TrFileError> {
		let mut pos = 0;
		for r in 0..self.height {
			let mut x = 0;
			while x < self.width {
				let control = *data.get(pos).ok_or(malformed(pos, EXHAUSTED))? as i8;
				let at = pos;
				pos += 1;

				if control == 0 {
					return Err(malformed(at, "zero-length run"));
				}
				let len = u32::from(control.unsigned_abs());
				if x + len > self.width {
					return Err(malformed(at, "run exceeds row width"));
				}

				if control > 0 {
					let run = data.get(pos..pos + len as usize).ok_or(malformed(data.len(), EXHAUSTED))?;
					for (i, &index) in run.iter().enumerate() {
						self.put(x + i as u32, r, index);
					}
					pos += len as usize;
				}
				x += len;
			}
		}
		Ok(())
	}

	fn isometric(&mut self, data: &[u8], side: Side, shape: Shape) -> Result<(), TrFileError> {
		if self.width != BLOCK_SIZE || self.height != BLOCK_SIZE {
			return Err(malformed(0, "isometric frames must be 32x32"));
		}

		let mut pos = 0;
		for r in 0..BLOCK_SIZE {
			let skip = shape.transparent_len(r);
			let opaque = (BLOCK_SIZE - skip) as usize;
			let padding = if skip & 2 != 0 {
				2
			} else {
				0
			};

			let (pad_at, start, x0) = match side {
				Side::Left => (pos, pos + padding, skip),
				Side::Right => (pos + opaque, pos, 0),
			};

			let row = data.get(start..start + opaque).ok_or(malformed(data.len(), EXHAUSTED))?;
			for (i, &index) in row.iter().enumerate() {
				self.put(x0 + i as u32, r, index);
			}

			if padding > 0 {
				let pad = data.get(pad_at..pad_at + padding).ok_or(malformed(data.len(), EXHAUSTED))?;
				if pad.iter().any(|&b| b != 0) {
					log::warn!("Non-zero alignment bytes at payload offset {:#x}", pad_at);
				}
			}
			pos += opaque + padding;
		}

		if pos < data.len() {
			log::trace!("Ignoring {} trailing bytes of isometric frame", data.len() - pos);
		}
		Ok(())
	}

	fn rle(&mut self, data: &[u8]) -> Result<(), TrFileError> {
		let total = self.width as usize * self.height as usize;
		let width = self.width as usize;
		let mut written = 0usize;
		let mut pos = 0;

		while written < total {
			let at = pos;
			let control = *data.get(pos).ok_or(malformed(pos, EXHAUSTED))?;
			pos += 1;

			if control == 0 {
				return Err(malformed(at, "zero-length run"));
			}
			if control < 0x80 {
				let len = usize::from(control);
				if written + len > total {
					return Err(malformed(at, "run exceeds frame"));
				}
				written += len;
				continue;
			}

			let n = 256 - usize::from(control);
			if n > 65 {
				let len = n - 65;
				if written + len > total {
					return Err(malformed(at, "run exceeds frame"));
				}
				let index = *data.get(pos).ok_or(malformed(pos, "fill run missing its value"))?;
				pos += 1;
				for i in written..written + len {
					self.put((i % width) as u32, (i / width) as u32, index);
				}
				written += len;
			} else {
				if written + n > total {
					return Err(malformed(at, "run exceeds frame"));
				}
				let run = data.get(pos..pos + n).ok_or(malformed(data.len(), EXHAUSTED))?;
				for (i, &index) in (written..).zip(run) {
					self.put((i % width) as u32, (i / width) as u32, index);
				}
				pos += n;
				written += n;
			}
		}
		Ok(())
	}
}

#[inline]
fn malformed(offset: usize, reason: &'static str) -> TrFileError {
	TrFileError::malformed_frame(0, offset, reason)
}
