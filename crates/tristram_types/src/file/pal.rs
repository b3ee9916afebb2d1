//! `.PAL` palette support.
//!
//! A palette file holds exactly 256 colours as packed `R, G, B` triples
//! (768 bytes, no header). Alpha is not stored; every loaded colour is fully
//! opaque. Transparency is decided by the frame decoders, never by the
//! palette.

use std::{fmt, io::Read, path::Path};

use image::Rgba;

use crate::file::{TrFileError, trn::Transition};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Converts the color into an `image` pixel.
	#[inline]
	pub const fn to_rgba(self) -> Rgba<u8> {
		Rgba([self.r, self.g, self.b, self.a])
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

impl From<Color> for Rgba<u8> {
	fn from(color: Color) -> Self {
		color.to_rgba()
	}
}

/// 256-entry colour lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Number of colours in a palette
	pub const PALETTE_SIZE: usize = 256;

	/// Size of a `.PAL` file in bytes (256 colours × 3 bytes)
	pub const FILE_SIZE: usize = Self::PALETTE_SIZE * 3;

	/// Loads a palette from a `.PAL` file.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::MalformedPalette`] (annotated with the path) if the
	/// file is not exactly 768 bytes, or an IO error if it cannot be read.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		Self::from_bytes(&data).map_err(|e| e.in_file(path))
	}

	/// Loads a palette from a byte slice of exactly 768 bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Self, TrFileError> {
		if data.len() != Self::FILE_SIZE {
			return Err(TrFileError::MalformedPalette {
				len: data.len(),
			});
		}

		let mut colors = [Color::transparent(); Self::PALETTE_SIZE];
		for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
			*color = Color::rgb(rgb[0], rgb[1], rgb[2]);
		}

		Ok(Self {
			colors,
		})
	}

	/// Loads a palette from a reader, consuming it to the end.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TrFileError> {
		let mut data = Vec::with_capacity(Self::FILE_SIZE);
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Creates a palette where every entry is the grey level of its index.
	///
	/// Useful for inspecting raw palette indices.
	pub fn grayscale() -> Self {
		let mut colors = [Color::transparent(); Self::PALETTE_SIZE];
		for (i, color) in colors.iter_mut().enumerate() {
			let v = i as u8;
			*color = Color::rgb(v, v, v);
		}
		Self {
			colors,
		}
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Returns the `image` pixel for a palette index.
	#[inline]
	pub fn rgba(&self, index: u8) -> Rgba<u8> {
		self.colors[index as usize].to_rgba()
	}

	/// Returns a reference to the color array.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}

	/// Returns a new palette with every index routed through a transition table.
	///
	/// Entry `i` of the result is entry `trn[i]` of `self`.
	pub fn remap(&self, trn: &Transition) -> Self {
		let mut colors = self.colors;
		for (i, color) in colors.iter_mut().enumerate() {
			*color = self.colors[trn.get(i as u8) as usize];
		}
		Self {
			colors,
		}
	}

	/// Serializes the palette back into `.PAL` layout.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors", Self::PALETTE_SIZE)
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
