//! Benchmark helper utilities for tristram-rs
//!
//! Generates synthetic CEL/CL2 payloads for every frame encoding, so the
//! benchmarks run without game data. Generated payloads decode cleanly and
//! mix all opcodes of their encoding.

use tristram_types::file::{FrameType, Side, cel};

/// Generates a type 0 payload: `width × height` raw indices.
pub fn plain_frame(width: u32, height: u32) -> Vec<u8> {
	(0..width * height).map(|i| (i % 251) as u8).collect()
}

/// Generates a type 1 payload of alternating transparent and literal runs.
pub fn sprite_frame(width: u32, height: u32) -> Vec<u8> {
	let mut out = Vec::new();
	for row in 0..height {
		let mut x = 0;
		// Odd rows start opaque so both run kinds open a row somewhere
		let mut opaque = row % 2 == 1;
		while x < width {
			let len = if opaque {
				(width - x).min(12)
			} else {
				(width - x).min(4 + row % 5)
			};
			if opaque {
				out.push(len as u8);
				out.extend((0..len).map(|i| ((x + i + row) % 256) as u8));
			} else {
				out.push((-(len as i32)) as i8 as u8);
			}
			x += len;
			opaque = !opaque;
		}
	}
	out
}

/// Generates a 32×32 isometric payload (types 2 to 5).
pub fn isometric_frame(frame_type: FrameType) -> Vec<u8> {
	let (side, trapezoid) = match frame_type {
		FrameType::IsoTriangle(side) => (side, false),
		FrameType::IsoTrapezoid(side) => (side, true),
		_ => (Side::Left, true),
	};

	let mut out = Vec::new();
	for r in 0..32u32 {
		let skip = match (r < 16, trapezoid) {
			(true, _) => 30 - 2 * r,
			(false, false) => 2 * (r - 15),
			(false, true) => 0,
		};
		let pixels = (0..32 - skip).map(|x| ((x * 7 + r) % 256) as u8);
		let pad = skip & 2 != 0;
		match side {
			Side::Left => {
				if pad {
					out.extend_from_slice(&[0, 0]);
				}
				out.extend(pixels);
			}
			Side::Right => {
				out.extend(pixels);
				if pad {
					out.extend_from_slice(&[0, 0]);
				}
			}
		}
	}
	out
}

/// Generates a type 6 payload cycling skip, fill and literal runs.
pub fn rle_frame(width: u32, height: u32) -> Vec<u8> {
	let total = (width * height) as usize;
	let mut out = Vec::new();
	let mut written = 0;
	let mut op = 0;

	while written < total {
		let left = total - written;
		match op % 3 {
			0 => {
				let n = left.min(20);
				out.push(n as u8);
				written += n;
			}
			1 => {
				let n = left.min(40);
				out.push((0xBF - n) as u8);
				out.push((written % 256) as u8);
				written += n;
			}
			_ => {
				let n = left.min(30);
				out.push((0x100 - n) as u8);
				out.extend((0..n).map(|i| ((written + i) % 256) as u8));
				written += n;
			}
		}
		op += 1;
	}
	out
}

/// Packs `count` copies of `frame` into a container with `header_len` zero
/// bytes ahead of each payload.
pub fn container(frame: &[u8], count: usize, header_len: usize) -> Vec<u8> {
	let mut payload = vec![0u8; header_len];
	payload.extend_from_slice(frame);
	let frames = vec![payload; count];
	cel::File::from_frames(&frames, header_len).to_bytes()
}

/// Common benchmark frame sizes
pub mod sizes {
	/// Inventory item: 28×28
	pub const ITEM: (u32, u32) = (28, 28);
	/// Monster animation frame: 128×128
	pub const MONSTER: (u32, u32) = (128, 128);
	/// Full screen panel: 640×480
	pub const SCREEN: (u32, u32) = (640, 480);
}

#[cfg(test)]
mod tests {
	use super::*;
	use tristram_types::file::{Palette, cel::decode};

	#[test]
	fn test_generated_frames_decode() {
		let palette = Palette::grayscale();
		let (w, h) = sizes::MONSTER;

		assert!(decode(FrameType::Plain, &plain_frame(w, h), w, h, &palette).is_ok());
		assert!(decode(FrameType::Sprite, &sprite_frame(w, h), w, h, &palette).is_ok());
		assert!(decode(FrameType::RleSprite, &rle_frame(w, h), w, h, &palette).is_ok());
		for code in 2..=5u8 {
			let ty = FrameType::try_from(code).unwrap();
			assert!(decode(ty, &isometric_frame(ty), 32, 32, &palette).is_ok(), "{ty}");
		}
	}

	#[test]
	fn test_container() {
		let data = container(&plain_frame(2, 2), 3, 10);
		let file = cel::File::from_bytes(&data, 10).unwrap();
		assert_eq!(file.frame_count(), 3);
		assert_eq!(file.frame(2).unwrap().pixel_data().unwrap(), [0, 1, 2, 3]);
	}
}
