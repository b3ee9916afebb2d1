//! End-to-end checks against an extracted game data directory.
//!
//! The data directory is `$TRISTRAM_DATA_DIR`, else `bin/` under the crate
//! root. Tests that need game files log a message and pass when it is absent.

use std::path::PathBuf;

use sha1::{Digest, Sha1};
use tristram_rs::prelude::*;

mod levels;
mod palette;
mod sprites;

/// Opens a loader over the game data, or `None` when no data is installed.
pub(crate) fn loader() -> Option<AssetLoader> {
	let root = std::env::var_os("TRISTRAM_DATA_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("bin"));

	let Ok(data) = DataDir::new(&root) else {
		log::warn!("No game data at {}, skipping", root.display());
		return None;
	};
	Some(AssetLoader::new(data).unwrap())
}

/// Like [`loader`], but also skips when `path` is missing from the data.
pub(crate) fn loader_with(path: &str) -> Option<AssetLoader> {
	let loader = loader()?;
	if !loader.data_dir().exists(path) {
		log::warn!("{path} is not in the game data, skipping");
		return None;
	}
	Some(loader)
}

/// Upper-case hex SHA-1 of an image's RGBA bytes.
pub(crate) fn sha1_hex(image: &image::RgbaImage) -> String {
	hex::encode_upper(Sha1::digest(image.as_raw()))
}
