//! Palette loading through a data directory.

use tristram_rs::prelude::*;

#[test_log::test]
fn short_palette_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("short.pal"), vec![0u8; 767]).unwrap();

	let loader = AssetLoader::new(DataDir::new(dir.path()).unwrap()).unwrap();
	let err = loader.palette("short.pal").unwrap_err();
	assert!(matches!(
		err.root(),
		TrFileError::MalformedPalette {
			len: 767
		}
	));
}
