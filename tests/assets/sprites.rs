//! Control panel and UI sprites.

use tristram_rs::prelude::*;

use crate::{loader_with, sha1_hex};

const TOWN_PAL: &str = "levels/towndata/town.pal";

#[test_log::test]
fn golddrop_matches_reference() {
	let Some(loader) = loader_with("ctrlpan/golddrop.cel") else {
		return;
	};
	let palette = loader.palette(TOWN_PAL).unwrap();
	let asset = loader.decode("golddrop.cel", &palette).unwrap();

	assert_eq!(asset.frame_count(), 1);
	let frame = &asset.sub_images[0][0];
	assert_eq!(frame.dimensions(), (261, 136));
	assert_eq!(sha1_hex(frame), "93AE688098CBB3489DF09BF05CBBBCF93D830BB8");
}

#[test_log::test]
fn p8bulbs_matches_reference() {
	let Some(loader) = loader_with("ctrlpan/p8bulbs.cel") else {
		return;
	};
	let palette = loader.palette(TOWN_PAL).unwrap();
	let asset = loader.decode("p8bulbs.cel", &palette).unwrap();

	let frames = &asset.sub_images[0];
	assert_eq!(frames.len(), 2);
	assert!(frames.iter().all(|f| f.dimensions() == (88, 88)));
	assert_eq!(sha1_hex(&frames[0]), "49A7E39E98FBDB2753AE42837D684A136471782F");
	assert_eq!(sha1_hex(&frames[1]), "8C42B957B39B25CF8B865A51E0041270573F04D1");
}

#[test_log::test]
fn square_first_row_is_index_zero() {
	let Some(loader) = loader_with("data/square.cel") else {
		return;
	};
	let meta = loader.meta("square.cel").unwrap();
	assert_eq!(meta.header_len(), 10);

	let palette = loader.primary_palette(meta).unwrap();
	let asset = loader.decode("square.cel", &palette).unwrap();
	assert_eq!(asset.frame_count(), 1);

	let frame = &asset.sub_images[0][0];
	assert_eq!(frame.dimensions(), (64, 128));
	let expected = palette.rgba(0);
	for x in 0..64 {
		assert_eq!(*frame.get_pixel(x, 0), expected, "pixel ({x}, 0)");
	}
}

#[test_log::test]
fn documented_pixel_totals() {
	let Some(loader) = crate::loader() else {
		return;
	};

	let mut checked = 0;
	for meta in loader.registry().iter() {
		let Some(pixels) = meta.documented_pixels() else {
			continue;
		};
		if meta.is_archive() || !loader.data_dir().exists(meta.path()) {
			continue;
		}
		let (_, images) = loader.open_cel(meta.path()).unwrap();
		assert_eq!(meta.pixel_total(images[0].frame_count()), pixels, "{}", meta.path());
		checked += 1;
	}
	log::info!("Checked pixel totals of {checked} assets");
}
