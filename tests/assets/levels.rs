//! Level pieces and tiles.

use tristram_rs::prelude::*;

use crate::loader_with;

const L1_CEL: &str = "levels/l1data/l1.cel";
const L1_MIN: &str = "levels/l1data/l1.min";
const L1_TIL: &str = "levels/l1data/l1.til";

#[test_log::test]
fn l1_pieces_reference_level_frames() {
	let Some(loader) = loader_with(L1_MIN) else {
		return;
	};
	let min = loader.open_min(L1_MIN).unwrap();
	assert_eq!(min.layout(), MinLayout::Blocks10);
	assert_eq!(min.piece(0).unwrap().blocks().len(), 10);

	let (_, images) = loader.open_cel(L1_CEL).unwrap();
	let frame_count: usize = images.iter().map(cel::File::frame_count).sum();
	for piece in min.pieces() {
		for block in piece.blocks() {
			assert!(block.frame_index() <= frame_count, "frame {} of {frame_count}", block.frame_index());
		}
	}
}

#[test_log::test]
fn l1_tile_zero_renders() {
	let Some(loader) = loader_with(L1_TIL) else {
		return;
	};
	let min = loader.open_min(L1_MIN).unwrap();
	let til = loader.open_til(L1_TIL).unwrap();
	let palette = loader.primary_palette(loader.meta(L1_CEL).unwrap()).unwrap();

	let frames = loader.decode_level(L1_CEL, &min, &palette).unwrap();
	let pieces = min.render_all(&frames).unwrap();
	let tile = til.render_tile(0, &pieces).unwrap();
	assert_eq!(tile.dimensions(), (128, 192));
}

#[test_log::test]
fn l1_cel_decodes_on_its_own() {
	let Some(loader) = loader_with(L1_MIN) else {
		return;
	};
	let min = loader.open_min(L1_MIN).unwrap();
	let palette = loader.primary_palette(loader.meta(L1_CEL).unwrap()).unwrap();

	let asset = loader.decode(L1_CEL, &palette).unwrap();
	let frames = loader.decode_level(L1_CEL, &min, &palette).unwrap();
	assert_eq!(asset.sub_images[0], frames);
	assert!(frames.iter().all(|f| f.dimensions() == (32, 32)));
}
