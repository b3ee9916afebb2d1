//! Prelude module for `tristram_types`.
//!
//! # Examples
//!
//! ```no_run
//! use tristram_types::prelude::*;
//!
//! let palette = Palette::grayscale();
//! let frame = cel::decode(FrameType::Plain, &[1, 2, 3, 4], 2, 2, &palette);
//! ```

#[doc(inline)]
pub use crate::file::{
	Block,
	CelArchive,
	CelFile,
	Color,
	DungeonPiece,
	FileType,
	Frame,
	FrameType,
	MinFile,
	MinLayout,
	Palette,
	Side,
	TilFile,
	Tile,
	Transition,
	TrFileError,
};

#[doc(inline)]
pub use crate::registry::{AssetMeta, FrameClassifier, Registry};

// Re-export the format modules for advanced usage
#[doc(inline)]
pub use crate::file::{cel, min, til};
