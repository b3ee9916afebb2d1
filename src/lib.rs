#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `tristram-rs` decodes the sprite and level graphics of a late-90s
//! isometric action RPG: CEL/CL2 frame containers, PAL palettes, TRN
//! transition tables and MIN/TIL dungeon tiles.
//!
//! ```no_run
//! use tristram_rs::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = AssetLoader::new(DataDir::new("bin")?)?;
//! let asset = loader.decode_default("p8bulbs.cel")?;
//! asset.sub_images[0][0].save("p8bulbs_0.png")?;
//! # Ok(())
//! # }
//! ```
pub use tristram_internal::*;
