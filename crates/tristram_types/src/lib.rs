//! This crate provides the file formats of the `tristram-rs` project.
//!
//! # File Formats
//!
//! - **PAL**: 256-entry RGB palettes
//! - **TRN**: 256-byte palette index remap tables
//! - **CEL / CL2**: frame containers and multi-image archives, with seven
//!   frame encodings
//! - **MIN**: dungeon pieces built from 32×32 level blocks
//! - **TIL**: isometric tiles built from four dungeon pieces
//!
//! Frame dimensions and encodings are not stored in CEL/CL2 files; they come
//! from the [`registry`].
//!
//! # Examples
//!
//! ```no_run
//! use tristram_types::prelude::*;
//!
//! # fn main() -> Result<(), TrFileError> {
//! let palette = Palette::from_file("levels/towndata/town.pal")?;
//! let meta = Registry::builtin()?.get("golddrop.cel")?;
//! let cel = CelFile::open("ctrlpan/golddrop.cel", meta.header_len())?;
//! let frames = cel.decode_all(meta, &palette)?;
//! assert_eq!(frames[0].dimensions(), (261, 136));
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod registry;

/// `use tristram_types::prelude::*;` to import commonly used items.
pub mod prelude;
