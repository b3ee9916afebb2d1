//! File format support for `tristram-rs`.

mod error;

pub mod cel;
pub mod min;
pub mod pal;
pub mod til;
pub mod trn;

// Re-export unified error type
pub use error::{FileType, TrFileError};

// Re-export main file types
pub use cel::{Archive as CelArchive, File as CelFile, Frame, FrameType, Side};
pub use min::{Block, DungeonPiece, File as MinFile, MinLayout};
pub use pal::{Color, Palette};
pub use til::{File as TilFile, Tile};
pub use trn::Transition;
