//! Glue between the `tristram-rs` format crates, re-exported by the facade crate.

pub mod loader;
pub mod settings;

/// `use tristram_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the format and file system crates for convenience
pub use tristram_types;
pub use tristram_vfs;

// Re-export commonly used types at crate root
pub use loader::{AssetLoader, DecodedAsset};
pub use settings::Settings;
pub use tristram_types::file::{FileType, Palette, TrFileError, Transition};
pub use tristram_types::registry::{AssetMeta, Registry};
pub use tristram_vfs::DataDir;
