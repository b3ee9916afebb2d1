//! Prelude module for `tristram_internal`.
//!
//! # Examples
//!
//! ```no_run
//! use tristram_internal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let loader = AssetLoader::from_settings(&settings)?;
//! let asset = loader.decode_default("objcurs.cel")?;
//! println!("{} frames", asset.frame_count());
//! # Ok(())
//! # }
//! ```

// Re-export everything from tristram_types::prelude
#[doc(inline)]
pub use tristram_types::prelude::*;

#[doc(inline)]
pub use crate::loader::{AssetLoader, DecodedAsset};

#[doc(inline)]
pub use crate::settings::Settings;

#[doc(inline)]
pub use tristram_vfs::DataDir;
