//! Layered runtime settings.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. `tristram.toml` in the working directory (optional), or an explicit file
//! 3. environment variables prefixed with `TRISTRAM_`, e.g. `TRISTRAM_DATA_DIR`
//!
//! ```toml
//! data_dir = "bin"
//! output_dir = "output"
//! default_palette = "levels/towndata/town.pal"
//! registry = "extra_assets.toml"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Base name of the optional settings file in the working directory
pub const SETTINGS_FILE: &str = "tristram";

/// Prefix of settings environment variables
pub const ENV_PREFIX: &str = "TRISTRAM";

/// Palette used for assets whose registry entry lists none
pub const DEFAULT_PALETTE: &str = "levels/towndata/town.pal";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Root of the extracted game data
	pub data_dir: PathBuf,
	/// Directory decoded images are written to
	pub output_dir: PathBuf,
	/// Archive-relative path of the fallback palette
	pub default_palette: String,
	/// Extra registry document merged over the built-in one
	pub registry: Option<PathBuf>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from("bin"),
			output_dir: PathBuf::from("output"),
			default_palette: DEFAULT_PALETTE.to_string(),
			registry: None,
		}
	}
}

impl Settings {
	/// Loads settings from `tristram.toml` (if present) and the environment.
	pub fn load() -> Result<Self, ConfigError> {
		Self::build(File::with_name(SETTINGS_FILE).required(false))
	}

	/// Loads settings from an explicit file and the environment.
	pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		Self::build(File::from(path.as_ref()).required(true))
	}

	fn build<S>(file: S) -> Result<Self, ConfigError>
	where
		S: config::Source + Send + Sync + 'static,
	{
		let settings: Self = Config::builder()
			.add_source(file)
			.add_source(Environment::with_prefix(ENV_PREFIX))
			.build()?
			.try_deserialize()?;
		log::debug!("Loaded settings: {:?}", settings);
		Ok(settings)
	}
}
