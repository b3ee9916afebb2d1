//! Asset loading on top of a game data directory.
//!
//! [`AssetLoader`] ties the pieces together: it finds files in a
//! [`DataDir`], looks their metadata up in the [`Registry`], picks palettes and
//! decodes whole assets. Every error it returns carries the path of the asset
//! that caused it.

use image::RgbaImage;
use tristram_types::{
	file::{FileType, Palette, TrFileError, Transition, cel, min, til},
	registry::{AssetMeta, Registry},
};
use tristram_vfs::DataDir;

use crate::settings::{DEFAULT_PALETTE, Settings};

/// All frames of one decoded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
	/// Archive-relative path of the asset
	pub path: String,
	/// Frames per sub-image; plain containers have exactly one sub-image
	pub sub_images: Vec<Vec<RgbaImage>>,
}

impl DecodedAsset {
	/// Returns the total number of frames over all sub-images.
	pub fn frame_count(&self) -> usize {
		self.sub_images.iter().map(Vec::len).sum()
	}

	/// Iterates over `(sub_image, frame, image)` triples.
	pub fn frames(&self) -> impl Iterator<Item = (usize, usize, &RgbaImage)> {
		self.sub_images
			.iter()
			.enumerate()
			.flat_map(|(s, frames)| frames.iter().enumerate().map(move |(f, image)| (s, f, image)))
	}
}

/// Loads and decodes assets from a data directory.
#[derive(Debug, Clone)]
pub struct AssetLoader {
	data: DataDir,
	registry: Registry,
	default_palette: String,
}

impl AssetLoader {
	/// Creates a loader using the built-in registry.
	pub fn new(data: DataDir) -> Result<Self, TrFileError> {
		Ok(Self {
			data,
			registry: Registry::builtin()?.clone(),
			default_palette: DEFAULT_PALETTE.to_string(),
		})
	}

	/// Creates a loader from runtime settings, merging the extra registry
	/// document if one is configured.
	pub fn from_settings(settings: &Settings) -> Result<Self, TrFileError> {
		let data = DataDir::new(&settings.data_dir).map_err(|e| TrFileError::from(e).in_file(&settings.data_dir))?;
		let mut loader = Self::new(data)?.with_default_palette(&settings.default_palette);
		if let Some(path) = &settings.registry {
			loader.registry.merge(Registry::from_file(path)?);
			log::info!("Merged asset registry {}", path.display());
		}
		Ok(loader)
	}

	/// Replaces the registry.
	pub fn with_registry(mut self, registry: Registry) -> Self {
		self.registry = registry;
		self
	}

	/// Sets the palette used for assets whose registry entry lists none.
	pub fn with_default_palette(mut self, path: impl Into<String>) -> Self {
		self.default_palette = path.into();
		self
	}

	/// Returns the registry.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Returns the data directory.
	pub fn data_dir(&self) -> &DataDir {
		&self.data
	}

	/// Looks up the metadata of an asset by short name or path.
	pub fn meta(&self, name: &str) -> Result<&AssetMeta, TrFileError> {
		self.registry.get(name)
	}

	/// Reads a file from the data directory.
	pub fn read(&self, path: &str) -> Result<Vec<u8>, TrFileError> {
		self.data.read(path).map_err(|e| TrFileError::from(e).in_file(path))
	}

	/// Loads a palette.
	pub fn palette(&self, path: &str) -> Result<Palette, TrFileError> {
		Palette::from_bytes(&self.read(path)?).map_err(|e| e.in_file(path))
	}

	/// Loads a transition table.
	pub fn transition(&self, path: &str) -> Result<Transition, TrFileError> {
		Transition::from_bytes(&self.read(path)?).map_err(|e| e.in_file(path))
	}

	/// Returns the palette paths an asset is rendered with: the registry list,
	/// else the default palette.
	pub fn palette_paths<'a>(&'a self, meta: &'a AssetMeta) -> Vec<&'a str> {
		if meta.palettes().is_empty() {
			vec![self.default_palette.as_str()]
		} else {
			meta.palettes().iter().map(String::as_str).collect()
		}
	}

	/// Loads the first palette of an asset.
	pub fn primary_palette(&self, meta: &AssetMeta) -> Result<Palette, TrFileError> {
		let paths = self.palette_paths(meta);
		self.palette(paths.first().copied().unwrap_or(DEFAULT_PALETTE))
	}

	/// Splits an asset into its containers (one per archive sub-image).
	pub fn open_cel(&self, name: &str) -> Result<(&AssetMeta, Vec<cel::File>), TrFileError> {
		let meta = self.meta(name)?;
		let data = self.read(meta.path())?;
		let file_type = FileType::from_name(meta.path());

		let images = if meta.is_archive() {
			cel::Archive::parse(&data, meta.nimgs(), meta.header_len(), file_type)
				.map_err(|e| e.in_file(meta.path()))?
				.into_images()
		} else {
			vec![cel::File::parse(data, meta.header_len(), file_type).map_err(|e| e.in_file(meta.path()))?]
		};
		Ok((meta, images))
	}

	/// Decodes every frame of an asset with `palette`.
	///
	/// Level CELs whose `.MIN` file is present are typed from it, like
	/// [`decode_level`](Self::decode_level); everything else is typed by the
	/// registry.
	pub fn decode(&self, name: &str, palette: &Palette) -> Result<DecodedAsset, TrFileError> {
		let (meta, images) = self.open_cel(name)?;
		let level_min = match self.level_min_path(meta) {
			Some(path) => {
				log::debug!("Typing frames of {} from {}", meta.path(), path);
				Some(self.open_min(&path)?)
			}
			None => None,
		};
		let sub_images = images
			.iter()
			.map(|file| match &level_min {
				Some(min) => min::decode_level_frames(file, meta, min, palette),
				None => file.decode_all(meta, palette),
			})
			.collect::<Result<Vec<_>, _>>()
			.map_err(|e| e.in_file(meta.path()))?;

		let asset = DecodedAsset {
			path: meta.path().to_string(),
			sub_images,
		};
		log::debug!("Decoded {}: {} frames", asset.path, asset.frame_count());
		Ok(asset)
	}

	/// Decodes every frame of an asset with its first palette.
	pub fn decode_default(&self, name: &str) -> Result<DecodedAsset, TrFileError> {
		let meta = self.meta(name)?;
		let palette = self.primary_palette(meta)?;
		self.decode(name, &palette)
	}

	/// Returns the path of the `.MIN` file next to a level CEL, if the data
	/// directory has one.
	pub fn level_min_path(&self, meta: &AssetMeta) -> Option<String> {
		let path = format!("{}.min", meta.path().strip_suffix(".cel")?);
		(min::MinLayout::from_name(&path).is_ok() && self.data.exists(&path)).then_some(path)
	}

	/// Opens a `.MIN` file.
	pub fn open_min(&self, path: &str) -> Result<min::File, TrFileError> {
		let layout = min::MinLayout::from_name(path).map_err(|e| e.in_file(path))?;
		min::File::from_bytes(&self.read(path)?, layout).map_err(|e| e.in_file(path))
	}

	/// Opens a `.TIL` file.
	pub fn open_til(&self, path: &str) -> Result<til::File, TrFileError> {
		til::File::from_bytes(&self.read(path)?).map_err(|e| e.in_file(path))
	}

	/// Decodes a level CEL, typing its frames with the matching `.MIN` file.
	pub fn decode_level(&self, cel_name: &str, min: &min::File, palette: &Palette) -> Result<Vec<RgbaImage>, TrFileError> {
		let (meta, images) = self.open_cel(cel_name)?;
		let mut frames = Vec::new();
		for file in &images {
			frames.extend(min::decode_level_frames(file, meta, min, palette).map_err(|e| e.in_file(meta.path()))?);
		}
		Ok(frames)
	}
}
