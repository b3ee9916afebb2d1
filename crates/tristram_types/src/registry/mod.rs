//! Static asset metadata registry.
//!
//! CEL and CL2 files do not record frame dimensions, frame header lengths or
//! pixel encodings. That knowledge lives here: a table keyed by asset path,
//! shipped as an embedded TOML document (`assets.toml`) and parsed once per
//! process.
//!
//! # Document format
//!
//! ```toml
//! [[asset]]
//! path = "data/inv/objcurs.cel"   # archive-relative path
//! width = 28                      # default frame width
//! height = 28                     # default frame height
//! header = 0                      # bytes skipped at the start of each frame
//! nimgs = 0                       # 0 = plain container, N = archive of N images
//! palettes = ["levels/towndata/town.pal"]
//! transitions = []
//! frame_type = 1                  # default frame type code (0-6)
//! frame_types = [{ first = 0, last = 3, value = 0 }]
//! widths = [{ first = 0, value = 33 }]
//! heights = [{ first = 0, value = 29 }]
//! frames = 179                    # optional documented frame count
//! pixels = 123456                 # optional documented pixel total
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use tristram_types::registry::Registry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::builtin()?;
//! let meta = registry.get("golddrop.cel")?;
//! assert_eq!(meta.frame_size(0), (261, 136));
//! # Ok(())
//! # }
//! ```

mod ranges;

use std::{collections::HashMap, path::Path, sync::LazyLock};

use serde::Deserialize;

use crate::file::{FrameType, TrFileError};

pub use ranges::{FrameRanges, Span};

/// Embedded default registry document.
pub const BUILTIN_ASSETS: &str = include_str!("assets.toml");

static BUILTIN: LazyLock<Result<Registry, String>> =
	LazyLock::new(|| Registry::from_toml_str(BUILTIN_ASSETS).map_err(|e| e.to_string()));

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
	#[serde(default, rename = "asset")]
	assets: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAsset {
	path: String,
	width: u32,
	height: u32,
	#[serde(default)]
	header: usize,
	#[serde(default)]
	nimgs: usize,
	#[serde(default)]
	palettes: Vec<String>,
	#[serde(default)]
	transitions: Vec<String>,
	#[serde(default = "default_frame_type")]
	frame_type: FrameType,
	#[serde(default)]
	frame_types: Vec<Span<FrameType>>,
	#[serde(default)]
	widths: Vec<Span<u32>>,
	#[serde(default)]
	heights: Vec<Span<u32>>,
	#[serde(default)]
	frames: Option<usize>,
	#[serde(default)]
	pixels: Option<u64>,
}

fn default_frame_type() -> FrameType {
	FrameType::Sprite
}

/// Per-asset frame type selection: a default plus range overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameClassifier {
	default: FrameType,
	overrides: FrameRanges<FrameType>,
}

impl FrameClassifier {
	/// Creates a classifier from a default type and range overrides.
	pub fn new(default: FrameType, overrides: FrameRanges<FrameType>) -> Self {
		Self {
			default,
			overrides,
		}
	}

	/// Creates a classifier returning the same type for every frame.
	pub fn fixed(default: FrameType) -> Self {
		Self::new(default, FrameRanges::default())
	}

	/// Returns the frame type of `frame`.
	#[inline]
	pub fn classify(&self, frame: usize) -> FrameType {
		self.overrides.get(frame).unwrap_or(self.default)
	}

	/// Returns the default frame type.
	pub fn default_type(&self) -> FrameType {
		self.default
	}
}

/// Metadata of a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMeta {
	path: String,
	nimgs: usize,
	header_len: usize,
	width: u32,
	height: u32,
	widths: FrameRanges<u32>,
	heights: FrameRanges<u32>,
	palettes: Vec<String>,
	transitions: Vec<String>,
	classifier: FrameClassifier,
	frames: Option<usize>,
	pixels: Option<u64>,
}

impl AssetMeta {
	/// Creates metadata for a plain container with fixed frame size and type.
	pub fn new(path: impl Into<String>, width: u32, height: u32, frame_type: FrameType) -> Self {
		Self {
			path: normalize(&path.into()),
			nimgs: 0,
			header_len: 0,
			width,
			height,
			widths: FrameRanges::default(),
			heights: FrameRanges::default(),
			palettes: Vec::new(),
			transitions: Vec::new(),
			classifier: FrameClassifier::fixed(frame_type),
			frames: None,
			pixels: None,
		}
	}

	/// Sets the per-frame header length.
	pub fn with_header_len(mut self, header_len: usize) -> Self {
		self.header_len = header_len;
		self
	}

	/// Sets the number of archive sub-images (0 for a plain container).
	pub fn with_nimgs(mut self, nimgs: usize) -> Self {
		self.nimgs = nimgs;
		self
	}

	/// Replaces the frame classifier.
	pub fn with_classifier(mut self, classifier: FrameClassifier) -> Self {
		self.classifier = classifier;
		self
	}

	/// Sets per-frame width and height overrides.
	pub fn with_size_overrides(mut self, widths: FrameRanges<u32>, heights: FrameRanges<u32>) -> Self {
		self.widths = widths;
		self.heights = heights;
		self
	}

	fn from_raw(raw: RawAsset) -> Result<Self, String> {
		if raw.width == 0 || raw.height == 0 {
			return Err(format!("{}: frame dimensions must be non-zero", raw.path));
		}
		let context = |e: String| format!("{}: {e}", raw.path);
		let widths = FrameRanges::new(raw.widths).map_err(context)?;
		let heights = FrameRanges::new(raw.heights).map_err(context)?;
		let overrides = FrameRanges::new(raw.frame_types).map_err(context)?;

		Ok(Self {
			path: normalize(&raw.path),
			nimgs: raw.nimgs,
			header_len: raw.header,
			width: raw.width,
			height: raw.height,
			widths,
			heights,
			palettes: raw.palettes.iter().map(String::as_str).map(normalize).collect(),
			transitions: raw.transitions.iter().map(String::as_str).map(normalize).collect(),
			classifier: FrameClassifier::new(raw.frame_type, overrides),
			frames: raw.frames,
			pixels: raw.pixels,
		})
	}

	/// Returns the archive-relative path, lowercase with `/` separators.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the file name component of the path.
	pub fn short_name(&self) -> &str {
		short_name(&self.path)
	}

	/// Returns the number of archive sub-images (0 for plain containers).
	pub fn nimgs(&self) -> usize {
		self.nimgs
	}

	/// Returns `true` if the asset is an archive of several containers.
	pub fn is_archive(&self) -> bool {
		self.nimgs > 0
	}

	/// Returns the number of bytes skipped at the start of every frame.
	pub fn header_len(&self) -> usize {
		self.header_len
	}

	/// Returns the default frame width.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the default frame height.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the effective width of `frame`.
	pub fn frame_width(&self, frame: usize) -> u32 {
		self.widths.get(frame).unwrap_or(self.width)
	}

	/// Returns the effective height of `frame`.
	pub fn frame_height(&self, frame: usize) -> u32 {
		self.heights.get(frame).unwrap_or(self.height)
	}

	/// Returns the effective `(width, height)` of `frame`.
	pub fn frame_size(&self, frame: usize) -> (u32, u32) {
		(self.frame_width(frame), self.frame_height(frame))
	}

	/// Returns the frame type of `frame`.
	pub fn frame_type(&self, frame: usize) -> FrameType {
		self.classifier.classify(frame)
	}

	/// Returns the frame classifier.
	pub fn classifier(&self) -> &FrameClassifier {
		&self.classifier
	}

	/// Returns the palettes this asset is rendered with (empty = level default).
	pub fn palettes(&self) -> &[String] {
		&self.palettes
	}

	/// Returns the transition tables applicable to this asset.
	pub fn transitions(&self) -> &[String] {
		&self.transitions
	}

	/// Returns the documented frame count, if recorded.
	pub fn documented_frames(&self) -> Option<usize> {
		self.frames
	}

	/// Returns the documented total pixel count, if recorded.
	pub fn documented_pixels(&self) -> Option<u64> {
		self.pixels
	}

	/// Sums `width · height` over the first `frame_count` frames.
	pub fn pixel_total(&self, frame_count: usize) -> u64 {
		(0..frame_count)
			.map(|i| {
				let (w, h) = self.frame_size(i);
				u64::from(w) * u64::from(h)
			})
			.sum()
	}
}

/// Mapping from asset name to [`AssetMeta`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
	assets: Vec<AssetMeta>,
	by_path: HashMap<String, usize>,
	by_name: HashMap<String, usize>,
}

impl Registry {
	/// Returns the process-wide registry built from the embedded document.
	///
	/// # Errors
	///
	/// Returns [`TrFileError::Registry`] if the embedded document is invalid.
	pub fn builtin() -> Result<&'static Registry, TrFileError> {
		BUILTIN.as_ref().map_err(|e| TrFileError::Registry(e.clone()))
	}

	/// Parses a registry document.
	pub fn from_toml_str(text: &str) -> Result<Self, TrFileError> {
		let doc: RawDocument = toml::from_str(text).map_err(|e| TrFileError::Registry(e.to_string()))?;
		let mut registry = Self::default();
		for raw in doc.assets {
			let meta = AssetMeta::from_raw(raw).map_err(TrFileError::Registry)?;
			registry.insert(meta);
		}
		log::debug!("Loaded asset registry with {} entries", registry.len());
		Ok(registry)
	}

	/// Reads and parses a registry document from disk.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrFileError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|e| TrFileError::from(e).in_file(path))?;
		Self::from_toml_str(&text).map_err(|e| e.in_file(path))
	}

	/// Inserts an entry, replacing any entry with the same path.
	pub fn insert(&mut self, meta: AssetMeta) {
		let name = meta.short_name().to_string();
		let idx = match self.by_path.get(meta.path()) {
			Some(&idx) => {
				self.assets[idx] = meta;
				idx
			}
			None => {
				self.assets.push(meta);
				let idx = self.assets.len() - 1;
				self.by_path.insert(self.assets[idx].path.clone(), idx);
				idx
			}
		};
		if let Some(prev) = self.by_name.insert(name, idx)
			&& prev != idx
		{
			log::warn!(
				"Short name {} is shared by {} and {}",
				self.assets[idx].short_name(),
				self.assets[prev].path(),
				self.assets[idx].path()
			);
		}
	}

	/// Merges `other` into `self`; entries of `other` win on equal paths.
	pub fn merge(&mut self, other: Registry) {
		for meta in other.assets {
			self.insert(meta);
		}
	}

	/// Looks an asset up by short name (`objcurs.cel`) or full path.
	///
	/// Lookup is case-insensitive and accepts `\` separators.
	pub fn get(&self, name: &str) -> Result<&AssetMeta, TrFileError> {
		let key = normalize(name);
		self.by_path
			.get(&key)
			.or_else(|| self.by_name.get(&key))
			.map(|&idx| &self.assets[idx])
			.ok_or_else(|| TrFileError::AssetUnknown {
				name: name.to_string(),
			})
	}

	/// Returns the full archive-relative path of a short name.
	pub fn path_of(&self, short_name: &str) -> Option<&str> {
		self.by_name.get(&normalize(short_name)).map(|&idx| self.assets[idx].path())
	}

	/// Returns `true` if the registry knows `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_ok()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.assets.len()
	}

	/// Returns `true` if the registry has no entries.
	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}

	/// Iterates over all entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &AssetMeta> {
		self.assets.iter()
	}
}

/// Lowercases a path and converts `\` separators to `/`.
pub fn normalize(path: &str) -> String {
	path.trim().replace('\\', "/").to_ascii_lowercase()
}

/// Returns the file name component of a `/`-separated path.
pub fn short_name(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}
