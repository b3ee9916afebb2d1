//! Read-only view of an extracted game data directory.
//!
//! Game assets are addressed by archive-relative paths such as
//! `Levels\TownData\Town.pal`. Extracted copies keep whatever casing the
//! extractor produced, so [`DataDir`] resolves paths one component at a time,
//! falling back to a case-insensitive match when the exact name is missing.
//!
//! ```no_run
//! use tristram_vfs::DataDir;
//!
//! # fn main() -> std::io::Result<()> {
//! let data = DataDir::new("bin")?;
//! let bytes = data.read("LEVELS\\TOWNDATA\\TOWN.PAL")?;
//! assert_eq!(bytes.len(), 768);
//! # Ok(())
//! # }
//! ```

use std::{
	fs, io,
	path::{Path, PathBuf},
};

/// A game data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
	root: PathBuf,
}

impl DataDir {
	/// Opens a data directory.
	///
	/// # Errors
	///
	/// Returns [`io::ErrorKind::NotFound`] if `root` is not a directory.
	pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
		let root = root.into();
		if !root.is_dir() {
			return Err(io::Error::new(
				io::ErrorKind::NotFound,
				format!("data directory {} does not exist", root.display()),
			));
		}
		log::debug!("Using data directory {}", root.display());
		Ok(Self {
			root,
		})
	}

	/// Returns the directory root.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves an archive-relative path to an existing file system path.
	///
	/// Both `/` and `\` separate components. Each component matches exactly
	/// first, then case-insensitively.
	///
	/// # Errors
	///
	/// Returns [`io::ErrorKind::NotFound`] if some component has no match.
	pub fn resolve(&self, name: &str) -> io::Result<PathBuf> {
		let mut current = self.root.clone();
		for component in name.split(['/', '\\']).filter(|c| !c.is_empty() && *c != ".") {
			let exact = current.join(component);
			if exact.exists() {
				current = exact;
				continue;
			}
			current = find_case_insensitive(&current, component)?.ok_or_else(|| {
				io::Error::new(io::ErrorKind::NotFound, format!("{} not found under {}", name, self.root.display()))
			})?;
		}
		log::trace!("Resolved {} to {}", name, current.display());
		Ok(current)
	}

	/// Returns `true` if `name` resolves to an existing file.
	pub fn exists(&self, name: &str) -> bool {
		self.resolve(name).is_ok_and(|p| p.is_file())
	}

	/// Reads the whole file at `name`.
	pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
		fs::read(self.resolve(name)?)
	}
}

fn find_case_insensitive(dir: &Path, component: &str) -> io::Result<Option<PathBuf>> {
	if !dir.is_dir() {
		return Ok(None);
	}
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		if entry.file_name().to_string_lossy().eq_ignore_ascii_case(component) {
			return Ok(Some(entry.path()));
		}
	}
	Ok(None)
}
