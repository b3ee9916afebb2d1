//! CEL/CL2 CLI Utility
//!
//! Inspects, dumps and fingerprints CEL and CL2 assets of an extracted game
//! data directory.
//!
//! # Features
//!
//! - **info**: Show registry metadata and the container layout of an asset
//! - **dump**: Decode every frame to PNG (one directory per palette) with JSON metadata
//! - **hash**: Print the SHA-1 of every decoded frame's RGBA bytes
//!
//! # Metadata Format
//!
//! ```json
//! {
//!   "path": "ctrlpan/p8bulbs.cel",
//!   "palette": "levels/towndata/town.pal",
//!   "transition": null,
//!   "frame_count": 2,
//!   "frames": [
//!     {
//!       "sub_image": 0,
//!       "index": 0,
//!       "width": 88,
//!       "height": 88,
//!       "frame_type": 1,
//!       "filename": "s0_f000.png"
//!     }
//!   ]
//! }
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Show what the registry and the file say about an asset
//! cargo run --example cel_utils -- info objcurs.cel
//!
//! # Dump every frame with every registered palette
//! cargo run --example cel_utils -- dump l1s.cel --all-palettes -o out/
//!
//! # Dump a monster with each of its transition tables applied
//! cargo run --example cel_utils -- dump zombiea.cl2 --transitions
//!
//! # Print frame hashes
//! cargo run --example cel_utils -- -d /games/data hash golddrop.cel
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sha1::{Digest, Sha1};
use tristram_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let settings = load_settings(&cli.global)?;
	let loader = AssetLoader::from_settings(&settings)
		.with_context(|| format!("Failed to open data directory {}", settings.data_dir.display()))?;

	match cli.command {
		Command::Info(args) => run_info(&loader, args),
		Command::Dump(args) => run_dump(&loader, &settings, args),
		Command::Hash(args) => run_hash(&loader, args),
	}
}

#[derive(Parser)]
#[command(name = "cel_utils")]
#[command(author = "tristram-rs project")]
#[command(version)]
#[command(about = "Inspect and decode CEL/CL2 sprite files", long_about = None)]
struct Cli {
	#[command(flatten)]
	global: GlobalArgs,

	#[command(subcommand)]
	command: Command,
}

#[derive(Args)]
struct GlobalArgs {
	/// Settings file (defaults to ./tristram.toml when present)
	#[arg(short, long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Extracted game data directory (overrides the settings)
	#[arg(short, long, value_name = "DIR", global = true, env = "TRISTRAM_DATA_DIR")]
	data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
	/// Show registry metadata and container layout
	Info(InfoArgs),
	/// Decode every frame to PNG files
	Dump(DumpArgs),
	/// Print the SHA-1 of every decoded frame
	Hash(HashArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Asset short name or archive-relative path
	#[arg(value_name = "ASSET")]
	asset: String,

	/// List every frame
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args)]
struct DumpArgs {
	/// Asset short name or archive-relative path
	#[arg(value_name = "ASSET")]
	asset: String,

	/// Output directory (defaults to the configured output directory)
	#[arg(short, long, value_name = "DIR")]
	output: Option<PathBuf>,

	/// Explicit palette path, overriding the registry
	#[arg(short, long, value_name = "PALETTE")]
	palette: Option<String>,

	/// Render with every registered palette instead of the first one
	#[arg(long, default_value_t = false)]
	all_palettes: bool,

	/// Also render once per registered transition table
	#[arg(long, default_value_t = false)]
	transitions: bool,
}

#[derive(Args)]
struct HashArgs {
	/// Asset short name or archive-relative path
	#[arg(value_name = "ASSET")]
	asset: String,

	/// Explicit palette path, overriding the registry
	#[arg(short, long, value_name = "PALETTE")]
	palette: Option<String>,
}

#[derive(Debug, Serialize)]
struct FrameMetadata {
	sub_image: usize,
	index: usize,
	width: u32,
	height: u32,
	frame_type: u8,
	filename: String,
}

#[derive(Debug, Serialize)]
struct DumpMetadata {
	path: String,
	palette: String,
	transition: Option<String>,
	frame_count: usize,
	frames: Vec<FrameMetadata>,
}

fn load_settings(global: &GlobalArgs) -> Result<Settings> {
	let mut settings = match &global.config {
		Some(path) => Settings::load_from(path).with_context(|| format!("Failed to load {}", path.display()))?,
		None => Settings::load().context("Failed to load settings")?,
	};
	if let Some(dir) = &global.data_dir {
		settings.data_dir.clone_from(dir);
	}
	Ok(settings)
}

fn run_info(loader: &AssetLoader, args: InfoArgs) -> Result<()> {
	let (meta, images) = loader.open_cel(&args.asset)?;

	println!("Asset:       {}", meta.path());
	println!("Frame size:  {}x{}", meta.width(), meta.height());
	println!("Header:      {} bytes", meta.header_len());
	println!("Frame type:  {}", meta.classifier().default_type());
	if meta.is_archive() {
		println!("Archive:     {} sub-images", meta.nimgs());
	}
	println!("Palettes:    {}", loader.palette_paths(meta).join(", "));
	if !meta.transitions().is_empty() {
		println!("Transitions: {}", meta.transitions().join(", "));
	}

	for (s, file) in images.iter().enumerate() {
		let pixels = meta.pixel_total(file.frame_count());
		println!("Sub-image {s}: {} frames, {} bytes, {} pixels", file.frame_count(), file.as_bytes().len(), pixels);

		if let Some(documented) = meta.documented_frames()
			&& documented != file.frame_count()
		{
			println!("  ! registry documents {documented} frames");
		}

		if args.verbose {
			for frame in file {
				let (w, h) = meta.frame_size(frame.index());
				println!("  {frame}: {w}x{h}, {}", meta.frame_type(frame.index()));
			}
		}
	}
	Ok(())
}

fn run_dump(loader: &AssetLoader, settings: &Settings, args: DumpArgs) -> Result<()> {
	let meta = loader.meta(&args.asset)?.clone();
	let output = args.output.unwrap_or_else(|| settings.output_dir.clone()).join(meta.short_name());

	let palettes: Vec<String> = match &args.palette {
		Some(path) => vec![path.clone()],
		None if args.all_palettes => loader.palette_paths(&meta).iter().map(ToString::to_string).collect(),
		None => loader.palette_paths(&meta).first().map(ToString::to_string).into_iter().collect(),
	};
	if palettes.is_empty() {
		bail!("No palette available for {}", meta.path());
	}

	let mut transitions: Vec<Option<&str>> = vec![None];
	if args.transitions {
		transitions.extend(meta.transitions().iter().map(|t| Some(t.as_str())));
	}

	for palette_path in &palettes {
		let base = loader.palette(palette_path)?;
		for transition in &transitions {
			let (palette, label) = match transition {
				Some(trn) => (base.remap(&loader.transition(trn)?), format!("{}+{}", stem(palette_path), stem(trn))),
				None => (base.clone(), stem(palette_path).to_string()),
			};
			let dir = output.join(&label);
			let asset = loader.decode(meta.path(), &palette)?;
			let metadata = write_frames(&meta, &asset, &dir, palette_path, transition.map(ToString::to_string))?;
			log::info!("Wrote {} frames to {}", metadata.frame_count, dir.display());
		}
	}
	Ok(())
}

fn write_frames(
	meta: &AssetMeta,
	asset: &DecodedAsset,
	dir: &Path,
	palette: &str,
	transition: Option<String>,
) -> Result<DumpMetadata> {
	fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

	let mut frames = Vec::with_capacity(asset.frame_count());
	for (s, f, image) in asset.frames() {
		let filename = format!("s{s}_f{f:03}.png");
		image.save(dir.join(&filename)).with_context(|| format!("Failed to write {filename}"))?;
		frames.push(FrameMetadata {
			sub_image: s,
			index: f,
			width: image.width(),
			height: image.height(),
			frame_type: meta.frame_type(f).code(),
			filename,
		});
	}

	let metadata = DumpMetadata {
		path: asset.path.clone(),
		palette: palette.to_string(),
		transition,
		frame_count: frames.len(),
		frames,
	};
	fs::write(dir.join("metadata.json"), serde_json::to_string_pretty(&metadata)?)?;
	Ok(metadata)
}

fn run_hash(loader: &AssetLoader, args: HashArgs) -> Result<()> {
	let meta = loader.meta(&args.asset)?;
	let palette = match &args.palette {
		Some(path) => loader.palette(path)?,
		None => loader.primary_palette(meta)?,
	};
	let asset = loader.decode(meta.path(), &palette)?;

	for (s, f, image) in asset.frames() {
		let digest = Sha1::digest(image.as_raw());
		println!("{s}:{f:03} {}x{} {}", image.width(), image.height(), hex::encode_upper(digest));
	}
	Ok(())
}

fn stem(path: &str) -> &str {
	let name = path.rsplit('/').next().unwrap_or(path);
	name.split('.').next().unwrap_or(name)
}
