//! Level tile utility.
//!
//! Renders the dungeon pieces (`.MIN`) and tiles (`.TIL`) of a level from its
//! level CEL. Levels are named `town`, `l1`, `l2`, `l3` or `l4`; their files
//! live under `levels/<name>data/` in the extracted game data.
//!
//! Provides three subcommands:
//! - `info`: piece, tile and frame counts of a level, plus frame type usage.
//! - `pieces`: render every dungeon piece to `piece_NNNN.png`.
//! - `tiles`: render every tile to `tile_NNNN.png`.
//!
//! ```bash
//! cargo run --example level_utils -- info l1
//! cargo run --example level_utils -- pieces town -o out/town --limit 50
//! cargo run --example level_utils -- tiles l4 --palette levels/l4data/l4_2.pal
//! ```

use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use tristram_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let mut settings = Settings::load().context("Failed to load settings")?;
	if let Some(dir) = cli.data_dir {
		settings.data_dir = dir;
	}
	let loader = AssetLoader::from_settings(&settings)
		.with_context(|| format!("Failed to open data directory {}", settings.data_dir.display()))?;

	match cli.command {
		Command::Info(level) => run_info(&loader, &level),
		Command::Pieces(args) => run_render(&loader, &settings, &args, Target::Pieces),
		Command::Tiles(args) => run_render(&loader, &settings, &args, Target::Tiles),
	}
}

#[derive(Parser)]
#[command(name = "level_utils")]
#[command(author = "tristram-rs project")]
#[command(version)]
#[command(about = "Render dungeon pieces and tiles of a level", long_about = None)]
struct Cli {
	/// Extracted game data directory (overrides the settings)
	#[arg(short, long, value_name = "DIR", global = true, env = "TRISTRAM_DATA_DIR")]
	data_dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Show piece, tile and frame counts of a level
	Info(LevelArgs),
	/// Render every dungeon piece
	Pieces(RenderArgs),
	/// Render every tile
	Tiles(RenderArgs),
}

#[derive(Args)]
struct LevelArgs {
	/// Level name: town, l1, l2, l3 or l4
	#[arg(value_name = "LEVEL")]
	level: String,
}

#[derive(Args)]
struct RenderArgs {
	#[command(flatten)]
	level: LevelArgs,

	/// Output directory (defaults to `<output_dir>/<level>/<pieces|tiles>`)
	#[arg(short, long, value_name = "DIR")]
	output: Option<PathBuf>,

	/// Palette path (defaults to the level CEL's first registered palette)
	#[arg(short, long, value_name = "PALETTE")]
	palette: Option<String>,

	/// Render at most this many images
	#[arg(short, long, value_name = "COUNT")]
	limit: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
	Pieces,
	Tiles,
}

impl Target {
	fn name(self) -> &'static str {
		match self {
			Self::Pieces => "pieces",
			Self::Tiles => "tiles",
		}
	}
}

/// Archive-relative paths of a level's files.
struct LevelPaths {
	name: String,
	cel: String,
	min: String,
	til: String,
}

impl LevelPaths {
	fn new(level: &str) -> Result<Self> {
		let name = level.to_ascii_lowercase();
		let dir = match name.as_str() {
			"town" => "towndata".to_string(),
			"l1" | "l2" | "l3" | "l4" => format!("{name}data"),
			_ => bail!("Unknown level {level}; expected town, l1, l2, l3 or l4"),
		};
		Ok(Self {
			cel: format!("levels/{dir}/{name}.cel"),
			min: format!("levels/{dir}/{name}.min"),
			til: format!("levels/{dir}/{name}.til"),
			name,
		})
	}
}

fn run_info(loader: &AssetLoader, args: &LevelArgs) -> Result<()> {
	let paths = LevelPaths::new(&args.level)?;
	let (_, images) = loader.open_cel(&paths.cel)?;
	let min = loader.open_min(&paths.min)?;
	let til = loader.open_til(&paths.til)?;
	let frame_count: usize = images.iter().map(cel::File::frame_count).sum();

	println!("Level:        {}", paths.name);
	println!("Level frames: {frame_count}");
	println!("Pieces:       {} ({} blocks each)", min.len(), min.layout().blocks());
	println!("Tiles:        {}", til.len());

	if min.max_frame_index() > frame_count {
		println!("  ! pieces reference frame {} past the end of {}", min.max_frame_index(), paths.cel);
	}

	let mut usage: BTreeMap<u8, usize> = BTreeMap::new();
	for ty in min.frame_types()?.values() {
		*usage.entry(ty.code()).or_default() += 1;
	}
	println!("Frame types used by pieces:");
	for (code, count) in usage {
		println!("  {}: {count} frames", FrameType::try_from(code)?);
	}
	Ok(())
}

fn run_render(loader: &AssetLoader, settings: &Settings, args: &RenderArgs, target: Target) -> Result<()> {
	let paths = LevelPaths::new(&args.level.level)?;
	let palette = match &args.palette {
		Some(path) => loader.palette(path)?,
		None => loader.primary_palette(loader.meta(&paths.cel)?)?,
	};

	let min = loader.open_min(&paths.min)?;
	let frames = loader.decode_level(&paths.cel, &min, &palette)?;
	let limit = args.limit.unwrap_or(usize::MAX);

	let output = args.output.clone().unwrap_or_else(|| settings.output_dir.join(&paths.name).join(target.name()));
	fs::create_dir_all(&output).with_context(|| format!("Failed to create {}", output.display()))?;

	let written = match target {
		Target::Pieces => {
			let pieces = min.render_all(&frames)?;
			save_all(&output, "piece", pieces.iter().take(limit))?
		}
		Target::Tiles => {
			let til = loader.open_til(&paths.til)?;
			let pieces = min.render_all(&frames)?;
			let tiles = til.tiles().iter().take(limit).map(|t| t.render(&pieces)).collect::<Result<Vec<_>, _>>()?;
			save_all(&output, "tile", tiles.iter())?
		}
	};

	log::info!("Wrote {} {} to {}", written, target.name(), output.display());
	Ok(())
}

fn save_all<'a>(dir: &Path, prefix: &str, images: impl Iterator<Item = &'a RgbaImage>) -> Result<usize> {
	let mut count = 0;
	for (i, image) in images.enumerate() {
		let path = dir.join(format!("{prefix}_{i:04}.png"));
		image.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
		count += 1;
	}
	Ok(count)
}
