//! Benchmark suite for CEL/CL2 frame decoding
//!
//! Measures each frame encoding on synthetic payloads, plus container
//! splitting and whole-file decoding.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tristram_benches::{container, isometric_frame, plain_frame, rle_frame, sizes, sprite_frame};
use tristram_types::{
	file::{FrameType, Palette, Side, cel},
	registry::AssetMeta,
};

/// Benchmark the sprite decoders at several frame sizes
fn bench_sprite_decoders(c: &mut Criterion) {
	let mut group = c.benchmark_group("cel_decode");
	let palette = Palette::grayscale();

	for (name, (w, h)) in [("item", sizes::ITEM), ("monster", sizes::MONSTER), ("screen", sizes::SCREEN)] {
		group.throughput(Throughput::Elements(u64::from(w * h)));

		let cases = [
			(FrameType::Plain, plain_frame(w, h)),
			(FrameType::Sprite, sprite_frame(w, h)),
			(FrameType::RleSprite, rle_frame(w, h)),
		];
		for (ty, data) in cases {
			group.bench_with_input(BenchmarkId::new(format!("type{}", ty.code()), name), &data, |b, data| {
				b.iter(|| black_box(cel::decode(ty, black_box(data), w, h, &palette)));
			});
		}
	}

	group.finish();
}

/// Benchmark the four isometric level encodings
fn bench_isometric(c: &mut Criterion) {
	let mut group = c.benchmark_group("cel_isometric");
	let palette = Palette::grayscale();
	group.throughput(Throughput::Elements(32 * 32));

	for ty in [
		FrameType::IsoTriangle(Side::Left),
		FrameType::IsoTriangle(Side::Right),
		FrameType::IsoTrapezoid(Side::Left),
		FrameType::IsoTrapezoid(Side::Right),
	] {
		let data = isometric_frame(ty);
		group.bench_with_input(BenchmarkId::new("decode", ty.code()), &data, |b, data| {
			b.iter(|| black_box(cel::decode(ty, black_box(data), 32, 32, &palette)));
		});
	}

	group.finish();
}

/// Benchmark container parsing and whole-file decoding
fn bench_container(c: &mut Criterion) {
	let mut group = c.benchmark_group("cel_container");
	let palette = Palette::grayscale();
	let (w, h) = sizes::MONSTER;

	// A 16-frame monster animation with the usual 10-byte frame headers
	let data = container(&rle_frame(w, h), 16, 10);
	let meta = AssetMeta::new("monsters/bench/bench.cl2", w, h, FrameType::RleSprite).with_header_len(10);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("split", |b| {
		b.iter(|| black_box(cel::File::from_bytes(black_box(&data), 10)));
	});

	let file = match cel::File::from_bytes(&data, 10) {
		Ok(file) => file,
		Err(e) => {
			eprintln!("Warning: Could not build benchmark container: {e}");
			return;
		}
	};
	group.sample_size(50);
	group.bench_function("decode_all", |b| {
		b.iter(|| black_box(file.decode_all(&meta, &palette)));
	});

	group.finish();
}

criterion_group!(benches, bench_sprite_decoders, bench_isometric, bench_container);

criterion_main!(benches);
