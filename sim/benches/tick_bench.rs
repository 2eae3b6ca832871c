//! Criterion benchmarks for the water tick.
//!
//! Benchmarks:
//!   - one tick over a 3-layer patch of radius 10 (about 1000 cells)
//!   - the same patch with every cell walled on its east edge
//!   - overlay buffer export for the patch
//!
//! Run with: cargo bench -p soilwater_sim --bench tick_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use soilwater_sim::{HexAddress, HexDirection, SoilType, WaterSim};

const RADIUS: i32 = 10;
const LAYERS: i32 = 3;

fn build_patch(walled: bool) -> WaterSim {
    let mut sim = WaterSim::new();
    let soils = [SoilType::Sand, SoilType::Loam, SoilType::Clay];
    for y in 0..LAYERS {
        for q in -RADIUS..=RADIUS {
            for r in (-RADIUS).max(-q - RADIUS)..=RADIUS.min(-q + RADIUS) {
                let addr = HexAddress::new(q, r, y);
                sim.add_hex(addr, soils[(q - r + y).rem_euclid(3) as usize]);
                sim.add_water(addr, ((q * 31 + r * 17).rem_euclid(300)) as f32);
                if walled {
                    sim.add_barrier(addr, HexDirection::East.index());
                }
            }
        }
    }
    sim
}

// ---------------------------------------------------------------------------
// Benchmark: tick
// ---------------------------------------------------------------------------

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("water_tick");

    let mut open = build_patch(false);
    group.bench_function("open_patch", |b| {
        b.iter(|| open.tick(black_box(0.1)));
    });

    let mut walled = build_patch(true);
    group.bench_function("walled_patch", |b| {
        b.iter(|| walled.tick(black_box(0.1)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: overlay export
// ---------------------------------------------------------------------------

fn bench_overlay(c: &mut Criterion) {
    let sim = build_patch(false);
    c.bench_function("overlay_buffer", |b| {
        b.iter(|| black_box(sim.overlay_buffer()));
    });
}

criterion_group!(benches, bench_tick, bench_overlay);
criterion_main!(benches);
