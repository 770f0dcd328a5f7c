use std::hint::black_box;
use std::time::Instant;

use deepspace_common::Heading;
use deepspace_kernel::{World, WorldBounds, WorldObject};
use deepspace_render::{Frustum, Projector};
use glam::IVec3;

fn bench_project(object_count: usize, frustum: Frustum, iterations: usize) {
    let world = World::generate(WorldBounds::new(5000, 5000, 5000), object_count, 42);
    let projector = Projector::default();

    let mut visible = 0;
    let start = Instant::now();
    for i in 0..iterations {
        // Drift forward like the demo does.
        let viewer = IVec3::new(500, 500, (i % 5000) as i32);
        let out = projector.project(black_box(&world), black_box(viewer), black_box(frustum));
        visible += out.len();
        black_box(&out);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  project ({object_count} objects, depth={}, {iterations} iters): {per_iter:?}/iter, avg visible {}, total {elapsed:?}",
        frustum.depth,
        visible / iterations.max(1)
    );
}

fn bench_walk(object_count: usize, iterations: usize) {
    let world = World::generate(WorldBounds::new(1000, 1000, 1000), object_count, 7);
    let out = Projector::default().project(
        &world,
        IVec3::new(500, 500, 0),
        Frustum::new(1000, 1000, 1000),
    );

    let start = Instant::now();
    for _ in 0..iterations {
        let sum: i64 = out.far_to_near().map(|p| p.depth as i64).sum();
        black_box(sum);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  far-to-near walk ({} visible in {} buckets, {iterations} iters): {per_iter:?}/iter",
        out.len(),
        out.bucket_count()
    );
}

/// One object per depth, so every visible object gets its own bucket.
fn bench_distinct_depths(object_count: usize, iterations: usize) {
    let depth = object_count as i32;
    let mut world = World::new(WorldBounds::new(1000, 1000, depth));
    for (i, z) in (1..=depth).enumerate() {
        let template = WorldObject::new((i % 6) as u8, 3, Heading::North);
        world.add_object(&template, 400 + (i % 200) as i32, 500, z);
    }
    let projector = Projector::default();
    let viewer = IVec3::new(500, 500, 0);
    let frustum = Frustum::new(1000, 1000, depth);

    let mut buckets = 0;
    let start = Instant::now();
    for _ in 0..iterations {
        let out = projector.project(black_box(&world), black_box(viewer), black_box(frustum));
        let sum: i64 = out.far_to_near().map(|p| p.depth as i64).sum();
        buckets = out.bucket_count();
        black_box(sum);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  project + walk ({object_count} objects in {buckets} buckets, {iterations} iters): {per_iter:?}/iter"
    );
}

fn main() {
    println!("=== Projection Benchmarks ===\n");

    println!("Project:");
    bench_project(1_000, Frustum::new(600, 600, 250), 1000);
    bench_project(10_000, Frustum::new(600, 600, 250), 100);
    bench_project(100_000, Frustum::new(600, 600, 250), 10);
    bench_project(10_000, Frustum::new(5000, 5000, 5000), 100);

    println!("\nDraw-order walk:");
    bench_walk(1_000, 10000);
    bench_walk(10_000, 1000);

    println!("\nDistinct depths:");
    bench_distinct_depths(1_000, 1000);
    bench_distinct_depths(10_000, 100);

    println!("\n=== Done ===");
}
