//! Benchmarks for ring cleanup, validation, boolean operations and splitting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ringprep::polygon::{BooleanOpEngine, PointRing, SelfIntersectionSplitter};
use ringprep::Point2;

/// Regular polygon with `num_points` vertices.
fn generate_circle(num_points: usize, cx: f64, cy: f64, radius: f64) -> Vec<Point2<f64>> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64 * 2.0 * std::f64::consts::PI;
            Point2::new(cx + radius * t.cos(), cy + radius * t.sin())
        })
        .collect()
}

/// Circle with a midpoint inserted on every edge, so half the vertices are
/// collinear with their neighbours.
fn generate_padded_circle(num_points: usize) -> Vec<Point2<f64>> {
    let corners = generate_circle(num_points, 0.0, 0.0, 10.0);
    let n = corners.len();
    (0..n)
        .flat_map(|i| [corners[i], corners[i].midpoint(corners[(i + 1) % n])])
        .collect()
}

/// Star polygon `{n/2}`: every second vertex of a regular n-gon.
fn generate_star(num_points: usize) -> Vec<Point2<f64>> {
    let circle = generate_circle(num_points, 0.0, 0.0, 10.0);
    (0..num_points)
        .map(|i| circle[(2 * i) % num_points])
        .collect()
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");

    for size in [100, 1000, 5000] {
        let ring = PointRing::from_points(generate_padded_circle(size));
        group.throughput(Throughput::Elements(ring.len() as u64));

        group.bench_with_input(BenchmarkId::new("padded_circle", size), &ring, |b, ring| {
            b.iter(|| {
                let mut ring = ring.clone();
                ring.simplify(black_box(0.0))
            })
        });
    }

    group.finish();
}

fn bench_is_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_simple");

    // Pairwise edge test, so keep sizes small
    for size in [50, 200, 500] {
        let ring = PointRing::from_points(generate_circle(size, 0.0, 0.0, 10.0));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("circle", size), &ring, |b, ring| {
            b.iter(|| black_box(ring).is_simple())
        });
    }

    group.finish();
}

fn bench_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean_union");

    for size in [16, 64, 256] {
        let a = PointRing::from_points(generate_circle(size, 0.0, 0.0, 10.0));
        let b = PointRing::from_points(generate_circle(size, 7.0, 1.0, 10.0));
        group.throughput(Throughput::Elements(2 * size as u64));

        group.bench_with_input(BenchmarkId::new("offset_circles", size), &(a, b), |bench, (a, b)| {
            bench.iter(|| BooleanOpEngine::union(black_box(a), black_box(b)))
        });
    }

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_intersection_split");

    for size in [5, 7, 11] {
        let star = PointRing::from_points(generate_star(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("star", size), &star, |b, star| {
            b.iter(|| SelfIntersectionSplitter::split(black_box(star)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simplify, bench_is_simple, bench_union, bench_split);
criterion_main!(benches);
