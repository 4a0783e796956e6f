use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use losgeom::{LosOptions, Point2, Point3, Polygon2D, Scene, Structure, Vec3, Vessel, VesselKind};

fn circle(r0: f64, a: f64, n: usize) -> Polygon2D {
    let points = (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            Point2::new(r0 + a * t.cos(), a * t.sin())
        })
        .collect();
    Polygon2D::new(points).unwrap()
}

fn rect(r0: f64, z0: f64, r1: f64, z1: f64) -> Polygon2D {
    Polygon2D::new(vec![
        Point2::new(r0, z0),
        Point2::new(r1, z0),
        Point2::new(r1, z1),
        Point2::new(r0, z1),
    ])
    .unwrap()
}

/// Torus with a limiter ring and a set of toroidally localised tiles.
fn scene() -> Scene {
    let vessel = Vessel::new(circle(1.0, 0.3, 128), VesselKind::Toroidal);
    let mut structures = vec![Structure::new(rect(0.72, -0.05, 0.78, 0.05))];
    for i in 0..16 {
        let phi = TAU * i as f64 / 16.0;
        structures.push(
            Structure::new(rect(1.2, 0.1, 1.25, 0.18)).with_limits(vec![(phi, phi + 0.1)]),
        );
    }
    Scene::new(&vessel, &structures).unwrap()
}

/// A pinhole camera looking into the torus.
fn camera(n: usize) -> (Vec<Point3>, Vec<Vec3>) {
    let pinhole = Point3::new(1.8, 0.0, 0.2);
    let side = (n as f64).sqrt().ceil() as usize;
    let mut origins = Vec::with_capacity(side * side);
    let mut directions = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let u = i as f64 / side as f64 - 0.5;
            let v = j as f64 / side as f64 - 0.5;
            origins.push(pinhole);
            directions.push(Vec3::new(-1.0, 1.2 * u, 0.8 * v - 0.1));
        }
    }
    (origins, directions)
}

fn bench_batch(c: &mut Criterion) {
    let scene = scene();
    let mut group = c.benchmark_group("trace_batch");

    for n in [1_000, 10_000, 100_000] {
        let (origins, directions) = camera(n);
        for (name, options) in [
            ("parallel", LosOptions::default()),
            (
                "sequential",
                LosOptions {
                    parallel: false,
                    ..LosOptions::default()
                },
            ),
            (
                "no_prefilter",
                LosOptions {
                    prefilter: false,
                    ..LosOptions::default()
                },
            ),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| {
                    scene
                        .trace_batch(black_box(&origins), black_box(&directions), &options)
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_batch);
criterion_main!(benches);
