//! Benchmarks for multiresolution operations.

use criterion::{criterion_group, criterion_main, Criterion};
use multires::algo::multires::{apply_details, compute_details, higher_synthesis, lower_analysis};
use multires::algo::subdivide::{subdivide_level, SubdivisionOperator};
use multires::mesh::{compute_vertex_normals, primitives};
use multires::prelude::*;

/// An icosahedron subdivided `levels` times, with the top level sculpted.
fn create_pair(levels: usize) -> (LevelMesh, LevelMesh) {
    let scheme = SubdivisionScheme::Loop;
    let mut coarse = primitives::icosahedron().unwrap();
    for _ in 1..levels {
        coarse = subdivide_level(&coarse, &scheme).unwrap();
        coarse.detach();
    }
    let mut fine = subdivide_level(&coarse, &scheme).unwrap();

    let normals = fine.normals().to_vec();
    for (p, n) in fine.positions_mut().iter_mut().zip(&normals) {
        *p += n * (0.02 * (7.0 * p.x).sin());
    }
    fine.update_normals();
    (coarse, fine)
}

fn bench_codec(c: &mut Criterion) {
    let (coarse, fine) = create_pair(5);
    let scheme = SubdivisionScheme::Loop;
    let refinement = fine.refinement().unwrap();
    let prediction = scheme.predict(&coarse, refinement).unwrap();
    let normals = compute_vertex_normals(&prediction.positions, fine.faces());

    for (name, options) in [
        ("parallel", MultiresOptions::default()),
        ("sequential", MultiresOptions::default().sequential()),
    ] {
        let details = compute_details(
            fine.positions(),
            fine.colors(),
            &prediction,
            &normals,
            fine.ring(),
            &options,
        )
        .unwrap();

        c.bench_function(&format!("compute_details_{}", name), |b| {
            b.iter(|| {
                compute_details(
                    fine.positions(),
                    fine.colors(),
                    &prediction,
                    &normals,
                    fine.ring(),
                    &options,
                )
                .unwrap()
            });
        });

        c.bench_function(&format!("apply_details_{}", name), |b| {
            b.iter(|| {
                let mut positions = prediction.positions.clone();
                let mut colors = prediction.colors.clone();
                apply_details(&mut positions, &mut colors, &normals, fine.ring(), &details, &options)
                    .unwrap();
                positions
            });
        });
    }
}

fn bench_transitions(c: &mut Criterion) {
    let (mut coarse, mut fine) = create_pair(4);
    let scheme = SubdivisionScheme::Loop;
    let options = MultiresOptions::default();

    c.bench_function("lower_analysis_level4", |b| {
        b.iter(|| lower_analysis(&mut fine, &mut coarse, &scheme, &options).unwrap());
    });

    c.bench_function("higher_synthesis_level4", |b| {
        b.iter(|| higher_synthesis(&coarse, &mut fine, &scheme, &options).unwrap());
    });
}

criterion_group!(benches, bench_codec, bench_transitions);
criterion_main!(benches);
