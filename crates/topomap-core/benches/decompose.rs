use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use topomap_core::graph::CoordRef;
use topomap_core::{CoordinateMode, EdgeRow, NodeRow, Scene, SceneConfig, SceneInput};

/// A grid of `side * side` nodes with one multi-hop path per row and per column, plus a
/// literal waypoint between every second pair of hops.
fn grid_input(side: usize) -> SceneInput {
    let id = |r: usize, c: usize| format!("n{r}_{c}");
    let mut nodes = Vec::with_capacity(side * side);
    for r in 0..side {
        for c in 0..side {
            nodes.push(NodeRow::new(id(r, c), c as f64 * 10.0, r as f64 * 10.0));
        }
    }

    let mut edges = Vec::with_capacity(side * 2);
    for line in 0..side {
        for horizontal in [true, false] {
            let mut path = Vec::new();
            for k in 0..side {
                let (r, c) = if horizontal { (line, k) } else { (k, line) };
                if k > 0 && k % 2 == 0 {
                    path.push(CoordRef::point(c as f64 * 10.0 - 5.0, r as f64 * 10.0 + 2.0));
                }
                path.push(CoordRef::node(id(r, c)));
            }
            let tag = if horizontal { "h" } else { "v" };
            edges.push(EdgeRow::new(path).with_id(format!("{tag}{line}")));
        }
    }
    SceneInput { nodes, edges }
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_update");
    group.measurement_time(Duration::from_secs(5));

    for side in [8usize, 32, 64] {
        let input = grid_input(side);
        for mode in [CoordinateMode::Cartesian, CoordinateMode::Geographic] {
            let label = format!("{mode:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(label, side), &input, |b, input| {
                b.iter_batched(
                    || {
                        Scene::new(SceneConfig {
                            mode,
                            ..Default::default()
                        })
                    },
                    |mut scene| {
                        let out = scene.update(black_box(input), None);
                        black_box(out.map(|g| g.line_count()).unwrap_or_default())
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let input = grid_input(12);
    let algorithm = topomap_core::LayoutConfig::default().algorithm();
    c.bench_function("scene_update_with_layout/12", |b| {
        b.iter_batched(
            Scene::default,
            |mut scene| {
                let out = scene.update(black_box(&input), Some(&algorithm));
                black_box(out.map(|g| g.line_count()).unwrap_or_default())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_update, bench_layout);
criterion_main!(benches);
