use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use ditherlab::dither_with_rng;

use bench_utils::*;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered");
    let image = gen_random_image(BENCH_IMAGE_SIZE);

    macro_rules! benchmark_sizes {
        ($name:expr, $sizes:expr) => {
            for size in $sizes {
                let params = default_params($name).with("matrixSize", size as f64);
                let id = BenchmarkId::new($name, size);
                group.bench_with_input(id, &params, |b, params| {
                    let mut rng = bench_rng();
                    b.iter_batched_ref(
                        || image.clone(),
                        |buffer| dither_with_rng(buffer, $name, params, &mut rng),
                        BatchSize::LargeInput,
                    )
                });
            }
        };
    }

    benchmark_sizes!("Bayer Matrix", [2, 4, 8]);
    benchmark_sizes!("Clustered Dot Ordered", [1, 3, 6]);
    benchmark_sizes!("Dispersed Dot Ordered", [2, 8, 16]);

    // first iteration pays for building the shared matrix
    let params = default_params("Void-and-Cluster");
    group.bench_function("Void-and-Cluster", |b| {
        let mut rng = bench_rng();
        b.iter_batched_ref(
            || image.clone(),
            |buffer| dither_with_rng(buffer, "Void-and-Cluster", &params, &mut rng),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(ordered, criterion_benchmark);
criterion_main!(ordered);
