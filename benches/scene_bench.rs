use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use solstice::options::SceneOptions;
use solstice::scene::{GeneratorParams, SceneGenerator};

fn generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_generation");

    for count in [64, 256, 1024] {
        let options = SceneOptions {
            max_spheres: count,
            ..SceneOptions::default()
        };
        let generator = SceneGenerator::new(GeneratorParams::from(&options));
        let mut rng = StdRng::seed_from_u64(7);

        group.bench_function(format!("{count}_spheres"), |b| {
            b.iter(|| black_box(generator.generate(&mut rng)));
        });
    }
    group.finish();
}

fn upload_packing_benchmark(c: &mut Criterion) {
    let options = SceneOptions {
        max_spheres: 1024,
        ..SceneOptions::default()
    };
    let scene = SceneGenerator::new(GeneratorParams::from(&options))
        .generate(&mut StdRng::seed_from_u64(7));

    c.bench_function("pack_1024_slots", |b| {
        b.iter(|| black_box(scene.to_gpu()));
    });
}

criterion_group!(benches, generation_benchmark, upload_packing_benchmark);
criterion_main!(benches);
