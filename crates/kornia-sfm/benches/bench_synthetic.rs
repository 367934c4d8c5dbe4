use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kornia_sfm::camera::IntrinsicModel;
use kornia_sfm::dataset::{NViewDataset, NViewDatasetConfig};
use kornia_sfm::features::DescriberType;
use kornia_sfm::synthetic::{
    convert_rig_scene, convert_scene, synthesize_features, synthesize_matches, RigStructure,
    UniformNoise,
};

fn bench_convert_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_scene");
    let config = NViewDatasetConfig::default();

    for (nviews, npoints) in [(8, 256), (32, 1024), (64, 4096)] {
        let dataset = NViewDataset::ring(nviews, npoints, &config);
        let id = format!("{nviews}x{npoints}");

        group.bench_with_input(BenchmarkId::new("single", &id), &dataset, |b, d| {
            b.iter(|| std::hint::black_box(convert_scene(d, &config, IntrinsicModel::Pinhole)))
        });

        let rig = RigStructure::stereo(0.02);
        group.bench_with_input(BenchmarkId::new("stereo_rig", &id), &dataset, |b, d| {
            b.iter(|| {
                std::hint::black_box(convert_rig_scene(d, &config, IntrinsicModel::Pinhole, &rig))
            })
        });
    }
    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let config = NViewDatasetConfig::default();

    for (nviews, npoints) in [(8, 256), (32, 1024), (64, 4096)] {
        let dataset = NViewDataset::ring(nviews, npoints, &config);
        let sfm_data = convert_scene(&dataset, &config, IntrinsicModel::Pinhole);
        let id = format!("{nviews}x{npoints}");

        group.bench_with_input(BenchmarkId::new("features", &id), &sfm_data, |b, s| {
            let mut noise = UniformNoise::new(0.5);
            b.iter(|| std::hint::black_box(synthesize_features(s, DescriberType::Sift, &mut noise)))
        });

        group.bench_with_input(BenchmarkId::new("matches", &id), &sfm_data, |b, s| {
            b.iter(|| std::hint::black_box(synthesize_matches(s, DescriberType::Sift)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert_scene, bench_synthesize);
criterion_main!(benches);
