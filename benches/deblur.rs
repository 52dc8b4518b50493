use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use nalgebra::DMatrix;
use psf_deblur::deblur_pipeline::{
    deconvolve, DeblurConfig, DeblurPipeline, Image, Operator, PsfKind,
};

fn generate_gradient(size: usize) -> Image {
    Image::grayscale(DMatrix::from_fn(size, size, |r, c| {
        ((r + c) % 256) as f64 / 255.0
    }))
}

fn benchmark_process_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_by_size");

    let sizes = vec![(32, "32x32"), (64, "64x64"), (128, "128x128")];

    for (size, label) in sizes {
        let image = generate_gradient(size);

        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let config = DeblurConfig::builder().psf(PsfKind::Gaussian, 5, 0.8).build();
            let pipeline = DeblurPipeline::new(config).unwrap();

            b.iter(|| {
                let _ = pipeline.process(black_box(image));
            });
        });
    }

    group.finish();
}

fn benchmark_invert(c: &mut Criterion) {
    let mut group = c.benchmark_group("invert_operator");

    let kernels = vec![
        (PsfKind::Gaussian, 5, 0.8, "gaussian"),
        (PsfKind::Defocus, 4, 1.0, "defocus"),
    ];

    for (kind, n, param, label) in kernels {
        let kernel = kind.synthesize(n, param).unwrap();
        let operator = Operator::build(&kernel, 96).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(label), &operator, |b, operator| {
            b.iter(|| {
                let _ = deconvolve::invert(black_box(operator));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_process_sizes, benchmark_invert);
criterion_main!(benches);
