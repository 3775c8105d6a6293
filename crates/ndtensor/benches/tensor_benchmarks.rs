use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ndtensor::Tensor;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_tensor(shape: &[usize], seed: u64) -> Tensor<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Tensor::from_shape_fn(shape, |_| rng.random_range(-1.0..1.0))
}

fn benchmark_tensor_clone(c: &mut Criterion) {
    let tensor = random_tensor(&[100, 100], 0);

    c.bench_function("tensor clone", |b| {
        b.iter(|| {
            let _clone = black_box(&tensor).clone();
        })
    });
}

fn benchmark_add_inplace(c: &mut Criterion) {
    let tensor1 = random_tensor(&[100, 100], 1);
    let tensor2 = random_tensor(&[10_000], 2);

    c.bench_function("add_inplace", |b| {
        b.iter(|| {
            let mut t = black_box(&tensor1).clone();
            ndtensor::ops::add_inplace(&mut t, black_box(&tensor2)).unwrap();
        })
    });
}

fn benchmark_transpose(c: &mut Criterion) {
    let tensor = random_tensor(&[16, 32, 64], 3);

    c.bench_function("transpose 3d", |b| {
        b.iter(|| {
            let _t = black_box(&tensor).transpose(&[2, 0, 1]).unwrap();
        })
    });
}

fn benchmark_assign(c: &mut Criterion) {
    let src = Tensor::from_shape_val(&[64, 64, 64], 1.0f64);
    let mut dst = Tensor::<f32>::zeros(&[8, 64, 64, 64]);

    c.bench_function("assign sub-tensor", |b| {
        b.iter(|| {
            dst.assign(black_box(&src), &[3], &[]).unwrap();
        })
    });
}

fn benchmark_dot(c: &mut Criterion) {
    let a = random_tensor(&[64, 64], 4);
    let b_ = random_tensor(&[64, 64], 5);

    c.bench_function("dot matmul 64", |b| {
        b.iter(|| {
            let _c = black_box(&a).dot(black_box(&b_), &[1], &[0]).unwrap();
        })
    });

    let t = random_tensor(&[8, 16, 16, 8], 6);
    c.bench_function("dot two axes", |b| {
        b.iter(|| {
            let _c = black_box(&t).dot(black_box(&t), &[1, 2], &[2, 1]).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_tensor_clone,
    benchmark_add_inplace,
    benchmark_transpose,
    benchmark_assign,
    benchmark_dot
);
criterion_main!(benches);
