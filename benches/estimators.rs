//! Estimator and sampler benchmarks.
//!
//! Compares the cost of the four P(A<B) estimators on a realistic posterior
//! pair, the binomial generators (inversion, BTPE, naive) and the two pairwise
//! comparators used by Monte Carlo.

use abconfidence::estimators::monte_carlo::sample_based_beta_a_lt_b;
use abconfidence::sampling::{naive_binomial_sample, optimized_binomial_sample};
use abconfidence::{
    integral_beta_a_lt_b, normal_approx_beta_a_lt_b, summation_beta_a_lt_b, BetaParams, Delta,
    IntegrationParams, PairwiseMethod,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bench_estimators(c: &mut Criterion) {
    let a = BetaParams::from_counts(500, 4500);
    let b = BetaParams::from_counts(540, 4460);
    let mut group = c.benchmark_group("estimators");

    group.bench_function("summation", |bench| {
        bench.iter(|| summation_beta_a_lt_b(black_box(&a), black_box(&b)))
    });
    group.bench_function("integration", |bench| {
        let params = IntegrationParams::new(a, b);
        bench.iter(|| integral_beta_a_lt_b(black_box(&params)))
    });
    group.bench_function("integration_constant_delta", |bench| {
        let params = IntegrationParams {
            delta: Some(Delta::constant(0.005)),
            ..IntegrationParams::new(a, b)
        };
        bench.iter(|| integral_beta_a_lt_b(black_box(&params)))
    });
    group.bench_function("normal_approx", |bench| {
        bench.iter(|| normal_approx_beta_a_lt_b(black_box(&a), black_box(&b), None))
    });
    group.bench_function("monte_carlo_10k", |bench| {
        let mut rng = StdRng::seed_from_u64(1);
        bench.iter(|| {
            sample_based_beta_a_lt_b(
                &mut rng,
                black_box(&a),
                black_box(&b),
                None,
                10_000,
                PairwiseMethod::MannWhitney,
            )
        })
    });
    group.finish();
}

fn bench_binomial(c: &mut Criterion) {
    let mut group = c.benchmark_group("binomial");
    // n·p = 20 takes the inversion path, n·p = 3000 takes BTPE.
    for (n, p) in [(1000u64, 0.02), (10_000u64, 0.3)] {
        group.bench_with_input(
            BenchmarkId::new("optimized", format!("n{}_p{}", n, p)),
            &(n, p),
            |bench, &(n, p)| {
                let mut rng = StdRng::seed_from_u64(2);
                bench.iter(|| optimized_binomial_sample(&mut rng, black_box(p), black_box(n)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("naive", format!("n{}_p{}", n, p)),
            &(n, p),
            |bench, &(n, p)| {
                let mut rng = StdRng::seed_from_u64(3);
                bench.iter(|| naive_binomial_sample(&mut rng, black_box(p), black_box(n)))
            },
        );
    }
    group.finish();
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise");
    let mut rng = StdRng::seed_from_u64(4);
    for size in [100usize, 1000] {
        let samples_a: Vec<f64> = (0..size).map(|_| rng.gen()).collect();
        let samples_b: Vec<f64> = (0..size).map(|_| rng.gen()).collect();
        for method in [PairwiseMethod::Naive, PairwiseMethod::MannWhitney] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", method), size),
                &size,
                |bench, _| {
                    bench.iter(|| method.estimate(black_box(&samples_a), black_box(&samples_b)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_estimators, bench_binomial, bench_pairwise);
criterion_main!(benches);
