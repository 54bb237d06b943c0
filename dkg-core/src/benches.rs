//! Cryptosystem-generic benchmark functions.
#![allow(clippy::unwrap_used)]

use alloc::{format, vec::Vec};

use criterion::{BenchmarkId, Criterion};
use rand_core::{CryptoRng, RngCore};

use crate::{
    tests::helpers::{add_commitments, generate_commitments, generate_trustees, session_with_keys},
    Cryptosystem, ThresholdConfig,
};

/// Benchmark the threshold setup with the specified cryptosystem.
pub fn bench_setup<C: Cryptosystem, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    cryptosystem: &C,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("Threshold Setup {name}"));
    group.sample_size(10);
    for &n in [3u16, 5, 10].iter() {
        let num_trustees = n;
        let threshold = (n * 2 + 2) / 3;
        let config = ThresholdConfig::new(num_trustees, threshold).unwrap();

        let trustees = generate_trustees(cryptosystem, num_trustees, rng);
        let sessions: Vec<_> = trustees
            .iter()
            .map(|_| session_with_keys(cryptosystem, config, &trustees))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("Generate Commitment", num_trustees),
            &sessions[0],
            |b, session| {
                let mut rng = rng.clone();
                b.iter(|| session.generate_commitment(&mut rng).unwrap())
            },
        );

        let commitments = generate_commitments(&sessions, rng);
        let mut session = sessions[0].clone();
        add_commitments(&mut session, &commitments);

        group.bench_with_input(
            BenchmarkId::new("Fingerprint", num_trustees),
            &session,
            |b, session| b.iter(|| session.get_fingerprint().unwrap()),
        );

        group.bench_with_input(
            BenchmarkId::new("Generate Key Pair", num_trustees),
            &session,
            |b, session| {
                b.iter(|| {
                    session
                        .clone()
                        .generate_key_pair(1, &trustees[0].private_key)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}
