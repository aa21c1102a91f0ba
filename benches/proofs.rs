#![allow(non_snake_case)]

extern crate anyproofs;
use anyproofs::{MembershipProof, ProofConfig, RangeProof};

#[macro_use]
extern crate criterion;
use criterion::Criterion;

extern crate curve25519_dalek;
use curve25519_dalek::scalar::Scalar;

extern crate merlin;
use merlin::Transcript;

extern crate rand;
use rand::Rng;

static RING_SIZES: [usize; 4] = [16, 64, 256, 1024];
static RANGE_BITS: [usize; 4] = [8, 16, 32, 64];

fn membership_prove_helper(n: usize, k: usize, compress: bool, c: &mut Criterion) {
    let label = format!("membership_prove/n={}/k={}/compress={}", n, k, compress);

    c.bench_function(&label, move |b| {
        let mut config = ProofConfig::new(k, n, 64);
        config.compress = compress;
        let (pp, _) = config.setup().unwrap();

        let mut rng = rand::thread_rng();
        let secrets: Vec<Scalar> = (0..k).map(|_| Scalar::random(&mut rng)).collect();

        b.iter(|| {
            let mut transcript = Transcript::new(b"MembershipBenchmark");
            MembershipProof::prove(&pp, &mut transcript, &secrets, &mut rng).unwrap()
        })
    });
}

fn membership_verify_helper(n: usize, k: usize, compress: bool, c: &mut Criterion) {
    let label = format!("membership_verify/n={}/k={}/compress={}", n, k, compress);

    c.bench_function(&label, move |b| {
        let mut config = ProofConfig::new(k, n, 64);
        config.compress = compress;
        let (pp, vp) = config.setup().unwrap();

        let mut rng = rand::thread_rng();
        let secrets: Vec<Scalar> = (0..k).map(|_| Scalar::random(&mut rng)).collect();
        let mut transcript = Transcript::new(b"MembershipBenchmark");
        let (pks, proof) =
            MembershipProof::prove(&pp, &mut transcript, &secrets, &mut rng).unwrap();
        println!("{}: {} bytes", label, proof.serialized_size());

        b.iter(|| {
            let mut transcript = Transcript::new(b"MembershipBenchmark");
            proof.verify(&vp, &mut transcript, &pks)
        })
    });
}

fn membership_prove(c: &mut Criterion) {
    for &n in RING_SIZES.iter() {
        membership_prove_helper(n, 1, true, c);
        membership_prove_helper(n, n / 2, true, c);
    }
    membership_prove_helper(256, 1, false, c);
}

fn membership_verify(c: &mut Criterion) {
    for &n in RING_SIZES.iter() {
        membership_verify_helper(n, 1, true, c);
        membership_verify_helper(n, n / 2, true, c);
    }
    membership_verify_helper(256, 1, false, c);
}

fn range_prove_helper(d: usize, c: &mut Criterion) {
    let label = format!("range_prove/d={}", d);

    c.bench_function(&label, move |b| {
        let (pp, _) = ProofConfig::new(1, 1, d).setup().unwrap();
        let mut rng = rand::thread_rng();
        let v: u64 = rng.gen::<u64>() >> (64 - d);
        let gamma = Scalar::random(&mut rng);

        b.iter(|| {
            let mut transcript = Transcript::new(b"RangeBenchmark");
            RangeProof::prove(&pp, &mut transcript, v, gamma, &mut rng).unwrap()
        })
    });
}

fn range_verify_helper(d: usize, c: &mut Criterion) {
    let label = format!("range_verify/d={}", d);

    c.bench_function(&label, move |b| {
        let (pp, vp) = ProofConfig::new(1, 1, d).setup().unwrap();
        let mut rng = rand::thread_rng();
        let v: u64 = rng.gen::<u64>() >> (64 - d);
        let gamma = Scalar::random(&mut rng);
        let mut transcript = Transcript::new(b"RangeBenchmark");
        let (proof, commitment) =
            RangeProof::prove(&pp, &mut transcript, v, gamma, &mut rng).unwrap();

        b.iter(|| {
            let mut transcript = Transcript::new(b"RangeBenchmark");
            proof.verify(&vp, &mut transcript, &commitment)
        })
    });
}

fn range_prove(c: &mut Criterion) {
    for &d in RANGE_BITS.iter() {
        range_prove_helper(d, c);
    }
}

fn range_verify(c: &mut Criterion) {
    for &d in RANGE_BITS.iter() {
        range_verify_helper(d, c);
    }
}

criterion_group! {
    name = membership;
    config = Criterion::default().sample_size(10)
            .measurement_time(std::time::Duration::from_secs(10));
    targets =
    membership_prove,
    membership_verify,
}

criterion_group! {
    name = range;
    config = Criterion::default().sample_size(10);
    targets =
    range_prove,
    range_verify,
}

criterion_main!(membership, range);
