#![allow(non_snake_case)]

extern crate anyproofs;
extern crate curve25519_dalek;
extern crate merlin;
extern crate rand;
extern crate rand_chacha;

use std::iter;

use anyproofs::{GeneratorSet, InnerProductProof, ProofError};
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_COMPRESSED;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, VartimeMultiscalarMul};
use merlin::Transcript;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

struct Instance {
    gens: GeneratorSet,
    G: Vec<RistrettoPoint>,
    H: Vec<RistrettoPoint>,
    a: Vec<Scalar>,
    b: Vec<Scalar>,
    C: RistrettoPoint,
}

fn instance(n: usize, seed: u8) -> Instance {
    let mut rng = ChaChaRng::from_seed([seed; 32]);
    let gens = GeneratorSet::new(n);
    let G = gens.G_vec(n).unwrap().to_vec();
    let H = gens.H_vec(n).unwrap().to_vec();
    let a: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    let b: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    let c: Scalar = a.iter().zip(b.iter()).map(|(a_i, b_i)| a_i * b_i).sum();
    let C = RistrettoPoint::vartime_multiscalar_mul(
        a.iter().chain(b.iter()).chain(iter::once(&c)),
        G.iter().chain(H.iter()).chain(iter::once(&gens.V)),
    );
    Instance { gens, G, H, a, b, C }
}

fn create(inst: &Instance) -> InnerProductProof {
    let mut transcript = Transcript::new(b"InnerProductTest");
    InnerProductProof::create(
        &mut transcript,
        &inst.gens.V,
        inst.G.clone(),
        inst.H.clone(),
        inst.a.clone(),
        inst.b.clone(),
    )
    .unwrap()
}

fn verify_bytes(inst: &Instance, bytes: &[u8]) -> Result<(), ProofError> {
    let proof = InnerProductProof::from_bytes(bytes)?;
    let mut transcript = Transcript::new(b"InnerProductTest");
    proof.verify(
        inst.a.len(),
        &mut transcript,
        &inst.C,
        &inst.gens.V,
        &inst.G,
        &inst.H,
    )
}

fn bump_scalar(bytes: &mut [u8], pos: usize) {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&bytes[pos..pos + 32]);
    let s = Scalar::from_canonical_bytes(buf).unwrap() + Scalar::one();
    bytes[pos..pos + 32].copy_from_slice(s.as_bytes());
}

fn round_trip_with_perturbation(n: usize) {
    let inst = instance(n, n as u8);
    let proof = create(&inst);
    let lg_n = n.trailing_zeros() as usize;
    assert_eq!(proof.rounds(), lg_n);

    let bytes = proof.to_bytes();
    assert_eq!(bytes.len(), proof.serialized_size());
    assert!(verify_bytes(&inst, &bytes).is_ok());

    for j in 0..lg_n {
        for &pos in &[2 * j * 32, (2 * j + 1) * 32] {
            let mut tampered = bytes.clone();
            tampered[pos..pos + 32].copy_from_slice(RISTRETTO_BASEPOINT_COMPRESSED.as_bytes());
            assert_eq!(
                verify_bytes(&inst, &tampered),
                Err(ProofError::VerificationError)
            );
        }
    }

    let a = 2 * lg_n * 32;
    for &pos in &[a, a + 32] {
        let mut tampered = bytes.clone();
        bump_scalar(&mut tampered, pos);
        assert_eq!(
            verify_bytes(&inst, &tampered),
            Err(ProofError::VerificationError)
        );
    }
}

#[test]
fn compression_of_length_2() {
    round_trip_with_perturbation(2);
}

#[test]
fn compression_of_length_4() {
    round_trip_with_perturbation(4);
}

#[test]
fn compression_of_length_1024() {
    round_trip_with_perturbation(1024);
}

#[test]
fn padding_does_not_change_the_proof() {
    let n = 5;
    let inst = instance(n, 9);
    let implicit = create(&inst);

    let mut transcript = Transcript::new(b"InnerProductTest");
    let explicit = InnerProductProof::create(
        &mut transcript,
        &inst.gens.V,
        inst.G
            .iter()
            .cloned()
            .chain(iter::repeat(RistrettoPoint::identity()).take(3))
            .collect(),
        inst.H
            .iter()
            .cloned()
            .chain(iter::repeat(RistrettoPoint::identity()).take(3))
            .collect(),
        inst.a.iter().cloned().chain(iter::repeat(Scalar::zero()).take(3)).collect(),
        inst.b.iter().cloned().chain(iter::repeat(Scalar::zero()).take(3)).collect(),
    )
    .unwrap();

    assert_eq!(implicit, explicit);
    assert_eq!(implicit.rounds(), 3);
    assert!(verify_bytes(&inst, &implicit.to_bytes()).is_ok());
}

#[test]
fn challenges_are_a_function_of_the_transcript() {
    let inst = instance(16, 3);
    assert_eq!(create(&inst), create(&inst));

    let mut transcript = Transcript::new(b"AnotherLabel");
    let other = InnerProductProof::create(
        &mut transcript,
        &inst.gens.V,
        inst.G.clone(),
        inst.H.clone(),
        inst.a.clone(),
        inst.b.clone(),
    )
    .unwrap();
    assert_ne!(create(&inst), other);
}

#[test]
fn wrong_commitment_is_rejected() {
    let inst = instance(8, 4);
    let proof = create(&inst);
    let mut transcript = Transcript::new(b"InnerProductTest");
    assert_eq!(
        proof.verify(8, &mut transcript, &(inst.C + inst.gens.G), &inst.gens.V, &inst.G, &inst.H),
        Err(ProofError::VerificationError)
    );
}

#[test]
fn empty_input_is_refused() {
    let gens = GeneratorSet::new(1);
    let mut transcript = Transcript::new(b"InnerProductTest");
    assert!(InnerProductProof::create(
        &mut transcript,
        &gens.V,
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    )
    .is_err());
}
