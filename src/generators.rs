//! The `generators` module contains API for producing a
//! set of generators for the sigma protocols and the inner-product
//! compressor.

#![allow(non_snake_case)]
#![deny(missing_docs)]

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;

use digest::{ExtendableOutput, Input, XofReader};
use sha3::{Sha3_512, Shake256, Sha3XofReader};

use crate::errors::ProofError;

/// The `GeneratorsChain` creates an arbitrary-long sequence of
/// orthogonal generators.  The sequence can be deterministically
/// produced starting with an arbitrary point.
struct GeneratorsChain {
    reader: Sha3XofReader,
}

impl GeneratorsChain {
    /// Creates a chain of generators, determined by the hash of `label`.
    fn new(label: &[u8]) -> Self {
        let mut shake = Shake256::default();
        shake.input(b"GeneratorsChain");
        shake.input(label);

        GeneratorsChain {
            reader: shake.xof_result(),
        }
    }
}

impl Default for GeneratorsChain {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Iterator for GeneratorsChain {
    type Item = RistrettoPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let mut uniform_bytes = [0u8; 64];
        self.reader.read(&mut uniform_bytes);

        Some(RistrettoPoint::from_uniform_bytes(&uniform_bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::max_value(), None)
    }
}

/// The public bases shared by every prover and verifier of a session.
///
/// * `G` is the key base of public keys.
/// * `H` is derived from `G` by hashing and has no known discrete log
///   relative to it.
/// * `U` blinds every sigma-protocol commitment.
/// * `V` carries the value of the \\(t\\)-commitments and of the
///   inner-product argument.
/// * `G_vec`, `H_vec` hold `capacity` vector bases each.
///
/// All bases are derived deterministically, so two independently built
/// sets of the same capacity are equal. The set is immutable once built and
/// can be shared across threads by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSet {
    /// Key base for public keys.
    pub G: RistrettoPoint,
    /// Second base, with unknown discrete log relative to `G`.
    pub H: RistrettoPoint,
    /// Blinding base of the sigma-protocol commitments.
    pub U: RistrettoPoint,
    /// Value base of the \\(t\\)-commitments.
    pub V: RistrettoPoint,
    capacity: usize,
    G_vec: Vec<RistrettoPoint>,
    H_vec: Vec<RistrettoPoint>,
}

impl GeneratorSet {
    /// Create a new `GeneratorSet` able to serve vectors of up to
    /// `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let G = RISTRETTO_BASEPOINT_POINT;
        let H = RistrettoPoint::hash_from_bytes::<Sha3_512>(G.compress().as_bytes());

        let mut bases = GeneratorsChain::new(b"AnyProof bases");
        let U = bases.next().unwrap_or(H);
        let V = bases.next().unwrap_or(H);

        GeneratorSet {
            G,
            H,
            U,
            V,
            capacity,
            G_vec: GeneratorsChain::new(b"G").take(capacity).collect(),
            H_vec: GeneratorsChain::new(b"H").take(capacity).collect(),
        }
    }

    /// Number of vector bases available in `G_vec` and `H_vec`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The first `n` bases of `G_vec`.
    pub fn G_vec(&self, n: usize) -> Result<&[RistrettoPoint], ProofError> {
        if n > self.capacity {
            return Err(ProofError::ConfigurationError(
                "generator set capacity is too small",
            ));
        }
        Ok(&self.G_vec[..n])
    }

    /// The first `n` bases of `H_vec`.
    pub fn H_vec(&self, n: usize) -> Result<&[RistrettoPoint], ProofError> {
        if n > self.capacity {
            return Err(ProofError::ConfigurationError(
                "generator set capacity is too small",
            ));
        }
        Ok(&self.H_vec[..n])
    }

    /// Commits to `value` with `blinding` over the engine's value and
    /// blinding bases: \\(v \cdot V + \gamma \cdot U\\).
    pub fn commit_value(&self, value: Scalar, blinding: Scalar) -> RistrettoPoint {
        RistrettoPoint::multiscalar_mul(&[value, blinding], &[self.V, self.U])
    }
}
