#![allow(non_snake_case)]

//! Range proofs: a committed value lies in \\([0, 2^d)\\).
//!
//! The value is committed as \\(C\_v = v \cdot V + \gamma \cdot U\\), over
//! the same value and blinding bases as the sigma engine's
//! \\(t\\)-commitments, so the engine's \\(t\\)-check absorbs it directly.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use log::debug;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde_derive::{Deserialize, Serialize};

use crate::errors::ProofError;
use crate::params::{ProverParams, VerifierParams, MAX_RANGE_BITS};
use crate::sigma::{Relation, Selector, SigmaProof, SigmaProver, SigmaVerifier, Witness};
use crate::transcript::TranscriptProtocol;
use crate::util;

/// The range statement as seen by the sigma engine.
struct RangeRelation {
    commitment: RistrettoPoint,
    compressed: CompressedRistretto,
    d: usize,
}

impl Relation for RangeRelation {
    fn label(&self) -> &'static [u8] {
        b"range"
    }

    fn size(&self) -> usize {
        self.d
    }

    fn append_statement(&self, transcript: &mut Transcript) {
        transcript.append_u64(b"d", self.d as u64);
        transcript.commit_point(b"C_v", &self.compressed);
    }

    fn aux_weights(&self) -> Vec<Scalar> {
        util::exp_vec(Scalar::from(2u64), self.d)
    }

    fn value_commitment(&self) -> Option<&RistrettoPoint> {
        Some(&self.commitment)
    }
}

/// A proof that a value commitment opens to a `d`-bit value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeProof(SigmaProof);

impl RangeProof {
    /// Commits to `v` with blinding `gamma` and proves that `v` fits in
    /// `d` bits, where `d` comes from the parameters.
    ///
    /// Returns the proof and the value commitment. Fails with
    /// [`ProofError::ConfigurationError`] if `v` does not fit.
    pub fn prove<T: RngCore + CryptoRng>(
        params: &ProverParams,
        transcript: &mut Transcript,
        v: u64,
        gamma: Scalar,
        rng: &mut T,
    ) -> Result<(RangeProof, CompressedRistretto), ProofError> {
        let d = params.config.d;
        if d == 0 || d > MAX_RANGE_BITS {
            return Err(ProofError::ConfigurationError("d must be in 1..=64"));
        }
        if d < 64 && v >> d != 0 {
            return Err(ProofError::ConfigurationError("value does not fit in d bits"));
        }

        let commitment = params.gens.commit_value(Scalar::from(v), gamma);
        let relation = RangeRelation {
            commitment,
            compressed: commitment.compress(),
            d,
        };

        debug!("range: proving d = {}", d);
        let witness = Witness::with_blinding(Selector::from_bits(v, d), gamma);
        let prover = SigmaProver::new(transcript, &params.gens, &relation, witness)?;
        let proof = prover.prove(params.config.compress, rng)?;
        Ok((RangeProof(proof), relation.compressed))
    }

    /// Verifies the proof against the value commitment `C_v`.
    ///
    /// Returns `Ok(())` iff the proof is valid; every rejection is
    /// [`ProofError::VerificationError`].
    pub fn verify(
        &self,
        params: &VerifierParams,
        transcript: &mut Transcript,
        C_v: &CompressedRistretto,
    ) -> Result<(), ProofError> {
        let d = params.config.d;
        if d == 0 || d > MAX_RANGE_BITS {
            return Err(ProofError::VerificationError);
        }
        let relation = RangeRelation {
            commitment: C_v.decompress().ok_or(ProofError::VerificationError)?,
            compressed: *C_v,
            d,
        };
        SigmaVerifier::new(transcript, &params.gens, &relation).verify(&self.0)
    }

    /// Whether the response vectors are compressed.
    pub fn is_compressed(&self) -> bool {
        self.0.is_compressed()
    }

    /// Returns the size in bytes required to serialize the proof.
    pub fn serialized_size(&self) -> usize {
        self.0.serialized_size()
    }

    /// Serializes the proof into a byte array.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Deserializes the proof from a byte slice.
    pub fn from_bytes(slice: &[u8]) -> Result<RangeProof, ProofError> {
        SigmaProof::from_bytes(slice).map(RangeProof)
    }
}
