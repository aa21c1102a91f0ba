#![allow(non_snake_case)]

//! Any-out-of-many membership proofs: knowledge of the secret keys of `k`
//! out of `N` public keys, without revealing which ones.

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use log::debug;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde_derive::{Deserialize, Serialize};

use crate::errors::ProofError;
use crate::params::{ProverParams, VerifierParams};
use crate::sigma::{Relation, Selector, SigmaProof, SigmaProver, SigmaVerifier, Witness};
use crate::transcript::TranscriptProtocol;
use crate::util;

/// The public statement of a membership proof: \\(N\\) public keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicKeyVector(Vec<CompressedRistretto>);

impl PublicKeyVector {
    /// Wraps already-published keys.
    pub fn new(keys: Vec<CompressedRistretto>) -> Self {
        PublicKeyVector(keys)
    }

    /// Number of keys \\(N\\).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The compressed keys.
    pub fn as_slice(&self) -> &[CompressedRistretto] {
        &self.0
    }

    /// Mutable access to the compressed keys.
    pub fn as_mut_slice(&mut self) -> &mut [CompressedRistretto] {
        &mut self.0
    }

    fn decompress(&self) -> Option<Vec<RistrettoPoint>> {
        self.0.iter().map(|pk| pk.decompress()).collect()
    }
}

/// The membership statement as seen by the sigma engine.
///
/// The selector weight is bound through the engine's value commitment:
/// with \\(\mathbf{w} = \mathbf{1}\\) and the unblinded commitment
/// \\(k \cdot V\\), the \\(t\\)-check holds only if
/// \\(\langle \mathbf{b}\_0, \mathbf{1} \rangle = k\\).
pub(crate) struct MembershipRelation<'a> {
    compressed: &'a [CompressedRistretto],
    keys: Vec<RistrettoPoint>,
    k: usize,
    weight_commitment: RistrettoPoint,
}

impl<'a> MembershipRelation<'a> {
    pub(crate) fn new(pks: &'a PublicKeyVector, k: usize, V: &RistrettoPoint) -> Option<Self> {
        Some(MembershipRelation {
            compressed: pks.as_slice(),
            keys: pks.decompress()?,
            k,
            weight_commitment: Scalar::from(k as u64) * V,
        })
    }
}

impl<'a> Relation for MembershipRelation<'a> {
    fn label(&self) -> &'static [u8] {
        b"membership"
    }

    fn size(&self) -> usize {
        self.keys.len()
    }

    fn append_statement(&self, transcript: &mut Transcript) {
        transcript.append_u64(b"k", self.k as u64);
        for pk in self.compressed {
            transcript.commit_point(b"PK", pk);
        }
    }

    fn aux_weights(&self) -> Vec<Scalar> {
        util::constant_vec(Scalar::one(), self.keys.len())
    }

    fn key_points(&self) -> Option<&[RistrettoPoint]> {
        Some(&self.keys)
    }

    fn value_commitment(&self) -> Option<&RistrettoPoint> {
        Some(&self.weight_commitment)
    }
}

/// Places the secret keys at the slots of `selector` and fills every other
/// slot with the public key of a fresh random decoy.
///
/// `secrets` are assigned to the selected slots in increasing slot order.
pub fn keygen<T: RngCore + CryptoRng>(
    params: &ProverParams,
    selector: &Selector,
    secrets: &[Scalar],
    rng: &mut T,
) -> Result<PublicKeyVector, ProofError> {
    let n = params.config.n;
    if selector.len() != n {
        return Err(ProofError::LengthMismatch(n, selector.len()));
    }
    if secrets.len() != selector.weight() {
        return Err(ProofError::LengthMismatch(selector.weight(), secrets.len()));
    }
    let G = &params.gens.G;
    let mut secrets = secrets.iter();
    let keys = (0..n)
        .map(|i| {
            let sk = if selector.is_selected(i) {
                secrets.next().cloned().unwrap_or_else(Scalar::zero)
            } else {
                Scalar::random(&mut *rng)
            };
            (sk * G).compress()
        })
        .collect();
    Ok(PublicKeyVector(keys))
}

/// A proof that the prover knows the secret keys of some of the keys in a
/// [`PublicKeyVector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MembershipProof(SigmaProof);

impl MembershipProof {
    /// Hides `secrets` at `k` random slots among fresh decoys and proves
    /// knowledge of them.
    ///
    /// Fails with [`ProofError::LengthMismatch`] if `secrets` does not hold
    /// exactly `k` keys.
    pub fn prove<T: RngCore + CryptoRng>(
        params: &ProverParams,
        transcript: &mut Transcript,
        secrets: &[Scalar],
        rng: &mut T,
    ) -> Result<(PublicKeyVector, MembershipProof), ProofError> {
        let config = &params.config;
        config.validate()?;
        if secrets.len() != config.k {
            return Err(ProofError::LengthMismatch(config.k, secrets.len()));
        }
        let selector = Selector::random(config.k, config.n, rng)?;
        let pks = keygen(params, &selector, secrets, rng)?;
        let proof = MembershipProof::create(params, transcript, &pks, selector, secrets, rng)?;
        Ok((pks, proof))
    }

    /// Like [`MembershipProof::prove`], with `secrets[j]` placed at slot
    /// `indices[j]`.
    pub fn prove_at<T: RngCore + CryptoRng>(
        params: &ProverParams,
        transcript: &mut Transcript,
        secrets: &[Scalar],
        indices: &[usize],
        rng: &mut T,
    ) -> Result<(PublicKeyVector, MembershipProof), ProofError> {
        let config = &params.config;
        config.validate()?;
        if indices.len() != config.k {
            return Err(ProofError::LengthMismatch(config.k, indices.len()));
        }
        if secrets.len() != indices.len() {
            return Err(ProofError::LengthMismatch(indices.len(), secrets.len()));
        }
        let selector = Selector::from_indices(config.n, indices)?;

        let mut pairs: Vec<(usize, Scalar)> = indices
            .iter()
            .cloned()
            .zip(secrets.iter().cloned())
            .collect();
        pairs.sort_by_key(|(i, _)| *i);
        let ordered: Vec<Scalar> = pairs.iter().map(|(_, sk)| *sk).collect();

        let pks = keygen(params, &selector, &ordered, rng)?;
        let proof = MembershipProof::create(params, transcript, &pks, selector, &ordered, rng)?;
        Ok((pks, proof))
    }

    /// Proves knowledge of the secret keys at the slots of `selector` in
    /// an existing key vector.
    ///
    /// `secrets` are listed in increasing slot order and must match their
    /// public keys.
    pub fn create<T: RngCore + CryptoRng>(
        params: &ProverParams,
        transcript: &mut Transcript,
        pks: &PublicKeyVector,
        selector: Selector,
        secrets: &[Scalar],
        rng: &mut T,
    ) -> Result<MembershipProof, ProofError> {
        let config = &params.config;
        if pks.len() != config.n {
            return Err(ProofError::LengthMismatch(config.n, pks.len()));
        }
        if selector.weight() != config.k {
            return Err(ProofError::LengthMismatch(config.k, selector.weight()));
        }
        let relation = MembershipRelation::new(pks, config.k, &params.gens.V)
            .ok_or(ProofError::FormatError)?;

        for (&i, sk) in selector.indices().iter().zip(secrets.iter()) {
            if (sk * params.gens.G).compress() != pks.as_slice()[i] {
                return Err(ProofError::ConfigurationError(
                    "secret key does not match its public key",
                ));
            }
        }

        debug!("membership: proving N = {}, k = {}", pks.len(), selector.weight());
        let witness = Witness::with_keys(selector, secrets.to_vec()).unblinded();
        let prover = SigmaProver::new(transcript, &params.gens, &relation, witness)?;
        Ok(MembershipProof(prover.prove(config.compress, rng)?))
    }

    /// Verifies the proof against `pks`.
    ///
    /// Returns `Ok(())` iff the proof is valid; every rejection is
    /// [`ProofError::VerificationError`].
    pub fn verify(
        &self,
        params: &VerifierParams,
        transcript: &mut Transcript,
        pks: &PublicKeyVector,
    ) -> Result<(), ProofError> {
        if pks.len() != params.config.n {
            return Err(ProofError::VerificationError);
        }
        let relation = MembershipRelation::new(pks, params.config.k, &params.gens.V)
            .ok_or(ProofError::VerificationError)?;
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
    pub fn from_bytes(slice: &[u8]) -> Result<MembershipProof, ProofError> {
        SigmaProof::from_bytes(slice).map(MembershipProof)
    }
}
