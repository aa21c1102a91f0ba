//! The partial-knowledge sigma engine shared by the membership and range
//! proofs.
//!
//! Both proofs show knowledge of a binary selector \\(\mathbf{b}\_0\\) and
//! its complement \\(\mathbf{b}\_1 = \mathbf{1} - \mathbf{b}\_0\\) behind a
//! commitment \\(A\\). They differ only in what the selector means and in
//! which extra public terms bind it to the statement; a [`Relation`]
//! describes that difference and the engine does the rest.
//!
//! The prover runs the fixed sequence
//! `KeyGen → CommitAB → ChallengeYZ → CommitT → ChallengeX → Respond`,
//! then hands the response vectors to the inner-product compressor.

#![allow(non_snake_case)]

use clear_on_drop::clear::Clear;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;

use crate::util::exp_iter;

mod proof;
mod prover;
mod selector;
mod verifier;

pub use self::proof::{Opening, SigmaProof};
pub use self::prover::SigmaProver;
pub use self::selector::Selector;
pub use self::verifier::SigmaVerifier;

/// The statement-specific part of a sigma proof.
///
/// With \\(\mathbf{y}^N = (1, y, \ldots, y^{N-1})\\) and the auxiliary
/// vector \\(\mathbf{w}\\), the engine proves
/// \\[
/// t(x) = \langle \mathbf{b}\_0 + z \mathbf{1} + \mathbf{s}\_0 x,\;
/// (\mathbf{b}\_1 + z \mathbf{1} + \mathbf{s}\_1 x) \circ \mathbf{y}^N + z^2 \mathbf{w} \rangle
/// \\]
/// with constant term \\(\delta(y, z) + z^2 \langle \mathbf{b}\_0, \mathbf{w} \rangle\\).
pub trait Relation {
    /// Domain separator for the transcript.
    fn label(&self) -> &'static [u8];

    /// Length \\(N\\) of the selector.
    fn size(&self) -> usize;

    /// Commits the public statement to the transcript before any prover
    /// message.
    fn append_statement(&self, transcript: &mut Transcript);

    /// The auxiliary vector \\(\mathbf{w}\\); all zeros unless overridden.
    fn aux_weights(&self) -> Vec<Scalar> {
        vec![Scalar::zero(); self.size()]
    }

    /// Public keys whose secret keys are selected, if the relation has any.
    fn key_points(&self) -> Option<&[RistrettoPoint]> {
        None
    }

    /// A commitment \\(\langle \mathbf{b}\_0, \mathbf{w} \rangle V + \gamma U\\)
    /// absorbed by the \\(t\\)-commitment check, if the relation has one.
    fn value_commitment(&self) -> Option<&RistrettoPoint> {
        None
    }

    /// \\(\delta(y, z) = (z + z^2) \langle \mathbf{1}, \mathbf{y}^N \rangle + z^3 \langle \mathbf{1}, \mathbf{w} \rangle\\)
    fn delta(&self, y: &Scalar, z: &Scalar) -> Scalar {
        let sum_y: Scalar = exp_iter(*y).take(self.size()).sum();
        let sum_w: Scalar = self.aux_weights().iter().sum();
        let zz = z * z;
        (z + zz) * sum_y + zz * z * sum_w
    }
}

/// The prover's secrets for one session.
pub struct Witness {
    pub(crate) selector: Selector,
    /// Secret keys of the selected slots, in increasing slot order.
    pub(crate) secret_keys: Vec<Scalar>,
    /// Blinding of the relation's value commitment.
    pub(crate) value_blinding: Option<Scalar>,
}

impl Witness {
    /// A witness for a relation with key points.
    pub fn with_keys(selector: Selector, secret_keys: Vec<Scalar>) -> Self {
        Witness {
            selector,
            secret_keys,
            value_blinding: None,
        }
    }

    /// Opens the relation's value commitment with a zero blinding factor,
    /// for relations whose committed value is public.
    pub fn unblinded(mut self) -> Self {
        self.value_blinding = Some(Scalar::zero());
        self
    }

    /// A witness for a relation with a value commitment.
    pub fn with_blinding(selector: Selector, value_blinding: Scalar) -> Self {
        Witness {
            selector,
            secret_keys: Vec::new(),
            value_blinding: Some(value_blinding),
        }
    }
}

/// Overwrite secrets with null bytes when they go out of scope.
impl Drop for Witness {
    fn drop(&mut self) {
        for e in self.secret_keys.iter_mut() {
            e.clear();
        }
        if let Some(gamma) = self.value_blinding.as_mut() {
            gamma.clear();
        }
    }
}
