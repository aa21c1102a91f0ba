#![allow(non_snake_case)]

use std::iter;

use clear_on_drop::clear::Clear;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, MultiscalarMul};
use log::debug;
use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};

use super::{Opening, Relation, SigmaProof, Witness};
use crate::commitment::blinded_vector_commit;
use crate::errors::ProofError;
use crate::generators::GeneratorSet;
use crate::inner_product_proof::InnerProductProof;
use crate::transcript::TranscriptProtocol;
use crate::util::{self, VecPoly1};

/// Drives one proving session of the sigma engine.
///
/// A `SigmaProver` is built from the public generators, the relation and
/// the prover's witness, and is consumed by [`SigmaProver::prove`].
/// Secrets held by the witness are wiped when the prover is dropped.
pub struct SigmaProver<'a, 'b, R: Relation> {
    transcript: &'a mut Transcript,
    gens: &'b GeneratorSet,
    relation: &'b R,
    witness: Witness,
}

impl<'a, 'b, R: Relation> SigmaProver<'a, 'b, R> {
    /// Checks the witness shape against the relation.
    ///
    /// Fails with [`ProofError::ConfigurationError`] before anything is
    /// committed when the generators are too small, the selector has the
    /// wrong length, or the witness does not carry the secrets the relation
    /// needs.
    pub fn new(
        transcript: &'a mut Transcript,
        gens: &'b GeneratorSet,
        relation: &'b R,
        witness: Witness,
    ) -> Result<Self, ProofError> {
        let n = relation.size();
        if n == 0 {
            return Err(ProofError::ConfigurationError("N must be positive"));
        }
        if gens.capacity() < n {
            return Err(ProofError::ConfigurationError(
                "generator set capacity is too small",
            ));
        }
        if witness.selector.len() != n {
            return Err(ProofError::LengthMismatch(n, witness.selector.len()));
        }
        if let Some(keys) = relation.key_points() {
            if keys.len() != n {
                return Err(ProofError::LengthMismatch(n, keys.len()));
            }
            if witness.selector.weight() == 0 {
                return Err(ProofError::ConfigurationError("k must be in 1..=N"));
            }
            if witness.secret_keys.len() != witness.selector.weight() {
                return Err(ProofError::LengthMismatch(
                    witness.selector.weight(),
                    witness.secret_keys.len(),
                ));
            }
        }
        if relation.value_commitment().is_some() && witness.value_blinding.is_none() {
            return Err(ProofError::ConfigurationError(
                "value commitment needs a blinding factor",
            ));
        }
        Ok(SigmaProver {
            transcript,
            gens,
            relation,
            witness,
        })
    }

    /// Runs the protocol and produces the proof.
    ///
    /// With `compress` set the response vectors are opened through an
    /// [`InnerProductProof`]; otherwise they are sent in full.
    pub fn prove<T: RngCore + CryptoRng>(
        self,
        compress: bool,
        rng: &mut T,
    ) -> Result<SigmaProof, ProofError> {
        let n = self.relation.size();
        let G = self.gens.G_vec(n)?;
        let H = self.gens.H_vec(n)?;
        let U = &self.gens.U;
        let V = &self.gens.V;

        self.transcript.sigma_domain_sep(self.relation.label(), n as u64);
        self.relation.append_statement(self.transcript);

        let mut rng = {
            let mut builder = self
                .transcript
                .build_rng()
                .rekey_with_witness_bytes(b"b0", &self.witness.selector.as_bytes());
            for sk in self.witness.secret_keys.iter() {
                builder = builder.rekey_with_witness_bytes(b"sk", sk.as_bytes());
            }
            if let Some(gamma) = self.witness.value_blinding.as_ref() {
                builder = builder.rekey_with_witness_bytes(b"gamma", gamma.as_bytes());
            }
            builder.finalize(rng)
        };

        // CommitAB

        debug!("sigma prover: commit A, B (N = {})", n);
        let b0 = self.witness.selector.b0();
        let b1 = self.witness.selector.b1();

        let mut alpha = Scalar::random(&mut rng);
        let mut beta = Scalar::random(&mut rng);
        let mut s0: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
        let mut s1: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();

        let A = blinded_vector_commit(G, H, &b0, &b1, U, &alpha)?.compress();
        let B = blinded_vector_commit(G, H, &s0, &s1, U, &beta)?.compress();

        self.transcript.commit_point(b"A", &A);
        self.transcript.commit_point(b"B", &B);

        // ChallengeYZ

        let y = self.transcript.challenge_scalar(b"y");
        let z = self.transcript.challenge_scalar(b"z");
        let y_inv = util::invert(&y)?;
        let zz = z * z;

        // CommitT

        debug!("sigma prover: commit T1, T2, E");
        let y_n = util::exp_vec(y, n);
        let w = self.relation.aux_weights();

        let z_n = util::constant_vec(z, n);
        let l_poly = VecPoly1(util::add_vec(&b0, &z_n)?, s0.clone());
        let r_poly = VecPoly1(
            util::add_vec(
                &util::hadamard(&util::add_vec(&b1, &z_n)?, &y_n)?,
                &util::scalar_mul_vec(&zz, &w),
            )?,
            util::hadamard(&s1, &y_n)?,
        );
        let t_poly = l_poly.inner_product(&r_poly)?;

        let mut tau_1 = Scalar::random(&mut rng);
        let mut tau_2 = Scalar::random(&mut rng);
        let T_1 = RistrettoPoint::multiscalar_mul(&[t_poly.1, tau_1], &[*V, *U]).compress();
        let T_2 = RistrettoPoint::multiscalar_mul(&[t_poly.2, tau_2], &[*V, *U]).compress();

        let mut r_s = Scalar::zero();
        let E = match self.relation.key_points() {
            Some(keys) => {
                r_s = Scalar::random(&mut rng);
                let neg_r_s = -r_s;
                let weighted = util::hadamard(&s0, &y_n)?;
                RistrettoPoint::multiscalar_mul(
                    weighted.iter().chain(iter::once(&neg_r_s)),
                    keys.iter().chain(iter::once(&self.gens.G)),
                )
            }
            None => RistrettoPoint::identity(),
        }
        .compress();

        self.transcript.commit_point(b"T_1", &T_1);
        self.transcript.commit_point(b"T_2", &T_2);
        self.transcript.commit_point(b"E", &E);

        // ChallengeX

        let x = self.transcript.challenge_scalar(b"x");

        // Respond

        debug!("sigma prover: respond");
        let zeta = l_poly.eval(x);
        let eta = r_poly.eval(x);
        let ip = t_poly.eval(x);

        let mut tau_x = tau_1 * x + tau_2 * x * x;
        if let Some(gamma) = self.witness.value_blinding.as_ref() {
            tau_x += zz * gamma;
        }
        let mu = alpha + beta * x;
        let f_s = r_s * x
            + self
                .witness
                .selector
                .indices()
                .iter()
                .zip(self.witness.secret_keys.iter())
                .map(|(&i, sk)| y_n[i] * sk)
                .sum::<Scalar>();

        self.transcript.commit_scalar(b"tau_x", &tau_x);
        self.transcript.commit_scalar(b"mu", &mu);
        self.transcript.commit_scalar(b"ip", &ip);
        self.transcript.commit_scalar(b"f_s", &f_s);

        let opening = if compress {
            debug!("sigma prover: compressing opening");
            let G_comb: Vec<RistrettoPoint> = match self.relation.key_points() {
                Some(keys) => G
                    .iter()
                    .zip(keys.iter())
                    .zip(y_n.iter())
                    .map(|((G_i, PK_i), y_i)| G_i + y_i * PK_i)
                    .collect(),
                None => G.to_vec(),
            };
            let H_prime: Vec<RistrettoPoint> = H
                .iter()
                .zip(util::exp_iter(y_inv))
                .map(|(H_i, y_inv_i)| H_i * y_inv_i)
                .collect();
            Opening::Compressed(InnerProductProof::create(
                self.transcript,
                V,
                G_comb,
                H_prime,
                zeta,
                eta,
            )?)
        } else {
            Opening::Plain { zeta, eta }
        };

        alpha.clear();
        beta.clear();
        tau_1.clear();
        tau_2.clear();
        r_s.clear();
        for e in s0.iter_mut() {
            e.clear();
        }
        for e in s1.iter_mut() {
            e.clear();
        }

        Ok(SigmaProof {
            A,
            B,
            T_1,
            T_2,
            E,
            tau_x,
            mu,
            ip,
            f_s,
            x,
            y,
            z,
            opening,
        })
    }
}
