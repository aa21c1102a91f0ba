#![allow(non_snake_case)]

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{IsIdentity, VartimeMultiscalarMul};
use log::debug;
use merlin::Transcript;
use rand::thread_rng;
use subtle::ConstantTimeEq;

use super::{Opening, Relation, SigmaProof};
use crate::errors::ProofError;
use crate::generators::GeneratorSet;
use crate::inner_product_proof::VerificationScalars;
use crate::transcript::TranscriptProtocol;
use crate::util;

/// Checks one sigma proof against a relation.
///
/// The whole proof is folded into a single multiscalar multiplication:
/// the \\(t\\)-commitment identity, weighted by a random scalar \\(c\\),
/// is added to the opening identity, and the proof is accepted iff the sum
/// is the identity point.
pub struct SigmaVerifier<'a, 'b, R: Relation> {
    transcript: &'a mut Transcript,
    gens: &'b GeneratorSet,
    relation: &'b R,
}

impl<'a, 'b, R: Relation> SigmaVerifier<'a, 'b, R> {
    /// Creates a verifier for `relation` over `gens`.
    pub fn new(transcript: &'a mut Transcript, gens: &'b GeneratorSet, relation: &'b R) -> Self {
        SigmaVerifier {
            transcript,
            gens,
            relation,
        }
    }

    /// Accepts or rejects `proof`.
    ///
    /// Every failure, whatever its cause, is reported as
    /// [`ProofError::VerificationError`].
    pub fn verify(self, proof: &SigmaProof) -> Result<(), ProofError> {
        let result = self.check(proof);
        if result.is_err() {
            debug!("sigma verifier: proof rejected");
        }
        result.map_err(|_| ProofError::VerificationError)
    }

    fn check(self, proof: &SigmaProof) -> Result<(), ProofError> {
        let n = self.relation.size();
        let G = self.gens.G_vec(n)?;
        let H = self.gens.H_vec(n)?;

        self.transcript.sigma_domain_sep(self.relation.label(), n as u64);
        self.relation.append_statement(self.transcript);

        // Replay the challenges

        debug!("sigma verifier: replaying challenges (N = {})", n);
        self.transcript.commit_point(b"A", &proof.A);
        self.transcript.commit_point(b"B", &proof.B);
        let y = self.transcript.challenge_scalar(b"y");
        let z = self.transcript.challenge_scalar(b"z");

        self.transcript.commit_point(b"T_1", &proof.T_1);
        self.transcript.commit_point(b"T_2", &proof.T_2);
        self.transcript.commit_point(b"E", &proof.E);
        let x = self.transcript.challenge_scalar(b"x");

        let challenges_match = y.ct_eq(&proof.y) & z.ct_eq(&proof.z) & x.ct_eq(&proof.x);
        if !bool::from(challenges_match) {
            return Err(ProofError::VerificationError);
        }

        self.transcript.commit_scalar(b"tau_x", &proof.tau_x);
        self.transcript.commit_scalar(b"mu", &proof.mu);
        self.transcript.commit_scalar(b"ip", &proof.ip);
        self.transcript.commit_scalar(b"f_s", &proof.f_s);

        let y_inv = util::invert(&y)?;
        let zz = z * z;
        let y_n = util::exp_vec(y, n);
        let y_inv_n = util::exp_vec(y_inv, n);
        let w = self.relation.aux_weights();
        if w.len() != n {
            return Err(ProofError::LengthMismatch(n, w.len()));
        }
        let delta = self.relation.delta(&y, &z);

        // Per-generator opening scalars g_i, h_i and the V term they imply

        let (g, h, ipa_points, ipa_scalars, opening_v) = match &proof.opening {
            Opening::Plain { zeta, eta } => {
                if zeta.len() != n || eta.len() != n {
                    return Err(ProofError::VerificationError);
                }
                if util::inner_product(zeta, eta)? != proof.ip {
                    return Err(ProofError::VerificationError);
                }
                (zeta.clone(), eta.clone(), Vec::new(), Vec::new(), Scalar::zero())
            }
            Opening::Compressed(ipp) => {
                let VerificationScalars { u, u_inv, s, s_prime } =
                    ipp.verification_scalars(n, self.transcript)?;
                let g: Vec<Scalar> = s.iter().take(n).map(|s_i| ipp.a * s_i).collect();
                let h: Vec<Scalar> = s_prime.iter().take(n).map(|s_i| ipp.b * s_i).collect();
                let points = ipp
                    .L_vec
                    .iter()
                    .chain(ipp.R_vec.iter())
                    .map(|p| p.decompress().ok_or(ProofError::VerificationError))
                    .collect::<Result<Vec<_>, _>>()?;
                let scalars: Vec<Scalar> = u.into_iter().chain(u_inv.into_iter()).collect();
                (g, h, points, scalars, proof.ip - ipp.a * ipp.b)
            }
        };

        // Random weight for the t-commitment check.
        let mut rng = self.transcript.build_rng().finalize(&mut thread_rng());
        let c = Scalar::random(&mut rng);

        let A = proof.A.decompress().ok_or(ProofError::VerificationError)?;
        let B = proof.B.decompress().ok_or(ProofError::VerificationError)?;
        let T_1 = proof.T_1.decompress().ok_or(ProofError::VerificationError)?;
        let T_2 = proof.T_2.decompress().ok_or(ProofError::VerificationError)?;
        let E = proof.E.decompress().ok_or(ProofError::VerificationError)?;

        let g_scalars = util::sub_vec(&util::constant_vec(z, n), &g)?;
        let h_scalars: Vec<Scalar> = h
            .iter()
            .zip(w.iter())
            .zip(y_inv_n.iter())
            .map(|((h_i, w_i), y_inv_i)| z + y_inv_i * (zz * w_i - h_i))
            .collect();

        let mut scalars: Vec<Scalar> = vec![
            Scalar::one(),
            x,
            -c * x,
            -c * x * x,
            c * proof.tau_x - proof.mu,
            opening_v + c * (proof.ip - delta),
        ];
        let mut points: Vec<RistrettoPoint> = vec![A, B, T_1, T_2, self.gens.U, self.gens.V];

        match self.relation.key_points() {
            Some(keys) => {
                if keys.len() != n {
                    return Err(ProofError::LengthMismatch(n, keys.len()));
                }
                scalars.push(x);
                points.push(E);
                scalars.push(proof.f_s);
                points.push(self.gens.G);
                scalars.extend(
                    g_scalars
                        .iter()
                        .zip(y_n.iter())
                        .map(|(g_i, y_i)| y_i * g_i),
                );
                points.extend_from_slice(keys);
            }
            None => {
                if proof.f_s != Scalar::zero() || !E.is_identity() {
                    return Err(ProofError::VerificationError);
                }
            }
        }

        if let Some(C_v) = self.relation.value_commitment() {
            scalars.push(-c * zz);
            points.push(*C_v);
        }

        let total = scalars.len() + 2 * n + ipa_scalars.len();
        let scalars = util::concat(
            &[&scalars[..], &g_scalars[..], &h_scalars[..], &ipa_scalars[..]],
            total,
        )?;
        let points = util::concat(&[&points[..], G, H, &ipa_points[..]], total)?;

        let mega_check = RistrettoPoint::vartime_multiscalar_mul(scalars, points);

        if mega_check.is_identity() {
            debug!("sigma verifier: proof accepted");
            Ok(())
        } else {
            Err(ProofError::VerificationError)
        }
    }
}
