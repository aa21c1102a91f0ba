#![allow(non_snake_case)]
#![doc = include_str!("../docs/inner-product-protocol.md")]

use std::iter;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity, VartimeMultiscalarMul};
use log::debug;
use merlin::Transcript;
use serde::de::Visitor;
use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ProofError;
use crate::transcript::TranscriptProtocol;
use crate::util::{self, pad_with};

/// A logarithmic-size proof that a commitment
/// \\(C = \langle \mathbf{a}, \mathbf{G} \rangle + \langle \mathbf{b}, \mathbf{H} \rangle + \langle \mathbf{a}, \mathbf{b} \rangle \cdot V\\)
/// opens to two vectors with the committed inner product.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerProductProof {
    pub(crate) L_vec: Vec<CompressedRistretto>,
    pub(crate) R_vec: Vec<CompressedRistretto>,
    pub(crate) a: Scalar,
    pub(crate) b: Scalar,
}

/// Per-challenge and per-generator scalars recovered by the verifier.
pub(crate) struct VerificationScalars {
    /// The round challenges \\(u\_j\\).
    pub u: Vec<Scalar>,
    /// Their inverses.
    pub u_inv: Vec<Scalar>,
    /// The folded coefficient of each \\(G\_i\\).
    pub s: Vec<Scalar>,
    /// The folded coefficient of each \\(H\_i\\).
    pub s_prime: Vec<Scalar>,
}

impl InnerProductProof {
    /// Create an inner-product proof.
    ///
    /// The proof is created with respect to the bases \\(\mathbf{G}\\),
    /// \\(\mathbf{H}\\) and the value base \\(V\\).
    ///
    /// The `transcript` is passed in as a parameter so that the
    /// challenges depend on the *entire* transcript (including parent
    /// protocols).
    ///
    /// The lengths of the vectors must all be the same. Vectors whose
    /// length is not a power of two are padded with zero scalars and
    /// identity bases, which does not change the commitment.
    pub fn create(
        transcript: &mut Transcript,
        V: &RistrettoPoint,
        G_vec: Vec<RistrettoPoint>,
        H_vec: Vec<RistrettoPoint>,
        a_vec: Vec<Scalar>,
        b_vec: Vec<Scalar>,
    ) -> Result<InnerProductProof, ProofError> {
        let n = a_vec.len();
        if n == 0 {
            return Err(ProofError::ConfigurationError(
                "inner product of empty vectors",
            ));
        }
        for len in &[b_vec.len(), G_vec.len(), H_vec.len()] {
            if *len != n {
                return Err(ProofError::LengthMismatch(n, *len));
            }
        }

        let mut n = n.next_power_of_two();
        let mut G_vec = pad_with(G_vec, n, RistrettoPoint::identity());
        let mut H_vec = pad_with(H_vec, n, RistrettoPoint::identity());
        let mut a_vec = pad_with(a_vec, n, Scalar::zero());
        let mut b_vec = pad_with(b_vec, n, Scalar::zero());

        let mut G = &mut G_vec[..];
        let mut H = &mut H_vec[..];
        let mut a = &mut a_vec[..];
        let mut b = &mut b_vec[..];

        transcript.innerproduct_domain_sep(n as u64);

        let lg_n = n.trailing_zeros() as usize;
        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);

        while n != 1 {
            n = n / 2;
            debug!("inner product round: folding {} -> {}", 2 * n, n);
            let (a_L, a_R) = a.split_at_mut(n);
            let (b_L, b_R) = b.split_at_mut(n);
            let (G_L, G_R) = G.split_at_mut(n);
            let (H_L, H_R) = H.split_at_mut(n);

            let c_L = util::inner_product(a_L, b_R)?;
            let c_R = util::inner_product(a_R, b_L)?;

            let L = RistrettoPoint::vartime_multiscalar_mul(
                a_L.iter().chain(b_R.iter()).chain(iter::once(&c_L)),
                G_R.iter().chain(H_L.iter()).chain(iter::once(V)),
            )
            .compress();

            let R = RistrettoPoint::vartime_multiscalar_mul(
                a_R.iter().chain(b_L.iter()).chain(iter::once(&c_R)),
                G_L.iter().chain(H_R.iter()).chain(iter::once(V)),
            )
            .compress();

            L_vec.push(L);
            R_vec.push(R);

            transcript.commit_point(b"L", &L);
            transcript.commit_point(b"R", &R);

            let u = transcript.challenge_scalar(b"u");
            let u_inv = util::invert(&u)?;

            for i in 0..n {
                a_L[i] = a_L[i] * u + a_R[i];
                b_L[i] = b_L[i] * u_inv + b_R[i];
                G_L[i] = RistrettoPoint::vartime_multiscalar_mul(&[u_inv, Scalar::one()], &[G_L[i], G_R[i]]);
                H_L[i] = RistrettoPoint::vartime_multiscalar_mul(&[u, Scalar::one()], &[H_L[i], H_R[i]]);
            }

            a = a_L;
            b = b_L;
            G = G_L;
            H = H_L;
        }

        Ok(InnerProductProof {
            L_vec,
            R_vec,
            a: a[0],
            b: b[0],
        })
    }

    /// Replays the challenges of a proof over vectors of length `n` and
    /// expands them into the coefficients of the folded bases:
    /// \\(G^\* = \sum\_i s\_i G\_i\\), \\(H^\* = \sum\_i s'\_i H\_i\\).
    ///
    /// The returned `s` and `s_prime` cover the padded length.
    pub(crate) fn verification_scalars(
        &self,
        n: usize,
        transcript: &mut Transcript,
    ) -> Result<VerificationScalars, ProofError> {
        let lg_n = self.L_vec.len();
        if lg_n >= 32 || self.R_vec.len() != lg_n {
            return Err(ProofError::VerificationError);
        }
        if n == 0 || n.next_power_of_two() != (1 << lg_n) {
            return Err(ProofError::VerificationError);
        }
        let padded_n = 1 << lg_n;

        transcript.innerproduct_domain_sep(padded_n as u64);

        // 1. Recompute u_1, ..., u_k based on the proof transcript

        let mut u = Vec::with_capacity(lg_n);
        for (L, R) in self.L_vec.iter().zip(self.R_vec.iter()) {
            transcript.commit_point(b"L", L);
            transcript.commit_point(b"R", R);
            u.push(transcript.challenge_scalar(b"u"));
        }

        // 2. Invert them all at once

        if u.iter().any(|u_j| *u_j == Scalar::zero()) {
            return Err(ProofError::VerificationError);
        }
        let mut u_inv = u.clone();
        Scalar::batch_invert(&mut u_inv);

        // 3. Round j halves on bit (lg_n - 1 - j) of the index; the left
        // half of G picks up u_j^{-1}, the left half of H picks up u_j.

        let mut s = vec![Scalar::one()];
        let mut s_prime = vec![Scalar::one()];
        for j in (0..lg_n).rev() {
            let left: Vec<Scalar> = s.iter().map(|s_i| s_i * u_inv[j]).collect();
            s = left.into_iter().chain(s.into_iter()).collect();
            let left: Vec<Scalar> = s_prime.iter().map(|s_i| s_i * u[j]).collect();
            s_prime = left.into_iter().chain(s_prime.into_iter()).collect();
        }

        Ok(VerificationScalars { u, u_inv, s, s_prime })
    }

    /// Checks the proof against the commitment `C` on its own.
    ///
    /// The sigma protocols fold these terms into their combined check
    /// instead; this entry point serves standalone use and tests.
    pub fn verify(
        &self,
        n: usize,
        transcript: &mut Transcript,
        C: &RistrettoPoint,
        V: &RistrettoPoint,
        G: &[RistrettoPoint],
        H: &[RistrettoPoint],
    ) -> Result<(), ProofError> {
        if G.len() != n || H.len() != n {
            return Err(ProofError::VerificationError);
        }
        let VerificationScalars { u, u_inv, s, s_prime } =
            self.verification_scalars(n, transcript)?;

        let Ls = self
            .L_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::VerificationError))
            .collect::<Result<Vec<_>, _>>()?;

        let Rs = self
            .R_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::VerificationError))
            .collect::<Result<Vec<_>, _>>()?;

        // C + sum(u_j L_j + u_j^{-1} R_j) - a G* - b H* - ab V == 0
        let check = RistrettoPoint::vartime_multiscalar_mul(
            iter::once(Scalar::one())
                .chain(u.into_iter())
                .chain(u_inv.into_iter())
                .chain(s.iter().take(n).map(|s_i| -(self.a * s_i)))
                .chain(s_prime.iter().take(n).map(|s_i| -(self.b * s_i)))
                .chain(iter::once(-(self.a * self.b))),
            iter::once(C)
                .chain(Ls.iter())
                .chain(Rs.iter())
                .chain(G.iter())
                .chain(H.iter())
                .chain(iter::once(V)),
        );

        if check.is_identity() {
            Ok(())
        } else {
            Err(ProofError::VerificationError)
        }
    }

    /// Number of folding rounds, \\(\lceil \log\_2 n \rceil\\).
    pub fn rounds(&self) -> usize {
        self.L_vec.len()
    }

    /// Returns the size in bytes required to serialize the inner
    /// product proof.
    pub fn serialized_size(&self) -> usize {
        (self.L_vec.len() * 2 + 2) * 32
    }

    /// Serializes the proof into a byte array of \\(2k+2\\) 32-byte elements.
    /// The layout of the inner product proof is:
    /// * \\(k\\) pairs of compressed Ristretto points \\(L_0, R_0 \dots, L_{k-1}, R_{k-1}\\),
    /// * two scalars \\(a, b\\).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        for (l, r) in self.L_vec.iter().zip(self.R_vec.iter()) {
            buf.extend_from_slice(l.as_bytes());
            buf.extend_from_slice(r.as_bytes());
        }
        buf.extend_from_slice(self.a.as_bytes());
        buf.extend_from_slice(self.b.as_bytes());
        buf
    }

    /// Deserializes the proof from a byte slice.
    /// Returns an error in the following cases:
    /// * the slice does not have \\(2k+2\\) 32-byte elements,
    /// * \\(k\\) is larger or equal to 32 (proof is too big),
    /// * any of 2 scalars are not canonical scalars modulo Ristretto group order.
    ///
    /// Point encodings are checked when the proof is verified.
    pub fn from_bytes(slice: &[u8]) -> Result<InnerProductProof, ProofError> {
        let b = slice.len();
        if b % 32 != 0 {
            return Err(ProofError::FormatError);
        }
        let num_elements = b / 32;
        if num_elements < 2 {
            return Err(ProofError::FormatError);
        }
        if (num_elements - 2) % 2 != 0 {
            return Err(ProofError::FormatError);
        }
        let lg_n = (num_elements - 2) / 2;
        if lg_n >= 32 {
            return Err(ProofError::FormatError);
        }

        use crate::util::read32;

        let mut L_vec: Vec<CompressedRistretto> = Vec::with_capacity(lg_n);
        let mut R_vec: Vec<CompressedRistretto> = Vec::with_capacity(lg_n);
        for i in 0..lg_n {
            let pos = 2 * i * 32;
            L_vec.push(CompressedRistretto(read32(&slice[pos..])));
            R_vec.push(CompressedRistretto(read32(&slice[pos + 32..])));
        }

        let pos = 2 * lg_n * 32;
        let a =
            Scalar::from_canonical_bytes(read32(&slice[pos..])).ok_or(ProofError::FormatError)?;
        let b = Scalar::from_canonical_bytes(read32(&slice[pos + 32..]))
            .ok_or(ProofError::FormatError)?;

        Ok(InnerProductProof { L_vec, R_vec, a, b })
    }
}

impl Serialize for InnerProductProof {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for InnerProductProof {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InnerProductProofVisitor;

        impl<'de> Visitor<'de> for InnerProductProofVisitor {
            type Value = InnerProductProof;

            fn expecting(&self, formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                formatter.write_str("a valid InnerProductProof")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<InnerProductProof, E>
            where
                E: serde::de::Error,
            {
                InnerProductProof::from_bytes(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(InnerProductProofVisitor)
    }
}
