#![allow(non_snake_case)]

//! Pedersen-style commitments over the Ristretto group.
//!
//! Every vector commitment requires as many bases as scalars and fails with
//! [`ProofError::LengthMismatch`] otherwise. Equality of commitments is plain
//! point equality.

use std::iter;

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;

use crate::errors::ProofError;

/// Commits to a single scalar: \\(s \cdot G\\).
pub fn commit(G: &RistrettoPoint, s: &Scalar) -> RistrettoPoint {
    s * G
}

/// A two-base Pedersen commitment \\(s \cdot G + r \cdot H\\).
pub fn pedersen_commit(
    G: &RistrettoPoint,
    H: &RistrettoPoint,
    s: &Scalar,
    r: &Scalar,
) -> RistrettoPoint {
    RistrettoPoint::multiscalar_mul(&[*s, *r], &[*G, *H])
}

/// Computes \\(\sum\_i s\_i \cdot G\_i\\).
pub fn vector_commit(G_vec: &[RistrettoPoint], s_vec: &[Scalar]) -> Result<RistrettoPoint, ProofError> {
    if G_vec.len() != s_vec.len() {
        return Err(ProofError::LengthMismatch(G_vec.len(), s_vec.len()));
    }
    Ok(RistrettoPoint::multiscalar_mul(s_vec.iter(), G_vec.iter()))
}

/// Computes \\(\sum\_i (s\_i \cdot G\_i + r\_i \cdot H\_i)\\).
pub fn pedersen_vector_commit(
    G_vec: &[RistrettoPoint],
    H_vec: &[RistrettoPoint],
    s_vec: &[Scalar],
    r_vec: &[Scalar],
) -> Result<RistrettoPoint, ProofError> {
    if G_vec.len() != s_vec.len() {
        return Err(ProofError::LengthMismatch(G_vec.len(), s_vec.len()));
    }
    if H_vec.len() != r_vec.len() {
        return Err(ProofError::LengthMismatch(H_vec.len(), r_vec.len()));
    }
    Ok(RistrettoPoint::multiscalar_mul(
        s_vec.iter().chain(r_vec.iter()),
        G_vec.iter().chain(H_vec.iter()),
    ))
}

/// Computes \\(\sum\_i (s\_i \cdot G\_i + r\_i \cdot H\_i) + \rho \cdot U\\),
/// the shape of every blinded vector commitment in the sigma protocol.
pub fn blinded_vector_commit(
    G_vec: &[RistrettoPoint],
    H_vec: &[RistrettoPoint],
    s_vec: &[Scalar],
    r_vec: &[Scalar],
    U: &RistrettoPoint,
    rho: &Scalar,
) -> Result<RistrettoPoint, ProofError> {
    if G_vec.len() != s_vec.len() {
        return Err(ProofError::LengthMismatch(G_vec.len(), s_vec.len()));
    }
    if H_vec.len() != r_vec.len() {
        return Err(ProofError::LengthMismatch(H_vec.len(), r_vec.len()));
    }
    Ok(RistrettoPoint::multiscalar_mul(
        iter::once(rho).chain(s_vec.iter()).chain(r_vec.iter()),
        iter::once(U).chain(G_vec.iter()).chain(H_vec.iter()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratorSet;

    #[test]
    fn pedersen_commit_is_additively_homomorphic() {
        let gens = GeneratorSet::new(1);
        let (a, ra) = (Scalar::from(3u64), Scalar::from(11u64));
        let (b, rb) = (Scalar::from(5u64), Scalar::from(13u64));

        let ca = pedersen_commit(&gens.G, &gens.H, &a, &ra);
        let cb = pedersen_commit(&gens.G, &gens.H, &b, &rb);
        let cab = pedersen_commit(&gens.G, &gens.H, &(a + b), &(ra + rb));

        assert_eq!(ca + cb, cab);
        assert_eq!(commit(&gens.G, &a) + commit(&gens.H, &ra), ca);
    }

    #[test]
    fn vector_commit_matches_naive_sum() {
        let gens = GeneratorSet::new(4);
        let s: Vec<Scalar> = (1..5u64).map(Scalar::from).collect();
        let r: Vec<Scalar> = (5..9u64).map(Scalar::from).collect();
        let G = gens.G_vec(4).unwrap();
        let H = gens.H_vec(4).unwrap();

        let naive: RistrettoPoint = G.iter().zip(s.iter()).map(|(g, s)| s * g).sum();
        assert_eq!(vector_commit(G, &s).unwrap(), naive);

        let naive_h: RistrettoPoint = H.iter().zip(r.iter()).map(|(h, r)| r * h).sum();
        assert_eq!(
            pedersen_vector_commit(G, H, &s, &r).unwrap(),
            naive + naive_h
        );

        let rho = Scalar::from(42u64);
        assert_eq!(
            blinded_vector_commit(G, H, &s, &r, &gens.U, &rho).unwrap(),
            naive + naive_h + rho * gens.U
        );
    }

    #[test]
    fn vector_commit_rejects_wrong_lengths() {
        let gens = GeneratorSet::new(4);
        let s: Vec<Scalar> = (1..4u64).map(Scalar::from).collect();
        let G = gens.G_vec(4).unwrap();
        let H = gens.H_vec(4).unwrap();

        assert_eq!(vector_commit(G, &s), Err(ProofError::LengthMismatch(4, 3)));
        assert_eq!(
            pedersen_vector_commit(&G[..3], H, &s, &s),
            Err(ProofError::LengthMismatch(4, 3))
        );
    }
}
