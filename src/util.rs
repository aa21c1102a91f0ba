#![deny(missing_docs)]
#![allow(non_snake_case)]

//! Scalar and vector arithmetic modulo the group order.
//!
//! Every vector operation checks that its operands have equal length and
//! returns [`ProofError::LengthMismatch`] otherwise.

use clear_on_drop::clear::Clear;
use curve25519_dalek::scalar::Scalar;

use crate::errors::ProofError;

/// Represents a degree-1 vector polynomial \\(\mathbf{a} + \mathbf{b} \cdot x\\).
pub struct VecPoly1(pub Vec<Scalar>, pub Vec<Scalar>);

/// Represents a degree-2 scalar polynomial \\(a + b \cdot x + c \cdot x^2\\)
#[derive(Clone, Debug, PartialEq)]
pub struct Poly2(pub Scalar, pub Scalar, pub Scalar);

/// Provides an iterator over the powers of a `Scalar`.
///
/// This struct is created by the `exp_iter` function.
pub struct ScalarExp {
    x: Scalar,
    next_exp_x: Scalar,
}

impl Iterator for ScalarExp {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        let exp_x = self.next_exp_x;
        self.next_exp_x *= self.x;
        Some(exp_x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::max_value(), None)
    }
}

/// Return an iterator of the powers of `x`, starting with \\(x^0 = 1\\).
pub fn exp_iter(x: Scalar) -> ScalarExp {
    let next_exp_x = Scalar::one();
    ScalarExp { x, next_exp_x }
}

/// The exponential vector \\((1, y, y^2, \ldots, y^{n-1})\\).
///
/// Each entry is the previous one times `y`.
pub fn exp_vec(y: Scalar, n: usize) -> Vec<Scalar> {
    exp_iter(y).take(n).collect()
}

/// The constant vector \\(z \cdot \mathbf{1}^n\\).
pub fn constant_vec(z: Scalar, n: usize) -> Vec<Scalar> {
    vec![z; n]
}

/// Inverts `x`, refusing to silently map zero to zero.
pub fn invert(x: &Scalar) -> Result<Scalar, ProofError> {
    if *x == Scalar::zero() {
        return Err(ProofError::ArithmeticError);
    }
    Ok(x.invert())
}

fn check_lengths(a: usize, b: usize) -> Result<(), ProofError> {
    if a != b {
        return Err(ProofError::LengthMismatch(a, b));
    }
    Ok(())
}

/// Computes an inner product of two vectors
/// \\[
///    {\langle {\mathbf{a}}, {\mathbf{b}} \rangle} = \sum\_{i=0}^{n-1} a\_i \cdot b\_i.
/// \\]
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Result<Scalar, ProofError> {
    check_lengths(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(a_i, b_i)| a_i * b_i).sum())
}

/// Computes the Hadamard (entrywise) product \\(\mathbf{a} \circ \mathbf{b}\\).
pub fn hadamard(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, ProofError> {
    check_lengths(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(a_i, b_i)| a_i * b_i).collect())
}

/// Computes \\(\mathbf{a} + \mathbf{b}\\).
pub fn add_vec(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, ProofError> {
    check_lengths(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(a_i, b_i)| a_i + b_i).collect())
}

/// Computes \\(\mathbf{a} - \mathbf{b}\\).
pub fn sub_vec(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, ProofError> {
    check_lengths(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(a_i, b_i)| a_i - b_i).collect())
}

/// Computes \\(s \cdot \mathbf{a}\\).
pub fn scalar_mul_vec(s: &Scalar, a: &[Scalar]) -> Vec<Scalar> {
    a.iter().map(|a_i| s * a_i).collect()
}

/// Joins named sub-vectors into one vector whose total length must be
/// `expected_len`.
pub fn concat<T: Clone>(parts: &[&[T]], expected_len: usize) -> Result<Vec<T>, ProofError> {
    let total: usize = parts.iter().map(|p| p.len()).sum();
    check_lengths(total, expected_len)?;
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    Ok(out)
}

/// Extends `v` with copies of `fill` up to length `len`.
pub fn pad_with<T: Clone>(mut v: Vec<T>, len: usize, fill: T) -> Vec<T> {
    if v.len() < len {
        v.resize(len, fill);
    }
    v
}

impl VecPoly1 {
    /// Computes \\(\langle \mathbf{l}(x), \mathbf{r}(x) \rangle\\) as a
    /// degree-2 polynomial, using Karatsuba's method for the middle term.
    pub fn inner_product(&self, rhs: &VecPoly1) -> Result<Poly2, ProofError> {
        let l = self;
        let r = rhs;

        let t0 = inner_product(&l.0, &r.0)?;
        let t2 = inner_product(&l.1, &r.1)?;

        let l0_plus_l1 = add_vec(&l.0, &l.1)?;
        let r0_plus_r1 = add_vec(&r.0, &r.1)?;

        let t1 = inner_product(&l0_plus_l1, &r0_plus_r1)? - t0 - t2;

        Ok(Poly2(t0, t1, t2))
    }

    /// Evaluates the polynomial at `x`.
    pub fn eval(&self, x: Scalar) -> Vec<Scalar> {
        self.0
            .iter()
            .zip(self.1.iter())
            .map(|(a, b)| a + b * x)
            .collect()
    }
}

impl Poly2 {
    /// Evaluates the polynomial at `x`.
    pub fn eval(&self, x: Scalar) -> Scalar {
        self.0 + x * (self.1 + x * self.2)
    }
}

impl Drop for VecPoly1 {
    fn drop(&mut self) {
        for e in self.0.iter_mut() {
            e.clear();
        }
        for e in self.1.iter_mut() {
            e.clear();
        }
    }
}

impl Drop for Poly2 {
    fn drop(&mut self) {
        self.0.clear();
        self.1.clear();
        self.2.clear();
    }
}

/// Given `data` with `len >= 32`, return the first 32 bytes.
pub fn read32(data: &[u8]) -> [u8; 32] {
    let mut buf32 = [0u8; 32];
    buf32[..].copy_from_slice(&data[..32]);
    buf32
}
