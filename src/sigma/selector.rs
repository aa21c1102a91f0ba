//! Binary selector vectors \\(\mathbf{b}\_0, \mathbf{b}\_1 = \mathbf{1} - \mathbf{b}\_0\\).

use clear_on_drop::clear::Clear;
use curve25519_dalek::scalar::Scalar;
use rand::Rng;
use rand_core::{CryptoRng, RngCore};

use crate::errors::ProofError;

/// Retry budget per slot when sampling selector positions.
const RETRIES_PER_SLOT: usize = 64;

/// A length-\\(N\\) vector in \\(\\{0, 1\\}^N\\) marking the secret slots.
///
/// For the membership proof it marks the public keys whose secret keys the
/// prover knows; for the range proof it holds the bits of the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    bits: Vec<bool>,
}

impl Selector {
    /// Picks `k` distinct positions out of `n` uniformly at random.
    ///
    /// Positions are drawn as uniform indices mod `n`; an index that is
    /// already selected is redrawn. Fails with
    /// [`ProofError::SamplingCollision`] once the retry budget of
    /// \\(64 (n + 1)\\) draws is spent.
    pub fn random<T: RngCore + CryptoRng>(
        k: usize,
        n: usize,
        rng: &mut T,
    ) -> Result<Selector, ProofError> {
        if n == 0 {
            return Err(ProofError::ConfigurationError("N must be positive"));
        }
        if k == 0 || k > n {
            return Err(ProofError::ConfigurationError("k must be in 1..=N"));
        }

        let budget = RETRIES_PER_SLOT * (n + 1);
        let mut bits = vec![false; n];
        let mut chosen = 0;
        let mut draws = 0;
        while chosen < k {
            if draws == budget {
                return Err(ProofError::SamplingCollision);
            }
            draws += 1;
            let i = rng.gen_range(0, n);
            if !bits[i] {
                bits[i] = true;
                chosen += 1;
            }
        }
        Ok(Selector { bits })
    }

    /// Selects exactly the given `indices` out of `n`.
    pub fn from_indices(n: usize, indices: &[usize]) -> Result<Selector, ProofError> {
        if n == 0 {
            return Err(ProofError::ConfigurationError("N must be positive"));
        }
        if indices.is_empty() || indices.len() > n {
            return Err(ProofError::ConfigurationError("k must be in 1..=N"));
        }
        let mut bits = vec![false; n];
        for &i in indices {
            if i >= n {
                return Err(ProofError::ConfigurationError("selected index out of range"));
            }
            if bits[i] {
                return Err(ProofError::ConfigurationError("selected index repeated"));
            }
            bits[i] = true;
        }
        Ok(Selector { bits })
    }

    /// The little-endian bit decomposition of `value` over `d` bits.
    pub fn from_bits(value: u64, d: usize) -> Selector {
        let bits = (0..d)
            .map(|i| i < 64 && (value >> i) & 1 == 1)
            .collect();
        Selector { bits }
    }

    /// Length \\(N\\) of the selector.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Number of selected slots.
    pub fn weight(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Whether slot `i` is selected.
    pub fn is_selected(&self, i: usize) -> bool {
        self.bits.get(i).cloned().unwrap_or(false)
    }

    /// Selected positions in increasing order.
    pub fn indices(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
            .collect()
    }

    /// \\(\mathbf{b}\_0\\) as scalars.
    pub fn b0(&self) -> Vec<Scalar> {
        self.bits
            .iter()
            .map(|b| if *b { Scalar::one() } else { Scalar::zero() })
            .collect()
    }

    /// \\(\mathbf{b}\_1 = \mathbf{1} - \mathbf{b}\_0\\) as scalars.
    pub fn b1(&self) -> Vec<Scalar> {
        self.bits
            .iter()
            .map(|b| if *b { Scalar::zero() } else { Scalar::one() })
            .collect()
    }

    pub(crate) fn as_bytes(&self) -> Vec<u8> {
        self.bits.iter().map(|b| *b as u8).collect()
    }
}

impl Drop for Selector {
    fn drop(&mut self) {
        for b in self.bits.iter_mut() {
            b.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn random_selects_exactly_k() {
        let mut rng = ChaChaRng::from_seed([7u8; 32]);
        for &(k, n) in &[(1, 1), (1, 8), (3, 8), (8, 8), (64, 64)] {
            let sel = Selector::random(k, n, &mut rng).unwrap();
            assert_eq!(sel.len(), n);
            assert_eq!(sel.weight(), k);
            assert_eq!(sel.indices().len(), k);
        }
    }

    #[test]
    fn random_rejects_bad_sizes() {
        let mut rng = ChaChaRng::from_seed([7u8; 32]);
        assert!(Selector::random(0, 8, &mut rng).is_err());
        assert!(Selector::random(9, 8, &mut rng).is_err());
        assert!(Selector::random(1, 0, &mut rng).is_err());
    }

    #[test]
    fn complement_sums_to_one() {
        let sel = Selector::from_indices(5, &[1, 3]).unwrap();
        for (b0, b1) in sel.b0().iter().zip(sel.b1().iter()) {
            assert_eq!(b0 + b1, Scalar::one());
            assert_eq!(b0 * b1, Scalar::zero());
        }
        assert!(sel.is_selected(3));
        assert!(!sel.is_selected(0));
        assert!(!sel.is_selected(5));
    }

    #[test]
    fn from_indices_checks_input() {
        assert!(Selector::from_indices(4, &[]).is_err());
        assert!(Selector::from_indices(4, &[4]).is_err());
        assert!(Selector::from_indices(4, &[1, 1]).is_err());
    }

    #[test]
    fn bit_decomposition_is_little_endian() {
        let sel = Selector::from_bits(0b1011, 6);
        assert_eq!(sel.indices(), vec![0, 1, 3]);
        assert_eq!(Selector::from_bits(u64::max_value(), 64).weight(), 64);
    }
}
