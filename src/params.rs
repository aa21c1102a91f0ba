//! Public parameters shared by the prover and the verifier of a session.

use std::sync::Arc;

use log::debug;

use crate::errors::ProofError;
use crate::generators::GeneratorSet;

/// Largest supported bit length of a range proof.
pub const MAX_RANGE_BITS: usize = 64;

/// Sizes and options of a proof session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProofConfig {
    /// Number of secret keys the membership prover knows.
    pub k: usize,
    /// Number of public keys in a membership statement.
    pub n: usize,
    /// Bit length of a range statement.
    pub d: usize,
    /// Open the response vectors through the inner-product argument.
    pub compress: bool,
}

impl ProofConfig {
    /// A compressed configuration for `k`-out-of-`n` membership and
    /// `d`-bit range proofs.
    pub fn new(k: usize, n: usize, d: usize) -> Self {
        ProofConfig {
            k,
            n,
            d,
            compress: true,
        }
    }

    /// Rejects sizes no session can run with.
    pub fn validate(&self) -> Result<(), ProofError> {
        if self.n == 0 {
            return Err(ProofError::ConfigurationError("N must be positive"));
        }
        if self.k == 0 || self.k > self.n {
            return Err(ProofError::ConfigurationError("k must be in 1..=N"));
        }
        if self.d == 0 || self.d > MAX_RANGE_BITS {
            return Err(ProofError::ConfigurationError("d must be in 1..=64"));
        }
        Ok(())
    }

    /// Number of vector bases the generator set must provide.
    pub fn capacity(&self) -> usize {
        self.n.max(self.d).next_power_of_two()
    }

    /// Builds the generators and splits them between prover and verifier.
    pub fn setup(self) -> Result<(ProverParams, VerifierParams), ProofError> {
        self.validate()?;
        debug!(
            "setup: k = {}, N = {}, d = {}, capacity = {}",
            self.k,
            self.n,
            self.d,
            self.capacity()
        );
        let gens = Arc::new(GeneratorSet::new(self.capacity()));
        Ok((
            ProverParams {
                config: self,
                gens: Arc::clone(&gens),
            },
            VerifierParams { config: self, gens },
        ))
    }
}

/// Prover side of the public parameters.
#[derive(Clone, Debug)]
pub struct ProverParams {
    pub(crate) config: ProofConfig,
    pub(crate) gens: Arc<GeneratorSet>,
}

/// Verifier side of the public parameters.
#[derive(Clone, Debug)]
pub struct VerifierParams {
    pub(crate) config: ProofConfig,
    pub(crate) gens: Arc<GeneratorSet>,
}

impl ProverParams {
    /// The session configuration.
    pub fn config(&self) -> &ProofConfig {
        &self.config
    }

    /// The shared generators.
    pub fn gens(&self) -> &GeneratorSet {
        &self.gens
    }
}

impl VerifierParams {
    /// The session configuration.
    pub fn config(&self) -> &ProofConfig {
        &self.config
    }

    /// The shared generators.
    pub fn gens(&self) -> &GeneratorSet {
        &self.gens
    }
}

/// Validates the sizes and builds compressed parameters for a session
/// proving knowledge of `k` out of `n` secret keys or a `d`-bit range.
pub fn setup(k: usize, n: usize, d: usize) -> Result<(ProverParams, VerifierParams), ProofError> {
    ProofConfig::new(k, n, d).setup()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_sizes() {
        assert!(setup(0, 8, 64).is_err());
        assert!(setup(9, 8, 64).is_err());
        assert!(setup(1, 0, 64).is_err());
        assert!(setup(1, 8, 0).is_err());
        assert!(setup(1, 8, 65).is_err());
        assert!(setup(8, 8, 64).is_ok());
    }

    #[test]
    fn capacity_covers_both_statements() {
        assert_eq!(ProofConfig::new(1, 8, 64).capacity(), 64);
        assert_eq!(ProofConfig::new(1, 100, 8).capacity(), 128);
        assert_eq!(ProofConfig::new(1, 1, 1).capacity(), 1);
    }

    #[test]
    fn prover_and_verifier_share_generators() {
        let (prover, verifier) = setup(1, 8, 16).unwrap();
        assert!(Arc::ptr_eq(&prover.gens, &verifier.gens));
        assert_eq!(prover.config(), verifier.config());
        assert_eq!(prover.gens().capacity(), 16);
    }
}
