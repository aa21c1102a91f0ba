//! Defines a `TranscriptProtocol` trait for using a Merlin transcript.

use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::scalar::Scalar;
use log::trace;
use merlin::Transcript;

/// Extension of the Merlin transcript with the typed messages and
/// challenges used by the proofs in this crate.
pub trait TranscriptProtocol {
    /// Commit a domain separator for a sigma proof of a relation named
    /// `label` over vectors of length `n`.
    fn sigma_domain_sep(&mut self, label: &'static [u8], n: u64);
    /// Commit a domain separator for a length-`n` inner product proof.
    fn innerproduct_domain_sep(&mut self, n: u64);
    /// Commit a `scalar` with the given `label`.
    fn commit_scalar(&mut self, label: &'static [u8], scalar: &Scalar);
    /// Commit a `point` with the given `label`.
    fn commit_point(&mut self, label: &'static [u8], point: &CompressedRistretto);
    /// Compute a `label`ed challenge variable.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl TranscriptProtocol for Transcript {
    fn sigma_domain_sep(&mut self, label: &'static [u8], n: u64) {
        self.append_message(b"dom-sep", b"sigma v1");
        self.append_message(b"relation", label);
        self.append_u64(b"n", n);
    }

    fn innerproduct_domain_sep(&mut self, n: u64) {
        self.append_message(b"dom-sep", b"ipp v1");
        self.append_u64(b"n", n);
    }

    fn commit_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.as_bytes());
    }

    fn commit_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.append_message(label, point.as_bytes());
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        trace!("deriving challenge {:?}", String::from_utf8_lossy(label));
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);

        Scalar::from_bytes_mod_order_wide(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_COMPRESSED;

    fn transcript_with_point() -> Transcript {
        let mut t = Transcript::new(b"transcript test");
        t.sigma_domain_sep(b"membership", 8);
        t.commit_point(b"A", &RISTRETTO_BASEPOINT_COMPRESSED);
        t
    }

    #[test]
    fn challenges_are_deterministic() {
        let mut t1 = transcript_with_point();
        let mut t2 = transcript_with_point();
        assert_eq!(t1.challenge_scalar(b"y"), t2.challenge_scalar(b"y"));
        assert_eq!(t1.challenge_scalar(b"z"), t2.challenge_scalar(b"z"));
    }

    #[test]
    fn challenge_labels_are_separated() {
        let mut t1 = transcript_with_point();
        let mut t2 = transcript_with_point();
        assert_ne!(t1.challenge_scalar(b"y"), t2.challenge_scalar(b"z"));

        // A second challenge depends on the first one.
        let mut t3 = transcript_with_point();
        let y = t3.challenge_scalar(b"y");
        assert_ne!(y, t3.challenge_scalar(b"y"));
    }

    #[test]
    fn challenges_depend_on_every_message() {
        let mut t1 = transcript_with_point();
        let mut t2 = transcript_with_point();
        t2.commit_scalar(b"extra", &Scalar::one());
        assert_ne!(t1.challenge_scalar(b"x"), t2.challenge_scalar(b"x"));

        let mut t3 = Transcript::new(b"transcript test");
        t3.sigma_domain_sep(b"range", 8);
        t3.commit_point(b"A", &RISTRETTO_BASEPOINT_COMPRESSED);
        let mut t4 = transcript_with_point();
        assert_ne!(t3.challenge_scalar(b"x"), t4.challenge_scalar(b"x"));
    }
}
