//! Definition of the sigma proof struct and its wire format.

#![allow(non_snake_case)]

use byteorder::{ByteOrder, LittleEndian};
use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::scalar::Scalar;
use serde::de::Visitor;
use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ProofError;
use crate::inner_product_proof::InnerProductProof;
use crate::util::read32;

const POINT_COUNT: usize = 5;
const SCALAR_COUNT: usize = 7;
const TAG_LEN: usize = 8;

const TAG_PLAIN: u64 = 0;
const TAG_COMPRESSED: u64 = 1;

/// How the response vectors \\(\zeta, \eta\\) are opened to the verifier.
#[derive(Clone, Debug, PartialEq)]
pub enum Opening {
    /// Both vectors sent in full.
    Plain {
        /// \\(\zeta = l(x)\\)
        zeta: Vec<Scalar>,
        /// \\(\eta = r(x)\\)
        eta: Vec<Scalar>,
    },
    /// A logarithmic-size argument for \\(\langle \zeta, \eta \rangle\\).
    Compressed(InnerProductProof),
}

impl Opening {
    fn serialized_size(&self) -> usize {
        match self {
            Opening::Plain { zeta, eta } => (zeta.len() + eta.len()) * 32,
            Opening::Compressed(ipp) => ipp.serialized_size(),
        }
    }
}

/// A proof produced by the sigma engine for any [`Relation`](super::Relation).
#[derive(Clone, Debug, PartialEq)]
pub struct SigmaProof {
    /// Commitment to the selector vectors
    pub(crate) A: CompressedRistretto,
    /// Commitment to the blinding vectors
    pub(crate) B: CompressedRistretto,
    /// Commitment to the \\(t_1\\) coefficient of \\( t(x) \\)
    pub(crate) T_1: CompressedRistretto,
    /// Commitment to the \\(t_2\\) coefficient of \\( t(x) \\)
    pub(crate) T_2: CompressedRistretto,
    /// Auxiliary commitment binding the key response (identity when unused)
    pub(crate) E: CompressedRistretto,
    /// Blinding factor for the synthetic commitment to \\( t(x) \\)
    pub(crate) tau_x: Scalar,
    /// Blinding factor for the combined \\(A + x B\\)
    pub(crate) mu: Scalar,
    /// Evaluation of the polynomial \\(t(x)\\) at the challenge point \\(x\\)
    pub(crate) ip: Scalar,
    /// Response for the selected secret keys
    pub(crate) f_s: Scalar,
    pub(crate) x: Scalar,
    pub(crate) y: Scalar,
    pub(crate) z: Scalar,
    pub(crate) opening: Opening,
}

impl SigmaProof {
    /// Whether the response vectors are opened through the
    /// inner-product argument.
    pub fn is_compressed(&self) -> bool {
        match self.opening {
            Opening::Compressed(_) => true,
            Opening::Plain { .. } => false,
        }
    }

    /// The opening of the response vectors.
    pub fn opening(&self) -> &Opening {
        &self.opening
    }

    /// Returns the size in bytes required to serialize the proof.
    pub fn serialized_size(&self) -> usize {
        (POINT_COUNT + SCALAR_COUNT) * 32 + TAG_LEN + self.opening.serialized_size()
    }

    /// Serializes the proof into a byte array.
    ///
    /// The format is:
    /// 1. the points \\(A, B, T_1, T_2, E\\),
    /// 2. the scalars \\(\tau_x, \mu, ip, f_s, x, y, z\\),
    /// 3. a u64-LE tag: 0 for a plain opening, 1 for a compressed one,
    /// 4. either \\(\zeta\\) followed by \\(\eta\\), or the inner-product proof.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());

        for point in &[self.A, self.B, self.T_1, self.T_2, self.E] {
            buf.extend_from_slice(point.as_bytes());
        }
        for scalar in &[
            self.tau_x, self.mu, self.ip, self.f_s, self.x, self.y, self.z,
        ] {
            buf.extend_from_slice(scalar.as_bytes());
        }

        let mut tag = [0u8; TAG_LEN];
        match &self.opening {
            Opening::Plain { zeta, eta } => {
                LittleEndian::write_u64(&mut tag, TAG_PLAIN);
                buf.extend_from_slice(&tag);
                for s in zeta.iter().chain(eta.iter()) {
                    buf.extend_from_slice(s.as_bytes());
                }
            }
            Opening::Compressed(ipp) => {
                LittleEndian::write_u64(&mut tag, TAG_COMPRESSED);
                buf.extend_from_slice(&tag);
                buf.extend_from_slice(&ipp.to_bytes());
            }
        }
        buf
    }

    /// Deserializes the proof from a byte slice.
    ///
    /// Scalars must be canonical; point encodings are checked when the
    /// proof is verified.
    pub fn from_bytes(slice: &[u8]) -> Result<SigmaProof, ProofError> {
        let fixed_len = (POINT_COUNT + SCALAR_COUNT) * 32;
        if slice.len() < fixed_len + TAG_LEN {
            return Err(ProofError::FormatError);
        }

        let read_point = |i: usize| CompressedRistretto(read32(&slice[i * 32..]));
        let A = read_point(0);
        let B = read_point(1);
        let T_1 = read_point(2);
        let T_2 = read_point(3);
        let E = read_point(4);

        let read_scalar = |i: usize| -> Result<Scalar, ProofError> {
            let pos = (POINT_COUNT + i) * 32;
            Scalar::from_canonical_bytes(read32(&slice[pos..])).ok_or(ProofError::FormatError)
        };
        let tau_x = read_scalar(0)?;
        let mu = read_scalar(1)?;
        let ip = read_scalar(2)?;
        let f_s = read_scalar(3)?;
        let x = read_scalar(4)?;
        let y = read_scalar(5)?;
        let z = read_scalar(6)?;

        let tag = LittleEndian::read_u64(&slice[fixed_len..fixed_len + TAG_LEN]);
        let rest = &slice[fixed_len + TAG_LEN..];

        let opening = match tag {
            TAG_PLAIN => {
                if rest.is_empty() || rest.len() % 64 != 0 {
                    return Err(ProofError::FormatError);
                }
                let n = rest.len() / 64;
                let scalars = rest
                    .chunks(32)
                    .map(|chunk| {
                        Scalar::from_canonical_bytes(read32(chunk)).ok_or(ProofError::FormatError)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let (zeta, eta) = scalars.split_at(n);
                Opening::Plain {
                    zeta: zeta.to_vec(),
                    eta: eta.to_vec(),
                }
            }
            TAG_COMPRESSED => Opening::Compressed(InnerProductProof::from_bytes(rest)?),
            _ => return Err(ProofError::FormatError),
        };

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

impl Serialize for SigmaProof {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for SigmaProof {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SigmaProofVisitor;

        impl<'de> Visitor<'de> for SigmaProofVisitor {
            type Value = SigmaProof;

            fn expecting(&self, formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                formatter.write_str("a valid SigmaProof")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<SigmaProof, E>
            where
                E: serde::de::Error,
            {
                SigmaProof::from_bytes(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(SigmaProofVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_COMPRESSED;

    fn sample_proof(opening: Opening) -> SigmaProof {
        let p = RISTRETTO_BASEPOINT_COMPRESSED;
        let s = |v: u64| Scalar::from(v);
        SigmaProof {
            A: p,
            B: p,
            T_1: p,
            T_2: p,
            E: CompressedRistretto::default(),
            tau_x: s(1),
            mu: s(2),
            ip: s(3),
            f_s: s(4),
            x: s(5),
            y: s(6),
            z: s(7),
            opening,
        }
    }

    #[test]
    fn plain_layout() {
        let proof = sample_proof(Opening::Plain {
            zeta: vec![Scalar::from(8u64); 4],
            eta: vec![Scalar::from(9u64); 4],
        });
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), proof.serialized_size());
        assert_eq!(bytes.len(), 12 * 32 + 8 + 8 * 32);
        assert!(!proof.is_compressed());
        assert_eq!(SigmaProof::from_bytes(&bytes).unwrap(), proof);
    }

    #[test]
    fn compressed_layout() {
        let ipp = InnerProductProof {
            L_vec: vec![RISTRETTO_BASEPOINT_COMPRESSED; 3],
            R_vec: vec![RISTRETTO_BASEPOINT_COMPRESSED; 3],
            a: Scalar::from(10u64),
            b: Scalar::from(11u64),
        };
        let proof = sample_proof(Opening::Compressed(ipp));
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), 12 * 32 + 8 + 8 * 32);
        assert!(proof.is_compressed());
        assert_eq!(SigmaProof::from_bytes(&bytes).unwrap(), proof);
    }

    #[test]
    fn rejects_truncated_or_tagged_garbage() {
        let proof = sample_proof(Opening::Plain {
            zeta: vec![Scalar::one(); 2],
            eta: vec![Scalar::one(); 2],
        });
        let bytes = proof.to_bytes();
        assert_eq!(
            SigmaProof::from_bytes(&bytes[..bytes.len() - 32]),
            Err(ProofError::FormatError)
        );
        assert_eq!(
            SigmaProof::from_bytes(&bytes[..12 * 32]),
            Err(ProofError::FormatError)
        );

        let mut bad_tag = bytes.clone();
        bad_tag[12 * 32] = 7;
        assert_eq!(SigmaProof::from_bytes(&bad_tag), Err(ProofError::FormatError));

        let mut bad_scalar = bytes;
        for b in bad_scalar[5 * 32..6 * 32].iter_mut() {
            *b = 0xff;
        }
        assert_eq!(
            SigmaProof::from_bytes(&bad_scalar),
            Err(ProofError::FormatError)
        );
    }
}
