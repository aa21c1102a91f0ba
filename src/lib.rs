#![warn(missing_docs)]
#![allow(non_snake_case)]
#![doc(html_root_url = "https://docs.rs/anyproofs/0.1.0")]

//! Any-out-of-many partial-knowledge proofs and range proofs over the
//! Ristretto group, with logarithmic inner-product compression.
//!
//! A session starts with [`setup`], which validates the sizes and builds
//! the shared generators. The prover then calls
//! [`MembershipProof::prove`] or [`RangeProof::prove`] and the verifier the
//! matching `verify`, each with its own Merlin [`Transcript`](merlin::Transcript)
//! created under the same label.

extern crate byteorder;
extern crate clear_on_drop;
extern crate curve25519_dalek;
extern crate digest;
extern crate failure;
extern crate log;
extern crate merlin;
extern crate rand;
extern crate rand_core;
extern crate serde;
extern crate serde_derive;
extern crate sha3;
extern crate subtle;

#[cfg(test)]
extern crate rand_chacha;

mod util;

mod commitment;
mod errors;
mod generators;
mod inner_product_proof;
mod membership;
mod params;
mod range_proof;
mod transcript;

pub mod sigma;

pub use crate::commitment::{
    blinded_vector_commit, commit, pedersen_commit, pedersen_vector_commit, vector_commit,
};
pub use crate::errors::ProofError;
pub use crate::generators::GeneratorSet;
pub use crate::inner_product_proof::InnerProductProof;
pub use crate::membership::{keygen, MembershipProof, PublicKeyVector};
pub use crate::params::{setup, ProofConfig, ProverParams, VerifierParams, MAX_RANGE_BITS};
pub use crate::range_proof::RangeProof;
pub use crate::transcript::TranscriptProtocol;
