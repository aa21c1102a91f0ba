//! Command-line demo: proves and verifies a membership proof and a range
//! proof with the given sizes.
//!
//! Usage:
//! cargo run --bin anyproof --release -- --n 8 --k 1 --d 64 --index 3
//! RUST_LOG=debug cargo run --bin anyproof -- --n 16 --k 4 --no-compress

extern crate anyproofs;
extern crate clap;
extern crate curve25519_dalek;
extern crate env_logger;
extern crate log;
extern crate merlin;
extern crate rand;

use std::process;

use anyproofs::{MembershipProof, ProofConfig, ProofError, RangeProof};
use clap::{App, Arg};
use curve25519_dalek::scalar::Scalar;
use log::{error, info};
use merlin::Transcript;
use rand::rngs::OsRng;
use rand::Rng;

fn main() {
    env_logger::init();

    let matches = App::new("Any-out-of-many proofs")
        .version("0.1")
        .about("Proves and verifies a membership proof and a range proof")
        .arg(Arg::with_name("n")
            .short("n")
            .long("n")
            .value_name("N")
            .help("Number of public keys (default: 8)")
            .takes_value(true))
        .arg(Arg::with_name("k")
            .short("k")
            .long("k")
            .value_name("K")
            .help("Number of known secret keys (default: 1)")
            .takes_value(true))
        .arg(Arg::with_name("d")
            .short("d")
            .long("d")
            .value_name("BITS")
            .help("Bit length of the range proof (default: 64)")
            .takes_value(true))
        .arg(Arg::with_name("index")
            .short("i")
            .long("index")
            .value_name("SLOT")
            .help("Slots of the known secret keys (default: random)")
            .takes_value(true)
            .multiple(true))
        .arg(Arg::with_name("value")
            .short("v")
            .long("value")
            .value_name("V")
            .help("Value to prove in range (default: random)")
            .takes_value(true))
        .arg(Arg::with_name("no-compress")
            .long("no-compress")
            .help("Send the response vectors in full"))
        .get_matches();

    let n = matches.value_of("n")
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);

    let indices: Option<Vec<usize>> = matches
        .values_of("index")
        .map(|vals| vals.filter_map(|s| s.parse().ok()).collect());

    let k = matches.value_of("k")
        .and_then(|s| s.parse().ok())
        .or_else(|| indices.as_ref().map(|i| i.len()))
        .unwrap_or(1);

    let d = matches.value_of("d")
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    let mut config = ProofConfig::new(k, n, d);
    config.compress = !matches.is_present("no-compress");

    let value = matches.value_of("value").and_then(|s| s.parse().ok());

    println!("\nConfiguration: N={}, k={}, d={}, compress={}", n, k, d, config.compress);

    if let Err(e) = run(config, indices, value) {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(
    config: ProofConfig,
    indices: Option<Vec<usize>>,
    value: Option<u64>,
) -> Result<(), ProofError> {
    let (prover_params, verifier_params) = config.setup()?;
    let mut rng = OsRng;

    // Membership

    let secrets: Vec<Scalar> = (0..config.k).map(|_| Scalar::random(&mut rng)).collect();

    let mut transcript = Transcript::new(b"anyproof demo membership");
    let (pks, proof) = match indices {
        Some(indices) => MembershipProof::prove_at(
            &prover_params,
            &mut transcript,
            &secrets,
            &indices,
            &mut rng,
        )?,
        None => MembershipProof::prove(&prover_params, &mut transcript, &secrets, &mut rng)?,
    };

    let mut transcript = Transcript::new(b"anyproof demo membership");
    let verdict = proof.verify(&verifier_params, &mut transcript, &pks);
    info!("membership proof verified: {}", verdict.is_ok());

    println!("\nMembership proof");
    println!("  size:    {} bytes", proof.serialized_size());
    println!("  verdict: {}", if verdict.is_ok() { "accept" } else { "reject" });
    verdict?;

    // Range

    let d = config.d;
    let v = value.unwrap_or_else(|| {
        let v: u64 = rng.gen();
        if d < 64 { v & ((1u64 << d) - 1) } else { v }
    });
    let gamma = Scalar::random(&mut rng);

    let mut transcript = Transcript::new(b"anyproof demo range");
    let (proof, commitment) =
        RangeProof::prove(&prover_params, &mut transcript, v, gamma, &mut rng)?;

    let mut transcript = Transcript::new(b"anyproof demo range");
    let verdict = proof.verify(&verifier_params, &mut transcript, &commitment);
    info!("range proof verified: {}", verdict.is_ok());

    println!("\nRange proof (v = {})", v);
    println!("  size:    {} bytes", proof.serialized_size());
    println!("  verdict: {}\n", if verdict.is_ok() { "accept" } else { "reject" });
    verdict
}
