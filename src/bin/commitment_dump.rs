// Prints the per-block state commitments and the Keccak-256 digest of a file (or stdin).
// Usage: commitment_dump [--json] [FILE]
//   --json  emit a reference vector {"input", "commitments", "digest"} instead of text
// Log level via RUST_LOG (e.g. RUST_LOG=keccak_matrix=trace).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use tracing_subscriber::EnvFilter;

use keccak_matrix::{Completion, ReferenceVector, StateMatrix};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut json = false;
    let mut path: Option<String> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let mut source: Box<dyn BufRead> = match &path {
        Some(p) => Box::new(BufReader::new(File::open(p).expect("open input file"))),
        None => Box::new(BufReader::new(io::stdin())),
    };

    if json {
        let mut input = Vec::new();
        source.read_to_end(&mut input).expect("read input");
        let vector = ReferenceVector::generate(input).expect("absorb input");
        println!("{}", serde_json::to_string_pretty(&vector).expect("serialize vector"));
        return;
    }

    let mut matrix = StateMatrix::new();
    let mut index = 0usize;
    println!("commitment[{}] = 0x{}", index, hex::encode(matrix.state_commitment()));
    let mut print = |m: &StateMatrix| {
        index += 1;
        println!("commitment[{}] = 0x{}", index, hex::encode(m.state_commitment()));
    };
    while matrix
        .absorb_next_leaf_with(&mut source, &mut print)
        .expect("absorb leaf")
        == Completion::More
    {}
    println!("digest        = 0x{}", hex::encode(matrix.hash().expect("finalized")));
}
