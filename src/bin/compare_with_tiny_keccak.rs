// Compares this engine against tiny-keccak:
//  1) raw Keccak-f[1600] on random states
//  2) Keccak-256 digests of random inputs, absorbed leaf by leaf
// Usage: compare_with_tiny_keccak [ITERATIONS]   (default 1000)

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tiny_keccak::{Hasher, Keccak};

use keccak_matrix::keccak::keccak_f1600;
use keccak_matrix::{StateMatrix, LEAF_SIZE};

fn reference_keccak256(data: &[u8]) -> [u8; 32] {
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let iters: usize = std::env::args()
        .nth(1)
        .map(|s| s.parse().expect("ITERATIONS must be a number"))
        .unwrap_or(1000);
    let mut rng = StdRng::seed_from_u64(0x1600);

    // ============================================================
    // Keccak-f[1600]
    // ============================================================
    println!("=== Keccak-f[1600] vs tiny_keccak::keccakf ===");
    let mut fails = 0usize;
    let t0 = Instant::now();
    for _ in 0..iters {
        let mut ours: [u64; 25] = core::array::from_fn(|_| rng.gen());
        let mut theirs = ours;
        keccak_f1600(&mut ours);
        tiny_keccak::keccakf(&mut theirs);
        if ours != theirs {
            fails += 1;
        }
    }
    println!("{} states, {} mismatches ({:?})", iters, fails, t0.elapsed());

    // ============================================================
    // Keccak-256 through the state matrix
    // ============================================================
    println!("\n=== Keccak-256 (leaf absorption) vs tiny_keccak::Keccak::v256 ===");
    let mut digest_fails = 0usize;
    let t1 = Instant::now();
    for _ in 0..iters {
        let len = rng.gen_range(0..8 * LEAF_SIZE);
        let mut data = vec![0u8; len];
        rng.fill(data.as_mut_slice());

        let mut m = StateMatrix::new();
        let mut leaves = data.chunks(LEAF_SIZE).peekable();
        if leaves.peek().is_none() {
            m.absorb_leaf(&[], true).unwrap();
        }
        while let Some(leaf) = leaves.next() {
            m.absorb_leaf(leaf, leaves.peek().is_none()).unwrap();
        }

        let ours = m.hash().unwrap();
        let theirs = reference_keccak256(&data);
        if ours != theirs {
            digest_fails += 1;
            println!("FAIL: len={} ours=0x{} ref=0x{}", len, hex::encode(ours), hex::encode(theirs));
        }
    }
    println!("{} inputs, {} mismatches ({:?})", iters, digest_fails, t1.elapsed());

    if fails + digest_fails > 0 {
        std::process::exit(1);
    }
    println!("\nOK");
}
