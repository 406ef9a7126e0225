// Keccak-f[1600] permutation (24 rounds) over 25 lanes indexed x + 5*y.
// Each step is exported on its own so a verifier can replay a single round.

use crate::keccak_params::{RC, ROT, STATE_LANES};

pub type Lanes = [u64; STATE_LANES];

#[inline(always)]
fn rol(x: u64, n: u32) -> u64 {
    x.rotate_left(n)
}

#[inline(always)]
fn idx(x: usize, y: usize) -> usize {
    x + 5 * y
}

/// θ: XOR every lane with the parities of the two neighbouring columns.
pub fn theta(state: &mut Lanes) {
    let mut c = [0u64; 5];
    for x in 0..5 {
        c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
    }
    let mut d = [0u64; 5];
    for x in 0..5 {
        d[x] = c[(x + 4) % 5] ^ rol(c[(x + 1) % 5], 1);
    }
    for y in 0..5 {
        for x in 0..5 {
            state[idx(x, y)] ^= d[x];
        }
    }
}

/// ρ and π fused: rotate lane (x, y) by ROT[x][y] and move it to (y, 2x + 3y).
pub fn rho_pi(state: &mut Lanes) {
    let mut b = [0u64; STATE_LANES];
    for y in 0..5 {
        for x in 0..5 {
            b[idx(y, (2 * x + 3 * y) % 5)] = rol(state[idx(x, y)], ROT[x][y]);
        }
    }
    *state = b;
}

/// χ: the only non-linear step, row-wise.
pub fn chi(state: &mut Lanes) {
    for y in 0..5 {
        let row = [
            state[idx(0, y)],
            state[idx(1, y)],
            state[idx(2, y)],
            state[idx(3, y)],
            state[idx(4, y)],
        ];
        for x in 0..5 {
            state[idx(x, y)] = row[x] ^ ((!row[(x + 1) % 5]) & row[(x + 2) % 5]);
        }
    }
}

#[inline(always)]
pub fn iota(state: &mut Lanes, round: usize) {
    state[0] ^= RC[round];
}

pub fn keccak_round(state: &mut Lanes, round: usize) {
    theta(state);
    rho_pi(state);
    chi(state);
    iota(state, round);
}

pub fn keccak_f1600(state: &mut Lanes) {
    for round in 0..RC.len() {
        keccak_round(state, round);
    }
}
