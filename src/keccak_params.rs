// Keccak-256 sponge parameters (rate 1088 / capacity 512) and the Keccak-f[1600] tables.
// Packed sizes are for 32-byte word consumers (one word per lane).

pub const STATE_LANES: usize = 25;
pub const LANE_BYTES: usize = 8;
pub const ROUNDS: usize = 24;

pub const RATE_BYTES: usize = 136; // 17 lanes
pub const RATE_LANES: usize = RATE_BYTES / LANE_BYTES;
pub const CAPACITY_BYTES: usize = STATE_LANES * LANE_BYTES - RATE_BYTES; // 64

/// Largest leaf a caller may hand to the engine. Equal to the rate.
pub const LEAF_SIZE: usize = RATE_BYTES;

/// Original Keccak domain byte (SHA3 would use 0x06).
pub const PAD_DOMAIN: u8 = 0x01;
pub const PAD_LAST: u8 = 0x80;

pub const DIGEST_BYTES: usize = 32;
pub const PACKED_WORD_BYTES: usize = 32;
pub const PACKED_STATE_BYTES: usize = STATE_LANES * PACKED_WORD_BYTES; // 800

pub const RC: [u64; ROUNDS] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808A, 0x8000000080008000,
    0x000000000000808B, 0x0000000080000001, 0x8000000080008081, 0x8000000000008009,
    0x000000000000008A, 0x0000000000000088, 0x0000000080008009, 0x000000008000000A,
    0x000000008000808B, 0x800000000000008B, 0x8000000000008089, 0x8000000000008003,
    0x8000000000008002, 0x8000000000000080, 0x000000000000800A, 0x800000008000000A,
    0x8000000080008081, 0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

// ROT[x][y] = rho offset of lane (x, y)
pub const ROT: [[u32; 5]; 5] = [
    [ 0, 36,  3, 41, 18],
    [ 1, 44, 10, 45,  2],
    [62,  6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39,  8, 14],
];
