// State packing for 32-byte word consumers, and the state commitment built on it.
// Word i = lane i zero-extended to 32 bytes, big-endian. This is NOT the sponge byte order
// (absorb/squeeze are little-endian per lane).

use tiny_keccak::{Hasher, Keccak};

use crate::error::{Error, Result};
use crate::keccak::Lanes;
use crate::keccak_params::{DIGEST_BYTES, LANE_BYTES, PACKED_STATE_BYTES, PACKED_WORD_BYTES, STATE_LANES};

pub type Commitment = [u8; DIGEST_BYTES];

const LANE_OFFSET: usize = PACKED_WORD_BYTES - LANE_BYTES;

/// Copy of the 25 lanes at some point of the absorption, indexed `x + 5*y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StateSnapshot(pub Lanes);

impl StateSnapshot {
    pub fn lanes(&self) -> &Lanes {
        &self.0
    }

    pub fn pack(&self) -> [u8; PACKED_STATE_BYTES] {
        let mut out = [0u8; PACKED_STATE_BYTES];
        for (word, lane) in out.chunks_exact_mut(PACKED_WORD_BYTES).zip(self.0.iter()) {
            word[LANE_OFFSET..].copy_from_slice(&lane.to_be_bytes());
        }
        out
    }

    /// Inverse of [`StateSnapshot::pack`]. Every word must carry zeros above its low 8 bytes.
    pub fn unpack(packed: &[u8; PACKED_STATE_BYTES]) -> Result<Self> {
        let mut lanes = [0u64; STATE_LANES];
        for (index, word) in packed.chunks_exact(PACKED_WORD_BYTES).enumerate() {
            let (high, low) = word.split_at(LANE_OFFSET);
            if high.iter().any(|&b| b != 0) {
                return Err(Error::InvalidPackedWord { index });
            }
            let mut lane = [0u8; LANE_BYTES];
            lane.copy_from_slice(low);
            lanes[index] = u64::from_be_bytes(lane);
        }
        Ok(Self(lanes))
    }

    pub fn commitment(&self) -> Commitment {
        keccak256_public(&self.pack())
    }
}

impl From<Lanes> for StateSnapshot {
    fn from(lanes: Lanes) -> Self {
        Self(lanes)
    }
}

// Public Keccak-256 (tiny-keccak), independent of the sponge in this crate.
fn keccak256_public(data: &[u8]) -> Commitment {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; DIGEST_BYTES];
    hasher.finalize(&mut out);
    out
}
