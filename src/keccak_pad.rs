// Original Keccak pad10*1 applied to the final leaf.
// A final leaf that fills the rate keeps its block untouched and gets a second, padding-only block.

use crate::error::{Error, Result};
use crate::keccak_params::{LEAF_SIZE, PAD_DOMAIN, PAD_LAST, RATE_BYTES};

pub type Block = [u8; RATE_BYTES];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaddedLeaf {
    Single(Block),
    /// Unmodified data block followed by the padding-only block.
    Double(Block, Block),
}

impl PaddedLeaf {
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        let (first, second) = match self {
            PaddedLeaf::Single(a) => (a, None),
            PaddedLeaf::Double(a, b) => (a, Some(b)),
        };
        core::iter::once(first).chain(second)
    }

    pub fn block_count(&self) -> usize {
        match self {
            PaddedLeaf::Single(_) => 1,
            PaddedLeaf::Double(..) => 2,
        }
    }
}

/// Block holding `data` followed by pad10*1. `data` must be shorter than the rate.
#[inline(always)]
pub(crate) fn padded_block(data: &[u8]) -> Block {
    debug_assert!(data.len() < RATE_BYTES);
    let mut block = [0u8; RATE_BYTES];
    block[..data.len()].copy_from_slice(data);
    // when data.len() == 135 both markers share the last byte (0x81)
    block[data.len()] ^= PAD_DOMAIN;
    block[RATE_BYTES - 1] ^= PAD_LAST;
    block
}

pub fn pad_final_leaf(data: &[u8]) -> Result<PaddedLeaf> {
    match data.len() {
        len if len > LEAF_SIZE => Err(Error::InvalidLeafSize { len }),
        LEAF_SIZE => {
            let mut full = [0u8; RATE_BYTES];
            full.copy_from_slice(data);
            Ok(PaddedLeaf::Double(full, padded_block(&[])))
        }
        _ => Ok(PaddedLeaf::Single(padded_block(data))),
    }
}

/// A non-final leaf must fill the rate exactly.
pub fn full_block(data: &[u8]) -> Result<Block> {
    data.try_into()
        .map_err(|_| Error::InvalidLeafSize { len: data.len() })
}
