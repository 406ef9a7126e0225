// Error taxonomy for the leaf absorption engine.
// Source exhaustion is not in here: the streaming adapter reports it as Completion::Done.

use thiserror::Error;

use crate::keccak_params::LEAF_SIZE;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "invalid leaf size {len}: leaves hold at most {max} bytes and only the final leaf may be short",
        max = LEAF_SIZE
    )]
    InvalidLeafSize { len: usize },

    #[error("state matrix already absorbed its final leaf")]
    AlreadyFinalized,

    #[error("digest requested before the final leaf was absorbed")]
    NotFinalized,

    #[error("invalid read limit {max_len}: must be a positive multiple of {leaf}", leaf = LEAF_SIZE)]
    InvalidReadLimit { max_len: usize },

    #[error("packed word {index} does not hold a zero-extended 64-bit lane")]
    InvalidPackedWord { index: usize },

    #[error("leaf source: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
