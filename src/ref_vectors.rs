// Conformance vectors: an input, its full commitment sequence and its Keccak-256 digest.
// JSON layout: {"input": "<hex>", "commitments": ["<hex32>", ...], "digest": "<hex32>"}

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keccak_params::{DIGEST_BYTES, LEAF_SIZE};
use crate::leaf_stream::Completion;
use crate::packing::Commitment;
use crate::state_matrix::StateMatrix;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceVector {
    #[serde(with = "hex::serde")]
    pub input: Vec<u8>,
    #[serde(with = "hex_commitments")]
    pub commitments: Vec<Commitment>,
    #[serde(with = "hex::serde")]
    pub digest: [u8; DIGEST_BYTES],
}

#[derive(Debug, thiserror::Error)]
pub enum VectorMismatch {
    #[error("expected {expected} commitments, derived {actual}")]
    Length { expected: usize, actual: usize },

    #[error("commitment {index} differs: expected {expected}, derived {actual}")]
    Commitment {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("digest differs: expected {expected}, derived {actual}")]
    Digest { expected: String, actual: String },

    #[error(transparent)]
    Engine(#[from] Error),
}

impl ReferenceVector {
    /// Derive the vector by absorbing `input` leaf by leaf.
    pub fn generate(input: Vec<u8>) -> Result<Self, Error> {
        let mut matrix = StateMatrix::new();
        let mut commitments = vec![matrix.state_commitment()];
        let mut log = |m: &StateMatrix| commitments.push(m.state_commitment());
        if input.is_empty() {
            matrix.absorb_leaf_with(&[], true, &mut log)?;
        }
        let leaves = input.len().div_ceil(LEAF_SIZE);
        for (i, leaf) in input.chunks(LEAF_SIZE).enumerate() {
            matrix.absorb_leaf_with(leaf, i + 1 == leaves, &mut log)?;
        }
        Ok(Self {
            commitments,
            digest: matrix.hash()?,
            input,
        })
    }

    /// Re-derive the commitment sequence and digest through the streaming adapter and compare.
    pub fn check(&self) -> Result<(), VectorMismatch> {
        let mut matrix = StateMatrix::new();
        let mut actual = vec![matrix.state_commitment()];
        let mut source = Cursor::new(&self.input);
        while matrix.absorb_next_leaf_with(&mut source, |m| actual.push(m.state_commitment()))?
            == Completion::More
        {}

        if actual.len() != self.commitments.len() {
            return Err(VectorMismatch::Length {
                expected: self.commitments.len(),
                actual: actual.len(),
            });
        }
        if let Some((index, (e, a))) = self
            .commitments
            .iter()
            .zip(&actual)
            .enumerate()
            .find(|(_, (e, a))| e != a)
        {
            return Err(VectorMismatch::Commitment {
                index,
                expected: hex::encode(e),
                actual: hex::encode(a),
            });
        }

        let digest = matrix.hash()?;
        if digest != self.digest {
            return Err(VectorMismatch::Digest {
                expected: hex::encode(self.digest),
                actual: hex::encode(digest),
            });
        }
        Ok(())
    }
}

/// serde helper: a list of 32-byte values as hex strings.
pub mod hex_commitments {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::packing::Commitment;

    pub fn serialize<S: Serializer>(values: &[Commitment], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Commitment>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| {
                let mut out = [0u8; 32];
                hex::decode_to_slice(s.trim_start_matches("0x"), &mut out).map_err(D::Error::custom)?;
                Ok(out)
            })
            .collect()
    }
}
