// Streaming adapter: pulls LEAF_SIZE chunks from a buffered byte source into a StateMatrix.
// End of input is reported as Completion::Done, never as an error. I/O errors pass through
// untouched (no retries, Interrupted included).

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::keccak_params::LEAF_SIZE;
use crate::packing::Commitment;
use crate::state_matrix::StateMatrix;

#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// A full, non-final leaf was absorbed and the source has more bytes.
    More,
    /// The final leaf was absorbed; the digest is available.
    Done,
}

/// One bounded slice of a larger input, as absorbed by [`StateMatrix::absorb_up_to`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(with = "hex::serde")]
    pub input: Vec<u8>,
    #[serde(with = "crate::ref_vectors::hex_commitments")]
    pub commitments: Vec<Commitment>,
    pub finalize: bool,
}

/// Fill `buf` from `source` until it is full or the source reports end of input.
fn read_leaf<R: BufRead>(source: &mut R, buf: &mut [u8; LEAF_SIZE]) -> Result<usize> {
    let mut filled = 0;
    while filled < LEAF_SIZE {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

impl StateMatrix {
    /// Absorb exactly one leaf pulled from `source`.
    ///
    /// A full leaf is final only when the source has nothing left after it, in which case the
    /// padding-only block is absorbed in the same call.
    pub fn absorb_next_leaf<R: BufRead>(&mut self, source: &mut R) -> Result<Completion> {
        self.absorb_next_leaf_with(source, |_| {})
    }

    /// [`absorb_next_leaf`](Self::absorb_next_leaf) with a per-block observer, as in
    /// [`absorb_leaf_with`](Self::absorb_leaf_with).
    pub fn absorb_next_leaf_with<R, F>(&mut self, source: &mut R, on_block: F) -> Result<Completion>
    where
        R: BufRead,
        F: FnMut(&StateMatrix),
    {
        let mut buf = [0u8; LEAF_SIZE];
        let (_, completion) = self.pull_leaf(source, &mut buf, on_block)?;
        Ok(completion)
    }

    /// Absorb leaves until `max_len` bytes were consumed or the source ran out, collecting the
    /// commitment after every absorbed block.
    ///
    /// `max_len` must be a positive multiple of `LEAF_SIZE`.
    pub fn absorb_up_to<R: BufRead>(&mut self, source: &mut R, max_len: usize) -> Result<InputData> {
        if max_len == 0 || max_len % LEAF_SIZE != 0 {
            return Err(Error::InvalidReadLimit { max_len });
        }

        let mut input = Vec::with_capacity(max_len);
        let mut commitments = Vec::new();
        let mut buf = [0u8; LEAF_SIZE];
        let mut finalize = false;
        while input.len() < max_len {
            let (read, completion) =
                self.pull_leaf(source, &mut buf, |m| commitments.push(m.state_commitment()))?;
            input.extend_from_slice(&buf[..read]);
            // a full leaf at the limit is final only if the source is empty as well
            if completion == Completion::Done {
                finalize = true;
                break;
            }
        }

        debug!(
            consumed = input.len(),
            commitments = commitments.len(),
            finalize,
            "absorbed input chunk"
        );
        Ok(InputData {
            input,
            commitments,
            finalize,
        })
    }

    /// Read one leaf into `buf`, decide finality by looking ahead, absorb it.
    /// Returns the number of leaf bytes read.
    fn pull_leaf<R, F>(
        &mut self,
        source: &mut R,
        buf: &mut [u8; LEAF_SIZE],
        on_block: F,
    ) -> Result<(usize, Completion)>
    where
        R: BufRead,
        F: FnMut(&StateMatrix),
    {
        if self.is_finalized() {
            return Err(Error::AlreadyFinalized);
        }

        let read = read_leaf(source, buf)?;
        let exhausted = read < LEAF_SIZE || source.fill_buf()?.is_empty();
        trace!(read, exhausted, "pulled leaf");

        self.absorb_leaf_with(&buf[..read], exhausted, on_block)?;
        let completion = if exhausted {
            Completion::Done
        } else {
            Completion::More
        };
        Ok((read, completion))
    }
}
