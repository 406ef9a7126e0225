// Keccak-256 state matrix with leaf absorption.
//
// The matrix owns the 25 lanes (rate = first 17, capacity = last 8) and nothing else on top of a
// block counter and the finalized flag. `absorb_block` is the only place the permutation runs;
// leaves and padding sit on top of it. Commitments are computed on demand: a caller that wants one
// after every block passes an observer to `absorb_leaf_with` and calls `state_commitment` there.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::keccak::{keccak_f1600, Lanes};
use crate::keccak_pad::{full_block, pad_final_leaf, padded_block, Block};
use crate::keccak_params::{
    DIGEST_BYTES, LANE_BYTES, LEAF_SIZE, PACKED_STATE_BYTES, RATE_BYTES, RATE_LANES,
};
use crate::packing::{Commitment, StateSnapshot};

#[derive(Clone, Debug)]
pub struct StateMatrix {
    lanes: Lanes,
    finalized: bool,
    blocks: u64,
}

impl Default for StateMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMatrix {
    pub fn new() -> Self {
        Self::from_snapshot(StateSnapshot::default())
    }

    /// Resume absorption from an arbitrary intermediate state.
    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            lanes: snapshot.0,
            finalized: false,
            blocks: 0,
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot(self.lanes)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Blocks permuted by this matrix (not counting any history behind a resumed snapshot).
    pub fn blocks_absorbed(&self) -> u64 {
        self.blocks
    }

    // ------------------------------------------------------------------------
    // Sponge primitives
    // ------------------------------------------------------------------------

    /// XOR one rate-sized block into lanes 0..17 (little-endian) and permute.
    pub fn absorb_block(&mut self, block: &Block) {
        for (lane, bytes) in self.lanes[..RATE_LANES]
            .iter_mut()
            .zip(block.chunks_exact(LANE_BYTES))
        {
            let mut le = [0u8; LANE_BYTES];
            le.copy_from_slice(bytes);
            *lane ^= u64::from_le_bytes(le);
        }
        keccak_f1600(&mut self.lanes);
        self.blocks += 1;
        trace!(block = self.blocks, "absorbed block");
    }

    /// First 32 bytes of the state, lanes (0,0)..(3,0) little-endian. Does not permute.
    pub fn squeeze_32(&self) -> [u8; DIGEST_BYTES] {
        let mut out = [0u8; DIGEST_BYTES];
        for (chunk, lane) in out.chunks_exact_mut(LANE_BYTES).zip(self.lanes.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    // ------------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------------

    /// Absorb one leaf. Non-final leaves must be exactly `LEAF_SIZE` bytes; the final leaf may be
    /// anything from 0 to `LEAF_SIZE` bytes and is padded here.
    pub fn absorb_leaf(&mut self, data: &[u8], is_final: bool) -> Result<()> {
        self.absorb_leaf_with(data, is_final, |_| {})
    }

    /// Same as [`absorb_leaf`](Self::absorb_leaf), calling `on_block` with the post-permutation
    /// state after every absorbed block. An exact-rate final leaf calls it twice.
    pub fn absorb_leaf_with<F>(&mut self, data: &[u8], is_final: bool, mut on_block: F) -> Result<()>
    where
        F: FnMut(&StateMatrix),
    {
        if self.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if !is_final {
            let block = full_block(data)?;
            self.absorb_block(&block);
            on_block(self);
            return Ok(());
        }

        let padded = pad_final_leaf(data)?;
        for block in padded.iter() {
            self.absorb_block(block);
            on_block(self);
        }
        self.finalized = true;
        debug!(
            blocks = self.blocks,
            final_leaf_len = data.len(),
            padding_blocks = padded.block_count(),
            "state matrix finalized"
        );
        Ok(())
    }

    /// Keccak-256 digest of everything absorbed. Only available after the final leaf.
    pub fn hash(&self) -> Result<[u8; DIGEST_BYTES]> {
        if !self.finalized {
            return Err(Error::NotFinalized);
        }
        Ok(self.squeeze_32())
    }

    // ------------------------------------------------------------------------
    // Commitments
    // ------------------------------------------------------------------------

    pub fn pack_state(&self) -> [u8; PACKED_STATE_BYTES] {
        self.snapshot().pack()
    }

    pub fn state_commitment(&self) -> Commitment {
        self.snapshot().commitment()
    }
}

/// One-shot Keccak-256 through the state matrix.
pub fn keccak256(data: &[u8]) -> [u8; DIGEST_BYTES] {
    let mut matrix = StateMatrix::new();
    let mut leaves = data.chunks_exact(LEAF_SIZE);
    for leaf in leaves.by_ref() {
        let mut block = [0u8; RATE_BYTES];
        block.copy_from_slice(leaf);
        matrix.absorb_block(&block);
    }
    matrix.absorb_block(&padded_block(leaves.remainder()));
    matrix.squeeze_32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_case::test_case;
    use tiny_keccak::{Hasher, Keccak};

    fn reference_keccak256(data: &[u8]) -> [u8; 32] {
        let mut k = Keccak::v256();
        k.update(data);
        let mut out = [0u8; 32];
        k.finalize(&mut out);
        out
    }

    fn input(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 + 7) as u8).collect()
    }

    /// Leaf-chunk `data` the way a caller would: full leaves, last one final.
    fn absorb_chunked(data: &[u8]) -> StateMatrix {
        absorb_chunked_logged(data).0
    }

    /// Same, collecting the commitment of the starting state and of every block after it.
    fn absorb_chunked_logged(data: &[u8]) -> (StateMatrix, Vec<Commitment>) {
        let mut m = StateMatrix::new();
        let mut log = vec![m.state_commitment()];
        if data.is_empty() {
            m.absorb_leaf_with(&[], true, |s| log.push(s.state_commitment())).unwrap();
            return (m, log);
        }
        let mut start = 0;
        while start < data.len() {
            let end = (start + LEAF_SIZE).min(data.len());
            m.absorb_leaf_with(&data[start..end], end == data.len(), |s| {
                log.push(s.state_commitment())
            })
            .unwrap();
            start = end;
        }
        (m, log)
    }

    /// Independent commitment sequence built on tiny-keccak's permutation.
    fn reference_commitments(data: &[u8]) -> Vec<Commitment> {
        let mut padded = data.to_vec();
        padded.push(0x01);
        padded.resize(padded.len().div_ceil(LEAF_SIZE) * LEAF_SIZE, 0);
        *padded.last_mut().unwrap() |= 0x80;

        let mut st = [0u64; 25];
        let mut out = vec![StateSnapshot(st).commitment()];
        for block in padded.chunks_exact(LEAF_SIZE) {
            for (i, lane) in block.chunks_exact(8).enumerate() {
                st[i] ^= u64::from_le_bytes(lane.try_into().unwrap());
            }
            tiny_keccak::keccakf(&mut st);
            out.push(StateSnapshot(st).commitment());
        }
        out
    }

    #[test_case(0 ; "empty")]
    #[test_case(1 ; "one byte")]
    #[test_case(135 ; "rate minus one")]
    #[test_case(136 ; "exact rate")]
    #[test_case(137 ; "rate plus one")]
    #[test_case(272 ; "two leaves exact")]
    #[test_case(300 ; "remainder")]
    #[test_case(1000 ; "many leaves")]
    fn digest_matches_public_keccak(len: usize) {
        let data = input(len);
        let m = absorb_chunked(&data);
        assert_eq!(m.hash().unwrap(), reference_keccak256(&data));
        assert_eq!(keccak256(&data), reference_keccak256(&data));
    }

    #[test_case(0 ; "empty")]
    #[test_case(100 ; "short")]
    #[test_case(136 ; "exact rate")]
    #[test_case(408 ; "three leaves exact")]
    #[test_case(409 ; "three leaves plus one")]
    fn commitment_log_matches_reference(len: usize) {
        let data = input(len);
        let (m, log) = absorb_chunked_logged(&data);
        assert_eq!(log.len(), len / LEAF_SIZE + 2);
        assert_eq!(log, reference_commitments(&data));
        assert_eq!(log[0], StateMatrix::new().state_commitment());
        assert_eq!(*log.last().unwrap(), m.state_commitment());
    }

    #[test]
    fn empty_input_produces_two_commitments() {
        let (m, log) = absorb_chunked_logged(&[]);
        assert_eq!(m.blocks_absorbed(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(
            hex::encode(m.hash().unwrap()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn abc() {
        let mut m = StateMatrix::new();
        m.absorb_leaf(b"abc", true).unwrap();
        assert_eq!(
            hex::encode(m.hash().unwrap()),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn full_final_leaf_absorbs_two_blocks() {
        let mut m = StateMatrix::new();
        let mut seen = Vec::new();
        m.absorb_leaf_with(&[0xEE; LEAF_SIZE], true, |s| seen.push(s.blocks_absorbed()))
            .unwrap();
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(m.blocks_absorbed(), 2);
        assert_eq!(m.hash().unwrap(), reference_keccak256(&[0xEE; LEAF_SIZE]));
    }

    #[test]
    fn absorb_block_leaves_capacity_to_the_permutation() {
        let mut m = StateMatrix::new();
        let block = [0xFFu8; LEAF_SIZE];
        m.absorb_block(&block);

        let mut expected = [0u64; 25];
        expected[..RATE_LANES].fill(u64::MAX);
        tiny_keccak::keccakf(&mut expected);
        assert_eq!(m.snapshot().lanes(), &expected);
    }

    #[test]
    fn squeeze_does_not_permute() {
        let m = StateMatrix::from_snapshot(StateSnapshot(core::array::from_fn(|i| i as u64)));
        let out = m.squeeze_32();
        assert_eq!(&out[..8], &0u64.to_le_bytes());
        assert_eq!(&out[24..], &3u64.to_le_bytes());
        assert_eq!(m.squeeze_32(), out);
    }

    #[test]
    fn state_commitment_is_pure() {
        let mut m = StateMatrix::new();
        m.absorb_leaf(&[3u8; LEAF_SIZE], false).unwrap();
        assert_eq!(m.state_commitment(), m.state_commitment());
        assert_eq!(m.pack_state(), m.pack_state());
    }

    #[test]
    fn absorbing_after_final_is_rejected() {
        let mut m = StateMatrix::new();
        m.absorb_leaf(b"done", true).unwrap();
        let before = m.snapshot();
        let mut calls = 0;
        assert!(matches!(
            m.absorb_leaf_with(&[], true, |_| calls += 1),
            Err(Error::AlreadyFinalized)
        ));
        assert!(matches!(
            m.absorb_leaf(&[0u8; LEAF_SIZE], false),
            Err(Error::AlreadyFinalized)
        ));
        assert_eq!(calls, 0);
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn leaf_size_violations() {
        let mut m = StateMatrix::new();
        assert!(matches!(
            m.absorb_leaf(&[0u8; LEAF_SIZE + 1], true),
            Err(Error::InvalidLeafSize { len }) if len == LEAF_SIZE + 1
        ));
        assert!(matches!(
            m.absorb_leaf(&[0u8; 10], false),
            Err(Error::InvalidLeafSize { len: 10 })
        ));
        // rejected leaves leave the matrix untouched
        assert_eq!(m.blocks_absorbed(), 0);
        assert!(!m.is_finalized());
    }

    #[test]
    fn hash_before_final_is_rejected() {
        let mut m = StateMatrix::new();
        assert!(matches!(m.hash(), Err(Error::NotFinalized)));
        m.absorb_leaf(&[1u8; LEAF_SIZE], false).unwrap();
        assert!(matches!(m.hash(), Err(Error::NotFinalized)));
    }

    #[test]
    fn resumed_snapshot_continues_the_same_sponge() {
        let data = input(3 * LEAF_SIZE + 17);
        let (whole, whole_log) = absorb_chunked_logged(&data);

        let mut first = StateMatrix::new();
        first.absorb_leaf(&data[..LEAF_SIZE], false).unwrap();
        let mut resumed = StateMatrix::from_snapshot(first.snapshot());
        let mut log = vec![resumed.state_commitment()];
        assert_eq!(log[0], whole_log[1]);

        for (leaf, is_final) in [
            (&data[LEAF_SIZE..2 * LEAF_SIZE], false),
            (&data[2 * LEAF_SIZE..3 * LEAF_SIZE], false),
            (&data[3 * LEAF_SIZE..], true),
        ] {
            resumed
                .absorb_leaf_with(leaf, is_final, |s| log.push(s.state_commitment()))
                .unwrap();
        }
        assert_eq!(resumed.hash().unwrap(), whole.hash().unwrap());
        assert_eq!(log, &whole_log[1..]);
    }

    #[test]
    fn random_inputs_match_public_keccak() {
        let mut rng = XorShiftRng::seed_from_u64(136);
        for _ in 0..200 {
            let len = rng.gen_range(0..6 * LEAF_SIZE);
            let mut data = vec![0u8; len];
            rng.fill(data.as_mut_slice());
            let (m, log) = absorb_chunked_logged(&data);
            assert_eq!(m.hash().unwrap(), reference_keccak256(&data));
            assert_eq!(log.len(), len / LEAF_SIZE + 2);
        }
    }

    #[test]
    fn matrix_holds_only_its_fixed_size_state() {
        // lanes, block counter and the finalized flag; no per-block history
        assert!(std::mem::size_of::<StateMatrix>() <= std::mem::size_of::<Lanes>() + 16);

        let data = input(64 * LEAF_SIZE + 5);
        let m = absorb_chunked(&data);
        assert_eq!(m.blocks_absorbed(), 65);
        assert_eq!(m.hash().unwrap(), reference_keccak256(&data));
        assert_eq!(keccak256(&data), reference_keccak256(&data));
    }

    #[test]
    fn observer_runs_once_per_block_and_only_when_asked() {
        let mut m = StateMatrix::new();
        let mut after = Vec::new();
        m.absorb_leaf_with(&[9u8; LEAF_SIZE], false, |s| after.push(s.snapshot()))
            .unwrap();
        m.absorb_leaf(&[8u8; LEAF_SIZE], false).unwrap();
        m.absorb_leaf_with(b"end", true, |s| after.push(s.snapshot()))
            .unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(*after.last().unwrap(), m.snapshot());
        assert_eq!(m.blocks_absorbed(), 3);
    }

    #[test]
    fn independent_matrices_can_hash_on_separate_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateMatrix>();

        let handles: Vec<_> = (0..4usize)
            .map(|t| std::thread::spawn(move || absorb_chunked(&input(t * 200)).hash().unwrap()))
            .collect();
        for (t, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), reference_keccak256(&input(t * 200)));
        }
    }
}
