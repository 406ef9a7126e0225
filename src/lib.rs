pub mod keccak_params;
pub mod keccak;
pub mod keccak_pad;

pub mod error;
pub mod packing;
pub mod state_matrix;
pub mod leaf_stream;
pub mod ref_vectors;

pub use error::{Error, Result};
pub use keccak_params::LEAF_SIZE;
pub use leaf_stream::{Completion, InputData};
pub use packing::{Commitment, StateSnapshot};
pub use ref_vectors::{ReferenceVector, VectorMismatch};
pub use state_matrix::{keccak256, StateMatrix};
