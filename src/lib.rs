#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited

pub mod types;
pub mod params;
pub mod state;
pub mod code;
pub mod symmetry;
pub mod board;
pub mod moves;
pub mod persist;

pub mod solver;

// Re-exports: stable minimal API surface for external callers
pub use crate::board::terminal_result;
pub use crate::code::{decode_seq, decode_state, encode_seq, encode_state};
pub use crate::moves::{predecessors, successors};
pub use crate::params::Params;
pub use crate::persist::Record;
pub use crate::state::{Seq, State};
pub use crate::symmetry::{Canonical, Symmetry};
pub use crate::types::Side;
