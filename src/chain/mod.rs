//! Chain module - the atom chain state and its Metropolis mutation engine.

mod delta;
mod mutation;
mod params;
mod state;

pub use mutation::{acceptance_probability, metropolis_accept, MoveRecord, TrialMove, MAX_LOG_ACCEPTANCE};
pub use params::ChainParams;
pub use state::{AtomChain, ChainInit, ChainSnapshot};
