//! Account bookkeeping
//!
//! Keeps the local history of looked-up Stellar accounts.

mod history;

pub use history::*;
