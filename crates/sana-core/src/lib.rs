//! sana-core
//!
//! Pure domain types and the positional answer contract.
//! No I/O — this is the shared vocabulary of the Sana system.

pub mod contract;
pub mod models;
