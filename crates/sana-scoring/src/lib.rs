//! sana-scoring
//!
//! Gateway to the external scoring engine. One subprocess launch per call,
//! bounded by a kill-on-timeout deadline, with every failure mode absorbed
//! into a documented neutral fallback response.

pub mod error;
pub mod gateway;

pub use error::ScoringEngineFailure;
pub use gateway::{GatewayConfig, ScoringGateway, write_answers_file};
