//! sana-assess
//!
//! Pure assessment logic — no I/O. Free-text normalization heuristics,
//! strict validation of structured submissions, conversational answer
//! assembly, and longitudinal trend computation.

pub mod assemble;
pub mod error;
pub mod normalize;
pub mod trend;
pub mod validate;

pub use error::ValidationError;
