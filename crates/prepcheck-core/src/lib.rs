//! prepcheck-core — Answer evaluator, scoring strategies, and batch grading.
//!
//! This crate defines the data model, the heuristic free-text answer
//! evaluator, and the batch grading machinery the rest of prepcheck builds on.

pub mod concepts;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod similarity;
pub mod statistics;
pub mod structure;
pub mod text;
pub mod traits;

pub use error::{EvalError, StoreError};
pub use evaluator::Evaluator;
