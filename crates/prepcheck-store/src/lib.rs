//! prepcheck-store — question stores and configuration.
//!
//! Implements the `QuestionStore` trait over TOML question banks, provides a
//! mock store for tests, and loads `prepcheck.toml`.

pub mod bank;
pub mod config;
pub mod mock;

pub use bank::BankStore;
pub use config::{build_evaluator, load_config, load_config_from, open_store, PrepcheckConfig};
pub use mock::MockStore;
