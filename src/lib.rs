//! donegate library.
//!
//! Completion quality gate for AI coding tools: blocks "all done"
//! announcements while the working tree still has type, syntax, lint or
//! config errors.

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod hook;
pub mod patterns;
pub mod storage;

pub use error::Error;
pub use gate::{Category, Decision, Gate, Invocation, Issue};
