//! Contagion Test Harness - Randomized validation of the rollout engine
//!
//! This crate provides:
//! - Seeded generation of star-shaped user forests
//! - Brute-force oracles for selection and exact ordering
//! - An infection fuzzer that checks rollout invariants after every step

pub mod forest;
pub mod oracle;
pub mod fuzzer;

pub use forest::*;
pub use oracle::*;
pub use fuzzer::*;
