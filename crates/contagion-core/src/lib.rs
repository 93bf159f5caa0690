//! Contagion Core - Fundamental types
//!
//! This crate defines the types shared by the rollout engine:
//! - Identifiers (UserId)
//! - Version labels
//! - Construction input (component descriptions) and roster parsing
//! - Error taxonomy and configuration

pub mod id;
pub mod version;
pub mod roster;
pub mod config;
pub mod error;

pub use id::*;
pub use version::*;
pub use roster::*;
pub use config::*;
pub use error::*;
