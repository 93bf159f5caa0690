//! Contagion Diffusion
//!
//! Rollout of a new version across a population of users linked by
//! coaching relationships.
//!
//! # Model
//!
//! A teacher and its students form a star: one hub, N leaves. The whole
//! population is a forest of disjoint stars. Updating one user of a star
//! means updating the whole star, unless the caller explicitly asks for
//! an exact headcount.
//!
//! Key pieces:
//! - Topology: the user registry (arena of users, hubs, component sizes)
//! - Propagation: breadth-first total infection from a seed
//! - Selection: 0/1 subset-sum over component sizes
//! - Coordinator: total, limited, and exact-limited infection

pub mod coordinator;
pub mod propagation;
pub mod selection;
pub mod topology;

pub use coordinator::*;
pub use propagation::*;
pub use selection::*;
pub use topology::*;
