//! Propagation - total infection of a connected component
//!
//! Breadth-first spread of a version from a seed user. The visit marker
//! is the user's `infected` flag: whatever value the seed holds when the
//! run starts is treated as "not yet touched", and every visited user has
//! its flag flipped. Components are disjoint, so a run only ever sees
//! users that share the seed's polarity.
//!
//! Running the same seed twice flips the flags back; the versions are the
//! same either way. The flag's parity counts runs, not whether a user is
//! on a new version.

use std::collections::VecDeque;

use contagion_core::{UserId, VersionLabel};
use tracing::debug;

use crate::UserRegistry;

/// Outcome of a single propagation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Users that received the version (seed included)
    pub reached: usize,
    /// Neighbor links inspected during the traversal
    pub links_scanned: usize,
}

impl PropagationStats {
    /// Fold another run into this one
    pub fn absorb(&mut self, other: PropagationStats) {
        self.reached += other.reached;
        self.links_scanned += other.links_scanned;
    }
}

/// Spread `version` to every user reachable from `seed`
///
/// An absent or unknown seed is a no-op.
pub fn total_infection(
    registry: &mut UserRegistry,
    seed: Option<UserId>,
    version: &VersionLabel,
) -> PropagationStats {
    let mut stats = PropagationStats::default();

    let Some(seed) = seed else {
        return stats;
    };
    let Some(patient_zero) = registry.get_mut(seed) else {
        return stats;
    };

    let untouched = patient_zero.infected();
    patient_zero.flip_infected();
    patient_zero.set_version(version);
    stats.reached = 1;

    let mut queue = VecDeque::new();
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        for k in 0..registry.neighbors(current).len() {
            let neighbor = registry.neighbors(current)[k];
            stats.links_scanned += 1;
            let Some(user) = registry.get_mut(neighbor) else {
                continue;
            };
            if user.infected() == untouched {
                user.flip_infected();
                user.set_version(version);
                stats.reached += 1;
                queue.push_back(neighbor);
            }
        }
    }

    debug!(
        seed = %seed,
        version = %version,
        reached = stats.reached,
        "total infection complete"
    );
    stats
}
