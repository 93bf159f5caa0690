//! Oracles - slow, obviously-correct reference answers

use contagion_diffusion::UserRegistry;
use contagion_core::{ComponentId, UserId};

/// Largest subset sum of `sizes` not above `capacity`, by enumeration
///
/// Exponential; keep `sizes` short (at most ~20 items).
pub fn best_subset_sum(sizes: &[usize], capacity: usize) -> usize {
    assert!(sizes.len() < 25, "oracle input too large: {}", sizes.len());

    (0u32..1 << sizes.len())
        .map(|mask| {
            sizes
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| *s)
                .sum::<usize>()
        })
        .filter(|sum| *sum <= capacity)
        .max()
        .unwrap_or(0)
}

/// Users an exact infection of `limit` must touch, in order
pub fn exact_order(registry: &UserRegistry, limit: usize) -> Vec<UserId> {
    let mut order = Vec::new();
    for (index, &hub) in registry.hubs().iter().enumerate() {
        order.push(hub);
        order.extend(
            registry
                .users()
                .filter(|(id, user)| {
                    *id != hub && user.component() == ComponentId::from_index(index)
                })
                .map(|(id, _)| id),
        );
    }
    order.truncate(limit);
    order
}

/// Users sharing a component with `seed`, found by scanning every user
pub fn component_members(registry: &UserRegistry, seed: UserId) -> Vec<UserId> {
    let Some(component) = registry.component_of(seed) else {
        return Vec::new();
    };
    registry
        .users()
        .filter(|(_, user)| user.component() == component)
        .map(|(id, _)| id)
        .collect()
}
