//! Coordinator - the three rollout operations
//!
//! - Total: update the whole component of one seed user
//! - Limited: update whole components, as close to a headcount as possible
//!   without going over
//! - Exact: update exactly N users, splitting a component if needed

use contagion_core::{
    ComponentId, ContagionResult, InfectionConfig, RegistryConfig, UserId, VersionLabel,
};
use tracing::{debug, info, warn};

use crate::{select_components, total_infection, PropagationStats, UserRegistry};

/// Outcome of a limited infection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitedOutcome {
    /// Components that were fully updated, in registration order
    pub components: Vec<ComponentId>,
    /// Combined propagation counters
    pub stats: PropagationStats,
    /// The smallest component was taken despite exceeding the limit
    pub fallback: bool,
}

impl LimitedOutcome {
    /// Number of users moved to the new version
    pub fn infected(&self) -> usize {
        self.stats.reached
    }
}

/// Rollout coordinator over a user registry
#[derive(Debug, Clone)]
pub struct Infection {
    registry: UserRegistry,
    config: InfectionConfig,
}

impl Infection {
    /// Create a coordinator with default configuration
    pub fn new(registry: UserRegistry) -> Self {
        Self::with_config(registry, InfectionConfig::default())
    }

    pub fn with_config(registry: UserRegistry, config: InfectionConfig) -> Self {
        Infection { registry, config }
    }

    /// Parse a roster and wrap the resulting registry
    pub fn from_roster(text: &str, config: &RegistryConfig) -> ContagionResult<Self> {
        Ok(Self::new(UserRegistry::from_roster(text, config)?))
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut UserRegistry {
        &mut self.registry
    }

    /// Update the whole component containing `seed`
    pub fn total_infection(
        &mut self,
        seed: Option<UserId>,
        version: &VersionLabel,
    ) -> PropagationStats {
        total_infection(&mut self.registry, seed, version)
    }

    /// Same as [`total_infection`](Self::total_infection), seeded by name
    ///
    /// Unknown names behave like an absent seed.
    pub fn total_infection_by_name(
        &mut self,
        name: &str,
        version: &VersionLabel,
    ) -> PropagationStats {
        let seed = self.registry.lookup(name);
        if seed.is_none() {
            debug!(name, "total infection seed not registered");
        }
        self.total_infection(seed, version)
    }

    /// Update whole components totalling as close to `limit` as possible
    ///
    /// Non-positive limits do nothing. If no component fits, the smallest
    /// one is still updated when it overshoots by no more than `limit`
    /// (disabled by [`InfectionConfig::strict`]).
    pub fn limited_infection(&mut self, limit: i64, version: &VersionLabel) -> LimitedOutcome {
        let mut outcome = LimitedOutcome::default();
        if limit <= 0 {
            return outcome;
        }
        let capacity = usize::try_from(limit).unwrap_or(usize::MAX);

        let selection = select_components(self.registry.component_sizes(), capacity);
        let chosen: Vec<usize> = if !selection.is_empty() {
            selection.indices
        } else {
            self.oversize_candidate(capacity).into_iter().collect()
        };
        outcome.fallback = selection.total == 0 && !chosen.is_empty();

        for index in chosen {
            let hub = self.registry.hubs()[index];
            outcome
                .stats
                .absorb(total_infection(&mut self.registry, Some(hub), version));
            outcome.components.push(ComponentId::from_index(index));
        }

        if outcome.fallback {
            warn!(
                limit,
                infected = outcome.infected(),
                "no component fits under limit, infected smallest component"
            );
        }
        info!(
            limit,
            version = %version,
            components = outcome.components.len(),
            infected = outcome.infected(),
            "limited infection complete"
        );
        outcome
    }

    /// Smallest component, if it overshoots `capacity` by at most `capacity`
    fn oversize_candidate(&self, capacity: usize) -> Option<usize> {
        if !self.config.oversize_fallback {
            return None;
        }

        let (index, &min) = self
            .registry
            .component_sizes()
            .iter()
            .enumerate()
            .min_by_key(|(_, size)| **size)?;

        (min.saturating_sub(capacity) <= capacity).then_some(index)
    }

    /// Move exactly `limit` users to `version`
    ///
    /// Components are walked in registration order, hub before leaves,
    /// so the last component touched may be only partly updated. Only
    /// versions change; visit markers are left alone.
    ///
    /// Returns `false` without touching anyone when `limit` is negative
    /// or larger than the population.
    pub fn limited_infection_exact(&mut self, limit: i64, version: &VersionLabel) -> bool {
        if limit < 0 {
            warn!(limit, "exact infection refused: negative limit");
            return false;
        }
        if limit == 0 {
            return true;
        }
        let target = match usize::try_from(limit) {
            Ok(target) if target <= self.registry.len() => target,
            _ => {
                warn!(
                    limit,
                    population = self.registry.len(),
                    "exact infection refused: limit exceeds population"
                );
                return false;
            }
        };

        let order: Vec<UserId> = (0..self.registry.component_count())
            .flat_map(|c| self.registry.members(ComponentId::from_index(c)))
            .take(target)
            .collect();

        for id in &order {
            if let Some(user) = self.registry.get_mut(*id) {
                user.set_version(version);
            }
        }

        info!(limit, version = %version, infected = order.len(), "exact infection complete");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infection(text: &str) -> Infection {
        Infection::from_roster(text, &RegistryConfig::default()).unwrap()
    }

    fn on_version(infection: &Infection, version: &str) -> Vec<String> {
        let version = VersionLabel::from(version);
        infection
            .registry()
            .users()
            .filter(|(_, u)| u.version() == &version)
            .map(|(_, u)| u.name().to_string())
            .collect()
    }

    const CLASSES: &str = "A,B,C\nD,E,F,G,H\nI,J\n";

    #[test]
    fn test_total_infection_by_name() {
        let mut inf = infection(CLASSES);
        let stats = inf.total_infection_by_name("J", &VersionLabel::from("V2"));

        assert_eq!(stats.reached, 2);
        assert_eq!(on_version(&inf, "V2"), vec!["I", "J"]);
    }

    #[test]
    fn test_total_infection_unknown_name() {
        let mut inf = infection(CLASSES);
        let stats = inf.total_infection_by_name("nobody", &VersionLabel::from("V2"));
        assert_eq!(stats.reached, 0);
        assert!(on_version(&inf, "V2").is_empty());
    }

    #[test]
    fn test_limited_picks_best_fit() {
        let mut inf = infection(CLASSES);
        let outcome = inf.limited_infection(7, &VersionLabel::from("V2"));

        assert!(!outcome.fallback);
        assert_eq!(
            outcome.components,
            vec![ComponentId::new(1), ComponentId::new(2)]
        );
        assert_eq!(outcome.infected(), 7);
        assert_eq!(
            on_version(&inf, "V2"),
            vec!["D", "E", "F", "G", "H", "I", "J"]
        );
        for name in ["A", "B", "C"] {
            let id = inf.registry().lookup(name).unwrap();
            assert!(!inf.registry().get(id).unwrap().infected());
        }
    }

    #[test]
    fn test_limited_non_positive_is_noop() {
        let mut inf = infection(CLASSES);
        assert_eq!(inf.limited_infection(0, &VersionLabel::from("V2")), LimitedOutcome::default());
        assert_eq!(inf.limited_infection(-3, &VersionLabel::from("V2")), LimitedOutcome::default());
        assert!(on_version(&inf, "V2").is_empty());
    }

    #[test]
    fn test_limited_fallback_takes_smallest() {
        // Sizes 4 and 3: nothing fits under 2, and 3 - 2 <= 2
        let mut inf = infection("A,B,C,D\nE,F,G\n");
        let outcome = inf.limited_infection(2, &VersionLabel::from("V2"));

        assert!(outcome.fallback);
        assert_eq!(outcome.components, vec![ComponentId::new(1)]);
        assert_eq!(on_version(&inf, "V2"), vec!["E", "F", "G"]);
    }

    #[test]
    fn test_limited_fallback_prefers_first_smallest() {
        let mut inf = infection("A,B,C\nD,E,F\n");
        let outcome = inf.limited_infection(2, &VersionLabel::from("V2"));
        assert_eq!(outcome.components, vec![ComponentId::new(0)]);
    }

    #[test]
    fn test_limited_fallback_too_far() {
        // Smallest is 5; 5 - 2 > 2
        let mut inf = infection("A,B,C,D,E\n");
        let outcome = inf.limited_infection(2, &VersionLabel::from("V2"));

        assert!(!outcome.fallback);
        assert!(outcome.components.is_empty());
        assert!(on_version(&inf, "V2").is_empty());
    }

    #[test]
    fn test_limited_strict_config_skips_fallback() {
        let registry = UserRegistry::from_roster("A,B,C\n", &RegistryConfig::default()).unwrap();
        let mut inf = Infection::with_config(registry, InfectionConfig::strict());
        let outcome = inf.limited_infection(2, &VersionLabel::from("V2"));

        assert!(outcome.components.is_empty());
        assert!(on_version(&inf, "V2").is_empty());
    }

    #[test]
    fn test_limited_empty_population() {
        let mut inf = Infection::new(UserRegistry::new());
        let outcome = inf.limited_infection(5, &VersionLabel::from("V2"));
        assert!(outcome.components.is_empty());
        assert!(!outcome.fallback);
    }

    #[test]
    fn test_exact_partial_component() {
        let mut inf = infection(CLASSES);
        assert!(inf.limited_infection_exact(5, &VersionLabel::from("V4")));
        assert_eq!(on_version(&inf, "V4"), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_exact_stops_on_hub() {
        let mut inf = infection(CLASSES);
        assert!(inf.limited_infection_exact(4, &VersionLabel::from("V4")));
        assert_eq!(on_version(&inf, "V4"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_exact_leaves_markers_alone() {
        let mut inf = infection(CLASSES);
        assert!(inf.limited_infection_exact(10, &VersionLabel::from("V4")));
        assert_eq!(on_version(&inf, "V4").len(), 10);
        assert!(inf.registry().users().all(|(_, u)| !u.infected()));
    }

    #[test]
    fn test_exact_failures() {
        let mut inf = infection(CLASSES);
        assert!(!inf.limited_infection_exact(-1, &VersionLabel::from("V4")));
        assert!(!inf.limited_infection_exact(11, &VersionLabel::from("V4")));
        assert!(on_version(&inf, "V4").is_empty());

        assert!(inf.limited_infection_exact(0, &VersionLabel::from("V4")));
        assert!(on_version(&inf, "V4").is_empty());
    }

    #[test]
    fn test_default_simulation_sequence() {
        let mut inf = infection(CLASSES);
        inf.total_infection_by_name("I", &VersionLabel::from("V2"));
        inf.limited_infection(10, &VersionLabel::from("V3"));
        assert!(inf.limited_infection_exact(4, &VersionLabel::from("V4")));

        assert_eq!(on_version(&inf, "V4"), vec!["A", "B", "C", "D"]);
        assert_eq!(on_version(&inf, "V3"), vec!["E", "F", "G", "H", "I", "J"]);
        assert!(on_version(&inf, "V2").is_empty());
    }
}
