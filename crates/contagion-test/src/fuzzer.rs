//! Infection Fuzzer - randomized rollout sequences with invariant checks
//!
//! Tests:
//! - Total infection reaches exactly the seed's component
//! - Limited infection is optimal and never overshoots without the fallback
//! - Exact infection hits the requested count in registration order
//! - Exact infection leaves visit markers alone
//! - Refused requests leave the population untouched

use std::collections::HashSet;

use contagion_core::{ComponentId, ContagionResult, UserId, VersionLabel};
use contagion_diffusion::{Infection, UserRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{best_subset_sum, component_members, exact_order, ForestConfig, ForestGenerator};

/// Largest component count for which the brute-force oracle is consulted
const ORACLE_MAX_COMPONENTS: usize = 16;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Population shape
    pub forest: ForestConfig,
    /// Number of operations to run
    pub operations: usize,
    /// Probability that a total infection gets an absent seed
    pub absent_seed_prob: f64,
    /// Random seed for the operation stream
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            forest: ForestConfig::default(),
            operations: 200,
            absent_seed_prob: 0.1,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            forest: ForestConfig::small(),
            operations: 50,
            absent_seed_prob: 0.1,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            forest: ForestConfig::medium(),
            operations: 2000,
            absent_seed_prob: 0.05,
            seed: 42,
        }
    }
}

/// One generated operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FuzzOp {
    Total { seed: Option<UserId> },
    Limited { limit: i64 },
    Exact { limit: i64 },
}

/// Fuzzing run summary
#[derive(Debug, Default)]
pub struct FuzzResult {
    pub total_runs: u64,
    pub limited_runs: u64,
    pub exact_runs: u64,
    pub fallbacks: u64,
    pub refused: u64,
    pub violations: Vec<String>,
}

impl FuzzResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn operations(&self) -> u64 {
        self.total_runs + self.limited_runs + self.exact_runs
    }
}

/// Per-user state captured before an operation
type Snapshot = Vec<(VersionLabel, bool)>;

fn snapshot(registry: &UserRegistry) -> Snapshot {
    registry
        .users()
        .map(|(_, u)| (u.version().clone(), u.infected()))
        .collect()
}

/// Infection fuzzer
pub struct InfectionFuzzer {
    config: FuzzerConfig,
    infection: Infection,
    rng: StdRng,
    step: u64,
}

impl InfectionFuzzer {
    /// Create a new fuzzer with a generated population
    pub fn new(config: FuzzerConfig) -> ContagionResult<Self> {
        let registry = ForestGenerator::new(config.forest.clone()).registry()?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a fuzzer over an existing population
    pub fn with_registry(config: FuzzerConfig, registry: UserRegistry) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        InfectionFuzzer {
            config,
            infection: Infection::new(registry),
            rng,
            step: 0,
        }
    }

    pub fn registry(&self) -> &UserRegistry {
        self.infection.registry()
    }

    /// Put the population back on the initial version and replay from `seed`
    ///
    /// The population itself is kept, so several operation streams can be
    /// checked against one forest without rebuilding it.
    pub fn restart(&mut self, seed: u64) {
        self.infection
            .registry_mut()
            .reset(&VersionLabel::initial());
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.step = 0;
    }

    fn generate_op(&mut self) -> FuzzOp {
        let population = self.registry().len() as i64;
        match self.rng.gen_range(0..3) {
            0 => {
                let seed = if population == 0 || self.rng.gen_bool(self.config.absent_seed_prob)
                {
                    None
                } else {
                    Some(UserId::from_index(self.rng.gen_range(0..population as usize)))
                };
                FuzzOp::Total { seed }
            }
            1 => FuzzOp::Limited {
                limit: self.rng.gen_range(-2..=population + 3),
            },
            _ => FuzzOp::Exact {
                limit: self.rng.gen_range(-2..=population + 2),
            },
        }
    }

    /// Run the configured number of random operations
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::default();
        if self.registry().is_empty() {
            result
                .violations
                .push("empty population: nothing to exercise".to_string());
            return result;
        }

        for _ in 0..self.config.operations {
            let op = self.generate_op();
            self.apply(op, &mut result);
        }
        debug!(
            operations = result.operations(),
            violations = result.violations.len(),
            "fuzz run complete"
        );
        result
    }

    /// Apply one operation and check its invariants
    pub fn apply(&mut self, op: FuzzOp, result: &mut FuzzResult) {
        self.step += 1;
        // A fresh label per step makes every change attributable
        let version = VersionLabel::from(format!("F{}", self.step));
        let before = snapshot(self.registry());

        match op {
            FuzzOp::Total { seed } => {
                result.total_runs += 1;
                let stats = self.infection.total_infection(seed, &version);
                self.check_total(seed, &version, stats.reached, &before, result);
            }
            FuzzOp::Limited { limit } => {
                result.limited_runs += 1;
                let outcome = self.infection.limited_infection(limit, &version);
                if outcome.fallback {
                    result.fallbacks += 1;
                }
                self.check_limited(
                    limit,
                    &version,
                    &outcome.components,
                    outcome.fallback,
                    &before,
                    result,
                );
            }
            FuzzOp::Exact { limit } => {
                result.exact_runs += 1;
                let ok = self.infection.limited_infection_exact(limit, &version);
                if !ok {
                    result.refused += 1;
                }
                self.check_exact(limit, ok, &version, &before, result);
            }
        }
    }

    fn check_total(
        &self,
        seed: Option<UserId>,
        version: &VersionLabel,
        reached: usize,
        before: &Snapshot,
        result: &mut FuzzResult,
    ) {
        let registry = self.registry();
        let members = seed
            .map(|s| component_members(registry, s))
            .unwrap_or_default();

        if reached != members.len() {
            result.violations.push(format!(
                "step {}: total infection reached {} of {} members",
                self.step,
                reached,
                members.len()
            ));
        }

        for (id, user) in registry.users() {
            let (old_version, old_flag) = &before[id.index()];
            let inside = members.contains(&id);
            let ok = if inside {
                user.version() == version && user.infected() != *old_flag
            } else {
                user.version() == old_version && user.infected() == *old_flag
            };
            if !ok {
                result.violations.push(format!(
                    "step {}: total infection mishandled {} (inside={})",
                    self.step,
                    user.name(),
                    inside
                ));
            }
        }
    }

    fn check_limited(
        &self,
        limit: i64,
        version: &VersionLabel,
        components: &[ComponentId],
        fallback: bool,
        before: &Snapshot,
        result: &mut FuzzResult,
    ) {
        let registry = self.registry();
        let sizes = registry.component_sizes();
        let infected = registry.count_on_version(version);

        let chosen_total: usize = components.iter().map(|c| sizes[c.index()]).sum();
        if infected != chosen_total {
            result.violations.push(format!(
                "step {}: limited infection moved {} users, components hold {}",
                self.step, infected, chosen_total
            ));
        }

        if limit <= 0 {
            if infected != 0 {
                result.violations.push(format!(
                    "step {}: non-positive limit infected users",
                    self.step
                ));
            }
            return;
        }

        let cap = limit as usize;
        if fallback {
            let min = sizes.iter().copied().min().unwrap_or(0);
            if infected != min || min <= cap || min > 2 * cap {
                result.violations.push(format!(
                    "step {}: bad fallback (limit {}, infected {}, smallest {})",
                    self.step, limit, infected, min
                ));
            }
        } else {
            if infected > cap {
                result.violations.push(format!(
                    "step {}: limited infection overshot {} with {}",
                    self.step, limit, infected
                ));
            }
            if sizes.len() <= ORACLE_MAX_COMPONENTS {
                let best = best_subset_sum(sizes, cap);
                if infected != best {
                    result.violations.push(format!(
                        "step {}: limited infection found {}, best is {}",
                        self.step, infected, best
                    ));
                }
            }
        }

        for (id, user) in registry.users() {
            if !components.contains(&user.component()) && user.version() != &before[id.index()].0 {
                result.violations.push(format!(
                    "step {}: {} changed outside chosen components",
                    self.step,
                    user.name()
                ));
            }
        }
    }

    fn check_exact(
        &self,
        limit: i64,
        ok: bool,
        version: &VersionLabel,
        before: &Snapshot,
        result: &mut FuzzResult,
    ) {
        let registry = self.registry();
        let expected_ok = limit >= 0 && limit as usize <= registry.len();
        if ok != expected_ok {
            result.violations.push(format!(
                "step {}: exact infection of {} returned {}",
                self.step, limit, ok
            ));
        }

        let expected: HashSet<UserId> = if ok {
            exact_order(registry, limit as usize).into_iter().collect()
        } else {
            HashSet::new()
        };

        for (id, user) in registry.users() {
            let (old_version, old_flag) = &before[id.index()];
            let wanted = if expected.contains(&id) { version } else { old_version };
            if user.version() != wanted || user.infected() != *old_flag {
                result.violations.push(format!(
                    "step {}: exact infection mishandled {}",
                    self.step,
                    user.name()
                ));
            }
        }
    }
}
