//! Forest generator - random populations of classrooms

use contagion_core::{ComponentDescription, ContagionResult, RegistryConfig};
use contagion_diffusion::UserRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shape of a generated forest
#[derive(Clone, Debug)]
pub struct ForestConfig {
    /// Number of components
    pub components: usize,
    /// Fewest leaves per hub
    pub min_leaves: usize,
    /// Most leaves per hub
    pub max_leaves: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            components: 8,
            min_leaves: 0,
            max_leaves: 6,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// A handful of small classes, cheap enough for brute-force checks
    pub fn small() -> Self {
        ForestConfig {
            components: 5,
            min_leaves: 0,
            max_leaves: 4,
            seed: 42,
        }
    }

    pub fn medium() -> Self {
        ForestConfig {
            components: 50,
            min_leaves: 1,
            max_leaves: 30,
            seed: 42,
        }
    }

    /// School-district scale
    pub fn large() -> Self {
        ForestConfig {
            components: 1000,
            min_leaves: 5,
            max_leaves: 40,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Deterministic forest generator
pub struct ForestGenerator {
    config: ForestConfig,
    rng: StdRng,
}

impl ForestGenerator {
    pub fn new(config: ForestConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        ForestGenerator { config, rng }
    }

    /// Generate component descriptions with names `t<i>` and `s<i>_<k>`
    pub fn descriptions(&mut self) -> Vec<ComponentDescription> {
        let max = self.config.max_leaves.max(self.config.min_leaves);
        (0..self.config.components)
            .map(|i| {
                let leaves = self.rng.gen_range(self.config.min_leaves..=max);
                ComponentDescription::new(format!("t{}", i))
                    .with_leaves((0..leaves).map(|k| format!("s{}_{}", i, k)))
            })
            .collect()
    }

    /// Generate a registry on the default initial version
    pub fn registry(&mut self) -> ContagionResult<UserRegistry> {
        UserRegistry::build(self.descriptions(), &RegistryConfig::default())
    }
}

/// Render descriptions back into roster text
pub fn to_roster(descriptions: &[ComponentDescription]) -> String {
    let mut text = String::new();
    for description in descriptions {
        let line: Vec<&str> = description.members().collect();
        text.push_str(&line.join(","));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::parse_roster;

    #[test]
    fn test_generation_is_deterministic() {
        let a = ForestGenerator::new(ForestConfig::medium()).descriptions();
        let b = ForestGenerator::new(ForestConfig::medium()).descriptions();
        assert_eq!(a, b);

        let c = ForestGenerator::new(ForestConfig::medium().with_seed(7)).descriptions();
        assert_ne!(a, c);
    }

    #[test]
    fn test_leaf_bounds() {
        let config = ForestConfig::medium();
        let descriptions = ForestGenerator::new(config.clone()).descriptions();

        assert_eq!(descriptions.len(), config.components);
        for d in &descriptions {
            assert!(d.leaves.len() >= config.min_leaves);
            assert!(d.leaves.len() <= config.max_leaves);
        }
    }

    #[test]
    fn test_registry_builds() {
        let registry = ForestGenerator::new(ForestConfig::small()).registry().unwrap();
        assert_eq!(registry.component_count(), 5);
        assert_eq!(registry.len(), registry.component_sizes().iter().sum::<usize>());
    }

    #[test]
    fn test_roster_text_parses_back() {
        let descriptions = ForestGenerator::new(ForestConfig::small()).descriptions();
        assert_eq!(parse_roster(&to_roster(&descriptions)).unwrap(), descriptions);
    }
}
