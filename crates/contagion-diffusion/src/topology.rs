//! Topology - the user registry
//!
//! The registry owns every user in a single arena. Coaching links are
//! stored as arena indices, so a hub and its leaves can point at each
//! other without shared ownership.

use std::collections::HashMap;

use contagion_core::{
    ComponentDescription, ComponentId, ContagionError, ContagionResult, RegistryConfig, UserId,
    VersionLabel,
};
use tracing::debug;

/// A user in the population
#[derive(Debug, Clone)]
pub struct User {
    /// Unique name, fixed at registration
    name: String,
    /// Release currently seen by the user
    version: VersionLabel,
    /// Visit marker for total infection; its polarity flips on every visit
    infected: bool,
    /// Coaching links (hub -> leaves, leaf -> hub)
    neighbors: Vec<UserId>,
    /// Component the user belongs to
    component: ComponentId,
}

impl User {
    fn new(name: String, version: VersionLabel, component: ComponentId) -> Self {
        User {
            name,
            version,
            infected: false,
            neighbors: Vec::new(),
            component,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &VersionLabel {
        &self.version
    }

    pub fn infected(&self) -> bool {
        self.infected
    }

    pub fn neighbors(&self) -> &[UserId] {
        &self.neighbors
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Hubs are the only users with more than one link
    pub fn is_hub(&self) -> bool {
        self.neighbors.len() > 1
    }

    pub(crate) fn set_version(&mut self, version: &VersionLabel) {
        self.version = version.clone();
    }

    pub(crate) fn flip_infected(&mut self) {
        self.infected = !self.infected;
    }
}

/// Registry of users, built once from component descriptions
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    /// Arena, in registration order
    users: Vec<User>,
    /// Name -> arena index
    by_name: HashMap<String, UserId>,
    /// One hub per component
    hubs: Vec<UserId>,
    /// Size of each component, aligned with `hubs`
    component_sizes: Vec<usize>,
}

impl UserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from component descriptions
    ///
    /// Users are registered component by component, hub first. Duplicate
    /// or empty names reject the whole roster.
    pub fn build<I>(descriptions: I, config: &RegistryConfig) -> ContagionResult<Self>
    where
        I: IntoIterator<Item = ComponentDescription>,
    {
        let mut registry = UserRegistry::new();

        for (position, description) in descriptions.into_iter().enumerate() {
            registry.add_component(position, description, &config.initial_version)?;
        }

        debug!(
            users = registry.users.len(),
            components = registry.hubs.len(),
            "registry built"
        );
        Ok(registry)
    }

    /// Parse a roster and build a registry from it
    pub fn from_roster(text: &str, config: &RegistryConfig) -> ContagionResult<Self> {
        Self::build(contagion_core::parse_roster(text)?, config)
    }

    fn add_component(
        &mut self,
        position: usize,
        description: ComponentDescription,
        version: &VersionLabel,
    ) -> ContagionResult<()> {
        let size = description.size();
        if self.users.len() + size > u32::MAX as usize {
            return Err(ContagionError::PopulationTooLarge(self.users.len() + size));
        }

        for name in description.members() {
            if name.is_empty() {
                return Err(ContagionError::EmptyIdentifier { line: position + 1 });
            }
        }

        let component = ComponentId::from_index(self.hubs.len());
        let hub = self.register(description.hub, version, component)?;

        let mut leaves = Vec::with_capacity(description.leaves.len());
        for name in description.leaves {
            let leaf = self.register(name, version, component)?;
            self.users[leaf.index()].neighbors.push(hub);
            leaves.push(leaf);
        }
        self.users[hub.index()].neighbors = leaves;

        self.hubs.push(hub);
        self.component_sizes.push(size);
        Ok(())
    }

    fn register(
        &mut self,
        name: String,
        version: &VersionLabel,
        component: ComponentId,
    ) -> ContagionResult<UserId> {
        if self.by_name.contains_key(&name) {
            return Err(ContagionError::DuplicateUser(name));
        }

        let id = UserId::from_index(self.users.len());
        self.by_name.insert(name.clone(), id);
        self.users.push(User::new(name, version.clone(), component));
        Ok(id)
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(id.index())
    }

    /// Find a user by name
    pub fn lookup(&self, name: &str) -> Option<UserId> {
        self.by_name.get(name).copied()
    }

    /// Find a user by name, failing if absent
    pub fn require(&self, name: &str) -> ContagionResult<UserId> {
        self.lookup(name)
            .ok_or_else(|| ContagionError::UnknownUser(name.to_string()))
    }

    /// All users in registration order
    pub fn users(&self) -> impl Iterator<Item = (UserId, &User)> {
        self.users
            .iter()
            .enumerate()
            .map(|(idx, user)| (UserId::from_index(idx), user))
    }

    /// One hub per component, in registration order
    pub fn hubs(&self) -> &[UserId] {
        &self.hubs
    }

    /// Component sizes, aligned with [`hubs`](Self::hubs)
    pub fn component_sizes(&self) -> &[usize] {
        &self.component_sizes
    }

    pub fn component_count(&self) -> usize {
        self.hubs.len()
    }

    pub fn component_of(&self, id: UserId) -> Option<ComponentId> {
        self.get(id).map(User::component)
    }

    /// Hub of a component
    pub fn hub(&self, component: ComponentId) -> Option<UserId> {
        self.hubs.get(component.index()).copied()
    }

    /// Members of a component: the hub, then its leaves in order
    pub fn members(&self, component: ComponentId) -> Vec<UserId> {
        match self.hub(component) {
            Some(hub) => std::iter::once(hub)
                .chain(self.neighbors(hub).iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Coaching links of a user (empty for unknown IDs)
    pub fn neighbors(&self, id: UserId) -> &[UserId] {
        self.get(id).map(User::neighbors).unwrap_or(&[])
    }

    /// Number of users currently on `version`
    pub fn count_on_version(&self, version: &VersionLabel) -> usize {
        self.users.iter().filter(|u| &u.version == version).count()
    }

    /// Put every user back on `version` with a cleared visit marker
    pub fn reset(&mut self, version: &VersionLabel) {
        for user in &mut self.users {
            user.version = version.clone();
            user.infected = false;
        }
    }
}
