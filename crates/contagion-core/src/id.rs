//! Identity types
//!
//! Users are addressed by a dense 32-bit arena index. The human-readable
//! name lives in the registry; the index is what neighbor lists store.

use std::fmt;

/// User identity - position of the user in the registry arena
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(pub u32);

impl UserId {
    pub const ZERO: UserId = UserId(0);

    #[inline]
    pub fn new(id: u32) -> Self {
        UserId(id)
    }

    /// Build from an arena position
    ///
    /// Registries never hold more than `u32::MAX` users, so the
    /// truncation cannot happen for any index handed out by one.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        UserId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component identity - position of a component in registration order
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ComponentId(pub u32);

impl ComponentId {
    #[inline]
    pub fn new(id: u32) -> Self {
        ComponentId(id)
    }

    #[inline]
    pub fn from_index(index: usize) -> Self {
        ComponentId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_index_roundtrip() {
        let id = UserId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, UserId::new(42));
    }

    #[test]
    fn test_user_id_ordering_follows_registration() {
        assert!(UserId::new(1) < UserId::new(2));
        assert_eq!(UserId::default(), UserId::ZERO);
    }

    #[test]
    fn test_debug_formats() {
        assert_eq!(format!("{:?}", UserId::new(7)), "User(7)");
        assert_eq!(format!("{}", UserId::new(7)), "#7");
        assert_eq!(format!("{:?}", ComponentId::new(3)), "Component(3)");
    }
}
