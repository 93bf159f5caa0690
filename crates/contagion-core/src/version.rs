//! Version labels
//!
//! A label is the name of the release a user currently sees. Labels are
//! shared by every user on the same release, so they are reference counted.

use std::fmt;
use std::sync::Arc;

/// Release label carried by every user
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionLabel(Arc<str>);

impl VersionLabel {
    /// Label every user starts on
    pub const INITIAL: &'static str = "V1";

    pub fn new(label: impl AsRef<str>) -> Self {
        VersionLabel(Arc::from(label.as_ref()))
    }

    pub fn initial() -> Self {
        Self::new(Self::INITIAL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VersionLabel {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for VersionLabel {
    fn from(label: String) -> Self {
        VersionLabel(Arc::from(label))
    }
}

impl AsRef<str> for VersionLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_initial() {
        assert_eq!(VersionLabel::default().as_str(), "V1");
    }

    #[test]
    fn test_clones_compare_equal() {
        let v2 = VersionLabel::from("V2");
        let other = VersionLabel::from(String::from("V2"));
        assert_eq!(v2.clone(), other);
        assert_ne!(v2, VersionLabel::initial());
        assert_eq!(v2.to_string(), "V2");
    }
}
