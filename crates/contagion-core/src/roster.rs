//! Roster - construction input for a population
//!
//! A roster lists one component per line: the hub (teacher) first, then
//! its leaves (students), separated by commas.
//!
//! ```text
//! A,B,C
//! D,E,F,G,H
//! I,J
//! ```

use std::io::Read;

use crate::{ContagionError, ContagionResult};

/// One star component: a hub and the leaves attached only to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentDescription {
    pub hub: String,
    pub leaves: Vec<String>,
}

impl ComponentDescription {
    pub fn new(hub: impl Into<String>) -> Self {
        ComponentDescription {
            hub: hub.into(),
            leaves: Vec::new(),
        }
    }

    pub fn with_leaf(mut self, leaf: impl Into<String>) -> Self {
        self.leaves.push(leaf.into());
        self
    }

    pub fn with_leaves<I, S>(mut self, leaves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leaves.extend(leaves.into_iter().map(Into::into));
        self
    }

    /// Hub plus leaves
    pub fn size(&self) -> usize {
        1 + self.leaves.len()
    }

    /// Identifiers in registration order (hub first)
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.hub.as_str()).chain(self.leaves.iter().map(String::as_str))
    }
}

/// Parse a roster from text
///
/// Blank lines and `#` comments are skipped. Identifiers are trimmed;
/// an empty identifier anywhere on a line is an error.
pub fn parse_roster(text: &str) -> ContagionResult<Vec<ComponentDescription>> {
    let mut components = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut names = trimmed.split(',').map(str::trim);
        let hub = names.next().unwrap_or_default();
        if hub.is_empty() {
            return Err(ContagionError::EmptyIdentifier { line });
        }

        let mut component = ComponentDescription::new(hub);
        for name in names {
            if name.is_empty() {
                return Err(ContagionError::EmptyIdentifier { line });
            }
            component.leaves.push(name.to_string());
        }
        components.push(component);
    }

    Ok(components)
}

/// Read and parse a roster from any reader
pub fn read_roster(mut reader: impl Read) -> ContagionResult<Vec<ComponentDescription>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_roster(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_roster() {
        let roster = parse_roster("A,B,C\nD,E,F,G,H\nI,J\n").unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].hub, "A");
        assert_eq!(roster[0].leaves, vec!["B", "C"]);
        assert_eq!(roster[1].size(), 5);
        assert_eq!(roster[2].size(), 2);
    }

    #[test]
    fn test_parse_trims_and_skips() {
        let roster = parse_roster("# classes\n\n  A , B \n\nC\n").unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].members().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(roster[1].size(), 1);
    }

    #[test]
    fn test_parse_rejects_empty_identifier() {
        let err = parse_roster("A,B\nC,,D\n").unwrap_err();
        assert!(matches!(err, ContagionError::EmptyIdentifier { line: 2 }));

        let err = parse_roster(",A\n").unwrap_err();
        assert!(matches!(err, ContagionError::EmptyIdentifier { line: 1 }));

        let err = parse_roster("A,B,\n").unwrap_err();
        assert!(matches!(err, ContagionError::EmptyIdentifier { line: 1 }));
    }

    #[test]
    fn test_read_roster_from_reader() {
        let roster = read_roster("X,Y\n".as_bytes()).unwrap();
        assert_eq!(roster, vec![ComponentDescription::new("X").with_leaf("Y")]);
    }

    proptest! {
        #[test]
        fn prop_parse_preserves_sizes(sizes in proptest::collection::vec(1usize..8, 0..10)) {
            let mut text = String::new();
            let mut next = 0usize;
            for size in &sizes {
                let names: Vec<String> = (0..*size).map(|k| format!("u{}", next + k)).collect();
                next += size;
                text.push_str(&names.join(","));
                text.push('\n');
            }

            let roster = parse_roster(&text).unwrap();
            let parsed: Vec<usize> = roster.iter().map(ComponentDescription::size).collect();
            prop_assert_eq!(parsed, sizes);
        }
    }
}
