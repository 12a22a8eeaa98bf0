//! Canonical-key lookup over a roster.

use std::collections::HashMap;

use crate::canonical::canonicalize;
use crate::entity::Entity;

/// Maps the canonical key of every name and alias to its entity.
///
/// Built per turn from the roster and never persisted. When two tokens
/// fold to the same key the entity processed last owns it.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex<'a> {
    keys: HashMap<String, &'a Entity>,
}

impl<'a> AliasIndex<'a> {
    #[must_use]
    pub fn build(roster: &'a [Entity]) -> Self {
        let mut keys = HashMap::new();
        for entity in roster {
            for token in entity.tokens() {
                keys.insert(canonicalize(token), entity);
            }
        }
        Self { keys }
    }

    /// Look up an already-canonical key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Entity> {
        self.keys.get(key).copied()
    }

    /// Canonicalize a display string and look it up.
    #[must_use]
    pub fn resolve(&self, display: &str) -> Option<&'a Entity> {
        let key = canonicalize(display);
        if key.is_empty() {
            return None;
        }
        self.get(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Entity> {
        vec![
            Entity::new("Widowmaker", "w.png").with_aliases(["Amelie", "Amélie", "Lacroix"]),
            Entity::new("Blair", "b.png"),
        ]
    }

    #[test]
    fn indexes_names_and_aliases() {
        let roster = roster();
        let index = AliasIndex::build(&roster);

        // "Amelie" and "Amélie" share a key
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("lacroix").map(|e| e.name.as_str()), Some("Widowmaker"));
        assert_eq!(index.resolve("AMÉLIE").map(|e| e.name.as_str()), Some("Widowmaker"));
        assert_eq!(index.resolve("blair").map(|e| e.name.as_str()), Some("Blair"));
        assert!(index.resolve("Tracer").is_none());
    }

    #[test]
    fn empty_roster_gives_empty_index() {
        let index = AliasIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.resolve("anyone").is_none());
    }

    #[test]
    fn nameless_entity_keeps_its_aliases() {
        let roster = vec![Entity::new("", "x.png").with_aliases(["Ghost"])];
        let index = AliasIndex::build(&roster);
        assert_eq!(index.len(), 1);
        assert!(index.resolve("ghost").is_some());
        assert!(index.resolve("").is_none());
    }

    #[test]
    fn colliding_keys_resolve_to_last_entity() {
        let roster = vec![
            Entity::new("Robin", "first.png"),
            Entity::new("R.O.B.I.N.", "second.png"),
        ];
        let index = AliasIndex::build(&roster);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve("robin").map(|e| e.image_url.as_str()), Some("second.png"));
    }
}
