//! Built-in roster used when the host supplies no characters.

use crate::entity::Entity;

/// The fixed default roster, in display order.
#[must_use]
pub fn default_roster() -> Vec<Entity> {
    vec![
        Entity::new("Lilith", "https://files.catbox.moe/hpcqr0.jpg").with_aliases(["Lady Lilith"]),
        Entity::new("Ankha", "https://files.catbox.moe/akibog.jpg"),
        Entity::new("Widowmaker", "https://files.catbox.moe/bzfzsg.jpg")
            .with_aliases(["Amelie", "Amélie", "Lacroix"]),
        Entity::new("Rebecca", "https://files.catbox.moe/qo4sg2.jpg").with_aliases(["Becca"]),
        Entity::new("Shadowheart", "https://files.catbox.moe/f6salf.jpg")
            .with_aliases(["Shadow Heart"]),
        Entity::new("Kaelen", "https://files.catbox.moe/ce0c87.jpg").with_aliases(["Kael"]),
        Entity::new("Blair", "https://files.catbox.moe/wj9iyb.jpg"),
        Entity::new("Maya", "https://files.catbox.moe/REPLACE_MAYA.png"),
        Entity::new("Tracer", "https://files.catbox.moe/REPLACE_TRACER.png")
            .with_aliases(["Lena", "Oxton", "Lena Oxton"]),
        Entity::new("Nyssia", "https://files.catbox.moe/REPLACE_NYSSIA.png"),
        Entity::new("Morgana", "https://files.catbox.moe/REPLACE_MORGANA.png"),
        Entity::new("Nami", "https://files.catbox.moe/REPLACE_NAMI.png"),
        Entity::new("Nico Robin", "https://files.catbox.moe/REPLACE_NICO_ROBIN.png")
            .with_aliases(["Nico", "Robin", "NicoRobin"]),
        Entity::new("Maki Oze", "https://files.catbox.moe/REPLACE_MAKI_OZE.png")
            .with_aliases(["Maki", "Oze", "MakiOze"]),
    ]
}

/// Pick the host roster when it has entries, otherwise the default one.
#[must_use]
pub fn effective_roster(configured: &[Entity]) -> Vec<Entity> {
    if configured.is_empty() {
        default_roster()
    } else {
        configured.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasIndex;
    use crate::canonical::canonicalize;
    use std::collections::HashSet;

    #[test]
    fn default_names_are_unique() {
        let roster = default_roster();
        let names: HashSet<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names.len(), roster.len());
    }

    #[test]
    fn every_default_name_is_discoverable() {
        let roster = default_roster();
        let index = AliasIndex::build(&roster);
        for entity in &roster {
            let found = index.get(&canonicalize(&entity.name));
            assert_eq!(found.map(|e| e.name.as_str()), Some(entity.name.as_str()));
        }
    }

    #[test]
    fn configured_roster_wins_when_present() {
        let custom = vec![Entity::new("Zed", "zed.png")];
        assert_eq!(effective_roster(&custom), custom);
        assert_eq!(effective_roster(&[]).len(), default_roster().len());
    }
}
