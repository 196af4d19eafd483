//! Shareable metadata for the `pgmi_core` registries.
//!
//! Each vocabulary (events, step kinds) is a `const` table of [`VocabInfo`] rows. The helpers here keep lookups
//! uniform across registries.
//!
//! ## Notes
//! - `description` is mandatory so listings and diagnostics can explain an item without extra tables.
//! - The type is `Copy` so registries can live in `const` tables.

/// Shared metadata shape for registry-first vocabulary items.
#[derive(Debug, Clone, Copy)]
pub struct VocabInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id: Copy + PartialEq> VocabInfo<Id> {
    /// Whether `name` is the canonical spelling or one of the aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.canonical == name || self.aliases.contains(&name)
    }
}

/// Resolve a spelling against a registry table, canonical spellings first.
pub fn resolve<Id: Copy + PartialEq>(table: &[VocabInfo<Id>], name: &str) -> Option<Id> {
    if let Some(info) = table.iter().find(|i| i.canonical == name) {
        return Some(info.id);
    }
    table.iter().find(|i| i.matches(name)).map(|i| i.id)
}

/// Find the metadata row for an id.
pub fn lookup<Id: Copy + PartialEq>(table: &'static [VocabInfo<Id>], id: Id) -> Option<&'static VocabInfo<Id>> {
    table.iter().find(|i| i.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Color {
        Red,
        Blue,
    }

    const COLORS: &[VocabInfo<Color>] = &[
        VocabInfo {
            id: Color::Red,
            canonical: "red",
            aliases: &["crimson"],
            description: "Red.",
        },
        VocabInfo {
            id: Color::Blue,
            canonical: "blue",
            aliases: &[],
            description: "Blue.",
        },
    ];

    #[test]
    fn test_resolve_canonical_and_alias() {
        assert_eq!(resolve(COLORS, "red"), Some(Color::Red));
        assert_eq!(resolve(COLORS, "crimson"), Some(Color::Red));
        assert_eq!(resolve(COLORS, "blue"), Some(Color::Blue));
        assert_eq!(resolve(COLORS, "green"), None);
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(lookup(COLORS, Color::Blue).map(|i| i.canonical), Some("blue"));
    }
}
