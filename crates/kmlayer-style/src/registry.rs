//! Style registry - merged style tables and style map resolution
//!
//! The registry answers "which style does this placemark use". It is built
//! from the document's root style table, then extended per container while
//! the container tree is walked. Each container gets its own scoped copy, so
//! styles declared in one folder never leak into a sibling folder.
//!
//! Merge order is root to leaf, and within one table, declaration order.
//! The last writer for a key wins.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::Style;

/// Style map table: alias key -> target style key.
pub type StyleAliasTable = BTreeMap<String, String>;

/// Merged, lookup-ready view of every style visible from one scope.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    /// The style without a key, if any.
    default: Option<Arc<Style>>,
    /// Keyed styles and resolved aliases.
    keyed: HashMap<String, Arc<Style>>,
}

impl StyleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a root style table and its style maps.
    #[must_use]
    pub fn from_tables(styles: &[Style], aliases: &StyleAliasTable) -> Self {
        let mut registry = Self::new();
        registry.merge(styles);
        registry.resolve_aliases(aliases);
        registry
    }

    /// Merge a style table. Entries overwrite existing entries with the same
    /// key, and later entries in `styles` overwrite earlier ones.
    pub fn merge(&mut self, styles: &[Style]) {
        for style in styles {
            let shared = Arc::new(style.clone());
            match style.id() {
                Some(key) => {
                    let _ = self.keyed.insert(key.to_string(), shared);
                }
                None => self.default = Some(shared),
            }
        }
    }

    /// Merge several tables in order.
    pub fn merge_all<'a>(&mut self, tables: impl IntoIterator<Item = &'a [Style]>) {
        for table in tables {
            self.merge(table);
        }
    }

    /// Resolve a style map table against the styles currently registered.
    ///
    /// Every alias whose target is registered gets an entry pointing to the
    /// same style. Aliases whose target is absent are dropped. Targets are
    /// resolved against the registry as it was before this call, so the result
    /// does not depend on the order aliases are visited in, and an alias is
    /// never followed through another alias of the same table.
    pub fn resolve_aliases(&mut self, aliases: &StyleAliasTable) {
        let resolved: Vec<(String, Arc<Style>)> = aliases
            .iter()
            .filter_map(|(alias, target)| {
                self.keyed
                    .get(target)
                    .map(|style| (alias.clone(), Arc::clone(style)))
            })
            .collect();

        for (alias, style) in resolved {
            let _ = self.keyed.insert(alias, style);
        }
    }

    /// A copy of this registry extended with a container's local styles and
    /// style maps. `self` is not modified.
    #[must_use]
    pub fn scoped(&self, styles: &[Style], aliases: &StyleAliasTable) -> Self {
        let mut scoped = self.clone();
        scoped.merge(styles);
        scoped.resolve_aliases(aliases);
        scoped
    }

    /// Like [`StyleRegistry::scoped`], but borrows `self` when the container
    /// declares no styles or style maps of its own.
    #[must_use]
    pub fn scope(&self, styles: &[Style], aliases: &StyleAliasTable) -> Cow<'_, Self> {
        if styles.is_empty() && aliases.is_empty() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.scoped(styles, aliases))
        }
    }

    /// Effective style for a style reference.
    ///
    /// The default style is the base. A key that resolves replaces it; a key
    /// that does not resolve (or no key at all) keeps the default. Returns
    /// `None` only when the key is unresolved and there is no default style.
    #[must_use]
    pub fn lookup(&self, key: Option<&str>) -> Option<Arc<Style>> {
        key.and_then(|k| self.keyed.get(k))
            .or(self.default.as_ref())
            .cloned()
    }

    /// Exact lookup without the default fallback.
    #[must_use]
    pub fn get_exact(&self, key: Option<&str>) -> Option<&Arc<Style>> {
        match key {
            Some(k) => self.keyed.get(k),
            None => self.default.as_ref(),
        }
    }

    /// The default style, if registered.
    #[must_use]
    pub const fn default_style(&self) -> Option<&Arc<Style>> {
        self.default.as_ref()
    }

    /// Number of registered entries (default style included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyed.len() + usize::from(self.default.is_some())
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.default = None;
        self.keyed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorValue;

    fn line_style(id: Option<&str>, width: f32) -> Style {
        Style::builder(id).line_width(width).build()
    }

    fn aliases(pairs: &[(&str, &str)]) -> StyleAliasTable {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_keyed_lookup_overrides_default() {
        let registry = StyleRegistry::from_tables(
            &[line_style(None, 1.0), line_style(Some("thick"), 9.0)],
            &StyleAliasTable::new(),
        );
        let style = registry.lookup(Some("thick")).unwrap();
        assert!((style.line().width - 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unresolved_key_falls_back_to_default() {
        let registry =
            StyleRegistry::from_tables(&[line_style(None, 2.0)], &StyleAliasTable::new());
        let style = registry.lookup(Some("nope")).unwrap();
        assert!(style.id().is_none());
        assert!(registry.lookup(None).is_some());
    }

    #[test]
    fn test_no_default_and_unresolved_is_none() {
        let registry =
            StyleRegistry::from_tables(&[line_style(Some("a"), 2.0)], &StyleAliasTable::new());
        assert!(registry.lookup(Some("b")).is_none());
        assert!(registry.lookup(None).is_none());
    }

    #[test]
    fn test_later_entries_win() {
        let mut registry = StyleRegistry::new();
        registry.merge_all([
            &[line_style(Some("s"), 1.0)][..],
            &[line_style(Some("s"), 5.0)][..],
        ]);
        let style = registry.lookup(Some("s")).unwrap();
        assert!((style.line().width - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_alias_points_to_same_style() {
        let registry = StyleRegistry::from_tables(
            &[line_style(Some("normal"), 3.0)],
            &aliases(&[("map", "normal"), ("broken", "missing")]),
        );
        let target = registry.get_exact(Some("normal")).unwrap();
        let alias = registry.get_exact(Some("map")).unwrap();
        assert!(Arc::ptr_eq(target, alias));
        assert!(registry.get_exact(Some("broken")).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_alias_is_not_chained_within_one_table() {
        let registry = StyleRegistry::from_tables(
            &[line_style(Some("base"), 3.0)],
            &aliases(&[("a", "b"), ("b", "base")]),
        );
        assert!(registry.get_exact(Some("b")).is_some());
        assert!(registry.get_exact(Some("a")).is_none());
    }

    #[test]
    fn test_scoped_does_not_touch_parent() {
        let root = StyleRegistry::from_tables(&[line_style(None, 1.0)], &StyleAliasTable::new());
        let child = root.scoped(
            &[Style::builder(Some("local"))
                .line_color(ColorValue::rgb(1, 2, 3))
                .build()],
            &aliases(&[("alias", "local")]),
        );
        assert!(child.get_exact(Some("local")).is_some());
        assert!(child.get_exact(Some("alias")).is_some());
        assert!(root.get_exact(Some("local")).is_none());
        assert!(root.get_exact(Some("alias")).is_none());
    }

    #[test]
    fn test_scope_borrows_when_nothing_is_added() {
        let root = StyleRegistry::from_tables(&[line_style(None, 1.0)], &StyleAliasTable::new());
        assert!(matches!(root.scope(&[], &StyleAliasTable::new()), Cow::Borrowed(_)));
        let owned = root.scope(&[line_style(Some("x"), 2.0)], &StyleAliasTable::new());
        assert!(matches!(owned, Cow::Owned(_)));
        assert!(owned.get_exact(Some("x")).is_some());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let registry = StyleRegistry::from_tables(
            &[line_style(None, 1.0), line_style(Some("k"), 4.0)],
            &StyleAliasTable::new(),
        );
        let first = registry.lookup(Some("k")).unwrap();
        let second = registry.lookup(Some("k")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear() {
        let mut registry =
            StyleRegistry::from_tables(&[line_style(None, 1.0)], &StyleAliasTable::new());
        assert!(!registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.lookup(None).is_none());
    }
}
