//! Navigation tree built once from the sidebar snapshot.
//!
//! Items are stored in an arena in pre-order, so iterating the arena visits
//! the tree in render order. Each item keeps the index of its parent for
//! ancestor lookups; ownership flows strictly from the arena.

use indexmap::{IndexMap, IndexSet};
use sidenav_types::{MenuEntry, MenuSnapshot};
use sidenav_util::{is_navigable_href, label_identifier, route_identifier, route_matches};
use tracing::{debug, warn};

/// Position of an item inside a [`NavigationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavIndex(usize);

impl NavIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Stable identifier, unique within the tree.
    pub id: String,
    pub label: String,
    pub href: Option<String>,
    /// Back-reference used for ancestor lookups only.
    pub parent: Option<NavIndex>,
    /// Children in render order.
    pub children: Vec<NavIndex>,
}

impl NavItem {
    /// Items with children are collapsible submenus.
    pub fn is_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationTree {
    items: Vec<NavItem>,
    roots: Vec<NavIndex>,
    by_id: IndexMap<String, NavIndex>,
}

impl NavigationTree {
    /// Build the tree from a snapshot of the rendered menu.
    ///
    /// Identifiers come from the entry's explicit id, then its href, then its
    /// label. A repeated identifier gets a numeric suffix (`devices-2`) so that
    /// every entry stays addressable.
    pub fn from_snapshot(snapshot: &MenuSnapshot) -> Self {
        let mut reserved = IndexSet::new();
        reserve_explicit_identifiers(&snapshot.entries, &mut reserved);

        let mut tree = Self::default();
        for entry in &snapshot.entries {
            let index = tree.insert(entry, None, &reserved);
            tree.roots.push(index);
        }
        debug!(items = tree.items.len(), roots = tree.roots.len(), "Built navigation tree");
        tree
    }

    fn insert(&mut self, entry: &MenuEntry, parent: Option<NavIndex>, reserved: &IndexSet<String>) -> NavIndex {
        let id = match explicit_identifier(entry) {
            Some(explicit) if !self.by_id.contains_key(explicit) => explicit.to_string(),
            _ => self.unique_identifier(entry_identifier(entry), reserved),
        };
        let index = NavIndex(self.items.len());
        self.items.push(NavItem {
            id: id.clone(),
            label: entry.label.clone(),
            href: entry.href.clone(),
            parent,
            children: Vec::with_capacity(entry.children.len()),
        });
        self.by_id.insert(id, index);

        for child in &entry.children {
            let child_index = self.insert(child, Some(index), reserved);
            self.items[index.0].children.push(child_index);
        }
        index
    }

    /// Derived identifiers never take one that an entry declares explicitly,
    /// even when that entry comes later in render order.
    fn unique_identifier(&self, base: String, reserved: &IndexSet<String>) -> String {
        let taken = |candidate: &str| self.by_id.contains_key(candidate) || reserved.contains(candidate);
        if !taken(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                warn!(identifier = %base, renamed = %candidate, "Duplicate navigation identifier");
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn roots(&self) -> &[NavIndex] {
        &self.roots
    }

    pub fn item(&self, index: NavIndex) -> &NavItem {
        &self.items[index.0]
    }

    pub fn index_of(&self, id: &str) -> Option<NavIndex> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&NavItem> {
        self.index_of(id).map(|index| self.item(index))
    }

    /// All items in render order.
    pub fn items(&self) -> impl Iterator<Item = (NavIndex, &NavItem)> {
        self.items.iter().enumerate().map(|(position, item)| (NavIndex(position), item))
    }

    /// Submenus in render order.
    pub fn submenus(&self) -> impl Iterator<Item = NavIndex> + '_ {
        self.items().filter(|(_, item)| item.is_submenu()).map(|(index, _)| index)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, index: NavIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.item(index).parent,
        }
    }

    /// Items sharing `index`'s parent, excluding `index`. Roots are siblings of
    /// each other.
    pub fn siblings(&self, index: NavIndex) -> impl Iterator<Item = NavIndex> + '_ {
        let peers = match self.item(index).parent {
            Some(parent) => self.item(parent).children.as_slice(),
            None => self.roots.as_slice(),
        };
        peers.iter().copied().filter(move |peer| *peer != index)
    }

    /// Items whose href matches `current_route`.
    pub fn find_active(&self, current_route: &str) -> Vec<NavIndex> {
        self.items()
            .filter(|(_, item)| item.href.as_deref().is_some_and(|href| route_matches(href, current_route)))
            .map(|(index, _)| index)
            .collect()
    }
}

pub struct Ancestors<'a> {
    tree: &'a NavigationTree,
    next: Option<NavIndex>,
}

impl Iterator for Ancestors<'_> {
    type Item = NavIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.item(current).parent;
        Some(current)
    }
}

fn explicit_identifier(entry: &MenuEntry) -> Option<&str> {
    entry.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

fn reserve_explicit_identifiers(entries: &[MenuEntry], reserved: &mut IndexSet<String>) {
    for entry in entries {
        if let Some(id) = explicit_identifier(entry) {
            reserved.insert(id.to_string());
        }
        reserve_explicit_identifiers(&entry.children, reserved);
    }
}

fn entry_identifier(entry: &MenuEntry) -> String {
    if let Some(id) = explicit_identifier(entry) {
        return id.to_string();
    }
    entry
        .href
        .as_deref()
        .filter(|href| is_navigable_href(href))
        .and_then(route_identifier)
        .unwrap_or_else(|| label_identifier(&entry.label))
}
