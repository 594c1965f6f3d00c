use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{DEFAULT_SIDEBAR_BREAKPOINT, DEFAULT_STORAGE_KEY, NavConfig, NavMode, ParseNavModeError};

/// CSS class applied to a submenu panel while it is open.
pub const OPEN_PANEL_CLASS: &str = "show";
/// CSS class applied to a toggle control while its submenu is open.
pub const EXPANDED_TOGGLE_CLASS: &str = "expanded";
/// CSS class applied to a navigation link matching the current route.
pub const ACTIVE_LINK_CLASS: &str = "active";

/// Snapshot of the rendered sidebar markup.
///
/// The snapshot is the only input describing menu structure; it is parsed
/// once at startup into a navigation tree and never queried again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    /// Top-level entries in render order.
    #[serde(default)]
    pub entries: Vec<MenuEntry>,
}

/// A single entry of the sidebar as it appears in the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Explicit identifier (e.g. a `data-submenu` attribute). When absent the
    /// identifier is derived from `href`, then from `label`.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable label rendered in the sidebar.
    pub label: String,
    /// Link target (e.g. "/devices/").
    #[serde(default)]
    pub href: Option<String>,
    /// Nested entries; a non-empty list makes this entry a submenu.
    #[serde(default)]
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    /// Build a leaf entry pointing at `href`.
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            href: Some(href.into()),
            children: Vec::new(),
        }
    }

    /// Build a submenu entry with an explicit identifier.
    pub fn submenu(id: impl Into<String>, label: impl Into<String>, children: Vec<MenuEntry>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            href: None,
            children,
        }
    }

    /// Attach an href to this entry.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn is_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Logical state tracked for every submenu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuState {
    /// Whether the submenu panel is expanded.
    pub is_open: bool,
    /// Whether the active route lives somewhere under this submenu.
    pub is_active_ancestor: bool,
}

/// Attributes pushed to the view for one submenu.
///
/// `expanded` maps to `aria-expanded` on the toggle control and `hidden` to
/// `aria-hidden` on the panel; the two are always complementary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuAttributes {
    pub submenu_id: String,
    pub expanded: bool,
    pub hidden: bool,
}

impl SubmenuAttributes {
    pub fn for_state(submenu_id: impl Into<String>, is_open: bool) -> Self {
        Self {
            submenu_id: submenu_id.into(),
            expanded: is_open,
            hidden: !is_open,
        }
    }

    /// Class toggled on the submenu panel, if any.
    pub fn panel_class(&self) -> Option<&'static str> {
        self.expanded.then_some(OPEN_PANEL_CLASS)
    }

    /// Class toggled on the toggle control, if any.
    pub fn toggle_class(&self) -> Option<&'static str> {
        self.expanded.then_some(EXPANDED_TOGGLE_CLASS)
    }
}

/// Attributes pushed to the view for the sidebar container itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarAttributes {
    /// Whether the `show` class is present on the sidebar.
    pub shown: bool,
    /// `aria-expanded` on the sidebar toggle button.
    pub expanded: bool,
    /// `aria-hidden` on the sidebar.
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submenu_attributes_are_complementary() {
        let open = SubmenuAttributes::for_state("devices", true);
        assert!(open.expanded);
        assert!(!open.hidden);
        assert_eq!(open.panel_class(), Some("show"));
        assert_eq!(open.toggle_class(), Some("expanded"));

        let closed = SubmenuAttributes::for_state("devices", false);
        assert!(!closed.expanded);
        assert!(closed.hidden);
        assert_eq!(closed.panel_class(), None);
    }

    #[test]
    fn snapshot_parses_from_yaml() {
        let yaml = r#"
entries:
  - label: Dashboard
    href: /
  - id: devices
    label: Devices
    href: /devices/
    children:
      - label: Laptops
        href: /devices/laptops/
"#;
        let snapshot: MenuSnapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snapshot.entries.len(), 2);
        assert!(!snapshot.entries[0].is_submenu());
        assert!(snapshot.entries[1].is_submenu());
        assert_eq!(snapshot.entries[1].children[0].href.as_deref(), Some("/devices/laptops/"));
    }

    #[test]
    fn snapshot_parses_from_json_with_missing_optionals() {
        let json = r#"{"entries":[{"label":"Reports"}]}"#;
        let snapshot: MenuSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.entries[0], MenuEntry {
            label: "Reports".into(),
            ..MenuEntry::default()
        });
    }
}
