//! Presentation sinks.
//!
//! The controller never touches markup directly. Every state change is pushed
//! through [`NavView`], which a browser binding maps onto `aria-*` attributes
//! and CSS classes.

use indexmap::IndexMap;
use sidenav_types::{SidebarAttributes, SubmenuAttributes};

pub trait NavView {
    /// Apply the expanded/hidden attributes of one submenu.
    fn render_submenu(&mut self, attributes: &SubmenuAttributes);

    /// Mark a link as matching (or not matching) the current route.
    fn render_link(&mut self, _item_id: &str, _active: bool) {}

    /// Apply the attributes of the sidebar container.
    fn render_sidebar(&mut self, _attributes: &SidebarAttributes) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl NavView for NoopView {
    fn render_submenu(&mut self, _attributes: &SubmenuAttributes) {}
}

/// Keeps the latest attributes per element plus a journal of submenu updates.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    submenus: IndexMap<String, SubmenuAttributes>,
    links: IndexMap<String, bool>,
    sidebar: Option<SidebarAttributes>,
    journal: Vec<SubmenuAttributes>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submenu(&self, submenu_id: &str) -> Option<&SubmenuAttributes> {
        self.submenus.get(submenu_id)
    }

    pub fn is_link_active(&self, item_id: &str) -> bool {
        self.links.get(item_id).copied().unwrap_or(false)
    }

    pub fn sidebar(&self) -> Option<SidebarAttributes> {
        self.sidebar
    }

    /// Submenu updates in the order they were rendered.
    pub fn journal(&self) -> &[SubmenuAttributes] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }
}

impl NavView for RecordingView {
    fn render_submenu(&mut self, attributes: &SubmenuAttributes) {
        self.submenus.insert(attributes.submenu_id.clone(), attributes.clone());
        self.journal.push(attributes.clone());
    }

    fn render_link(&mut self, item_id: &str, active: bool) {
        self.links.insert(item_id.to_string(), active);
    }

    fn render_sidebar(&mut self, attributes: &SidebarAttributes) {
        self.sidebar = Some(*attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_view_keeps_latest_and_journal() {
        let mut view = RecordingView::new();
        view.render_submenu(&SubmenuAttributes::for_state("devices", true));
        view.render_submenu(&SubmenuAttributes::for_state("devices", false));
        view.render_link("devices.laptops", true);

        assert!(view.submenu("devices").unwrap().hidden);
        assert_eq!(view.journal().len(), 2);
        assert!(view.is_link_active("devices.laptops"));
        assert!(!view.is_link_active("unknown"));

        view.clear_journal();
        assert!(view.journal().is_empty());
        assert!(view.submenu("devices").is_some());
    }
}
