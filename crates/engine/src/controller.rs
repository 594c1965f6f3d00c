//! Sidebar submenu state.
//!
//! [`NavigationController`] decides, for every submenu of a
//! [`NavigationTree`], whether it is open, and pushes the matching attributes
//! to a [`NavView`]. Each submenu is a two-state machine (`Closed`/`Open`)
//! driven by [`toggle`](NavigationController::toggle) and
//! [`force_open`](NavigationController::force_open); its starting state comes
//! from [`initialize`](NavigationController::initialize), which applies, in
//! order of precedence:
//!
//! 1. the active route (every ancestor of a matching link is forced open),
//! 2. the configured default-open list,
//! 3. the persisted open-set, when persistence is enabled,
//! 4. closed.
//!
//! Preference storage is best effort. Store and parse failures are logged and
//! the controller falls back to the configured defaults; none of the public
//! operations can fail.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use sidenav_types::{NavConfig, NavMode, SubmenuAttributes, SubmenuState};
use sidenav_util::{PreferenceStore, PreferenceStoreError, normalize_route};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sidebar::SidebarPanel;
use crate::tree::{NavIndex, NavigationTree};
use crate::view::{NavView, NoopView};

/// Why the persisted open-set could not be read.
#[derive(Debug, Error)]
pub enum PersistedStateError {
    #[error(transparent)]
    Store(#[from] PreferenceStoreError),
    #[error("malformed sidebar state: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct NavigationController<V: NavView = NoopView> {
    tree: NavigationTree,
    config: NavConfig,
    store: Arc<dyn PreferenceStore>,
    view: V,
    states: IndexMap<NavIndex, SubmenuState>,
    active_links: Vec<NavIndex>,
    sidebar: SidebarPanel,
}

impl<V: NavView> NavigationController<V> {
    /// Create a controller with every submenu closed. Call
    /// [`initialize`](Self::initialize) before handing it to event handlers.
    pub fn new(tree: NavigationTree, config: NavConfig, store: Arc<dyn PreferenceStore>, view: V) -> Self {
        let states = tree.submenus().map(|index| (index, SubmenuState::default())).collect();
        let sidebar = SidebarPanel::new(config.sidebar_breakpoint, u32::MAX);
        Self {
            tree,
            config,
            store,
            view,
            states,
            active_links: Vec::new(),
            sidebar,
        }
    }

    /// Use the given viewport width for the sidebar's initial layout.
    pub fn with_viewport_width(mut self, viewport_width: u32) -> Self {
        self.sidebar = SidebarPanel::new(self.config.sidebar_breakpoint, viewport_width);
        self
    }

    /// Derive the state of every submenu for the page at `current_route` and
    /// render the result.
    pub fn initialize(&mut self, current_route: &str) {
        let route = normalize_route(current_route);
        let mut decided: HashSet<NavIndex> = HashSet::new();
        for state in self.states.values_mut() {
            *state = SubmenuState::default();
        }

        let active_links = self.tree.find_active(&route);
        for &link in &active_links {
            for ancestor in self.tree.ancestors(link) {
                if let Some(state) = self.states.get_mut(&ancestor) {
                    state.is_open = true;
                    state.is_active_ancestor = true;
                    decided.insert(ancestor);
                }
            }
        }
        self.active_links = active_links;

        for submenu_id in &self.config.default_open {
            match self.tree.index_of(submenu_id).and_then(|index| self.states.get_mut(&index).map(|state| (index, state))) {
                Some((index, state)) => {
                    state.is_open = true;
                    decided.insert(index);
                }
                None => debug!(submenu_id = %submenu_id, "Default-open entry does not name a submenu"),
            }
        }

        if self.config.persist_preference {
            match self.load_persisted() {
                Ok(Some(saved)) => {
                    for (index, state) in self.states.iter_mut() {
                        if !decided.contains(index) {
                            state.is_open = saved.contains(&self.tree.item(*index).id);
                        }
                    }
                }
                Ok(None) => {}
                Err(error) => warn!(
                    key = %self.config.storage_key,
                    error = %error,
                    "Could not read saved sidebar state; using defaults"
                ),
            }
        }

        self.render_all();
        debug!(route = %route, open = ?self.open_submenus(), "Initialized navigation state");
    }

    /// Flip the identified submenu. Returns the new open state, or `None` when
    /// `submenu_id` does not name a submenu (nothing changes in that case).
    ///
    /// In accordion mode opening a submenu closes its open siblings.
    pub fn toggle(&mut self, submenu_id: &str) -> Option<bool> {
        let Some(index) = self.submenu_index(submenu_id) else {
            debug!(submenu_id, "Ignoring toggle for unknown submenu");
            return None;
        };

        let now_open = !self.states[&index].is_open;
        self.set_open(index, now_open);

        if now_open && self.config.mode == NavMode::Accordion {
            let open_siblings: Vec<NavIndex> = self
                .tree
                .siblings(index)
                .filter(|sibling| self.states.get(sibling).is_some_and(|state| state.is_open))
                .collect();
            for sibling in open_siblings {
                self.set_open(sibling, false);
            }
        }
        Some(now_open)
    }

    /// Open the identified submenu together with all of its ancestors. Returns
    /// `false` when `submenu_id` does not name a submenu.
    pub fn force_open(&mut self, submenu_id: &str) -> bool {
        let Some(index) = self.submenu_index(submenu_id) else {
            debug!(submenu_id, "Ignoring force-open for unknown submenu");
            return false;
        };
        let chain: Vec<NavIndex> = std::iter::once(index).chain(self.tree.ancestors(index)).collect();
        for target in chain {
            if self.states.get(&target).is_some_and(|state| !state.is_open) {
                self.set_open(target, true);
            }
        }
        true
    }

    /// Save the open submenus, in render order, as a JSON array.
    pub fn persist(&self) {
        if !self.config.persist_preference {
            debug!("Sidebar persistence disabled; skipping save");
            return;
        }
        let open = self.open_submenus();
        let payload = match serde_json::to_string(&open) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(error = %error, "Could not serialize sidebar state");
                return;
            }
        };
        match self.store.set(&self.config.storage_key, &payload) {
            Ok(()) => debug!(key = %self.config.storage_key, open = ?open, "Saved sidebar state"),
            Err(error) => warn!(
                key = %self.config.storage_key,
                error = %error,
                "Could not save sidebar state"
            ),
        }
    }

    /// Re-apply the saved open-set exactly: listed submenus open, all others
    /// closed. Falls back to the default-open list when nothing is saved or
    /// the saved value cannot be read.
    pub fn restore(&mut self) {
        let open: IndexSet<String> = match self.load_persisted() {
            Ok(Some(saved)) => saved,
            Ok(None) => self.config.default_open.clone(),
            Err(error) => {
                warn!(
                    key = %self.config.storage_key,
                    error = %error,
                    "Could not restore sidebar state; using defaults"
                );
                self.config.default_open.clone()
            }
        };

        for submenu_id in open.iter().filter(|id| self.submenu_index(id).is_none()) {
            debug!(submenu_id = %submenu_id, "Ignoring saved state for unknown submenu");
        }

        let submenus: Vec<NavIndex> = self.states.keys().copied().collect();
        for index in submenus {
            let is_open = open.contains(&self.tree.item(index).id);
            self.set_open(index, is_open);
        }
    }

    /// Guard that calls [`persist`](Self::persist) when dropped, so state is
    /// saved on every exit path of the owning scope.
    pub fn session(&mut self) -> NavigationSession<'_, V> {
        NavigationSession { controller: self }
    }

    /// Flip the sidebar overlay.
    pub fn toggle_sidebar(&mut self) {
        let attributes = self.sidebar.toggle();
        self.view.render_sidebar(&attributes);
    }

    /// Dismiss the sidebar overlay after a click outside of it.
    pub fn sidebar_click_outside(&mut self, viewport_width: u32) {
        if let Some(attributes) = self.sidebar.click_outside(viewport_width) {
            self.view.render_sidebar(&attributes);
        }
    }

    pub fn resize(&mut self, viewport_width: u32) {
        if let Some(attributes) = self.sidebar.resize(viewport_width) {
            self.view.render_sidebar(&attributes);
        }
    }

    pub fn is_open(&self, submenu_id: &str) -> Option<bool> {
        self.state(submenu_id).map(|state| state.is_open)
    }

    pub fn state(&self, submenu_id: &str) -> Option<SubmenuState> {
        self.tree.index_of(submenu_id).and_then(|index| self.states.get(&index).copied())
    }

    /// Every submenu with its state, in render order.
    pub fn submenu_states(&self) -> impl Iterator<Item = (&str, SubmenuState)> {
        self.states.iter().map(|(index, state)| (self.tree.item(*index).id.as_str(), *state))
    }

    /// Identifiers of open submenus in render order.
    pub fn open_submenus(&self) -> Vec<String> {
        self.submenu_states()
            .filter(|(_, state)| state.is_open)
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Identifiers of links matching the route given to `initialize`.
    pub fn active_links(&self) -> Vec<&str> {
        self.active_links.iter().map(|index| self.tree.item(*index).id.as_str()).collect()
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn sidebar(&self) -> &SidebarPanel {
        &self.sidebar
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn submenu_index(&self, submenu_id: &str) -> Option<NavIndex> {
        self.tree.index_of(submenu_id).filter(|index| self.states.contains_key(index))
    }

    fn set_open(&mut self, index: NavIndex, is_open: bool) {
        if let Some(state) = self.states.get_mut(&index) {
            state.is_open = is_open;
            let attributes = SubmenuAttributes::for_state(self.tree.item(index).id.as_str(), is_open);
            self.view.render_submenu(&attributes);
        }
    }

    fn render_all(&mut self) {
        for (index, state) in &self.states {
            let attributes = SubmenuAttributes::for_state(self.tree.item(*index).id.as_str(), state.is_open);
            self.view.render_submenu(&attributes);
        }
        for (index, item) in self.tree.items() {
            self.view.render_link(&item.id, self.active_links.contains(&index));
        }
    }

    fn load_persisted(&self) -> Result<Option<IndexSet<String>>, PersistedStateError> {
        let Some(raw) = self.store.get(&self.config.storage_key)? else {
            return Ok(None);
        };
        let saved: Vec<String> = serde_json::from_str(&raw)?;
        Ok(Some(saved.into_iter().collect()))
    }
}

/// Scope guard returned by [`NavigationController::session`].
pub struct NavigationSession<'a, V: NavView> {
    controller: &'a mut NavigationController<V>,
}

impl<V: NavView> Deref for NavigationSession<'_, V> {
    type Target = NavigationController<V>;

    fn deref(&self) -> &Self::Target {
        &*self.controller
    }
}

impl<V: NavView> DerefMut for NavigationSession<'_, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.controller
    }
}

impl<V: NavView> Drop for NavigationSession<'_, V> {
    fn drop(&mut self) {
        self.controller.persist();
    }
}
