//! # Sidenav Engine
//!
//! Navigation state for a server-rendered sidebar: which submenus are open,
//! which links match the current page, and whether the sidebar overlay is
//! shown on narrow screens.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sidenav_engine::{NavigationController, NavigationTree, RecordingView};
//! use sidenav_types::{MenuEntry, MenuSnapshot, NavConfig};
//! use sidenav_util::InMemoryPreferenceStore;
//!
//! let snapshot = MenuSnapshot {
//!     entries: vec![MenuEntry::submenu("devices", "Devices", vec![MenuEntry::link("Laptops", "/devices/laptops/")])],
//! };
//! let mut nav = NavigationController::new(
//!     NavigationTree::from_snapshot(&snapshot),
//!     NavConfig::default(),
//!     Arc::new(InMemoryPreferenceStore::new()),
//!     RecordingView::new(),
//! );
//! nav.initialize("/devices/laptops/");
//! assert_eq!(nav.is_open("devices"), Some(true));
//! ```
//!
//! ## Architecture
//!
//! - **`tree`**: arena-backed menu tree built once from a [`MenuSnapshot`]
//! - **`controller`**: submenu state machine, persistence and restore
//! - **`view`**: sinks receiving `aria-*`/class updates
//! - **`sidebar`**: overlay state of the sidebar container

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sidenav_types::{MenuSnapshot, NavConfig};

pub mod controller;
pub mod sidebar;
pub mod tree;
pub mod view;

pub use controller::{NavigationController, NavigationSession, PersistedStateError};
pub use sidebar::SidebarPanel;
pub use tree::{NavIndex, NavItem, NavigationTree};
pub use view::{NavView, NoopView, RecordingView};

/// Loads a menu snapshot from a YAML or JSON file.
///
/// JSON is a subset of YAML, so both formats go through the YAML parser.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a menu.
pub fn load_menu_file(file_path: impl AsRef<Path>) -> Result<MenuSnapshot> {
    load_document(file_path.as_ref(), "menu")
}

/// Loads controller configuration from a YAML or JSON file. Missing keys take
/// their default values.
pub fn load_config_file(file_path: impl AsRef<Path>) -> Result<NavConfig> {
    load_document(file_path.as_ref(), "config")
}

fn load_document<T: DeserializeOwned>(file_path: &Path, kind: &str) -> Result<T> {
    let content = fs::read_to_string(file_path).with_context(|| format!("Failed to read {kind} file: {}", file_path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {kind} file: {}", file_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidenav_types::NavMode;

    #[test]
    fn loads_yaml_menu() {
        let temp_dir = tempfile::tempdir().unwrap();
        let menu_path = temp_dir.path().join("menu.yaml");
        fs::write(
            &menu_path,
            r#"
entries:
  - id: devices
    label: Devices
    children:
      - label: Laptops
        href: /devices/laptops/
"#,
        )
        .unwrap();

        let snapshot = load_menu_file(&menu_path).unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].children.len(), 1);
    }

    #[test]
    fn loads_json_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nav.json");
        fs::write(&config_path, r#"{"mode":"independent","persistPreference":true}"#).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.mode, NavMode::Independent);
        assert!(config.persist_preference);
        assert!(config.default_open.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_menu_file("/nonexistent/menu.yaml").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/menu.yaml"));
    }

    #[test]
    fn invalid_menu_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let menu_path = temp_dir.path().join("menu.yaml");
        fs::write(&menu_path, "entries: 42").unwrap();
        assert!(load_menu_file(&menu_path).is_err());
    }
}
