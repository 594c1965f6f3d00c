//! Controller configuration.
//!
//! The configuration is usually read from a YAML or JSON file and then
//! adjusted by command-line overrides. Keys use camelCase so the same file can
//! be shared with the page templates that render the sidebar.

use std::{error::Error, fmt, str::FromStr};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Preference store key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "nav.sidebar.state";

/// Viewport width (in CSS pixels) at or below which the sidebar behaves as an
/// overlay.
pub const DEFAULT_SIDEBAR_BREAKPOINT: u32 = 1024;

/// How opening a submenu affects its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavMode {
    /// Opening a submenu closes every open sibling.
    #[default]
    Accordion,
    /// Submenus open and close independently.
    Independent,
}

impl NavMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::Independent => "independent",
        }
    }
}

impl fmt::Display for NavMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavMode {
    type Err = ParseNavModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accordion" => Ok(Self::Accordion),
            "independent" => Ok(Self::Independent),
            _ => Err(ParseNavModeError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseNavModeError;

impl fmt::Display for ParseNavModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid navigation mode; expected 'accordion' or 'independent'")
    }
}

impl Error for ParseNavModeError {}

/// Recognized controller options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavConfig {
    pub mode: NavMode,
    /// Submenu identifiers opened on every page load, in priority order.
    pub default_open: IndexSet<String>,
    /// Whether open submenus are saved to and read from the preference store.
    pub persist_preference: bool,
    /// Key under which the open-set is stored.
    pub storage_key: String,
    pub sidebar_breakpoint: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            mode: NavMode::default(),
            default_open: IndexSet::new(),
            persist_preference: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            sidebar_breakpoint: DEFAULT_SIDEBAR_BREAKPOINT,
        }
    }
}

impl NavConfig {
    pub fn with_mode(mut self, mode: NavMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_default_open<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_open = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persist_preference = enabled;
        self
    }

    pub fn is_default_open(&self, submenu_id: &str) -> bool {
        self.default_open.contains(submenu_id)
    }
}
