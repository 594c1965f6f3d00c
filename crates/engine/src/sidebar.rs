//! Show/hide state of the sidebar container on narrow viewports.
//!
//! At or below the breakpoint the sidebar is an overlay opened by a toggle
//! button and dismissed by clicking elsewhere. Above it the sidebar is always
//! visible and the overlay state is cleared.

use sidenav_types::SidebarAttributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarPanel {
    breakpoint: u32,
    attributes: SidebarAttributes,
}

impl SidebarPanel {
    /// Create the panel for a page rendered `viewport_width` pixels wide.
    pub fn new(breakpoint: u32, viewport_width: u32) -> Self {
        Self {
            breakpoint,
            attributes: SidebarAttributes {
                shown: false,
                expanded: false,
                hidden: viewport_width <= breakpoint,
            },
        }
    }

    pub fn attributes(&self) -> SidebarAttributes {
        self.attributes
    }

    pub fn is_shown(&self) -> bool {
        self.attributes.shown
    }

    fn is_overlay(&self, viewport_width: u32) -> bool {
        viewport_width <= self.breakpoint
    }

    /// Flip the overlay open or closed.
    pub fn toggle(&mut self) -> SidebarAttributes {
        let shown = !self.attributes.shown;
        self.attributes = SidebarAttributes {
            shown,
            expanded: shown,
            hidden: !shown,
        };
        self.attributes
    }

    /// A click landed outside both the sidebar and its toggle button. Returns
    /// the new attributes when the overlay was dismissed.
    pub fn click_outside(&mut self, viewport_width: u32) -> Option<SidebarAttributes> {
        if !self.is_overlay(viewport_width) || !self.attributes.shown {
            return None;
        }
        self.attributes = SidebarAttributes {
            shown: false,
            expanded: false,
            hidden: true,
        };
        Some(self.attributes)
    }

    /// The viewport changed size. Growing past the breakpoint clears the
    /// overlay and leaves the sidebar visible.
    pub fn resize(&mut self, viewport_width: u32) -> Option<SidebarAttributes> {
        if self.is_overlay(viewport_width) {
            return None;
        }
        let desktop = SidebarAttributes {
            shown: false,
            expanded: false,
            hidden: false,
        };
        if self.attributes == desktop {
            return None;
        }
        self.attributes = desktop;
        Some(self.attributes)
    }
}
