//! Route normalization and matching.
//!
//! Links in the sidebar are compared against the path of the current page.
//! Both sides are normalized first: query strings and fragments are dropped,
//! dot segments are resolved and trailing slashes are trimmed, so
//! `/assignments/active/?page=2` and `/assignments/active` compare equal.

use heck::ToKebabCase;
use url::Url;

/// Origin used to resolve relative paths; only the resulting path is kept.
const PLACEHOLDER_ORIGIN: &str = "http://localhost/";

/// Identifier given to a link that points at the site root.
pub const ROOT_ROUTE_ID: &str = "root";

/// Returns `false` for hrefs that never navigate (`#`, `javascript:` and blanks).
pub fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:"))
}

/// Reduce a path or full URL to a canonical path with a leading slash and no
/// trailing slash (the root stays `/`).
pub fn normalize_route(input: &str) -> String {
    let input = input.trim();
    let path = Url::parse(PLACEHOLDER_ORIGIN)
        .and_then(|base| base.join(input))
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| input.split(['?', '#']).next().unwrap_or_default().to_string());

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Whether a link with `href` is active on `current_route`.
///
/// The root link only matches the root exactly; every other link also matches
/// routes nested under it on a path-segment boundary, so `/devices` matches
/// `/devices/42/edit` but not `/devices-archive`.
pub fn route_matches(href: &str, current_route: &str) -> bool {
    if !is_navigable_href(href) {
        return false;
    }
    let href = normalize_route(href);
    let current = normalize_route(current_route);
    if href == "/" {
        return current == "/";
    }
    current == href || current.strip_prefix(href.as_str()).is_some_and(|rest| rest.starts_with('/'))
}

/// Derive a stable identifier from a link target, e.g. `/assignments/active/`
/// becomes `assignments.active`.
pub fn route_identifier(href: &str) -> Option<String> {
    if !is_navigable_href(href) {
        return None;
    }
    let route = normalize_route(href);
    if route == "/" {
        return Some(ROOT_ROUTE_ID.to_string());
    }
    let id = route
        .trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(".");
    Some(id)
}

/// Derive an identifier from a label, e.g. `Device Assignments` becomes
/// `device-assignments`.
pub fn label_identifier(label: &str) -> String {
    label.to_kebab_case()
}
