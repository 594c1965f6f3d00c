pub mod path_processing;
pub mod preference_store;
pub mod route;

pub use path_processing::expand_tilde;
pub use preference_store::{
    DisabledPreferenceStore, InMemoryPreferenceStore, JsonPreferenceStore, PreferenceStore, PreferenceStoreError,
};
pub use route::{is_navigable_href, label_identifier, normalize_route, route_identifier, route_matches};
