use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform configuration directory.
pub const CONFIG_DIR_NAME: &str = "sidenav";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if p == "~" {
        return home();
    }
    if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
        return home().join(rest);
    }
    PathBuf::from(p)
}

/// Resolve `file_name` inside the sidenav configuration directory, honoring an
/// override from `env_var` when it is set to a non-empty value.
pub fn config_file_path(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /tmp/prefs.json "), PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn tilde_prefix_expands_to_home() {
        let Some(home) = home_dir() else { return };
        assert_eq!(expand_tilde("~/prefs.json"), home.join("prefs.json"));
        assert_eq!(expand_tilde("~"), home);
    }

    #[test]
    fn env_override_wins_over_config_dir() {
        temp_env::with_var("SIDENAV_TEST_PATH", Some("/var/tmp/custom.json"), || {
            assert_eq!(config_file_path("SIDENAV_TEST_PATH", "x.json"), PathBuf::from("/var/tmp/custom.json"));
        });
        temp_env::with_var("SIDENAV_TEST_PATH", Some("   "), || {
            let path = config_file_path("SIDENAV_TEST_PATH", "x.json");
            assert!(path.ends_with("sidenav/x.json"));
        });
    }
}
