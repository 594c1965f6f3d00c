use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use sidenav_engine::{NavigationController, NavigationTree, RecordingView, load_config_file, load_menu_file};
use sidenav_types::{NavConfig, NavMode};
use sidenav_util::{InMemoryPreferenceStore, JsonPreferenceStore, PreferenceStore, normalize_route};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "sidenav", version, about = "Compute sidebar navigation state for a page")]
struct Cli {
    #[command(flatten)]
    page: PageArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PageArgs {
    /// Menu snapshot (YAML or JSON)
    #[arg(long, short = 'm', global = true)]
    menu: Option<PathBuf>,
    /// Path of the page being rendered
    #[arg(long, short = 'r', default_value = "/", global = true)]
    route: String,
    /// Controller configuration (YAML or JSON)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,
    /// Override the configured mode (accordion or independent)
    #[arg(long, global = true)]
    mode: Option<NavMode>,
    /// Override the default-open submenus (comma separated)
    #[arg(long = "default-open", value_delimiter = ',', global = true)]
    default_open: Vec<String>,
    /// Save and load open submenus through the preference store
    #[arg(long, global = true)]
    persist: bool,
    /// Preferences file; defaults to the platform config directory
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Viewport width used for the sidebar layout
    #[arg(long, default_value_t = 1280, global = true)]
    viewport_width: u32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the state derived for the route
    Show,
    /// Toggle submenus in order, then print the resulting state
    Toggle {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Re-apply the saved open submenus, then print the resulting state
    Restore,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let menu_path = cli
        .page
        .menu
        .clone()
        .ok_or_else(|| anyhow::anyhow!("a menu snapshot is required; pass --menu <FILE>"))?;
    let snapshot = load_menu_file(&menu_path)?;
    let config = resolve_config(&cli.page)?;
    let store = open_store(&cli.page, &config);
    let tree = NavigationTree::from_snapshot(&snapshot);
    info!(menu = %menu_path.display(), items = tree.len(), mode = %config.mode, "Loaded navigation menu");

    let mut nav = NavigationController::new(tree, config, store, RecordingView::new()).with_viewport_width(cli.page.viewport_width);
    nav.initialize(&cli.page.route);

    match &cli.command {
        Command::Show => {}
        Command::Toggle { ids } => {
            let mut session = nav.session();
            for id in ids {
                if session.toggle(id).is_none() {
                    warn!(submenu_id = %id, "No such submenu");
                }
            }
        }
        Command::Restore => nav.restore(),
    }

    let report = render_report(&nav, &cli.page.route);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Config file first, then command-line overrides.
fn resolve_config(page: &PageArgs) -> Result<NavConfig> {
    let mut config = match &page.config {
        Some(path) => load_config_file(path)?,
        None => NavConfig::default(),
    };
    if let Some(mode) = page.mode {
        config.mode = mode;
    }
    if !page.default_open.is_empty() {
        config = config.with_default_open(page.default_open.iter().map(|id| id.trim()).filter(|id| !id.is_empty()));
    }
    if page.persist {
        config.persist_preference = true;
    }
    Ok(config)
}

fn open_store(page: &PageArgs, config: &NavConfig) -> Arc<dyn PreferenceStore> {
    if !config.persist_preference {
        return Arc::new(InMemoryPreferenceStore::new());
    }
    match JsonPreferenceStore::new(page.store.clone()) {
        Ok(store) => {
            info!(path = %store.path().display(), "Using preferences file");
            Arc::new(store)
        }
        Err(error) => {
            warn!(error = %error, "Preferences file unavailable; state will not survive this run");
            Arc::new(InMemoryPreferenceStore::new())
        }
    }
}

fn render_report(nav: &NavigationController<RecordingView>, route: &str) -> serde_json::Value {
    let submenus: Vec<serde_json::Value> = nav
        .submenu_states()
        .map(|(id, state)| {
            let attributes = nav.view().submenu(id);
            json!({
                "id": id,
                "open": state.is_open,
                "activeAncestor": state.is_active_ancestor,
                "ariaExpanded": attributes.map(|attrs| attrs.expanded),
                "ariaHidden": attributes.map(|attrs| attrs.hidden),
            })
        })
        .collect();
    json!({
        "route": normalize_route(route),
        "mode": nav.config().mode,
        "openSubmenus": nav.open_submenus(),
        "activeLinks": nav.active_links(),
        "submenus": submenus,
        "sidebar": nav.view().sidebar().unwrap_or_else(|| nav.sidebar().attributes()),
    })
}
