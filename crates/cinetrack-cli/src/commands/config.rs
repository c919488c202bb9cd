use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use cinetrack_config::{Config, PathManager, CATALOG_API_KEY_ENV};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init {
            owner_id,
            api_key,
            force,
        } => init_config(owner_id, api_key, force, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'cinetrack config init' to create one.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let api_key = if full {
        config.catalog.api_key.clone()
    } else {
        mask_string(&config.catalog.api_key)
    };
    let library_file = config
        .store
        .library_file
        .clone()
        .unwrap_or_else(|| paths.library_file());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "catalog": {
                "api_key": api_key,
                "configured": config.is_catalog_configured(),
                "base_url": config.catalog.base_url,
                "language": config.catalog.language,
                "timeout_secs": config.catalog.timeout_secs,
            },
            "store": {
                "collection": config.store.collection,
                "library_file": library_file.display().to_string(),
            },
            "session": { "owner_id": config.session.owner_id },
            "library": { "domestic_language": config.library.domestic_language },
            "season_watch": {
                "enabled": config.season_watch.enabled,
                "run_on_startup": config.season_watch.run_on_startup,
                "poll_interval_minutes": config.season_watch.poll_interval_minutes,
            },
            "state_file": paths.state_file().display().to_string(),
        }));
        return Ok(());
    }

    output.header("Configuration");

    let mut files = section_table("Files");
    files.add_row(vec![Cell::new("Config"), Cell::new(config_file.display())]);
    files.add_row(vec![Cell::new("Library"), Cell::new(library_file.display())]);
    files.add_row(vec![Cell::new("State"), Cell::new(paths.state_file().display())]);
    files.add_row(vec![Cell::new("Logs"), Cell::new(paths.log_dir().display())]);
    output.block(files);

    let mut catalog = section_table("Catalog");
    catalog.add_row(vec![Cell::new("API Key"), Cell::new(api_key)]);
    catalog.add_row(vec![Cell::new("Base URL"), Cell::new(&config.catalog.base_url)]);
    catalog.add_row(vec![Cell::new("Language"), Cell::new(&config.catalog.language)]);
    catalog.add_row(vec![
        Cell::new("Timeout"),
        Cell::new(format!("{} seconds", config.catalog.timeout_secs)),
    ]);
    output.block(catalog);

    let mut library = section_table("Library");
    library.add_row(vec![Cell::new("Owner"), Cell::new(&config.session.owner_id)]);
    library.add_row(vec![Cell::new("Collection"), Cell::new(&config.store.collection)]);
    library.add_row(vec![
        Cell::new("Domestic Language"),
        Cell::new(&config.library.domestic_language),
    ]);
    output.block(library);

    let mut season_watch = section_table("Season Watch");
    season_watch.add_row(vec![Cell::new("Enabled"), Cell::new(check(config.season_watch.enabled))]);
    season_watch.add_row(vec![
        Cell::new("Run On Startup"),
        Cell::new(check(config.season_watch.run_on_startup)),
    ]);
    season_watch.add_row(vec![
        Cell::new("Poll Interval"),
        Cell::new(format!("{} minutes", config.season_watch.poll_interval_minutes)),
    ]);
    output.block(season_watch);

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
    }
    Ok(())
}

fn init_config(owner_id: Option<String>, api_key: Option<String>, force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if config_file.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
    }

    let owner_id = match owner_id {
        Some(id) => id,
        None => prompts::prompt_required("Owner id (the user this device signs in as)")?,
    };
    let api_key = match api_key {
        Some(key) => Some(key),
        None if std::env::var(CATALOG_API_KEY_ENV).is_ok() => None,
        None => {
            let key = prompts::prompt_string("Catalog API key (leave empty to set it later)", None)?;
            Some(key).filter(|k| !k.trim().is_empty())
        }
    };

    let mut config = Config::template(owner_id);
    if let Some(key) = api_key {
        config.catalog.api_key = key;
    }

    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    if !config.is_catalog_configured() {
        output.warn(format!(
            "No catalog API key set. Edit catalog.api_key or set {}",
            CATALOG_API_KEY_ENV
        ));
    }
    Ok(())
}

fn section_table(title: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

fn check(enabled: bool) -> String {
    if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.trim().is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
