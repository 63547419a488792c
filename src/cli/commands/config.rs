//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, PersistMode};
use crate::error::{MarketError, MarketResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 9] = [
    "general.log_format",
    "general.audit_log",
    "store.key",
    "store.dir",
    "store.persist_mode",
    "catalog.base_url",
    "catalog.timeout_secs",
    "display.currency_symbol",
    "display.decimal_separator",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> MarketResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> MarketResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> MarketResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(
        &ctx,
        &format!("Configuration initialized ({})", path.display()),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> MarketResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply_value(&mut config, key, value) {
        if matches!(e, MarketError::User(ref msg) if msg.starts_with("Unknown config key")) {
            ui::step_fail(&ctx, &format!("Unknown config key: {}", key));
            ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
        }
        return Err(e);
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Set a dot-separated key on `config`
fn apply_value(config: &mut Config, key: &str, value: &str) -> MarketResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,

        ["store", "key"] => config.store.key = parse_non_empty(key, value)?,
        ["store", "dir"] => config.store.dir = Some(PathBuf::from(value)),
        ["store", "persist_mode"] => {
            config.store.persist_mode = value.parse::<PersistMode>().map_err(MarketError::User)?
        }

        ["catalog", "base_url"] => config.catalog.base_url = parse_non_empty(key, value)?,
        ["catalog", "timeout_secs"] => config.catalog.timeout_secs = parse_timeout(value)?,

        ["display", "currency_symbol"] => config.display.currency_symbol = value.to_string(),
        ["display", "decimal_separator"] => {
            config.display.decimal_separator = value.to_string()
        }

        _ => return Err(MarketError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> MarketResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(MarketError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u64(value: &str) -> MarketResult<u64> {
    value
        .parse()
        .map_err(|_| MarketError::User(format!("Invalid number: {}", value)))
}

fn parse_timeout(value: &str) -> MarketResult<u64> {
    match parse_u64(value)? {
        0 => Err(MarketError::User(
            "catalog.timeout_secs must be at least 1".to_string(),
        )),
        secs => Ok(secs),
    }
}

fn parse_log_format(value: &str) -> MarketResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(MarketError::User(format!(
            "Invalid log format: {}. Use text/json",
            value
        ))),
    }
}

fn parse_non_empty(key: &str, value: &str) -> MarketResult<String> {
    if value.trim().is_empty() {
        return Err(MarketError::User(format!("{} cannot be empty", key)));
    }
    Ok(value.to_string())
}
