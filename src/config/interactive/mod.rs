#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};
use std::path::Path;
use std::time::Duration;

use super::settings::MAX_TOP_K;
use super::{CacheConfig, Config, ConfigError, MarqoConfig};
use crate::client::MarqoClient;

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 Semantic Cache Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Marqo Configuration").bold().yellow());
    eprintln!("Configure the Marqo instance that stores cached answers.");
    eprintln!();

    configure_marqo(&mut config.marqo)?;

    eprintln!();
    eprintln!("{}", style("Cache Configuration").bold().yellow());
    eprintln!();

    configure_cache(&mut config.cache)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_marqo_connection(&config.marqo) {
        eprintln!("{}", style("✓ Marqo connection successful!").green());
    } else {
        eprintln!("{}", style("⚠ Warning: Could not connect to Marqo").yellow());
        eprintln!("You can continue, but make sure Marqo is running before using the cache.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Marqo Settings:").bold().yellow());
    eprintln!("  URL: {}", style(&config.marqo.url).cyan());
    eprintln!(
        "  Model: {}",
        style(config.marqo.model.as_deref().unwrap_or("(service default)")).cyan()
    );
    eprintln!("  Timeout: {}s", style(config.marqo.timeout_seconds).cyan());

    eprintln!();
    eprintln!("{}", style("Cache Settings:").bold().yellow());
    eprintln!("  Index: {}", style(&config.cache.index_name).cyan());
    eprintln!("  Top K: {}", style(config.cache.top_k).cyan());
    eprintln!(
        "  Score threshold: {}",
        style(config.cache.score_threshold).cyan()
    );

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            })
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_marqo(marqo: &mut MarqoConfig) -> Result<()> {
    let url: String = Input::new()
        .with_prompt("Marqo URL")
        .default(marqo.url.to_string())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let mut temp_config = marqo.clone();
            temp_config.set_url(input)
        })
        .interact_text()?;

    let model: String = Input::new()
        .with_prompt("Embedding model for new indexes (blank for service default)")
        .default(marqo.model.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let timeout_seconds: u64 = Input::new()
        .with_prompt("Request timeout in seconds")
        .default(marqo.timeout_seconds)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if (1..=300).contains(input) {
                Ok(())
            } else {
                Err("Timeout must be between 1 and 300 seconds")
            }
        })
        .interact_text()?;

    let model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    marqo.set_url(&url)?;
    marqo.set_model(model)?;
    marqo.set_timeout_seconds(timeout_seconds)?;

    Ok(())
}

fn configure_cache(cache: &mut CacheConfig) -> Result<()> {
    let index_name: String = Input::new()
        .with_prompt("Index name")
        .default(cache.index_name.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let mut temp_config = cache.clone();
            temp_config.set_index_name(input.clone())
        })
        .interact_text()?;

    let top_k: usize = Input::new()
        .with_prompt("Candidates requested per lookup (top k)")
        .default(cache.top_k)
        .validate_with(|input: &usize| -> Result<(), String> {
            if (1..=MAX_TOP_K).contains(input) {
                Ok(())
            } else {
                Err(format!("Top k must be between 1 and {}", MAX_TOP_K))
            }
        })
        .interact_text()?;

    let score_threshold: f64 = Input::new()
        .with_prompt("Minimum similarity score for a cache hit")
        .default(cache.score_threshold)
        .validate_with(|input: &f64| -> Result<(), &str> {
            if input.is_finite() {
                Ok(())
            } else {
                Err("Score threshold must be a finite number")
            }
        })
        .interact_text()?;

    cache.set_index_name(index_name)?;
    cache.set_top_k(top_k)?;
    cache.set_score_threshold(score_threshold)?;

    Ok(())
}

fn test_marqo_connection(marqo: &MarqoConfig) -> bool {
    MarqoClient::new(marqo)
        .map(|client| client.with_timeout(Duration::from_secs(5)))
        .and_then(|client| client.health())
        .is_ok()
}
