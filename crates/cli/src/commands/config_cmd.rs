//! `consilium config`: Print the configuration.

use consilium_config::AppConfig;

pub async fn run(default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        println!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("# {}", config_path().display());
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

fn config_path() -> std::path::PathBuf {
    std::env::var("CONSILIUM_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| AppConfig::config_dir().join("config.toml"))
}

/// Replace every credential with a placeholder.
fn redacted(mut config: AppConfig) -> AppConfig {
    const PLACEHOLDER: &str = "[REDACTED]";
    if config.api_key.is_some() {
        config.api_key = Some(PLACEHOLDER.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(PLACEHOLDER.into());
        }
    }
    config
}
