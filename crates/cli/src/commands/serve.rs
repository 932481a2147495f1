//! `consilium serve`: Start the HTTP API server.

use consilium_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured, the gateway will not start.");
        eprintln!("  Set CONSILIUM_API_KEY or OPENAI_API_KEY, or add `api_key` to:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    println!("🏛️  Consilium Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.default_model);
    println!("   Data dir:  {}", config.datasets.data_dir.display());

    consilium_gateway::start(config).await?;

    Ok(())
}
