//! `parlance serve`: Start the HTTP API server.

use parlance_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🗣️  Parlance API");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.generation.model);
    if !config.has_api_key() {
        println!("   ⚠️  No API key: serving built-in templates only");
    }

    parlance_gateway::start(config).await?;

    Ok(())
}
