//! `chatrelay serve` — Start the HTTP relay.

use chatrelay_config::AppConfig;

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
    upstream_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(url) = upstream_override {
        config.upstream.url = url;
    }
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;

    println!("💬 ChatRelay");
    println!("   Listening: {}", config.listen_addr());
    println!("   Upstream:  {}", config.upstream.url);

    chatrelay_gateway::start(config).await?;

    Ok(())
}
