//! `chatrelay config` — Show the effective configuration.

use chatrelay_config::AppConfig;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("# Effective configuration (file + environment overrides)");
    println!("# Source: {}\n", AppConfig::config_path().display());
    print!("{}", config.to_toml());

    Ok(())
}
