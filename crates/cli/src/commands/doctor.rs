//! `chatrelay doctor` — Diagnose configuration and upstream health.

use chatrelay_config::AppConfig;
use chatrelay_core::Provider;
use chatrelay_providers::HttpInferenceProvider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 ChatRelay Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `chatrelay onboard` to create one)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Fix the configuration before running further checks.");
            return Ok(());
        }
    };

    println!("  ℹ️  Relay will listen on {}", config.listen_addr());

    let provider = HttpInferenceProvider::from_config(&config.upstream)?;
    match provider.health_check().await {
        Ok(true) => println!("  ✅ Upstream ready at {}", provider.base_url()),
        Ok(false) => {
            println!(
                "  ⚠️  Upstream at {} answered but is not ready (model still loading?)",
                provider.base_url()
            );
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Upstream unreachable at {}: {e}", provider.base_url());
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
