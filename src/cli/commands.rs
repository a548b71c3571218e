use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{get_config_dir, init_config, Config},
    service::HttpPredictionService,
    session::presets,
};

use super::Commands;

/// Handle CLI subcommands
pub async fn handle_command(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration written to: {}", path.display());
        }
        Commands::Presets => list_presets(),
        Commands::Status => show_status(config).await?,
        Commands::Version => show_version(),
    }
    Ok(())
}

/// List the suggested symptom descriptions with their shortcut numbers
pub fn list_presets() {
    println!("Suggested descriptions:");
    for (i, prompt) in presets().iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).cyan(), prompt);
    }
}

/// Show version information
pub fn show_version() {
    println!("skinchat v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal client for skin-condition assessment");
}

/// Show configuration and whether the service answers
async fn show_status(config: &Config) -> Result<()> {
    println!("skinchat status:");
    println!();

    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("  [OK] Configuration: {}", config_path.display());
    } else {
        println!("  [WARNING] Configuration: Not found (using defaults)");
    }

    let service = HttpPredictionService::new(&config.service)?;
    if service.check_connection().await {
        println!("  [OK] Prediction service: {}", service.base_url().green());
    } else {
        println!("  [ERROR] Prediction service: {} unreachable", service.base_url().red());
    }

    println!("    • chat endpoint: {}", config.service.chat_path);
    println!("    • image endpoint: {}", config.service.image_path);
    match config.service.request_timeout_secs {
        Some(secs) => println!("    • request timeout: {}s", secs),
        None => println!("    • request timeout: none"),
    }

    println!();
    Ok(())
}
