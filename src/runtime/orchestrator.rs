use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli},
    service::HttpPredictionService,
    session::SessionController,
    tui::{run_ui, App},
    utils::{log_info, log_warn, SkinChatError},
};

/// Load configuration for this invocation.
///
/// `--config` replaces the file layers; `--url` overrides the service base URL.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                log_warn("⚠️", format!("Failed to load config: {}. Using defaults.", e));
                Config::default()
            }
        }
    };

    if let Some(url) = &cli.url {
        config.service.base_url = url.clone();
        config.validate()?;
    }

    Ok(config)
}

/// Start a session against the configured service
pub fn connect(config: &Config) -> Result<SessionController> {
    let service = HttpPredictionService::new(&config.service).map_err(SkinChatError::from)?;
    Ok(SessionController::new(Arc::new(service)))
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        if let Some(command) = &self.cli.command {
            return handle_command(command, &self.config).await;
        }

        let session = connect(&self.config)?;
        println!(
            "🩺 Starting skinchat against {}",
            self.config.service.base_url.green()
        );
        log_info("🩺", format!("session started, service {}", self.config.service.base_url));

        let app = App::new(session, &self.config);
        run_ui(app).await
    }
}
