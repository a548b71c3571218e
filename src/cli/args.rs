use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skinchat")]
#[command(version)]
#[command(about = "Chat with a skin-condition assessment service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Prediction service base URL (overrides configuration)
    #[arg(long, env = "SKINCHAT_URL")]
    pub url: Option<String>,

    /// Symptom description to send without starting the UI
    #[arg(short, long)]
    pub message: Option<String>,

    /// Image to upload without starting the UI
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// True when either channel was requested on the command line
    pub fn is_non_interactive(&self) -> bool {
        self.message.is_some() || self.image.is_some()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// List suggested symptom descriptions
    Presets,
    /// Show configuration and service reachability
    Status,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_non_interactive() {
        let cli = Cli::parse_from([
            "skinchat",
            "--message",
            "Red rash on arms",
            "--image",
            "arm.png",
            "--output-format",
            "json",
        ]);
        assert!(cli.is_non_interactive());
        assert_eq!(cli.message.as_deref(), Some("Red rash on arms"));
        assert_eq!(cli.image, Some(PathBuf::from("arm.png")));
        assert_eq!(cli.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_subcommand() {
        let cli = Cli::parse_from(["skinchat", "presets"]);
        assert!(matches!(cli.command, Some(Commands::Presets)));
        assert!(!cli.is_non_interactive());
    }
}
