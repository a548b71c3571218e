use anyhow::Result;
use clap::Parser;

use skinchat::{
    cli::Cli,
    runtime::{connect, resolve_config, NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose
    if cli.verbose {
        init_logger();
    }

    // Check if running in non-interactive mode
    if cli.command.is_none() && cli.is_non_interactive() {
        run_non_interactive(cli).await
    } else {
        // Create and run the orchestrator for interactive mode
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Run in non-interactive mode
async fn run_non_interactive(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let session = connect(&config)?;

    let runner = NonInteractiveRunner::new(session);
    let result = runner.execute(cli.message.clone(), cli.image.clone()).await?;

    // Format and output the result
    let formatted = runner.format_result(&result, cli.output_format);
    println!("{}", formatted);

    // Exit with appropriate code
    if result.has_transport_failure() {
        std::process::exit(1);
    }

    Ok(())
}
