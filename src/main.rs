use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tidings::app::AppContext;
use tidings::cli::{commands, Cli, Commands};
use tidings::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG wins over the debug flag
    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let settings = Settings::from_cli(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let ctx = AppContext::new(&settings)?;
            let stats = commands::run(&ctx, &settings).await?;
            println!("Done: {}", stats);
        }
        Commands::Feeds => {
            commands::list_feeds(&settings)?;
        }
    }

    Ok(())
}
