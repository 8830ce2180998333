use clap::Parser;

use staffdesk_api::cli::{self, Cli, Commands};
use staffdesk_api::config::AppConfig;
use staffdesk_api::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);

    let _log_guard = logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::serve(config).await,
        Commands::SetRole { email, role } => cli::set_role(&config, &email, role).await,
    }
}
