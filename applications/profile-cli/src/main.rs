/// Profile Account - manage your profile from the terminal
use clap::Parser;
use profile_cli::{AppConfig, Command, Credentials};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "profile")]
#[command(about = "Profile Account: view and edit your profile", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./profile.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Account email
    #[arg(long, env = "PROFILE_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "PROFILE_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "profile_cli=info,profile_ui=info,profile_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!(url = %config.backend.url, "Configuration loaded");

    let credentials = Credentials {
        email: cli.email.unwrap_or_default(),
        password: cli.password.unwrap_or_default(),
    };

    let mut stdout = std::io::stdout().lock();
    profile_cli::run(cli.command, &config, &credentials, &mut stdout).await?;

    Ok(())
}
