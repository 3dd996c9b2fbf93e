use clap::Parser;
use spanner_bench::cli::{Cli, Commands};
use spanner_bench::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Config { action } => commands::config::run(&cli, action),
        Commands::Load(args) => commands::load::run(&cli, &args.clone()).await,
        Commands::Run(args) => commands::run::run(&cli, &args.clone()).await,
        Commands::Plumbing { action } => commands::plumbing::run(&cli, action).await,
    }
}
