use anyhow::Context;
use clap::Parser;
use hydration_bot::{
    Config,
    chat::ChatClient,
    config::Cli,
    logging,
    report::run_weekly_report,
    storage::{HydrationRepository, PgHydrationRepository},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if !cli.configs_dir.exists() {
        eprintln!("Config dir path does not exist");
        return Ok(());
    }

    let config = Config::load(&cli.configs_dir)?;
    logging::init_stderr_logging();

    let repo = PgHydrationRepository::connect(&config.db)
        .await
        .context("failed connecting db")?;
    tokio::fs::create_dir_all(&config.plot_output_dir).await?;

    let chat = ChatClient::new(&config.slack.api_base, &config.slack.token);
    let result = run_weekly_report(&repo, &chat, &config.plot_output_dir, &config.slack.channel).await;
    repo.close().await;

    let posted = result?;
    info!(posted, "weekly report finished");
    Ok(())
}
