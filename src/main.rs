use anyhow::Context;
use clap::Parser;
use hydration_bot::{
    AppState, Config,
    chat::ChatClient,
    config::{Cli, views_dir},
    logging,
    router,
    storage::{HydrationRepository, PgHydrationRepository},
    views::ViewRenderer,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if !cli.configs_dir.exists() {
        eprintln!("Config dir path does not exist");
        return Ok(());
    }

    let config = Config::load(&cli.configs_dir)?;
    let _log_guards = logging::init_file_logging(&config.log_dir)
        .with_context(|| format!("failed to open logs in {}", config.log_dir.display()))?;

    let repo = PgHydrationRepository::connect(&config.db)
        .await
        .context("failed connecting db")?;
    repo.ensure_schema().await?;
    let repo: Arc<dyn HydrationRepository> = Arc::new(repo);

    let state = AppState::new(
        Arc::clone(&repo),
        ChatClient::new(&config.slack.api_base, &config.slack.token),
        ViewRenderer::new(views_dir(&cli.configs_dir)),
        &config.slack.channel,
    );

    let listener = tokio::net::TcpListener::bind(&config.server_host).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
