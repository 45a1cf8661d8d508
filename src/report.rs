//! Weekly hydration chart posted once per user.

use crate::chart;
use crate::chat::{ChatClient, Upload};
use crate::errors::{ChatError, StoreError};
use crate::storage::HydrationRepository;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const PLOT_FILE_NAME: &str = "plot.png";
pub const PLOT_FILE_TYPE: &str = "png";
pub const REPORT_COMMENT: &str = "Hydration over the past week";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed fetching weekly data: {0}")]
    Store(#[from] StoreError),
    #[error("failed writing plot image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed posting file to chat: {0}")]
    Chat(#[from] ChatError),
}

/// Renders and uploads one chart per active user. Stops at the first failure.
/// Returns the number of charts posted.
pub async fn run_weekly_report(
    repo: &dyn HydrationRepository,
    chat: &ChatClient,
    output_dir: &Path,
    channel: &str,
) -> Result<usize, ReportError> {
    let users = repo.fetch_weekly_users().await?;
    info!(users = users.len(), "building weekly report");

    let output_path = output_dir.join(PLOT_FILE_NAME);
    for username in &users {
        let summaries = repo.fetch_weekly_summary(username).await?;
        let image = chart::render_bar_chart(&summaries, chart::DEFAULT_WIDTH, chart::DEFAULT_HEIGHT);
        image
            .save(&output_path)
            .map_err(|source| ReportError::Image {
                path: output_path.clone(),
                source,
            })?;

        chat.upload_file(&Upload {
            channel,
            file_name: PLOT_FILE_NAME,
            file_type: PLOT_FILE_TYPE,
            path: &output_path,
            comment: REPORT_COMMENT,
        })
        .await?;
        info!(%username, days = summaries.len(), "weekly chart posted");
    }

    Ok(users.len())
}
