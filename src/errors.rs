use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Error answered to the chat platform. The platform only shows a generic
/// failure, so the body stays terse.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Error".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Error".to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config dir path does not exist: {0}")]
    MissingDir(PathBuf),
    #[error("Config file does not exist: {0}")]
    MissingFile(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unsupported db client: {0}")]
    UnsupportedDbClient(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("hydration {0} not found")]
    NotFound(i64),
    #[error("database connection is closed")]
    Closed,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to read upload {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("View file does not exist: {0}")]
    Missing(PathBuf),
    #[error("failed to read view {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("view {path} is not valid JSON after substitution: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Pointer(#[from] crate::pointer::PointerError),
}

/// Failure of a background handler task. Only ever logged.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    View(#[from] ViewError),
}
