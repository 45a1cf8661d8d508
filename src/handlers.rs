use crate::errors::{AppError, HandlerError};
use crate::gateway::{Action, Command, Route, classify};
use crate::models::{Hydration, NewHydration, PrivateMetadata};
use crate::state::AppState;
use crate::views;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const UPDATE_DENIED_TITLE: &str = "Cannot update";
pub const UPDATE_DENIED_TEXT: &str = "You do not have permission to update this record";
pub const DELETE_DENIED_TITLE: &str = "Cannot delete";
pub const DELETE_DENIED_TEXT: &str = "You do not have permission to delete this record";

#[derive(Debug, Deserialize)]
pub struct CallbackForm {
    #[serde(default)]
    pub payload: String,
}

/// Entry point for every interactivity callback. Classifies and extracts
/// synchronously, then acknowledges before any I/O happens.
pub async fn gateway(
    State(state): State<AppState>,
    form: Result<Form<CallbackForm>, FormRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    // A body that is not a urlencoded form carries no payload field.
    let payload = match form {
        Ok(Form(form)) => form.payload,
        Err(rejection) => {
            warn!("unreadable callback form: {rejection}");
            String::new()
        }
    };
    info!(payload = %payload, "callback received");

    let envelope: Value = serde_json::from_str(&payload).map_err(|err| {
        error!("failed to parse payload: {err}");
        AppError::internal()
    })?;

    let action = match classify(&envelope) {
        Ok(Route::Dispatch(action)) => action,
        Ok(Route::Forbidden) => return Err(AppError::forbidden()),
        Ok(Route::Unknown(callback_id)) => {
            warn!(%callback_id, "unrecognized callback id");
            return Err(AppError::forbidden());
        }
        Err(err) => {
            error!("{err}");
            return Err(AppError::internal());
        }
    };

    spawn_command(state, Command::extract(action, &envelope));

    let body = if action == Action::OpenAddForm { "Ok" } else { "" };
    Ok((StatusCode::OK, body))
}

/// Runs a command detached from the request. Failures are only logged.
pub fn spawn_command(state: AppState, command: Command) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = command.action().name();
        match run_command(&state, command).await {
            Ok(()) => debug!(action, "callback handled"),
            Err(err) => error!(action, "callback failed: {err}"),
        }
    })
}

pub async fn run_command(state: &AppState, command: Command) -> Result<(), HandlerError> {
    match command {
        Command::OpenAddForm { trigger_id } => open_add_form(state, &trigger_id).await,
        Command::SubmitAddForm {
            username,
            drink,
            amount,
        } => record(state, NewHydration::now(username, drink, amount)).await,
        Command::OpenEditForm {
            trigger_id,
            username,
            hydration_id,
            channel,
            message_ts,
        } => {
            let metadata = PrivateMetadata::new(channel, message_ts, hydration_id);
            open_edit_form(state, &trigger_id, &username, metadata).await
        }
        Command::SubmitEditForm {
            metadata,
            username,
            drink,
            amount,
        } => submit_edit_form(state, metadata, username, drink, amount).await,
        Command::Delete {
            trigger_id,
            username,
            hydration_id,
            channel,
            message_ts,
        } => {
            let metadata = PrivateMetadata::new(channel, message_ts, hydration_id);
            delete(state, &trigger_id, &username, metadata).await
        }
        Command::Repeat {
            username,
            hydration_id,
        } => repeat(state, username, hydration_id).await,
    }
}

async fn open_add_form(state: &AppState, trigger_id: &str) -> Result<(), HandlerError> {
    let request = state.views.add_form_request(trigger_id).await?;
    state.chat.open_view(&request).await?;
    Ok(())
}

/// Stores a new record and posts the result with the user's running total.
async fn record(state: &AppState, hydration: NewHydration) -> Result<(), HandlerError> {
    let id = state.repo.add(&hydration).await?;
    let hydration = hydration.with_id(id);
    let daily_amount = state.repo.fetch_daily_amount(&hydration.username).await?;

    let blocks = state.views.result_blocks(&hydration, daily_amount).await?;
    let request = views::post_message_request(&state.result_channel, blocks)?;
    state.chat.post_message(&request).await?;
    Ok(())
}

async fn open_edit_form(
    state: &AppState,
    trigger_id: &str,
    username: &str,
    metadata: PrivateMetadata,
) -> Result<(), HandlerError> {
    let hydration = state.repo.fetch_one(metadata.hydration_id).await?;

    let request = if hydration.username == username {
        state
            .views
            .edit_form_request(trigger_id, &metadata, &hydration)
            .await?
    } else {
        info!(id = hydration.id, username, "edit refused for non-owner");
        state
            .views
            .alert_request(trigger_id, UPDATE_DENIED_TITLE, UPDATE_DENIED_TEXT)
            .await?
    };
    state.chat.open_view(&request).await?;
    Ok(())
}

async fn submit_edit_form(
    state: &AppState,
    metadata: PrivateMetadata,
    username: String,
    drink: String,
    amount: i64,
) -> Result<(), HandlerError> {
    let hydration = Hydration {
        id: metadata.hydration_id,
        username,
        drink,
        amount,
        modified: Local::now(),
    };
    state.repo.update(&hydration).await?;
    let daily_amount = state.repo.fetch_daily_amount(&hydration.username).await?;

    let blocks = state.views.result_blocks(&hydration, daily_amount).await?;
    let request = views::update_message_request(&metadata.channel, &metadata.message_ts, blocks)?;
    state.chat.update_message(&request).await?;
    Ok(())
}

async fn delete(
    state: &AppState,
    trigger_id: &str,
    username: &str,
    metadata: PrivateMetadata,
) -> Result<(), HandlerError> {
    let hydration = state.repo.fetch_one(metadata.hydration_id).await?;

    if hydration.username != username {
        info!(id = hydration.id, username, "delete refused for non-owner");
        let request = state
            .views
            .alert_request(trigger_id, DELETE_DENIED_TITLE, DELETE_DENIED_TEXT)
            .await?;
        state.chat.open_view(&request).await?;
        return Ok(());
    }

    state.repo.delete(&hydration).await?;
    let request = views::delete_message_request(&metadata.channel, &metadata.message_ts);
    state.chat.delete_message(&request).await?;
    Ok(())
}

async fn repeat(state: &AppState, username: String, hydration_id: i64) -> Result<(), HandlerError> {
    let previous = state.repo.fetch_one(hydration_id).await?;
    record(
        state,
        NewHydration::now(username, previous.drink, previous.amount),
    )
    .await
}
