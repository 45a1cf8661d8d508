//! Classification of inbound interactivity envelopes.
//!
//! An envelope is routed by two keys: `/type` picks where the second key
//! lives, and that second key (callback id or action id) picks the action.

use crate::models::PrivateMetadata;
use crate::pointer::{self, PointerError};
use serde_json::Value;
use thiserror::Error;

const DRINK: &str = "/view/state/values/drink/drink/value";
const AMOUNT: &str = "/view/state/values/amount/amount/selected_option/value";
const USERNAME: &str = "/user/username";
const TRIGGER_ID: &str = "/trigger_id";
const ACTION_VALUE: &str = "/actions/0/value";
const MESSAGE_TS: &str = "/container/message_ts";
const CHANNEL_ID: &str = "/container/channel_id";
const PRIVATE_METADATA: &str = "/view/private_metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenAddForm,
    SubmitAddForm,
    OpenEditForm,
    SubmitEditForm,
    Delete,
    Repeat,
}

/// Discriminator value to action.
pub const ACTIONS: &[(&str, Action)] = &[
    ("hydration__record_drink", Action::OpenAddForm),
    ("hydration__record_form", Action::SubmitAddForm),
    ("hydration__update_drink", Action::OpenEditForm),
    ("hydration__update_form", Action::SubmitEditForm),
    ("hydration__delete_drink", Action::Delete),
    ("hydration__repeat_drink", Action::Repeat),
];

impl Action {
    pub fn from_callback_id(callback_id: &str) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(id, _)| *id == callback_id)
            .map(|(_, action)| *action)
    }

    pub fn callback_id(self) -> &'static str {
        match self {
            Self::OpenAddForm => "hydration__record_drink",
            Self::SubmitAddForm => "hydration__record_form",
            Self::OpenEditForm => "hydration__update_drink",
            Self::SubmitEditForm => "hydration__update_form",
            Self::Delete => "hydration__delete_drink",
            Self::Repeat => "hydration__repeat_drink",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAddForm => "open_add_form",
            Self::SubmitAddForm => "submit_add_form",
            Self::OpenEditForm => "open_edit_form",
            Self::SubmitEditForm => "submit_edit_form",
            Self::Delete => "delete",
            Self::Repeat => "repeat",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("envelope has no request type: {0}")]
    MissingType(#[from] PointerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dispatch(Action),
    /// Discriminator missing or empty.
    Forbidden,
    /// Discriminator present but not in [`ACTIONS`].
    Unknown(String),
}

/// Pointer of the second discriminator for a request type.
pub fn discriminator_path(request_type: &str) -> Option<&'static str> {
    match request_type {
        "shortcut" => Some("/callback_id"),
        "view_submission" => Some("/view/callback_id"),
        "block_actions" => Some("/actions/0/action_id"),
        _ => None,
    }
}

pub fn classify(envelope: &Value) -> Result<Route, ClassifyError> {
    let request_type = pointer::get_str(envelope, "/type")?;

    let callback_id = discriminator_path(request_type)
        .and_then(|path| pointer::get_str(envelope, path).ok())
        .unwrap_or_default();

    if callback_id.is_empty() {
        return Ok(Route::Forbidden);
    }

    Ok(match Action::from_callback_id(callback_id) {
        Some(action) => Route::Dispatch(action),
        None => Route::Unknown(callback_id.to_string()),
    })
}

/// Fields a handler needs, pulled out of the envelope before the response is
/// sent. Unusable values are already replaced by `""` or `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenAddForm {
        trigger_id: String,
    },
    SubmitAddForm {
        username: String,
        drink: String,
        amount: i64,
    },
    OpenEditForm {
        trigger_id: String,
        username: String,
        hydration_id: i64,
        channel: String,
        message_ts: String,
    },
    SubmitEditForm {
        metadata: PrivateMetadata,
        username: String,
        drink: String,
        amount: i64,
    },
    Delete {
        trigger_id: String,
        username: String,
        hydration_id: i64,
        channel: String,
        message_ts: String,
    },
    Repeat {
        username: String,
        hydration_id: i64,
    },
}

impl Command {
    pub fn extract(action: Action, envelope: &Value) -> Self {
        let text = |path: &str| pointer::str_or_default(envelope, path);
        let int = |path: &str| pointer::int_or_default(envelope, path);

        match action {
            Action::OpenAddForm => Self::OpenAddForm {
                trigger_id: text(TRIGGER_ID),
            },
            Action::SubmitAddForm => Self::SubmitAddForm {
                username: text(USERNAME),
                drink: text(DRINK),
                amount: int(AMOUNT),
            },
            Action::OpenEditForm => Self::OpenEditForm {
                trigger_id: text(TRIGGER_ID),
                username: text(USERNAME),
                hydration_id: int(ACTION_VALUE),
                channel: text(CHANNEL_ID),
                message_ts: text(MESSAGE_TS),
            },
            Action::SubmitEditForm => Self::SubmitEditForm {
                metadata: PrivateMetadata::parse(&text(PRIVATE_METADATA)),
                username: text(USERNAME),
                drink: text(DRINK),
                amount: int(AMOUNT),
            },
            Action::Delete => Self::Delete {
                trigger_id: text(TRIGGER_ID),
                username: text(USERNAME),
                hydration_id: int(ACTION_VALUE),
                channel: text(CHANNEL_ID),
                message_ts: text(MESSAGE_TS),
            },
            Action::Repeat => Self::Repeat {
                username: text(USERNAME),
                hydration_id: int(ACTION_VALUE),
            },
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Self::OpenAddForm { .. } => Action::OpenAddForm,
            Self::SubmitAddForm { .. } => Action::SubmitAddForm,
            Self::OpenEditForm { .. } => Action::OpenEditForm,
            Self::SubmitEditForm { .. } => Action::SubmitEditForm,
            Self::Delete { .. } => Action::Delete,
            Self::Repeat { .. } => Action::Repeat,
        }
    }
}
