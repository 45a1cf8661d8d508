//! JSON view templates with `{{key}}` placeholders.
//!
//! Templates are plain text until every placeholder has been replaced, so a
//! token may sit anywhere, including inside a string literal (`"{{amount}}ml"`).
//! Values are inserted as-is; unknown tokens are left in place.

use crate::errors::ViewError;
use crate::gateway::Action;
use crate::models::{Hydration, PrivateMetadata};
use crate::pointer;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const RECORD_FORM: &str = "record_form.json";
pub const ALERT_DIALOG: &str = "alert_dialog.json";
pub const RESULT_MESSAGE: &str = "result_message.json";

pub const DEFAULT_INITIAL_AMOUNT: &str = "100";

pub type ViewParams = BTreeMap<&'static str, String>;

pub fn render_template(template: &str, params: &ViewParams) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let key = &rest[start + 2..start + 2 + len];
        out.push_str(&rest[..start]);
        match params.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + len + 4]),
        }
        rest = &rest[start + len + 4..];
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone)]
pub struct ViewRenderer {
    views_dir: PathBuf,
}

impl ViewRenderer {
    pub fn new(views_dir: impl Into<PathBuf>) -> Self {
        Self {
            views_dir: views_dir.into(),
        }
    }

    /// Reads `name`, substitutes `params` and parses the result.
    pub async fn load(&self, name: &str, params: &ViewParams) -> Result<Value, ViewError> {
        let path = self.views_dir.join(name);
        if !path.is_file() {
            return Err(ViewError::Missing(path));
        }
        let template = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ViewError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&render_template(&template, params))
            .map_err(|source| ViewError::Parse { path, source })
    }

    pub async fn add_form_request(&self, trigger_id: &str) -> Result<Value, ViewError> {
        let params = ViewParams::from([
            ("callbackID", Action::SubmitAddForm.callback_id().to_string()),
            ("metadata", String::new()),
            ("initialDrink", String::new()),
            ("initialAmount", DEFAULT_INITIAL_AMOUNT.to_string()),
        ]);
        let view = self.load(RECORD_FORM, &params).await?;
        open_view_request(trigger_id, view)
    }

    pub async fn edit_form_request(
        &self,
        trigger_id: &str,
        metadata: &PrivateMetadata,
        hydration: &Hydration,
    ) -> Result<Value, ViewError> {
        let params = ViewParams::from([
            ("callbackID", Action::SubmitEditForm.callback_id().to_string()),
            ("metadata", metadata.to_string()),
            ("initialDrink", hydration.drink.clone()),
            ("initialAmount", hydration.amount.to_string()),
        ]);
        let view = self.load(RECORD_FORM, &params).await?;
        open_view_request(trigger_id, view)
    }

    pub async fn alert_request(
        &self,
        trigger_id: &str,
        title: &str,
        text: &str,
    ) -> Result<Value, ViewError> {
        let params = ViewParams::from([("title", title.to_string()), ("text", text.to_string())]);
        let view = self.load(ALERT_DIALOG, &params).await?;
        open_view_request(trigger_id, view)
    }

    pub async fn result_blocks(
        &self,
        hydration: &Hydration,
        daily_amount: i64,
    ) -> Result<Value, ViewError> {
        self.load(RESULT_MESSAGE, &result_params(hydration, daily_amount))
            .await
    }
}

pub fn result_params(hydration: &Hydration, daily_amount: i64) -> ViewParams {
    ViewParams::from([
        ("hydrationID", hydration.id.to_string()),
        ("userName", hydration.username.clone()),
        ("drink", hydration.drink.clone()),
        ("amount", hydration.amount.to_string()),
        ("dailyAmount", daily_amount.to_string()),
    ])
}

pub fn open_view_request(trigger_id: &str, view: Value) -> Result<Value, ViewError> {
    let mut request = json!({ "trigger_id": "", "view": {} });
    pointer::set(&mut request, "/view", view)?;
    pointer::set(&mut request, "/trigger_id", json!(trigger_id))?;
    Ok(request)
}

pub fn post_message_request(channel: &str, blocks: Value) -> Result<Value, ViewError> {
    let mut request = json!({ "channel": "", "blocks": [] });
    pointer::set(&mut request, "/blocks", blocks)?;
    pointer::set(&mut request, "/channel", json!(channel))?;
    Ok(request)
}

pub fn update_message_request(channel: &str, ts: &str, blocks: Value) -> Result<Value, ViewError> {
    let mut request = json!({ "channel": "", "ts": "", "blocks": [] });
    pointer::set(&mut request, "/blocks", blocks)?;
    pointer::set(&mut request, "/channel", json!(channel))?;
    pointer::set(&mut request, "/ts", json!(ts))?;
    Ok(request)
}

pub fn delete_message_request(channel: &str, ts: &str) -> Value {
    json!({ "channel": channel, "ts": ts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn hydration() -> Hydration {
        Hydration {
            id: 42,
            username: "alice".to_string(),
            drink: "tea".to_string(),
            amount: 250,
            modified: Local::now(),
        }
    }

    #[test]
    fn render_replaces_known_tokens_only() {
        let params = ViewParams::from([("amount", "250".to_string())]);
        assert_eq!(render_template("{{amount}}ml", &params), "250ml");
        assert_eq!(
            render_template("{{amount}} / {{missing}}", &params),
            "250 / {{missing}}"
        );
    }

    #[test]
    fn render_inserts_values_literally() {
        let params = ViewParams::from([
            ("drink", "{{userName}}".to_string()),
            ("userName", "alice".to_string()),
        ]);
        assert_eq!(
            render_template("{{drink}} by {{userName}}", &params),
            "{{userName}} by alice"
        );
        assert_eq!(render_template("{{drink", &params), "{{drink");
    }

    #[test]
    fn render_does_not_escape_values() {
        let params = ViewParams::from([("drink", "\"quoted\"".to_string())]);
        assert_eq!(render_template("{{drink}}", &params), "\"quoted\"");
    }

    #[tokio::test]
    async fn load_splices_rendered_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(RESULT_MESSAGE),
            r#"[{"type": "section", "text": {"type": "mrkdwn", "text": "{{drink}} {{amount}}ml ({{dailyAmount}}ml today)"}}]"#,
        )
        .unwrap();
        let renderer = ViewRenderer::new(dir.path());

        let blocks = renderer.result_blocks(&hydration(), 900).await.unwrap();
        let request = post_message_request("#general", blocks).unwrap();

        assert_eq!(request["channel"], "#general");
        assert_eq!(request["blocks"][0]["text"]["text"], "tea 250ml (900ml today)");
    }

    #[tokio::test]
    async fn load_reports_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ViewRenderer::new(dir.path());
        let err = renderer.alert_request("T1", "title", "text").await.unwrap_err();
        assert!(matches!(err, ViewError::Missing(_)));
    }

    #[tokio::test]
    async fn edit_form_carries_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(RECORD_FORM),
            r#"{"type": "modal", "callback_id": "{{callbackID}}", "private_metadata": "{{metadata}}", "initial": "{{initialDrink}}:{{initialAmount}}"}"#,
        )
        .unwrap();
        let renderer = ViewRenderer::new(dir.path());
        let metadata = PrivateMetadata::new("C1", "1.2", 42);

        let request = renderer
            .edit_form_request("T1", &metadata, &hydration())
            .await
            .unwrap();

        assert_eq!(request["trigger_id"], "T1");
        assert_eq!(request["view"]["callback_id"], "hydration__update_form");
        assert_eq!(request["view"]["private_metadata"], "C1-1.2-42");
        assert_eq!(request["view"]["initial"], "tea:250");
    }

    #[test]
    fn update_request_targets_message() {
        let request = update_message_request("C1", "1.2", json!([])).unwrap();
        assert_eq!(request, json!({ "channel": "C1", "ts": "1.2", "blocks": [] }));
        assert_eq!(
            delete_message_request("C1", "1.2"),
            json!({ "channel": "C1", "ts": "1.2" })
        );
    }
}
