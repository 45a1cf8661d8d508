#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
};
use chrono::{Datelike, Duration, Local};
use hydration_bot::errors::StoreError;
use hydration_bot::models::{DailySummary, Hydration, NewHydration};
use hydration_bot::storage::HydrationRepository;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::time::sleep;

pub fn assets_views_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/views")
}

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<BTreeMap<i64, Hydration>>,
    next_id: Mutex<i64>,
}

impl MemoryRepository {
    pub fn insert(&self, hydration: Hydration) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(hydration.id);
        self.rows.lock().unwrap().insert(hydration.id, hydration);
    }

    pub fn get(&self, id: i64) -> Option<Hydration> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn all(&self) -> Vec<Hydration> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl HydrationRepository for MemoryRepository {
    async fn add(&self, hydration: &NewHydration) -> Result<i64, StoreError> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        self.rows
            .lock()
            .unwrap()
            .insert(id, hydration.clone().with_id(id));
        Ok(id)
    }

    async fn fetch_one(&self, id: i64) -> Result<Hydration, StoreError> {
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, hydration: &Hydration) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&hydration.id) {
            if row.username == hydration.username {
                *row = hydration.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, hydration: &Hydration) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .get(&hydration.id)
            .is_some_and(|row| row.username == hydration.username)
        {
            rows.remove(&hydration.id);
        }
        Ok(())
    }

    async fn fetch_daily_amount(&self, username: &str) -> Result<i64, StoreError> {
        let today = Local::now().date_naive();
        Ok(self
            .all()
            .iter()
            .filter(|row| row.username == username && row.modified.date_naive() == today)
            .map(|row| row.amount)
            .sum())
    }

    async fn fetch_weekly_users(&self) -> Result<Vec<String>, StoreError> {
        let since = Local::now().date_naive() - Duration::days(7);
        let mut users: Vec<String> = self
            .all()
            .into_iter()
            .filter(|row| row.modified.date_naive() > since)
            .map(|row| row.username)
            .collect();
        users.sort();
        users.dedup();
        Ok(users)
    }

    async fn fetch_weekly_summary(&self, username: &str) -> Result<Vec<DailySummary>, StoreError> {
        let since = Local::now().date_naive() - Duration::days(7);
        let mut totals: BTreeMap<u32, i64> = BTreeMap::new();
        for row in self.all() {
            if row.username == username && row.modified.date_naive() > since {
                *totals.entry(row.modified.day()).or_default() += row.amount;
            }
        }
        Ok(totals
            .into_iter()
            .map(|(day, total_amount)| DailySummary {
                day: day.to_string(),
                total_amount,
            })
            .collect())
    }

    async fn close(&self) {}
}

#[derive(Debug, Clone)]
pub struct ChatCall {
    pub method: String,
    pub authorization: String,
    pub content_type: String,
    pub body: String,
}

impl ChatCall {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Records every Web API call it receives and answers `{"ok": true}`.
#[derive(Clone, Default)]
pub struct MockChat {
    calls: Arc<Mutex<Vec<ChatCall>>>,
}

impl MockChat {
    pub async fn start() -> (Self, String) {
        let mock = Self::default();
        let app = Router::new()
            .route("/:method", post(record_call))
            .with_state(mock.clone());
        let addr = serve(app).await;
        (mock, format!("http://{addr}"))
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<ChatCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

async fn record_call(
    State(mock): State<MockChat>,
    Path(method): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    mock.calls.lock().unwrap().push(ChatCall {
        method,
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    Json(json!({ "ok": true }))
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Polls until `check` holds; background handlers finish after the response.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    let deadline = Instant::now() + std::time::Duration::from_secs(3);
    while !check() {
        if Instant::now() > deadline {
            panic!("condition not reached in time");
        }
        sleep(std::time::Duration::from_millis(20)).await;
    }
}

pub fn hydration(id: i64, username: &str, drink: &str, amount: i64) -> Hydration {
    Hydration {
        id,
        username: username.to_string(),
        drink: drink.to_string(),
        amount,
        modified: Local::now(),
    }
}
