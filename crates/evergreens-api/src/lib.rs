pub mod auth;
pub mod chat;
pub mod error;
pub mod meetings;
pub mod proposals;
pub mod routes;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use evergreens_chat::ChatGateway;
use evergreens_db::Database;

use crate::error::PortalError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub chat: ChatGateway,
}

/// Run a DB operation off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, PortalError>
where
    F: FnOnce(&Database) -> Result<T, PortalError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            PortalError::Persistence(e.into())
        })?
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone;
/// they are UTC.
pub(crate) fn parse_timestamp(raw: &str, record: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, record, e);
            DateTime::default()
        })
}
