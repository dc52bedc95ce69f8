//! HTTP front end for the alarm service.
//!
//! `GET /` (also `/index`, `/index.html`) applies any registration or
//! cancellation carried in the query string, runs one scheduler tick and
//! returns the page model as JSON. `GET /status` is read-only.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::alarm::model::TIME_FORMAT;
use crate::notifications::Notification;
use crate::service::{AlarmService, RegistrationRequest};

pub type SharedService = Arc<Mutex<AlarmService>>;

// --- Request/Response types ---

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Alarm time, `YYYY-MM-DDTHH:MM`.
    pub alarm: Option<String>,
    #[serde(alias = "two")]
    pub title: Option<String>,
    pub news: Option<String>,
    pub weather: Option<String>,
    /// Title of an alarm to cancel.
    pub alarm_item: Option<String>,
    /// Title of a notification to cancel.
    pub notif: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlarmView {
    pub title: String,
    pub content: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub title: &'static str,
    pub alarms: Vec<AlarmView>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    pending_alarms: usize,
    next_alarm: Option<String>,
    notifications: usize,
}

/// Build the axum router.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/index", get(handle_index))
        .route("/index.html", get(handle_index))
        .route("/status", get(handle_status))
        .with_state(service)
}

/// Serve the API until the listener fails.
pub async fn serve(service: SharedService, host: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Alarm API listening on {addr}");
    axum::serve(listener, router(service)).await
}

// --- Handlers ---

async fn handle_index(
    State(service): State<SharedService>,
    Query(query): Query<IndexQuery>,
) -> Json<IndexResponse> {
    let mut service = service.lock().await;
    apply_query(&mut service, query);
    service.tick().await;
    Json(index_response(&service))
}

async fn handle_status(State(service): State<SharedService>) -> Json<StatusResponse> {
    let service = service.lock().await;
    Json(StatusResponse {
        pending_alarms: service.alarms().len(),
        next_alarm: service
            .next_deadline()
            .map(|t| t.format(TIME_FORMAT).to_string()),
        notifications: service.notifications().len(),
    })
}

/// Apply registration, alarm cancellation and notification cancellation,
/// in that order. Failures only reach the log.
pub fn apply_query(service: &mut AlarmService, query: IndexQuery) {
    if let Some(alarm) = query.alarm {
        let request = RegistrationRequest {
            alarm,
            title: query.title,
            news: query.news.is_some(),
            weather: query.weather.is_some(),
        };
        if let Err(e) = service.register_request(request) {
            debug!("Registration from query string had no effect: {e}");
        }
    }

    if let Some(title) = query.alarm_item {
        if let Err(e) = service.cancel_alarm(&title) {
            warn!("Cancel request for {title} failed: {e}");
        }
    }

    if let Some(title) = query.notif {
        service.cancel_notification(&title);
    }
}

pub fn index_response(service: &AlarmService) -> IndexResponse {
    IndexResponse {
        title: "Daily Update",
        alarms: service
            .alarms()
            .iter()
            .map(|a| AlarmView {
                title: a.title.clone(),
                content: a.display_text(),
                time: a.fire_time.format(TIME_FORMAT).to_string(),
            })
            .collect(),
        notifications: service.notifications().to_vec(),
    }
}
