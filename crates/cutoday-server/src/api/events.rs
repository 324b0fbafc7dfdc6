//! Event endpoints: one per source plus the aggregate.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, WindowPolicy};

use super::error::ApiError;
use crate::state::AppState;

/// `timeMin` / `timeMax` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQuery {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
}

impl WindowQuery {
    fn resolve(&self, policy: &WindowPolicy) -> Result<TimeWindow, ApiError> {
        Ok(policy.resolve(self.time_min.as_deref(), self.time_max.as_deref(), Utc::now())?)
    }
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub items: Vec<NormalizedEvent>,
}

pub async fn calendar_events(
    state: State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    source_events(EventSource::Calendar, state, query).await
}

pub async fn organizing_events(
    state: State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    source_events(EventSource::Organizing, state, query).await
}

pub async fn image_events(
    state: State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    source_events(EventSource::Image, state, query).await
}

async fn source_events(
    source: EventSource,
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Query(query) = query?;
    let window = query.resolve(&state.window_policy)?;

    let items = state
        .aggregator
        .fetch_source(source, window)
        .await
        .map_err(|e| ApiError::from_source(source, e))?;

    info!(%source, event_count = items.len(), "served source events");
    Ok(Json(EventsResponse { items }))
}

/// Merged events from every source.
///
/// Failed sources are logged and left out; the request fails only if every
/// source task panicked.
pub async fn all_events(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Query(query) = query?;
    let window = query.resolve(&state.window_policy)?;

    let result = state
        .aggregator
        .aggregate(window)
        .await
        .map_err(|e| ApiError::Internal {
            message: "Failed to fetch combined events".to_string(),
            details: e.to_string(),
        })?;

    if !result.failures.is_empty() {
        warn!(
            failed = result.failures.len(),
            event_count = result.events.len(),
            "serving partial results"
        );
    }
    Ok(Json(EventsResponse {
        items: result.events,
    }))
}
