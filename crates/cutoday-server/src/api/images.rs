//! Uploaded image records.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use cutoday_core::parse_event_date;
use cutoday_store::{ImageRecord, NewImage};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CreateImage {
    pub url: Option<String>,
    pub organization: Option<String>,
    pub date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn list_images(State(state): State<AppState>) -> Result<Json<ImagesResponse>, ApiError> {
    let images = state.store.list_images().await?;
    Ok(Json(ImagesResponse { images }))
}

pub async fn create_image(
    State(state): State<AppState>,
    payload: Result<Json<CreateImage>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let url = non_empty(payload.url).ok_or_else(|| ApiError::validation("url is required"))?;

    // Stored dates feed the image event source, so they must sort.
    let date = non_empty(payload.date);
    if let Some(ref d) = date
        && parse_event_date(d).is_none()
    {
        return Err(ApiError::validation(format!(
            "date '{}' is not an ISO-8601 date or timestamp",
            d
        )));
    }

    let id = state
        .store
        .add_image(NewImage {
            url,
            organization: non_empty(payload.organization),
            date,
        })
        .await?;
    info!(id, "recorded image");
    Ok(Json(json!({ "id": id })))
}
