//! Organizations and their volunteer opportunities.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use cutoday_store::{NewOrganization, Organization};

use super::error::ApiError;
use crate::state::AppState;

/// An organization id as sent by clients: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrganizationId {
    Number(i64),
    Text(String),
}

impl OrganizationId {
    fn parse(id: Option<&Self>) -> Result<i64, ApiError> {
        match id {
            Some(Self::Number(n)) => Ok(*n),
            Some(Self::Text(s)) if !s.trim().is_empty() => s
                .trim()
                .parse()
                .map_err(|_| ApiError::validation(format!("organization_id '{}' is not a number", s))),
            _ => Err(ApiError::validation("organization_id is required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizationsResponse {
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub name: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpportunityQuery {
    pub organization_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    pub opportunities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOpportunity {
    pub organization_id: Option<OrganizationId>,
    pub opportunity: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<OrganizationsResponse>, ApiError> {
    let organizations = state.store.list_organizations().await?;
    Ok(Json(OrganizationsResponse { organizations }))
}

pub async fn create_organization(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrganization>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let name = required(payload.name, "name")?;
    let link = payload.link.filter(|l| !l.trim().is_empty());

    let id = state
        .store
        .create_organization(NewOrganization { name: name.clone(), link })
        .await?;
    info!(id, %name, "created organization");
    Ok(Json(json!({ "id": id })))
}

pub async fn list_opportunities(
    State(state): State<AppState>,
    query: Result<Query<OpportunityQuery>, QueryRejection>,
) -> Result<Json<OpportunitiesResponse>, ApiError> {
    let Query(query) = query?;
    let organization_id = OrganizationId::parse(query.organization_id.map(OrganizationId::Text).as_ref())?;
    let opportunities = state.store.list_opportunities(organization_id).await?;
    Ok(Json(OpportunitiesResponse { opportunities }))
}

pub async fn create_opportunity(
    State(state): State<AppState>,
    payload: Result<Json<CreateOpportunity>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let organization_id = OrganizationId::parse(payload.organization_id.as_ref())?;
    let opportunity = required(payload.opportunity, "opportunity")?;

    state
        .store
        .add_opportunity(organization_id, opportunity)
        .await?;
    info!(organization_id, "added opportunity");
    Ok(Json(json!({ "success": true })))
}
