//! In-memory stand-in for the Malaffi CRM backend.
//!
//! Serves every endpoint the dashboard's API client calls, under `/api`.
//! Successful responses use the `{data, success}` envelope; failures use
//! `{message, code, success: false}` with a matching status.

pub mod error;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub use error::BackendError;
pub use store::{
    Activity, Credentials, DashboardStats, Facility, FacilityInput, FacilityStatus, Group,
    GroupInput, GroupStatus, Session, Store,
};

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        data,
        success: true,
        message: None,
    })
}

fn ok_with_message<T>(data: T, message: &str) -> Json<Envelope<T>> {
    Json(Envelope {
        data,
        success: true,
        message: Some(message.to_string()),
    })
}

type ApiResult<T> = Result<Json<Envelope<T>>, BackendError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{id}", get(get_group).put(update_group).delete(delete_group))
        .route("/facilities", get(list_facilities).post(create_facility))
        .route(
            "/facilities/{id}",
            get(get_facility).put(update_facility).delete(delete_facility),
        )
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/activities", get(recent_activities))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

fn bearer_token(headers: &HeaderMap) -> Result<String, BackendError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(BackendError::Unauthorized)
}

async fn login(State(db): State<Db>, Json(credentials): Json<Credentials>) -> ApiResult<Session> {
    let session = db.write().await.login(&credentials)?;
    tracing::info!(email = %credentials.email, "session issued");
    Ok(ok(session))
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> ApiResult<()> {
    let token = bearer_token(&headers)?;
    db.write().await.logout(&token)?;
    Ok(ok_with_message((), "logged out"))
}

async fn refresh(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Session> {
    let token = bearer_token(&headers)?;
    Ok(ok(db.write().await.refresh(&token)?))
}

// --- groups ---

async fn list_groups(State(db): State<Db>) -> ApiResult<Vec<Group>> {
    Ok(ok(db.read().await.groups()))
}

async fn get_group(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Group> {
    Ok(ok(db.read().await.group(id)?))
}

async fn create_group(
    State(db): State<Db>,
    Json(input): Json<GroupInput>,
) -> Result<(StatusCode, Json<Envelope<Group>>), BackendError> {
    let group = db.write().await.create_group(input)?;
    tracing::info!(id = group.id, "group created");
    Ok((StatusCode::CREATED, ok(group)))
}

async fn update_group(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<GroupInput>,
) -> ApiResult<Group> {
    Ok(ok(db.write().await.update_group(id, input)?))
}

async fn delete_group(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<()> {
    db.write().await.delete_group(id)?;
    tracing::info!(id, "group deleted");
    Ok(ok_with_message((), "group deleted"))
}

// --- facilities ---

#[derive(Debug, Deserialize)]
pub struct FacilityFilter {
    #[serde(rename = "groupId")]
    pub group_id: Option<u64>,
}

async fn list_facilities(
    State(db): State<Db>,
    Query(filter): Query<FacilityFilter>,
) -> ApiResult<Vec<Facility>> {
    Ok(ok(db.read().await.facilities(filter.group_id)))
}

async fn get_facility(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Facility> {
    Ok(ok(db.read().await.facility(id)?))
}

async fn create_facility(
    State(db): State<Db>,
    Json(input): Json<FacilityInput>,
) -> Result<(StatusCode, Json<Envelope<Facility>>), BackendError> {
    let facility = db.write().await.create_facility(input)?;
    tracing::info!(id = facility.facility_id, "facility created");
    Ok((StatusCode::CREATED, ok(facility)))
}

async fn update_facility(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<FacilityInput>,
) -> ApiResult<Facility> {
    Ok(ok(db.write().await.update_facility(id, input)?))
}

async fn delete_facility(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<()> {
    db.write().await.delete_facility(id)?;
    tracing::info!(id, "facility deleted");
    Ok(ok_with_message((), "facility deleted"))
}

// --- dashboard ---

async fn dashboard_stats(State(db): State<Db>) -> ApiResult<DashboardStats> {
    Ok(ok(db.read().await.stats()))
}

async fn recent_activities(State(db): State<Db>) -> ApiResult<Vec<Activity>> {
    Ok(ok(db.read().await.activities()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_without_message() {
        let Json(envelope) = ok(vec![1, 2]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({"data": [1, 2], "success": true}));
    }

    #[test]
    fn unit_data_serializes_as_null() {
        let Json(envelope) = ok_with_message((), "logged out");
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "logged out");
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn group_input_defaults_status_to_active() {
        let input: GroupInput = serde_json::from_str(
            r#"{"name":"X","contactPerson":"Dr. X","email":"x@example.org"}"#,
        )
        .unwrap();
        assert_eq!(input.status, GroupStatus::Active);
    }

    #[test]
    fn group_input_rejects_missing_name() {
        let result: Result<GroupInput, _> =
            serde_json::from_str(r#"{"contactPerson":"Dr. X","email":"x@example.org"}"#);
        assert!(result.is_err());
    }
}
