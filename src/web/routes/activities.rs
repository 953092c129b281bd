use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::database::activity_directory::ActivityDirectory;
use crate::models::ActivityListing;
use crate::services::activities_service::{self, ActivityError};

pub const INDEX_PATH: &str = "/static/index.html";

/// Query pairs as sent. A repeated key is kept, the last one wins.
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Failures surfaced to API callers as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Activity(ActivityError),
    MissingEmail,
    /// Path or query string axum could not decode.
    Rejected { status: StatusCode, detail: String },
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::Rejected {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Rejected {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<ActivityError> for ApiError {
    fn from(e: ActivityError) -> Self {
        ApiError::Activity(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Activity(ActivityError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Activity(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingEmail => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Activity(e) => e.to_string(),
            ApiError::MissingEmail => "email query parameter is required".to_string(),
            ApiError::Rejected { detail, .. } => detail.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

fn required_email(query: Result<Query<QueryPairs>, QueryRejection>) -> Result<String, ApiError> {
    let Query(pairs) = query?;
    pairs
        .into_iter()
        .rev()
        .find_map(|(key, value)| (key == "email").then_some(value))
        .ok_or(ApiError::MissingEmail)
}

pub async fn root_handler() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}

pub async fn activities_handler(
    State(directory): State<Arc<ActivityDirectory>>,
) -> Json<ActivityListing> {
    Json(activities_service::list_activities(&directory))
}

pub async fn signup_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<QueryPairs>, QueryRejection>,
    State(directory): State<Arc<ActivityDirectory>>,
) -> Result<Json<MessageBody>, ApiError> {
    let Path(activity_name) = path?;
    let email = required_email(query)?;
    let message = activities_service::signup(&directory, &activity_name, &email)?;
    Ok(Json(MessageBody { message }))
}

pub async fn unregister_handler(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<QueryPairs>, QueryRejection>,
    State(directory): State<Arc<ActivityDirectory>>,
) -> Result<Json<MessageBody>, ApiError> {
    let Path(activity_name) = path?;
    let email = required_email(query)?;
    let message = activities_service::unregister(&directory, &activity_name, &email)?;
    Ok(Json(MessageBody { message }))
}
