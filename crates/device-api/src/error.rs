use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Failures surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("{0}")]
    InvalidPath(#[from] PathRejection),

    #[error("No route matches the requested path")]
    RouteNotFound,
}

/// RFC 7807 problem document
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Problem {
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "urn:device-api:problem-type:device-in-use")]
    pub problem_type: &'static str,
    #[schema(value_type = String)]
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    fn new(
        status: StatusCode,
        problem_type: &'static str,
        title: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type,
            title,
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (
            status,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(self.clone()),
        )
            .into_response();
        // Picked up by `attach_problem_instance`
        response.extensions_mut().insert(self);
        response
    }
}

impl ApiError {
    pub fn to_problem(&self) -> Problem {
        match self {
            ApiError::Domain(DomainError::Validation(reason)) => Problem::new(
                StatusCode::BAD_REQUEST,
                "urn:device-api:problem-type:validation",
                "Bad Request",
                reason.clone(),
            ),
            ApiError::Domain(DomainError::DeviceNotFound(_)) => Problem::new(
                StatusCode::NOT_FOUND,
                "urn:device-api:problem-type:not-found",
                "Device not found",
                "Device not found",
            ),
            ApiError::Domain(DomainError::DeviceInUse(reason)) => Problem::new(
                StatusCode::CONFLICT,
                "urn:device-api:problem-type:device-in-use",
                "Device In Use",
                reason.clone(),
            ),
            ApiError::Domain(DomainError::Storage(_)) => Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "urn:device-api:problem-type:internal",
                "Internal Server Error",
                "An unexpected error occurred.",
            ),
            ApiError::InvalidBody(rejection) => Problem::new(
                StatusCode::BAD_REQUEST,
                "urn:device-api:problem-type:validation",
                "Bad Request",
                rejection.body_text(),
            ),
            ApiError::InvalidPath(rejection) => Problem::new(
                StatusCode::BAD_REQUEST,
                "urn:device-api:problem-type:validation",
                "Bad Request",
                rejection.body_text(),
            ),
            ApiError::RouteNotFound => Problem::new(
                StatusCode::NOT_FOUND,
                "about:blank",
                "Not Found",
                "The requested resource was not found on this server.",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Domain(cause) if !cause.is_client_error() => {
                error!(error = %cause, "Unexpected failure while handling request");
            }
            ApiError::Domain(DomainError::DeviceInUse(reason)) => {
                warn!(reason = %reason, "Request conflicts with device state");
            }
            ApiError::RouteNotFound => warn!("No resource found for request path"),
            other => debug!(error = %other, "Rejected request"),
        }

        self.to_problem().into_response()
    }
}

/// Stamp the request path into problem documents as `instance`
pub async fn attach_problem_instance(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<Problem>() {
        Some(problem) => problem.with_instance(path).into_response(),
        None => response,
    }
}
