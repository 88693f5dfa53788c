use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
};
use domain::{DeviceId, DeviceState};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::dto::{DeviceRequest, DeviceResponse};
use crate::error::{ApiError, Problem, attach_problem_instance};
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(OpenApi)]
#[openapi(
    info(title = "Device API", description = "Create, query, update and delete devices"),
    paths(
        create_device,
        update_device,
        patch_device,
        get_device,
        list_devices,
        devices_by_brand,
        devices_by_state,
        delete_device
    ),
    components(schemas(DeviceRequest, DeviceResponse, DeviceState, Problem)),
    tags((name = "Devices", description = "Operations related to device management"))
)]
pub struct ApiDoc;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/devices", get(list_devices).post(create_device))
        .route(
            "/api/v1/devices/{id}",
            get(get_device)
                .put(update_device)
                .patch(patch_device)
                .delete(delete_device),
        )
        .route("/api/v1/devices/brand/{brand}", get(devices_by_brand))
        .route("/api/v1/devices/state/{state}", get(devices_by_state))
        .route("/api-docs/openapi.json", get(openapi))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(attach_problem_instance))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn device_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<DeviceId> {
    let Path(id) = path?;
    Ok(DeviceId::new(id))
}

fn responses(devices: Vec<domain::Device>) -> Json<Vec<DeviceResponse>> {
    Json(devices.into_iter().map(DeviceResponse::from).collect())
}

/// Create a new device
///
/// Creates and returns a new device. The creation time is set automatically.
#[utoipa::path(
    post,
    path = "/api/v1/devices",
    tag = "Devices",
    request_body = DeviceRequest,
    responses(
        (status = 201, description = "Device created", body = DeviceResponse),
        (status = 400, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
async fn create_device(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeviceRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let device = state.devices.create(request.into_new_device()?).await?;

    Ok((StatusCode::CREATED, Json(DeviceResponse::from(device))))
}

/// Fully update a device
///
/// Replaces name, brand and state. Devices in IN_USE state cannot change
/// name or brand.
#[utoipa::path(
    put,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "Device ID")),
    request_body = DeviceRequest,
    responses(
        (status = 200, description = "Device updated", body = DeviceResponse),
        (status = 400, description = "Validation error", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Device not found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict - Device is in use and cannot be updated", body = Problem, content_type = "application/problem+json")
    )
)]
async fn update_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<DeviceRequest>, JsonRejection>,
) -> ApiResult<Json<DeviceResponse>> {
    let id = device_id(id)?;
    let Json(request) = body?;
    let device = state
        .devices
        .update(id, request.into_new_device()?)
        .await?;

    Ok(Json(device.into()))
}

/// Partially update a device
///
/// Updates only the supplied fields. If the device is IN_USE, `name` and
/// `brand` cannot be changed.
#[utoipa::path(
    patch,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "Device ID")),
    request_body = DeviceRequest,
    responses(
        (status = 200, description = "Device updated successfully", body = DeviceResponse),
        (status = 400, description = "Validation error", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Device not found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict - Attempt to change restricted fields while device is IN_USE", body = Problem, content_type = "application/problem+json")
    )
)]
async fn patch_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<DeviceRequest>, JsonRejection>,
) -> ApiResult<Json<DeviceResponse>> {
    let id = device_id(id)?;
    let Json(request) = body?;
    let device = state
        .devices
        .partial_update(id, request.into_changes()?)
        .await?;

    Ok(Json(device.into()))
}

/// Get a device by ID
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device retrieved successfully", body = DeviceResponse),
        (status = 404, description = "Device not found", body = Problem, content_type = "application/problem+json")
    )
)]
async fn get_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = state.devices.find_by_id(device_id(id)?).await?;
    Ok(Json(device.into()))
}

/// List all devices
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    tag = "Devices",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceResponse>)
    )
)]
async fn list_devices(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DeviceResponse>>> {
    Ok(responses(state.devices.find_all().await?))
}

/// Get devices by brand
///
/// Exact, case-sensitive match on the brand name.
#[utoipa::path(
    get,
    path = "/api/v1/devices/brand/{brand}",
    tag = "Devices",
    params(("brand" = String, Path, description = "Device brand")),
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceResponse>)
    )
)]
async fn devices_by_brand(
    State(state): State<Arc<AppState>>,
    brand: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<DeviceResponse>>> {
    let Path(brand) = brand?;
    Ok(responses(state.devices.find_by_brand(&brand).await?))
}

/// Get devices by state
#[utoipa::path(
    get,
    path = "/api/v1/devices/state/{state}",
    tag = "Devices",
    params(("state" = DeviceState, Path, description = "Device state (AVAILABLE, IN_USE, INACTIVE)")),
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceResponse>),
        (status = 400, description = "Unknown state", body = Problem, content_type = "application/problem+json")
    )
)]
async fn devices_by_state(
    State(state): State<Arc<AppState>>,
    device_state: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<DeviceResponse>>> {
    let Path(device_state) = device_state?;
    let device_state: DeviceState = device_state.parse()?;
    Ok(responses(state.devices.find_by_state(device_state).await?))
}

/// Delete a device
///
/// Devices in state IN_USE cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/devices/{id}",
    tag = "Devices",
    params(("id" = i64, Path, description = "Device ID")),
    responses(
        (status = 204, description = "Device deleted successfully"),
        (status = 404, description = "Device not found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict - Device in use cannot be deleted", body = Problem, content_type = "application/problem+json")
    )
)]
async fn delete_device(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    state.devices.delete(device_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
