//! Route definitions
//!
//! - `GET /vehiculos?action=list|new|edit|delete[&id=N]`
//! - `POST /vehiculos` with a form encoded `action` of create, update or
//!   delete; any other action redirects to the list
//! - `GET /health`
//!
//! The engine is synchronous, so each request runs its dispatch on the
//! blocking pool. Validation messages reach the user verbatim; storage
//! failures are logged and shown as "database error".

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::trace::TraceLayer;

use garage_core::{EngineError, VehicleDraft, VehicleId, VehicleService};

use super::middleware::{request_logging_middleware, RequestId};
use super::{ApiResponse, ErrorInfo, HealthResponse, HealthStatus, ListView, StoreHealth};

/// Where unknown POST actions are sent
pub const LIST_LOCATION: &str = "/vehiculos?action=list";

pub const MSG_CREATED: &str = "vehicle created";
pub const MSG_UPDATED: &str = "vehicle updated";
pub const MSG_DELETED: &str = "vehicle deleted";
pub const MSG_INVALID_ID: &str = "invalid id";
pub const MSG_DATABASE_ERROR: &str = "database error";

/// Handler state shared across all routes
#[derive(Clone)]
pub struct HandlerState {
    pub service: VehicleService,
    /// Start time for uptime calculation
    pub start_time: Instant,
}

impl HandlerState {
    pub fn new(service: VehicleService) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

/// Errors that cannot be rendered as a list view
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_info = match &self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                ErrorInfo::new(self.error_code(), msg)
            }
        };
        let response = ApiResponse::<()>::error(error_info, uuid::Uuid::new_v4().to_string());
        (status, Json(response)).into_response()
    }
}

/// Query string of `GET /vehiculos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Form body of `POST /vehiculos`
///
/// Field names follow the catalog form; the Spanish names the legacy form
/// posts are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleForm {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "placa")]
    pub plate: Option<String>,
    #[serde(default, alias = "marca")]
    pub brand: Option<String>,
    #[serde(default, rename = "modelo", alias = "model_year")]
    pub model_year: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "propietario")]
    pub owner: Option<String>,
}

impl VehicleForm {
    pub fn draft(&self) -> VehicleDraft {
        VehicleDraft {
            plate: self.plate.clone(),
            brand: self.brand.clone(),
            model_year: self.model_year.clone(),
            color: self.color.clone(),
            owner: self.owner.clone(),
        }
    }
}

/// A rendered dispatcher outcome
#[derive(Debug)]
pub enum Page {
    View(StatusCode, ListView),
    Redirect,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::View(status, view) => (status, Json(view)).into_response(),
            Page::Redirect => Redirect::to(LIST_LOCATION).into_response(),
        }
    }
}

/// Status and list view parts produced by one action
type Outcome = (StatusCode, ListView);

/// Create the router with all routes
pub fn create_router(state: HandlerState) -> Router {
    Router::new()
        .route("/vehiculos", get(vehicles_get).post(vehicles_post))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /vehiculos
pub async fn vehicles_get(
    State(state): State<HandlerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Page, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let service = state.service.clone();
    run_blocking(move || dispatch_get(&service, &query)).await
}

/// POST /vehiculos
pub async fn vehicles_post(
    State(state): State<HandlerState>,
    form: Result<Form<VehicleForm>, FormRejection>,
) -> Result<Page, ApiError> {
    let Form(form) = form.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let service = state.service.clone();
    run_blocking(move || dispatch_post(&service, &form)).await
}

/// GET /health
pub async fn health_check(
    State(state): State<HandlerState>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let store = state.service.store().clone();
    let backend = store.backend().to_string();
    let reachable = tokio::task::spawn_blocking(move || match store.session() {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "store unreachable");
            false
        }
    })
    .await
    .unwrap_or(false);

    let (status, code) = if reachable {
        (HealthStatus::Healthy, StatusCode::OK)
    } else {
        (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
    };

    let health = HealthResponse {
        status,
        store: StoreHealth { backend, reachable },
        uptime_secs: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (code, Json(ApiResponse::success(health, request_id.0)))
}

async fn run_blocking<F>(task: F) -> Result<Page, ApiError>
where
    F: FnOnce() -> Result<Page, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|err| {
        tracing::error!(error = %err, "dispatch task failed");
        ApiError::Internal("internal error".to_string())
    })?
}

/// Run a `GET /vehiculos` action and render the list
pub fn dispatch_get(service: &VehicleService, query: &ListQuery) -> Result<Page, ApiError> {
    let (status, view) = match query.action.as_deref().unwrap_or("list") {
        "new" => (
            StatusCode::OK,
            ListView {
                draft: Some(VehicleDraft::new()),
                ..ListView::default()
            },
        ),
        "edit" => edit(service, query.id.as_deref()),
        "delete" => delete(service, query.id.as_deref()),
        _ => (StatusCode::OK, ListView::default()),
    };
    render(service, status, view)
}

/// Run a `POST /vehiculos` action and render the list
pub fn dispatch_post(service: &VehicleService, form: &VehicleForm) -> Result<Page, ApiError> {
    let (status, view) = match form.action.as_deref() {
        Some("create") => create(service, form),
        Some("update") => update(service, form),
        Some("delete") => delete(service, form.id.as_deref()),
        other => {
            tracing::debug!(action = ?other, "unknown action, redirecting to list");
            return Ok(Page::Redirect);
        }
    };
    render(service, status, view)
}

fn edit(service: &VehicleService, raw_id: Option<&str>) -> Outcome {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(outcome) => return outcome,
    };
    match service.find_by_id(id) {
        Ok(Some(vehicle)) => (
            StatusCode::OK,
            ListView {
                editing: Some(vehicle),
                ..ListView::default()
            },
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_view(format!("record not found (id={id})")),
        ),
        Err(err) => failed(err),
    }
}

fn create(service: &VehicleService, form: &VehicleForm) -> Outcome {
    let draft = form.draft();
    match service.create(&draft) {
        Ok(_) => ok_view(MSG_CREATED),
        Err(err) => with_draft(failed(err), draft),
    }
}

fn update(service: &VehicleService, form: &VehicleForm) -> Outcome {
    let id = match parse_id(form.id.as_deref()) {
        Ok(id) => id,
        Err(outcome) => return outcome,
    };
    let draft = form.draft();
    match service.update(id, &draft) {
        Ok(()) => ok_view(MSG_UPDATED),
        Err(err) => with_draft(failed(err), draft),
    }
}

fn delete(service: &VehicleService, raw_id: Option<&str>) -> Outcome {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(outcome) => return outcome,
    };
    match service.delete(id) {
        Ok(()) => ok_view(MSG_DELETED),
        Err(err) => failed(err),
    }
}

fn render(service: &VehicleService, status: StatusCode, mut view: ListView) -> Result<Page, ApiError> {
    view.vehicles = service.list_all().map_err(|err| {
        tracing::error!(error = %err, "failed to load vehicle list");
        ApiError::Internal(MSG_DATABASE_ERROR.to_string())
    })?;
    Ok(Page::View(status, view))
}

fn parse_id(raw: Option<&str>) -> Result<VehicleId, Outcome> {
    raw.and_then(|value| value.trim().parse::<VehicleId>().ok())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, error_view(MSG_INVALID_ID)))
}

fn failed(err: EngineError) -> Outcome {
    match err {
        EngineError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, error_view(err.to_string())),
        EngineError::Storage(err) => {
            tracing::error!(error = %err, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view(MSG_DATABASE_ERROR),
            )
        }
    }
}

fn ok_view(message: &str) -> Outcome {
    (
        StatusCode::OK,
        ListView {
            ok: Some(message.to_string()),
            ..ListView::default()
        },
    )
}

fn error_view(message: impl Into<String>) -> ListView {
    ListView {
        error: Some(message.into()),
        ..ListView::default()
    }
}

fn with_draft((status, mut view): Outcome, draft: VehicleDraft) -> Outcome {
    view.draft = Some(draft);
    (status, view)
}
