//! HTTP dispatcher for the vehicle catalog
//!
//! - `routes`: the `/vehiculos` form dispatcher and `/health`
//! - `middleware`: request id and request logging
//!
//! Every `/vehiculos` outcome renders the same [`ListView`]: the current
//! records plus an optional form payload and a success or error message.
//! Failures that cannot render a list view use [`ApiResponse`] with an
//! [`ErrorInfo`].

pub mod middleware;
pub mod routes;

pub use middleware::{request_logging_middleware, RequestId, REQUEST_ID_HEADER};
pub use routes::{
    create_router, dispatch_get, dispatch_post, ApiError, HandlerState, ListQuery, Page,
    VehicleForm,
};

use serde::{Deserialize, Serialize};

use garage_core::{Vehicle, VehicleDraft};

/// Standard wrapper for non list view responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub metadata: ResponseMetadata,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, request_id: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResponseMetadata::new(request_id),
        }
    }

    pub fn error(error: ErrorInfo, request_id: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
            metadata: ResponseMetadata::new(request_id),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
    /// ISO 8601
    pub timestamp: String,
    pub version: String,
}

impl ResponseMetadata {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The catalog page: all records, newest first, plus what the form shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    pub vehicles: Vec<Vehicle>,
    /// Record loaded into the edit form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing: Option<Vehicle>,
    /// Blank or rejected candidate shown in the create form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<VehicleDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub store: StoreHealth,
    pub uptime_secs: u64,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    pub backend: String,
    /// Whether a store session could be opened
    pub reachable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_error() {
        let response = ApiResponse::<()>::error(
            ErrorInfo::new("BAD_REQUEST", "invalid id"),
            "req-1".to_string(),
        );
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.unwrap().message, "invalid id");
        assert_eq!(response.metadata.request_id, "req-1");
    }

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(3usize, "req-2".to_string());
        assert!(response.success);
        assert_eq!(response.data, Some(3));
    }

    #[test]
    fn test_list_view_omits_empty_parts() {
        let view = ListView {
            ok: Some("vehicle created".to_string()),
            ..ListView::default()
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "vehicles": [], "ok": "vehicle created" })
        );
    }
}
