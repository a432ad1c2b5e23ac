//! Gateway request/error types shared by handlers.

use tide_allocations::AllocationFilters;
use tide_core::is_truthy_flag;

use super::*;

/// Error payload mapped to a JSON HTTP error envelope.
#[derive(Debug)]
pub(super) struct GatewayApiError {
    pub(super) status: StatusCode,
    pub(super) code: &'static str,
    pub(super) message: String,
}

impl GatewayApiError {
    pub(super) fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub(super) fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub(super) fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }
}

impl From<AllocationServiceError> for GatewayApiError {
    fn from(error: AllocationServiceError) -> Self {
        match &error {
            AllocationServiceError::ScenarioNotFound(_) => {
                Self::not_found("scenario_not_found", error.to_string())
            }
            AllocationServiceError::SnapshotNotFound { .. } => {
                Self::not_found("snapshot_not_found", error.to_string())
            }
            AllocationServiceError::SnapshotParse(_) => {
                tracing::error!(%error, "snapshot could not be parsed");
                Self::internal("snapshot_parse_error", error.to_string())
            }
        }
    }
}

impl IntoResponse for GatewayApiError {
    fn into_response(self) -> Response {
        let error_type = if self.status.is_client_error() {
            "invalid_request_error"
        } else {
            "server_error"
        };
        (
            self.status,
            Json(json!({
                "error": {
                    "type": error_type,
                    "code": self.code,
                    "message": self.message,
                }
            })),
        )
            .into_response()
    }
}

/// Raw query string of `GET /scenarios/{name}/allocations`.
///
/// Values are parsed leniently; unusable values fall back to "no constraint".
/// A repeated parameter (including both spellings of the critical flag) keeps
/// its first non-blank value. Unknown parameters are ignored.
#[derive(Debug, Default)]
pub(super) struct AllocationsQuery {
    latest: Option<String>,
    timestamp: Option<String>,
    zone: Option<String>,
    impact: Option<String>,
    critical_only: Option<String>,
    limit: Option<String>,
}

impl FromIterator<(String, String)> for AllocationsQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "latest" => &mut query.latest,
                "timestamp" => &mut query.timestamp,
                "zone" => &mut query.zone,
                "impact" => &mut query.impact,
                "criticalOnly" | "critical_only" => &mut query.critical_only,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() && !value.trim().is_empty() {
                *slot = Some(value);
            }
        }
        query
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

impl AllocationsQuery {
    pub(super) fn into_filters(self) -> AllocationFilters {
        AllocationFilters {
            latest: self.latest.as_deref().is_some_and(is_truthy_flag),
            timestamp: non_empty(self.timestamp),
            zone: non_empty(self.zone),
            impact: non_empty(self.impact),
            critical_only: self.critical_only.as_deref().is_some_and(is_truthy_flag),
            limit: self
                .limit
                .as_deref()
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .filter(|limit| *limit > 0),
        }
    }
}
