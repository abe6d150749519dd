//! Health check for the browser UI and load balancers

use axum::Json;
use chrono::{SecondsFormat, Utc};
use eventforge_domain::constants::SERVICE_NAME;
use serde::Serialize;

/// Liveness payload
///
/// # Example Response
/// ```json
/// { "ok": true, "service": "eventforge", "time": "2025-09-01T18:00:00.000Z" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub service: &'static str,
    pub time: String,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            ok: true,
            service: SERVICE_NAME,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// `GET /api/health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::now())
}
