//! Service banner

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// GET / - Service name, version and routes
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "botaniq-server",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /health",
            "POST /image-classify/",
            "POST /health-detect/",
            "POST /health-predict/",
        ],
    })
}
