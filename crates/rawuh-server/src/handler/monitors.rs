//! Liveness probe.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "rawuh_server::handler::monitors";

/// Reports that the process is up. Dependencies are not probed.
async fn health_status() -> (StatusCode, Json<MonitorStatus>) {
    tracing::trace!(target: TRACING_TARGET, "Health status requested");
    (StatusCode::OK, Json(MonitorStatus::default()))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health status")
        .description("Public liveness probe. Returns the service version.")
        .response::<200, Json<MonitorStatus>>()
}

/// Returns an [`ApiRouter`] with the public monitoring routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_is_public() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
