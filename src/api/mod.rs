//! REST API server for debrief.
//!
//! Exposes the meeting workflow to the display layer: audio upload,
//! transcript editing, analysis, action-item review, and scheduling.

pub mod error;
pub mod routes;

use crate::workflow::MeetingWorkflow;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

pub use routes::workflow::WorkflowApiState;

pub struct ApiServer {
    port: u16,
    workflow: Arc<MeetingWorkflow>,
}

impl ApiServer {
    pub fn new(workflow: Arc<MeetingWorkflow>, port: u16) -> Self {
        Self { port, workflow }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::workflow::router(WorkflowApiState {
                workflow: self.workflow,
            }))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET   /                   - Service info");
        info!("  GET   /version            - Version info");
        info!("  GET   /state              - Workflow state snapshot");
        info!("  POST  /process-audio      - Upload meeting audio (multipart)");
        info!("  PUT   /transcript         - Edit the transcript directly");
        info!("  POST  /process-transcript - Extract summary/actions/decisions");
        info!("  PATCH /actions            - Edit one action-item field");
        info!("  POST  /schedule           - Schedule the eligible actions");
        info!("  POST  /reset              - Clear the workflow");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "debrief",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "debrief"
    }))
}
