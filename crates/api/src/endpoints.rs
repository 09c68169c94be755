//! Typed endpoint operations used by the dashboard.

use std::fmt::Debug;

use async_trait::async_trait;
use flowdash_types::{CreateRunRequest, CreateRunResponse, DetailFetchMode, Job, RunDetail, WorkflowDefinition, WorkflowRun};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{ApiError, WorkflowClient};

/// Characters escaped when a run id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'?').add(b'`');

/// Every remote operation the dashboard performs.
///
/// Callers hold an `Arc<dyn WorkflowApi>` so the transport can be swapped
/// (for example by a recording fake in tests).
#[async_trait]
pub trait WorkflowApi: Send + Sync + Debug {
    /// `GET /workflow_definition`
    async fn list_definitions(&self) -> Result<Vec<WorkflowDefinition>, ApiError>;
    /// `POST /run`
    async fn create_run(&self, request: &CreateRunRequest) -> Result<CreateRunResponse, ApiError>;
    /// `GET /workflow`
    async fn list_runs(&self) -> Result<Vec<WorkflowRun>, ApiError>;
    /// `GET /workflow/:id`
    async fn run_detail(&self, run_id: &str) -> Result<RunDetail, ApiError>;
    /// `GET /workflow/:id/jobs`
    async fn run_jobs(&self, run_id: &str) -> Result<Vec<Job>, ApiError>;
    /// `DELETE /workflow/:id`
    async fn cancel_run(&self, run_id: &str) -> Result<(), ApiError>;
}

/// API path of a single run, with the id escaped as a path segment.
pub fn run_path(run_id: &str) -> String {
    format!("/workflow/{}", utf8_percent_encode(run_id, PATH_SEGMENT))
}

#[async_trait]
impl WorkflowApi for WorkflowClient {
    async fn list_definitions(&self) -> Result<Vec<WorkflowDefinition>, ApiError> {
        Ok(self.get("/workflow_definition").await?.data)
    }

    async fn create_run(&self, request: &CreateRunRequest) -> Result<CreateRunResponse, ApiError> {
        Ok(self.post("/run", Some(request)).await?.data)
    }

    async fn list_runs(&self) -> Result<Vec<WorkflowRun>, ApiError> {
        Ok(self.get("/workflow").await?.data)
    }

    async fn run_detail(&self, run_id: &str) -> Result<RunDetail, ApiError> {
        Ok(self.get(&run_path(run_id)).await?.data)
    }

    async fn run_jobs(&self, run_id: &str) -> Result<Vec<Job>, ApiError> {
        Ok(self.get(&format!("{}/jobs", run_path(run_id))).await?.data)
    }

    async fn cancel_run(&self, run_id: &str) -> Result<(), ApiError> {
        self.delete(&run_path(run_id)).await.map(|_| ())
    }
}

/// Fetch a run together with its jobs using the configured request shape.
///
/// In [`DetailFetchMode::Split`] the jobs embedded in the metadata response
/// (if any) are replaced by the dedicated jobs listing.
pub async fn fetch_run_detail(api: &dyn WorkflowApi, run_id: &str, mode: DetailFetchMode) -> Result<RunDetail, ApiError> {
    let mut detail = api.run_detail(run_id).await?;
    if mode == DetailFetchMode::Split {
        detail.jobs = api.run_jobs(run_id).await?;
    }
    Ok(detail)
}
