//! Fakes shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flowdash_api::{ApiError, WorkflowApi};
use flowdash_types::{CreateRunRequest, CreateRunResponse, Job, RunDetail, WorkflowDefinition, WorkflowRun};
use flowdash_util::DashboardConfig;
use reqwest::Method;

use crate::app::{App, SharedCtx};

/// Records every call as `"<METHOD> <path>"` and answers with empty
/// collections, or with HTTP 500 when built with [`RecordingApi::failing`].
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingApi {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer<T>(&self, method: Method, call: String, value: T) -> Result<T, ApiError> {
        self.calls.lock().expect("calls lock").push(call.clone());
        if self.fail {
            return Err(ApiError::Status {
                method,
                url: call,
                status: 500,
                body: "internal error".into(),
            });
        }
        Ok(value)
    }
}

#[async_trait]
impl WorkflowApi for RecordingApi {
    async fn list_definitions(&self) -> Result<Vec<WorkflowDefinition>, ApiError> {
        self.answer(Method::GET, "GET /workflow_definition".into(), Vec::new())
    }

    async fn create_run(&self, request: &CreateRunRequest) -> Result<CreateRunResponse, ApiError> {
        let call = format!(
            "POST /run {} {} {}",
            request.workflow_definition_id, request.input_dir, request.output_dir
        );
        let response = CreateRunResponse {
            workflow_id: format!("run-{}", request.workflow_definition_id),
        };
        self.answer(Method::POST, call, response)
    }

    async fn list_runs(&self) -> Result<Vec<WorkflowRun>, ApiError> {
        self.answer(Method::GET, "GET /workflow".into(), Vec::new())
    }

    async fn run_detail(&self, run_id: &str) -> Result<RunDetail, ApiError> {
        let detail = RunDetail {
            id: run_id.to_string(),
            created_at: Default::default(),
            status: Default::default(),
            jobs: Vec::new(),
        };
        self.answer(Method::GET, format!("GET /workflow/{run_id}"), detail)
    }

    async fn run_jobs(&self, run_id: &str) -> Result<Vec<Job>, ApiError> {
        self.answer(Method::GET, format!("GET /workflow/{run_id}/jobs"), Vec::new())
    }

    async fn cancel_run(&self, run_id: &str) -> Result<(), ApiError> {
        self.answer(Method::DELETE, format!("DELETE /workflow/{run_id}"), ())
    }
}

/// App on the home route backed by a [`RecordingApi`] and default config.
pub fn test_app() -> App {
    let ctx = SharedCtx::new(Arc::new(RecordingApi::default()), &DashboardConfig::default());
    App::new(ctx)
}
