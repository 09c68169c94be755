//! Records exchanged with the workflow execution API.
//!
//! The backend has shipped several shapes for the same records over time
//! (numeric vs string ids, `status` vs `state`, epoch vs ISO timestamps,
//! `created_at` vs `creationTime`). Decoding accepts all of them and
//! normalizes into a single representation; encoding always produces the
//! canonical shape.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Named, reusable template describing what a run executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Stable identifier; used for ordering and as the run-creation reference.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    /// Source text of the definition (wire name `definition`).
    #[serde(rename = "definition", default)]
    pub definition_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

/// Aggregate status of a workflow run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum RunStatus {
    #[default]
    Unknown,
    Running,
    Finished,
    Failed,
    Canceled,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    /// Cancellation is only meaningful while the run is executing.
    pub fn is_cancelable(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<&str> for RunStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "finished" => Self::Finished,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Summary record for one run as returned by `GET /workflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "state", default)]
    pub status: RunStatus,
    #[serde(deserialize_with = "timestamp", default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_jobs: u32,
    #[serde(default)]
    pub finished_jobs: u32,
}

/// State of a single job inside a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum JobState {
    #[default]
    Unknown,
    Queued,
    Initializing,
    Running,
    Paused,
    Complete,
    ExecutorError,
    SystemError,
    Canceled,
}

/// Fixed color class assigned to each job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobColor {
    Gray,
    Blue,
    Yellow,
    Green,
    Red,
    Orange,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Queued => "queued",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Complete => "complete",
            Self::ExecutorError => "executor_error",
            Self::SystemError => "system_error",
            Self::Canceled => "canceled",
        }
    }

    pub fn color(self) -> JobColor {
        match self {
            Self::Unknown | Self::Queued => JobColor::Gray,
            Self::Initializing | Self::Running => JobColor::Blue,
            Self::Paused => JobColor::Yellow,
            Self::Complete => JobColor::Green,
            Self::ExecutorError | Self::SystemError => JobColor::Red,
            Self::Canceled => JobColor::Orange,
        }
    }
}

impl From<&str> for JobState {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "initializing" => Self::Initializing,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "complete" => Self::Complete,
            "executor_error" => Self::ExecutorError,
            "system_error" => Self::SystemError,
            "canceled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for JobState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One unit of work belonging to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "creationTime", alias = "creation_time", deserialize_with = "timestamp", default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub state: JobState,
    /// Opaque newline-delimited log text.
    #[serde(default)]
    pub logs: String,
}

/// Run metadata with its jobs, as returned by `GET /workflow/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "timestamp", default)]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "state", default)]
    pub status: RunStatus,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Body of `POST /run`. The backend reads the definition from `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRunRequest {
    #[serde(rename = "id")]
    pub workflow_definition_id: String,
    pub input_dir: String,
    pub output_dir: String,
}

/// Successful response of `POST /run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRunResponse {
    #[serde(alias = "id", deserialize_with = "string_or_number")]
    pub workflow_id: String,
}

/// How the run detail view gathers a run and its jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailFetchMode {
    /// One `GET /workflow/:id` that embeds the jobs.
    #[default]
    Combined,
    /// `GET /workflow/:id` for metadata, then `GET /workflow/:id/jobs`.
    Split,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

/// Accepts epoch milliseconds, RFC 3339 strings, or naive ISO strings (read as UTC).
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value as i64))
                .ok_or_else(|| serde::de::Error::custom("timestamp out of range"))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| serde::de::Error::custom(format!("invalid epoch timestamp {millis}")))
        }
        Value::String(text) => parse_timestamp(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'"))),
        Value::Null => Ok(DateTime::<Utc>::default()),
        other => Err(serde::de::Error::custom(format!("expected timestamp, got {other}"))),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
