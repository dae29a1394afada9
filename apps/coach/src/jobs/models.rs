use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage of an application. Order is the board's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interview,
    Offer,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Saved => "saved",
            JobStatus::Applied => "applied",
            JobStatus::Interview => "interview",
            JobStatus::Offer => "offer",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown job status '{s}' (expected saved, applied, interview or offer)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Snapshot of an analysis run, stored as the client sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/jobs`. The board assigns id and timestamps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub status: JobStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub analysis_result: Option<serde_json::Value>,
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub status: Option<JobStatus>,
    pub applied_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub analysis_result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total: usize,
    pub saved: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    /// Share of active applications that got a response, in percent.
    pub response_rate: f64,
    /// Share of interviews that became offers, in percent.
    pub interview_rate: f64,
}
