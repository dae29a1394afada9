//! Job Tracking Board — applications moving through saved → applied →
//! interview → offer, with funnel stats.
//!
//! `JobBoard` is a plain value; the server holds it behind a lock and persists
//! it through a `JobStore` after every mutation. Callers pass the clock in.

pub mod handlers;
pub mod models;
pub mod store;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::jobs::models::{JobApplication, JobStats, JobStatus, JobUpdate, NewJob};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobBoard {
    jobs: Vec<JobApplication>,
}

impl JobBoard {
    pub fn new(jobs: Vec<JobApplication>) -> Self {
        Self { jobs }
    }

    /// All applications in insertion order.
    pub fn jobs(&self) -> &[JobApplication] {
        &self.jobs
    }

    pub fn add(&mut self, new: NewJob, now: DateTime<Utc>) -> JobApplication {
        let job = JobApplication {
            id: Uuid::new_v4(),
            title: new.title,
            company: new.company,
            status: new.status,
            applied_at: new.applied_at,
            url: new.url,
            notes: new.notes,
            analysis_result: new.analysis_result,
            created_at: now,
            updated_at: now,
        };
        self.jobs.push(job.clone());
        job
    }

    /// Moves an application to `status`. The first move to `applied` stamps
    /// `applied_at`; later moves keep the original stamp.
    pub fn update_status(
        &mut self,
        id: Uuid,
        status: JobStatus,
        now: DateTime<Utc>,
    ) -> Option<&JobApplication> {
        let job = self.jobs.iter_mut().find(|j| j.id == id)?;
        job.status = status;
        if status == JobStatus::Applied && job.applied_at.is_none() {
            job.applied_at = Some(now);
        }
        job.updated_at = now;
        Some(&*job)
    }

    pub fn update(
        &mut self,
        id: Uuid,
        update: JobUpdate,
        now: DateTime<Utc>,
    ) -> Option<&JobApplication> {
        let job = self.jobs.iter_mut().find(|j| j.id == id)?;

        if let Some(title) = update.title {
            job.title = title;
        }
        if let Some(company) = update.company {
            job.company = company;
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        if update.applied_at.is_some() {
            job.applied_at = update.applied_at;
        }
        if update.url.is_some() {
            job.url = update.url;
        }
        if update.notes.is_some() {
            job.notes = update.notes;
        }
        if update.analysis_result.is_some() {
            job.analysis_result = update.analysis_result;
        }
        job.updated_at = now;
        Some(&*job)
    }

    /// Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != id);
        self.jobs.len() != before
    }

    pub fn by_status(&self, status: JobStatus) -> Vec<JobApplication> {
        self.jobs
            .iter()
            .filter(|j| j.status == status)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> JobStats {
        let count = |status: JobStatus| self.jobs.iter().filter(|j| j.status == status).count();
        let saved = count(JobStatus::Saved);
        let applied = count(JobStatus::Applied);
        let interview = count(JobStatus::Interview);
        let offer = count(JobStatus::Offer);

        JobStats {
            total: self.jobs.len(),
            saved,
            applied,
            interview,
            offer,
            response_rate: percent(interview + offer, applied + interview + offer),
            interview_rate: percent(offer, interview + offer),
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
