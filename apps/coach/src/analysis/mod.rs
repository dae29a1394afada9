//! Analysis pipeline — Nexus scoring, committee review, optional Chameleon
//! rewrite, folded into one `AnalysisResult`.

pub mod handlers;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chameleon::{generate_chameleon_metrics, Archetype, ChameleonMetric};
use crate::committee::{AgentFeedback, AgentInput, Committee};
use crate::errors::AppError;
use crate::nexus::{score_resume, NexusAnalysis};

/// Minimum length, in characters, of both resume text and job description.
pub const MIN_INPUT_CHARS: usize = 50;

const NEXUS_WEIGHT: f64 = 0.6;
const COMMITTEE_WEIGHT: f64 = 0.4;

const DEFAULT_JOB_TITLE: &str = "Position";
const DEFAULT_COMPANY: &str = "Company";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTier {
    StrongMatch,
    ModerateMatch,
    WeakMatch,
    NoMatch,
}

impl MatchTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            75.. => MatchTier::StrongMatch,
            50..=74 => MatchTier::ModerateMatch,
            25..=49 => MatchTier::WeakMatch,
            _ => MatchTier::NoMatch,
        }
    }
}

/// Mean verdict score across the committee. 0 for an empty committee.
pub fn committee_average(feedback: &[AgentFeedback]) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }
    let total: u32 = feedback.iter().map(|f| f.verdict.score()).sum();
    total as f64 / feedback.len() as f64
}

/// `round(consensus × 0.6 + committee × 0.4)`
pub fn match_score(consensus_score: u32, committee_avg: f64) -> u32 {
    (consensus_score as f64 * NEXUS_WEIGHT + committee_avg * COMMITTEE_WEIGHT).round() as u32
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub archetype: Option<String>,
}

/// Checked inputs, with defaults applied.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_title: String,
    pub company: String,
    pub archetype: Option<Archetype>,
}

impl AnalyzeRequest {
    pub fn validate(self) -> Result<ValidatedRequest, AppError> {
        if self.resume_text.chars().count() < MIN_INPUT_CHARS {
            return Err(AppError::Validation(format!(
                "Resume text is too short (min {MIN_INPUT_CHARS} characters)"
            )));
        }
        if self.job_description.chars().count() < MIN_INPUT_CHARS {
            return Err(AppError::Validation(format!(
                "Job description is too short (min {MIN_INPUT_CHARS} characters)"
            )));
        }

        let archetype = match non_blank(self.archetype) {
            Some(raw) => Some(raw.parse::<Archetype>().map_err(AppError::Validation)?),
            None => None,
        };

        Ok(ValidatedRequest {
            resume_text: self.resume_text,
            job_description: self.job_description,
            job_title: non_blank(self.job_title).unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string()),
            company: non_blank(self.company).unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
            archetype,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: u32,
    pub match_tier: MatchTier,
    pub committee_feedback: Vec<AgentFeedback>,
    pub nexus_analysis: NexusAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chameleon_metrics: Option<Vec<ChameleonMetric>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_archetype: Option<Archetype>,
    pub job_title: String,
    pub company: String,
    /// RFC 3339, UTC, millisecond precision.
    pub analyzed_at: String,
}

/// Runs the Nexus engine off the async executor.
pub async fn score_resume_blocking(
    resume_text: String,
    job_description: String,
) -> Result<NexusAnalysis, AppError> {
    tokio::task::spawn_blocking(move || score_resume(&resume_text, &job_description))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in Nexus scoring: {e}"))
        })
}

/// Full pipeline for one request.
pub async fn run_analysis(
    committee: &Committee,
    request: ValidatedRequest,
) -> Result<AnalysisResult, AppError> {
    info!("Running Nexus engine");
    let nexus =
        score_resume_blocking(request.resume_text.clone(), request.job_description.clone()).await?;

    info!("Running committee evaluation");
    let feedback = committee
        .evaluate(&AgentInput {
            resume_text: &request.resume_text,
            job_description: &request.job_description,
            job_title: &request.job_title,
            company: &request.company,
            nexus_analysis: Some(&nexus),
        })
        .await;

    let chameleon_metrics = request.archetype.map(|archetype| {
        info!("Generating Chameleon metrics for {archetype}");
        generate_chameleon_metrics(&request.resume_text, archetype)
    });

    let result = assemble(request, nexus, feedback, chameleon_metrics, Utc::now());
    info!("Analysis complete. Score: {}", result.match_score);
    Ok(result)
}

fn assemble(
    request: ValidatedRequest,
    nexus: NexusAnalysis,
    committee_feedback: Vec<AgentFeedback>,
    chameleon_metrics: Option<Vec<ChameleonMetric>>,
    analyzed_at: DateTime<Utc>,
) -> AnalysisResult {
    let match_score = match_score(nexus.consensus_score, committee_average(&committee_feedback));

    AnalysisResult {
        match_score,
        match_tier: MatchTier::from_score(match_score),
        committee_feedback,
        nexus_analysis: nexus,
        chameleon_metrics,
        selected_archetype: request.archetype,
        job_title: request.job_title,
        company: request.company,
        analyzed_at: analyzed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::committee::{AgentRole, Verdict};

    fn feedback(verdicts: &[Verdict]) -> Vec<AgentFeedback> {
        verdicts
            .iter()
            .map(|v| AgentFeedback {
                agent_name: AgentRole::Hr,
                verdict: *v,
                concerns: vec![],
                praises: vec![],
            })
            .collect()
    }

    fn request(archetype: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest {
            resume_text: "r".repeat(60),
            job_description: "j".repeat(60),
            job_title: None,
            company: Some("  ".into()),
            archetype: archetype.map(str::to_string),
        }
    }

    #[test]
    fn test_match_tier_boundaries() {
        assert_eq!(MatchTier::from_score(100), MatchTier::StrongMatch);
        assert_eq!(MatchTier::from_score(75), MatchTier::StrongMatch);
        assert_eq!(MatchTier::from_score(74), MatchTier::ModerateMatch);
        assert_eq!(MatchTier::from_score(50), MatchTier::ModerateMatch);
        assert_eq!(MatchTier::from_score(49), MatchTier::WeakMatch);
        assert_eq!(MatchTier::from_score(25), MatchTier::WeakMatch);
        assert_eq!(MatchTier::from_score(24), MatchTier::NoMatch);
        assert_eq!(MatchTier::from_score(0), MatchTier::NoMatch);
    }

    #[test]
    fn test_committee_average() {
        let fb = feedback(&[Verdict::Hire, Verdict::Interview, Verdict::NoHire]);
        assert_eq!(committee_average(&fb), 60.0);
        assert_eq!(committee_average(&[]), 0.0);
    }

    #[test]
    fn test_match_score_weighting() {
        // 80×0.6 + 70×0.4 = 48 + 28 = 76
        let avg = committee_average(&feedback(&[Verdict::Hire, Verdict::Hire, Verdict::NoHire]));
        assert_eq!(match_score(80, avg), 76);
        // 0×0.6 + 60×0.4 = 24
        assert_eq!(match_score(0, 60.0), 24);
        assert_eq!(match_score(100, 90.0), 96);
    }

    #[test]
    fn test_validate_rejects_short_inputs() {
        let mut req = request(None);
        req.resume_text = "too short".into();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Resume text is too short"));

        let mut req = request(None);
        req.job_description = "x".repeat(49);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Job description is too short"));
    }

    #[test]
    fn test_validate_counts_chars_not_bytes() {
        let mut req = request(None);
        req.resume_text = "é".repeat(30); // 60 bytes, 30 chars
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_applies_defaults() {
        let v = request(None).validate().unwrap();
        assert_eq!(v.job_title, "Position");
        assert_eq!(v.company, "Company");
        assert_eq!(v.archetype, None);
    }

    #[test]
    fn test_validate_parses_archetype() {
        assert_eq!(request(Some("speed")).validate().unwrap().archetype, Some(Archetype::Speed));
        assert_eq!(request(Some("")).validate().unwrap().archetype, None);
        assert!(request(Some("chaotic")).validate().is_err());
    }

    #[test]
    fn test_assemble_result() {
        let v = request(Some("safety")).validate().unwrap();
        let nexus = score_resume(&v.resume_text, &v.job_description);
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let result = assemble(
            v,
            nexus,
            feedback(&[Verdict::Interview; 3]),
            Some(vec![]),
            at,
        );
        assert_eq!(result.match_score, 24);
        assert_eq!(result.match_tier, MatchTier::NoMatch);
        assert_eq!(result.analyzed_at, "2026-03-01T12:00:00.000Z");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["selectedArchetype"], "safety");
        assert_eq!(json["matchTier"], "NO_MATCH");
        assert_eq!(json["jobTitle"], "Position");
        assert!(json.get("nexusAnalysis").is_some());
        assert!(json.get("committeeFeedback").is_some());
    }

    #[test]
    fn test_optional_fields_omitted_without_archetype() {
        let v = request(None).validate().unwrap();
        let nexus = score_resume(&v.resume_text, &v.job_description);
        let result = assemble(v, nexus, feedback(&[Verdict::Hire; 3]), None, Utc::now());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("chameleonMetrics").is_none());
        assert!(json.get("selectedArchetype").is_none());
    }
}
