//! Nexus engine — resume vs job-description analysis.
//!
//! Flow: extract skills → score depth → infer implicit skills →
//!       extract requirements → match → consensus.
//!
//! Pure and synchronous: no I/O, no clock, no randomness. The same inputs
//! always produce the same `NexusAnalysis`.

pub mod catalog;
pub mod depth;
pub mod extract;
pub mod inference;
pub mod matcher;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nexus::depth::{score_competency_depth, CompetencyLevel, CompetencyScore};
use crate::nexus::extract::{extract_job_requirements, extract_skills_with_context};
use crate::nexus::inference::{infer_implicit_skills, ConfidenceLevel, InferredSkill};
use crate::nexus::matcher::{match_skills_to_job, Consensus};

/// Interview prep prompts are generated for at most this many lead-with skills.
const INTERVIEW_PREP_LIMIT: usize = 5;

/// Full analysis of one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusAnalysis {
    pub implicit_skills: Vec<InferredSkill>,
    pub competency_scores: Vec<CompetencyScore>,

    pub consensus_score: u32,
    pub confidence: ConfidenceLevel,
    pub conflicts: Vec<String>,
    pub lead_with: Vec<String>,
    pub strengthen: Vec<String>,
    pub de_emphasize: Vec<String>,
    pub interview_prep: Vec<String>,

    pub skill_count: usize,
    pub inferred_count: usize,
    pub matched_count: usize,
    pub missing_count: usize,
}

pub fn score_resume(resume_text: &str, job_description: &str) -> NexusAnalysis {
    let competency_scores: Vec<CompetencyScore> = extract_skills_with_context(resume_text)
        .iter()
        .map(|s| score_competency_depth(&s.skill, &s.context))
        .collect();

    let implicit_skills = infer_implicit_skills(resume_text);
    let requirements = extract_job_requirements(job_description);

    let matches = match_skills_to_job(&competency_scores, &implicit_skills, &requirements);
    let consensus = Consensus::from_match(&matches, requirements.len());

    debug!(
        skills = competency_scores.len(),
        inferred = implicit_skills.len(),
        requirements = requirements.len(),
        matched = matches.matched.len(),
        score = consensus.score,
        "nexus analysis complete"
    );

    let de_emphasize = competency_scores
        .iter()
        .filter(|s| s.score == 1)
        .map(|s| s.skill.clone())
        .collect();

    let interview_prep = build_interview_prep(&matches.lead_with, &competency_scores);

    NexusAnalysis {
        skill_count: competency_scores.len() + implicit_skills.len(),
        inferred_count: implicit_skills.len(),
        matched_count: matches.matched.len(),
        missing_count: matches.missing.len(),
        consensus_score: consensus.score,
        confidence: consensus.confidence,
        conflicts: consensus.conflicts,
        lead_with: matches.lead_with,
        strengthen: matches.strengthen,
        de_emphasize,
        interview_prep,
        implicit_skills,
        competency_scores,
    }
}

/// One STAR prompt per lead-with skill, at the skill's scored level.
///
/// Skills without a competency score fall back to IMPLEMENTED.
fn build_interview_prep(lead_with: &[String], scores: &[CompetencyScore]) -> Vec<String> {
    lead_with
        .iter()
        .take(INTERVIEW_PREP_LIMIT)
        .map(|skill| {
            let level = scores
                .iter()
                .find(|s| s.skill.eq_ignore_ascii_case(skill))
                .map(|s| s.level)
                .unwrap_or(CompetencyLevel::Implemented);
            format!("Prepare STAR narrative for {skill} at {level} level")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nexus::matcher::SHALLOW_DEPTH_CONFLICT;

    const RESUME: &str = "Senior Platform Engineer\n\
        - Managed kubernetes clusters serving 40M requests per day\n\
        - Architected Python services for the payments ledger\n\
        - Skills: Java, Redis\n\
        - Led team of 8 through a terraform migration";

    const JOB: &str = "Platform Engineer\n\
        Requirements:\n\
        - Kubernetes\n\
        - Strong Python background in backend systems\n\
        - Experience with sprint planning and delivery\n\
        - Fluent in Mandarin and Japanese\n";

    #[test]
    fn test_kubernetes_requirement_leads() {
        let a = score_resume(
            "Managed kubernetes clusters across three regions.",
            "We need:\n- Kubernetes\n",
        );
        assert_eq!(a.competency_scores.len(), 1);
        assert_eq!(a.competency_scores[0].level, CompetencyLevel::Led);
        assert_eq!(a.lead_with, vec!["kubernetes"]);
        assert_eq!(a.matched_count, 1);
        assert_eq!(a.missing_count, 0);
        assert_eq!(
            a.interview_prep,
            vec!["Prepare STAR narrative for kubernetes at LED level"]
        );
    }

    #[test]
    fn test_full_pipeline_counts_are_consistent() {
        let a = score_resume(RESUME, JOB);
        assert_eq!(
            a.skill_count,
            a.competency_scores.len() + a.implicit_skills.len()
        );
        assert_eq!(a.inferred_count, a.implicit_skills.len());
        assert!(a.consensus_score <= 100);
        assert!(a.missing_count >= 1, "Mandarin cannot be matched");
    }

    #[test]
    fn test_sprint_planning_matched_via_inference() {
        let a = score_resume(RESUME, JOB);
        assert!(a
            .implicit_skills
            .iter()
            .any(|s| s.name == "Sprint Planning"));
        assert!(a.strengthen.contains(&"Sprint Planning".to_string()));
    }

    #[test]
    fn test_de_emphasize_lists_score_one_skills() {
        let a = score_resume(RESUME, JOB);
        for skill in &a.de_emphasize {
            let s = a
                .competency_scores
                .iter()
                .find(|c| &c.skill == skill)
                .unwrap();
            assert_eq!(s.score, 1);
        }
        assert!(a.de_emphasize.contains(&"Java".to_string()));
    }

    #[test]
    fn test_many_skill_resume_scores_quickly() {
        let resume = "Architected Python and Rust services on AWS with Kubernetes and Docker. \
            Led a Terraform and Ansible rollout across GCP and Azure. \
            Built React, Vue and Angular frontends backed by Django and Flask. \
            Managed PostgreSQL, MySQL, MongoDB and Redis clusters. \
            Deployed Kafka and Spark pipelines into Snowflake. \
            Used Git, Jira and Figma daily.";
        let job = "Requirements:\n- Python\n- Kubernetes\n- Kafka\n- React\n";

        let started = std::time::Instant::now();
        let a = score_resume(resume, job);
        let elapsed = started.elapsed();

        assert!(a.competency_scores.len() >= 20, "got {}", a.competency_scores.len());
        assert!(elapsed.as_secs() < 5, "scoring took {elapsed:?}");
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(score_resume(RESUME, JOB), score_resume(RESUME, JOB));
    }

    #[test]
    fn test_empty_inputs_degrade_gracefully() {
        let a = score_resume("", "");
        assert_eq!(a.consensus_score, 0);
        assert_eq!(a.confidence, ConfidenceLevel::Speculative);
        assert!(a.conflicts.is_empty());
        assert!(a.interview_prep.is_empty());
        assert_eq!(a.skill_count, 0);
    }

    #[test]
    fn test_no_skills_everything_missing() {
        let a = score_resume(
            "I am a candidate.",
            "- Ten years of underwater basket weaving\n- Rust",
        );
        assert_eq!(a.matched_count, 0);
        assert_eq!(a.missing_count, 2);
        assert_eq!(a.consensus_score, 0);
        assert_eq!(a.conflicts, vec!["Missing 2 of 2 key requirements"]);
        assert!(!a.conflicts.contains(&SHALLOW_DEPTH_CONFLICT.to_string()));
    }

    #[test]
    fn test_interview_prep_falls_back_to_implemented_for_unscored_skill() {
        // lead_with is only filled from explicit matches, so the fallback is
        // unreachable via score_resume; exercise it directly.
        let prep = build_interview_prep(&["Mystery".to_string()], &[]);
        assert_eq!(
            prep,
            vec!["Prepare STAR narrative for Mystery at IMPLEMENTED level"]
        );
    }

    #[test]
    fn test_interview_prep_capped_at_five() {
        let lead: Vec<String> = (0..8).map(|i| format!("skill{i}")).collect();
        assert_eq!(build_interview_prep(&lead, &[]).len(), 5);
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let json = serde_json::to_value(score_resume(RESUME, JOB)).unwrap();
        for key in [
            "implicitSkills",
            "competencyScores",
            "consensusScore",
            "leadWith",
            "deEmphasize",
            "interviewPrep",
            "skillCount",
            "missingCount",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
