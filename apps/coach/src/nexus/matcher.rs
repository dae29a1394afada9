//! Requirement Matcher / Consensus Scorer.
//!
//! Fuses explicit competency scores and inferred skills against the job's
//! requirements, then derives a 0–100 consensus score.
//!
//! Algorithm per requirement (extraction order):
//! 1. Explicit skills, in extraction order: match if the requirement contains the
//!    skill, the skill contains the requirement, or any requirement word (len > 2)
//!    is a substring of the skill. First hit wins.
//! 2. Otherwise inferred skills: match if the requirement contains the inferred name.
//!    Synthesizes a USED/2 score and marks the skill for strengthening.
//! 3. Otherwise the requirement is missing.
//!
//! Scoring:
//!   coverage   = matched / max(1, requirements) × 100
//!   avg_depth  = mean(matched.score), or 1 when nothing matched
//!   consensus  = min(100, round(coverage × (0.6 + avg_depth / 5 × 0.4)))

use serde::{Deserialize, Serialize};

use crate::nexus::depth::{CompetencyLevel, CompetencyScore};
use crate::nexus::inference::{ConfidenceLevel, InferredSkill};

/// Requirement words this short or shorter are ignored for token matching.
const MIN_TOKEN_LEN: usize = 2;
/// Fraction of requirements that may be missing before a conflict is raised.
const MISSING_CONFLICT_RATIO: f64 = 0.3;
const SHALLOW_DEPTH_THRESHOLD: f64 = 2.5;

pub const SHALLOW_DEPTH_CONFLICT: &str =
    "Matched skills show shallow depth - strengthen with evidence";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: Vec<CompetencyScore>,
    pub missing: Vec<String>,
    pub lead_with: Vec<String>,
    pub strengthen: Vec<String>,
}

/// Score and diagnostics derived from a `MatchResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consensus {
    pub score: u32, // 0 – 100
    pub avg_depth: f64,
    pub confidence: ConfidenceLevel,
    pub conflicts: Vec<String>,
}

pub fn match_skills_to_job(
    scored: &[CompetencyScore],
    inferred: &[InferredSkill],
    requirements: &[String],
) -> MatchResult {
    let mut result = MatchResult::default();

    // Keyed once so every requirement compares against the same lowercase names.
    let keyed: Vec<(String, &CompetencyScore)> = scored
        .iter()
        .map(|s| (s.skill.to_lowercase(), s))
        .collect();

    for req in requirements {
        let req_lower = req.to_lowercase();
        let req_words: Vec<&str> = req_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > MIN_TOKEN_LEN)
            .collect();

        let explicit = keyed.iter().find(|(key, _)| {
            req_lower.contains(key.as_str())
                || key.contains(req_lower.as_str())
                || req_words.iter().any(|w| key.contains(w))
        });

        if let Some((_, score)) = explicit {
            result.matched.push((*score).clone());
            if score.score >= 4 {
                result.lead_with.push(score.skill.clone());
            } else if score.score <= 2 {
                result.strengthen.push(score.skill.clone());
            }
            continue;
        }

        let via_inference = inferred
            .iter()
            .find(|i| req_lower.contains(&i.name.to_lowercase()));

        if let Some(skill) = via_inference {
            result.matched.push(CompetencyScore::new(
                skill.name.clone(),
                CompetencyLevel::Used,
                vec![skill.reasoning.clone()],
            ));
            result.strengthen.push(skill.name.clone());
            continue;
        }

        result.missing.push(req.clone());
    }

    result
}

/// Mean depth of matched entries; 1.0 when nothing matched.
pub fn average_depth(matched: &[CompetencyScore]) -> f64 {
    if matched.is_empty() {
        return 1.0;
    }
    let total: u32 = matched.iter().map(|s| u32::from(s.score)).sum();
    f64::from(total) / matched.len() as f64
}

/// Coverage weighted 60% flat plus up to 40% more by evidenced depth, capped at 100.
pub fn consensus_score(matched_count: usize, requirement_count: usize, avg_depth: f64) -> u32 {
    let denominator = requirement_count.max(1) as f64;
    let coverage = matched_count as f64 / denominator * 100.0;
    let depth_multiplier = avg_depth / 5.0;
    let raw = (coverage * (0.6 + depth_multiplier * 0.4)).round();
    raw.clamp(0.0, 100.0) as u32
}

/// HIGH needs both score and depth; MEDIUM needs either, so a high score with
/// middling depth lands in MEDIUM.
pub fn classify_confidence(score: u32, avg_depth: f64) -> ConfidenceLevel {
    if score >= 75 && avg_depth >= 3.5 {
        ConfidenceLevel::High
    } else if score >= 50 || avg_depth >= 2.5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Speculative
    }
}

pub fn detect_conflicts(
    matched_count: usize,
    missing_count: usize,
    requirement_count: usize,
    avg_depth: f64,
) -> Vec<String> {
    let denominator = requirement_count.max(1);
    let mut conflicts = Vec::new();

    if missing_count as f64 > denominator as f64 * MISSING_CONFLICT_RATIO {
        conflicts.push(format!(
            "Missing {missing_count} of {denominator} key requirements"
        ));
    }
    if avg_depth < SHALLOW_DEPTH_THRESHOLD && matched_count > 0 {
        conflicts.push(SHALLOW_DEPTH_CONFLICT.to_string());
    }

    conflicts
}

impl Consensus {
    pub fn from_match(result: &MatchResult, requirement_count: usize) -> Self {
        let avg_depth = average_depth(&result.matched);
        let score = consensus_score(result.matched.len(), requirement_count, avg_depth);
        Self {
            score,
            avg_depth,
            confidence: classify_confidence(score, avg_depth),
            conflicts: detect_conflicts(
                result.matched.len(),
                result.missing.len(),
                requirement_count,
                avg_depth,
            ),
        }
    }
}
