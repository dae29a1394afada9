//! Explicit skill extraction (resume side) and requirement extraction (job side).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::nexus::catalog::{SkillCategory, SKILL_PATTERNS};

/// Characters of surrounding text captured on each side of a skill mention.
const CONTEXT_RADIUS: usize = 100;

/// Requirement lines must be strictly longer than this many characters...
const REQUIREMENT_MIN_EXCLUSIVE: usize = 10;
/// ...and strictly shorter than this many.
const REQUIREMENT_MAX_EXCLUSIVE: usize = 200;

static BULLET_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+").unwrap());
static NUMBERED_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());
static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*\d.)]+\s+").unwrap());

/// A skill named explicitly in the text, with the window it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub skill: String,
    pub context: String,
    pub category: SkillCategory,
}

/// Extracts explicitly named skills, first occurrence per lowercased name.
///
/// Results follow pattern-table order, then match order within each pattern.
pub fn extract_skills_with_context(text: &str) -> Vec<ExtractedSkill> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();

    for pattern in SKILL_PATTERNS.iter() {
        for m in pattern.regex.find_iter(text) {
            let skill = m.as_str();
            if !seen.insert(skill.to_lowercase()) {
                continue;
            }

            results.push(ExtractedSkill {
                skill: skill.to_string(),
                context: char_window(text, m.start(), m.end(), CONTEXT_RADIUS).to_string(),
                category: pattern.category,
            });
        }
    }

    results
}

/// Extracts requirement strings from a job description.
///
/// Bulleted or numbered lines come first (marker stripped, length-filtered),
/// then any catalog skill keyword not already contained in a collected
/// requirement. Exact duplicates are dropped; insertion order is kept.
pub fn extract_job_requirements(job_text: &str) -> Vec<String> {
    let mut requirements: Vec<String> = Vec::new();

    for line in job_text.split('\n') {
        let trimmed = line.trim();
        if !(BULLET_PREFIX_RE.is_match(trimmed) || NUMBERED_PREFIX_RE.is_match(trimmed)) {
            continue;
        }
        let cleaned = LIST_MARKER_RE.replace(trimmed, "");
        let cleaned = cleaned.trim();
        let len = cleaned.chars().count();
        if len > REQUIREMENT_MIN_EXCLUSIVE && len < REQUIREMENT_MAX_EXCLUSIVE {
            requirements.push(cleaned.to_string());
        }
    }

    for pattern in SKILL_PATTERNS.iter() {
        for m in pattern.regex.find_iter(job_text) {
            let keyword_lower = m.as_str().to_lowercase();
            let covered = requirements
                .iter()
                .any(|r| r.to_lowercase().contains(&keyword_lower));
            if !covered {
                requirements.push(m.as_str().to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    requirements.retain(|r| seen.insert(r.clone()));
    requirements
}

/// Returns `text[start..end]` widened by up to `radius` characters on each side.
fn char_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_dedups_case_insensitively_first_wins() {
        let text = "Wrote Rust services. Later taught rust to the team.";
        let skills = extract_skills_with_context(text);
        let rust: Vec<_> = skills
            .iter()
            .filter(|s| s.skill.eq_ignore_ascii_case("rust"))
            .collect();
        assert_eq!(rust.len(), 1);
        assert_eq!(rust[0].skill, "Rust");
        assert_eq!(rust[0].category, SkillCategory::Language);
    }

    #[test]
    fn test_extract_orders_by_pattern_table_not_position() {
        // Kubernetes (cloud) appears before Python (language) in the text,
        // but languages are scanned first.
        let text = "Kubernetes operator written in Python";
        let names: Vec<_> = extract_skills_with_context(text)
            .into_iter()
            .map(|s| s.skill)
            .collect();
        assert_eq!(names, vec!["Python", "Kubernetes"]);
    }

    #[test]
    fn test_context_window_is_100_chars_each_side() {
        let text = format!("{}Rust{}", "a".repeat(150), "b".repeat(150));
        // \b needs a boundary; use spaces around the skill
        let text = text.replace("aRustb", "a Rust b");
        let skills = extract_skills_with_context(&text);
        assert_eq!(skills.len(), 1);
        let ctx = &skills[0].context;
        assert_eq!(ctx.chars().count(), 100 + "Rust".len() + 100);
        assert!(ctx.contains(" Rust "));
    }

    #[test]
    fn test_context_window_clamps_at_text_edges() {
        let skills = extract_skills_with_context("Go");
        assert_eq!(skills[0].context, "Go");
    }

    #[test]
    fn test_char_window_respects_multibyte_chars() {
        let text = "ééé Rust ééé";
        let start = text.find("Rust").unwrap();
        let w = char_window(text, start, start + 4, 2);
        assert_eq!(w, "é Rust é");
    }

    #[test]
    fn test_no_skills_yields_empty() {
        assert!(extract_skills_with_context("I enjoy hiking and cooking.").is_empty());
    }

    #[test]
    fn test_requirements_from_bullets_and_numbers() {
        let jd = "About us\n\
                  - 5+ years building distributed systems\n\
                  * Strong communication skills\n\
                  1. Experience with payment platforms\n\
                  2) Ownership mindset and bias to act\n\
                  - Short one\n";
        let reqs = extract_job_requirements(jd);
        assert_eq!(
            reqs,
            vec![
                "5+ years building distributed systems",
                "Strong communication skills",
                "Experience with payment platforms",
                "Ownership mindset and bias to act",
            ]
        );
    }

    #[test]
    fn test_requirement_length_bounds_are_exclusive() {
        let ten = "a".repeat(10);
        let eleven = "b".repeat(11);
        let long = "c".repeat(200);
        let jd = format!("- {ten}\n- {eleven}\n- {long}\n");
        assert_eq!(extract_job_requirements(&jd), vec![eleven]);
    }

    #[test]
    fn test_keywords_added_only_when_not_already_covered() {
        let jd = "- Production experience with Kubernetes at scale\nWe use Kubernetes, Terraform and AWS.";
        let reqs = extract_job_requirements(jd);
        assert_eq!(
            reqs,
            vec![
                "Production experience with Kubernetes at scale",
                "Terraform",
                "AWS",
            ]
        );
    }

    #[test]
    fn test_repeated_keyword_added_once() {
        let reqs = extract_job_requirements("Python, python and PYTHON");
        assert_eq!(reqs, vec!["Python"]);
    }

    #[test]
    fn test_duplicate_bullets_removed() {
        let jd = "- Strong written communication\n- Strong written communication\n";
        assert_eq!(
            extract_job_requirements(jd),
            vec!["Strong written communication"]
        );
    }

    #[test]
    fn test_empty_job_yields_no_requirements() {
        assert!(extract_job_requirements("").is_empty());
    }
}
