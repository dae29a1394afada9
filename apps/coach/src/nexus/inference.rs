//! Implicit Skill Inferrer — skills implied by achievements rather than named.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::nexus::catalog::{first_sentence_containing, truncate_chars, INFERENCE_TRIGGERS};

const SOURCE_ACHIEVEMENT_MAX: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Speculative,
}

impl ConfidenceLevel {
    /// ≥0.85 → HIGH, ≥0.70 → MEDIUM, else SPECULATIVE.
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.85 {
            ConfidenceLevel::High
        } else if weight >= 0.7 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Speculative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::Speculative => "SPECULATIVE",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredSkill {
    pub name: String,
    pub source_achievement: String,
    pub confidence: ConfidenceLevel,
    pub reasoning: String,
}

/// Scans `text` for trigger phrases and emits the skills they imply.
///
/// Dedup is global by lowercased skill name: the first trigger (in table order)
/// to imply a skill owns it.
pub fn infer_implicit_skills(text: &str) -> Vec<InferredSkill> {
    let text_lower = text.to_lowercase();
    let mut inferred = Vec::new();
    let mut seen = HashSet::new();

    for (trigger, skills) in INFERENCE_TRIGGERS {
        if !text_lower.contains(trigger) {
            continue;
        }

        let source = first_sentence_containing(text, trigger)
            .map(|s| truncate_chars(s, SOURCE_ACHIEVEMENT_MAX))
            .unwrap_or_default();

        for (name, weight) in *skills {
            if !seen.insert(name.to_lowercase()) {
                continue;
            }
            inferred.push(InferredSkill {
                name: name.to_string(),
                source_achievement: source.clone(),
                confidence: ConfidenceLevel::from_weight(*weight),
                reasoning: format!(
                    "\"{trigger}\" implies {name} ({:.0}% confidence)",
                    weight * 100.0
                ),
            });
        }
    }

    inferred
}
