//! Competency Depth Scorer — how senior was the candidate's use of a skill?
//!
//! For each depth level (1..=5) and each of its verbs, two windowed patterns are
//! tested against the context: verb then skill within 20 chars, or skill then
//! verb within 10 chars. The highest matching level wins. A skill that is present
//! but has no verb evidence is scored at level 1 (EXPOSED), never 0.

use std::fmt;

use regex::RegexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nexus::catalog::{
    first_sentence_containing, truncate_chars, DEPTH_VERBS, SKILL_TO_VERB_GAP, VERB_TO_SKILL_GAP,
};

/// Evidence sentences are capped at this many characters.
const EVIDENCE_SENTENCE_MAX: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetencyLevel {
    Exposed,
    Used,
    Implemented,
    Led,
    Architected,
}

impl CompetencyLevel {
    /// Fixed 1:1 table; scores outside 1..=5 clamp to the nearest level.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => CompetencyLevel::Exposed,
            2 => CompetencyLevel::Used,
            3 => CompetencyLevel::Implemented,
            4 => CompetencyLevel::Led,
            _ => CompetencyLevel::Architected,
        }
    }

    pub fn score(self) -> u8 {
        match self {
            CompetencyLevel::Exposed => 1,
            CompetencyLevel::Used => 2,
            CompetencyLevel::Implemented => 3,
            CompetencyLevel::Led => 4,
            CompetencyLevel::Architected => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompetencyLevel::Exposed => "EXPOSED",
            CompetencyLevel::Used => "USED",
            CompetencyLevel::Implemented => "IMPLEMENTED",
            CompetencyLevel::Led => "LED",
            CompetencyLevel::Architected => "ARCHITECTED",
        }
    }
}

impl fmt::Display for CompetencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth score for one skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub skill: String,
    pub level: CompetencyLevel,
    pub score: u8, // 1 – 5, always level.score()
    pub evidence: Vec<String>,
}

impl CompetencyScore {
    pub fn new(skill: impl Into<String>, level: CompetencyLevel, evidence: Vec<String>) -> Self {
        Self {
            skill: skill.into(),
            level,
            score: level.score(),
            evidence,
        }
    }
}

/// Scores the depth evidenced for `skill` inside `context`.
pub fn score_competency_depth(skill: &str, context: &str) -> CompetencyScore {
    let context_lower = context.to_lowercase();
    let skill_lower = skill.to_lowercase();
    let skill_escaped = regex::escape(&skill_lower);

    let mut highest = CompetencyLevel::Exposed;
    let mut evidence = Vec::new();

    for (depth, verbs) in DEPTH_VERBS {
        let level = CompetencyLevel::from_score(*depth);
        if level <= highest {
            continue;
        }
        if let Some(verb) = first_matching_verb(verbs, &skill_escaped, &context_lower) {
            highest = level;
            evidence.push(format!("\"{verb}\" indicates {level} level"));
        }
    }

    if let Some(sentence) = first_sentence_containing(context, &skill_lower) {
        evidence.push(truncate_chars(sentence, EVIDENCE_SENTENCE_MAX));
    }

    debug!(skill, level = %highest, "scored competency depth");

    CompetencyScore::new(skill, highest, evidence)
}

/// First verb of the level, in catalog order, found next to the skill.
///
/// All of a level's windowed patterns share one `RegexSet`. Inputs are already
/// lowercased; the gap class is whitespace plus ASCII word characters.
fn first_matching_verb<'v>(
    verbs: &[&'v str],
    skill_escaped: &str,
    context_lower: &str,
) -> Option<&'v str> {
    let patterns = verbs.iter().flat_map(|verb| {
        let verb_escaped = regex::escape(verb);
        [
            format!(r"{verb_escaped}[\sa-z0-9_]{{0,{VERB_TO_SKILL_GAP}}}{skill_escaped}"),
            format!(r"{skill_escaped}[\sa-z0-9_]{{0,{SKILL_TO_VERB_GAP}}}{verb_escaped}"),
        ]
    });

    let set = RegexSet::new(patterns)
        .map_err(|e| debug!("skipping depth patterns for {skill_escaped:?}: {e}"))
        .ok()?;

    // Two patterns per verb, so pattern index / 2 is the verb index.
    set.matches(context_lower)
        .iter()
        .next()
        .map(|idx| verbs[idx / 2])
}
