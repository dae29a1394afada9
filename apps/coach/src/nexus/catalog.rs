//! Static pattern tables for the Nexus engine.
//!
//! Everything here is immutable and compiled at most once per process.
//! Table order is significant: extraction order, inference dedup and
//! evidence ordering all follow the order written below.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Depth verbs
// ────────────────────────────────────────────────────────────────────────────

/// Verb phrases evidencing each depth level, lowest level first.
pub const DEPTH_VERBS: &[(u8, &[&str])] = &[
    (
        1,
        &[
            "familiar",
            "exposed",
            "aware",
            "participated",
            "assisted",
            "supported",
            "learned",
            "studied",
        ],
    ),
    (
        2,
        &[
            "used",
            "applied",
            "utilized",
            "leveraged",
            "worked with",
            "operated",
            "configured",
            "maintained",
        ],
    ),
    (
        3,
        &[
            "built",
            "developed",
            "implemented",
            "engineered",
            "executed",
            "delivered",
            "launched",
            "deployed",
        ],
    ),
    (
        4,
        &[
            "led",
            "directed",
            "managed",
            "owned",
            "drove",
            "spearheaded",
            "orchestrated",
            "oversaw",
            "scaled",
        ],
    ),
    (
        5,
        &[
            "architected",
            "designed",
            "founded",
            "pioneered",
            "invented",
            "created",
            "innovated",
            "envisioned",
        ],
    ),
];

/// Max `[\s\w]` characters allowed between a verb and a following skill.
pub const VERB_TO_SKILL_GAP: usize = 20;
/// Max `[\s\w]` characters allowed between a skill and a following verb.
pub const SKILL_TO_VERB_GAP: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Implicit skill triggers
// ────────────────────────────────────────────────────────────────────────────

/// Trigger phrase (matched as a lowercase substring) → implied skills with weights.
pub const INFERENCE_TRIGGERS: &[(&str, &[(&str, f64)])] = &[
    (
        "partnership portfolio",
        &[
            ("Contract Negotiation", 0.95),
            ("Executive Stakeholder Management", 0.95),
            ("Revenue Forecasting", 0.9),
        ],
    ),
    (
        "partner-sourced pipeline",
        &[
            ("Partner Enablement", 0.95),
            ("Co-selling", 0.9),
            ("Pipeline Attribution", 0.9),
        ],
    ),
    (
        "tcv",
        &[("Enterprise Sales Cycles", 0.95), ("Multi-year Contracts", 0.9)],
    ),
    (
        "arr",
        &[("SaaS Metrics", 0.9), ("Recurring Revenue Models", 0.85)],
    ),
    (
        "architected",
        &[("System Design", 0.95), ("Technical Documentation", 0.85)],
    ),
    (
        "microservices",
        &[
            ("Domain-Driven Design", 0.9),
            ("API Design", 0.9),
            ("Container Orchestration", 0.8),
        ],
    ),
    (
        "data pipeline",
        &[("ETL Design", 0.95), ("Data Quality", 0.85)],
    ),
    (
        "ci/cd",
        &[
            ("DevOps", 0.95),
            ("Automation", 0.9),
            ("Release Management", 0.85),
        ],
    ),
    (
        "kubernetes",
        &[("Container Orchestration", 0.95), ("Cloud Native", 0.9)],
    ),
    (
        "terraform",
        &[("Infrastructure as Code", 0.95), ("Cloud Provisioning", 0.9)],
    ),
    (
        "led team",
        &[
            ("Performance Management", 0.9),
            ("Resource Allocation", 0.85),
            ("Sprint Planning", 0.8),
        ],
    ),
    (
        "cross-functional",
        &[("Stakeholder Alignment", 0.9), ("Collaboration", 0.95)],
    ),
    ("headcount", &[("Hiring", 0.95), ("Team Building", 0.9)]),
    (
        "p&l",
        &[
            ("Financial Accountability", 0.95),
            ("Budget Ownership", 0.95),
        ],
    ),
    (
        "machine learning",
        &[
            ("Python", 0.85),
            ("Data Science", 0.9),
            ("Statistical Analysis", 0.85),
        ],
    ),
    (
        "llm",
        &[
            ("Prompt Engineering", 0.9),
            ("NLP", 0.85),
            ("AI Integration", 0.9),
        ],
    ),
    (
        "gtm",
        &[("Go-to-Market Strategy", 0.95), ("Sales Enablement", 0.85)],
    ),
];

// ────────────────────────────────────────────────────────────────────────────
// Skill category patterns
// ────────────────────────────────────────────────────────────────────────────

/// Category of an explicitly named skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillCategory {
    Language,
    Framework,
    Cloud,
    Data,
    AiMl,
    Tools,
}

pub struct SkillPattern {
    pub category: SkillCategory,
    pub regex: Regex,
}

/// Ordered category table. Extraction walks this table top to bottom.
pub static SKILL_PATTERNS: Lazy<Vec<SkillPattern>> = Lazy::new(|| {
    [
        (
            SkillCategory::Language,
            r"(?i)\b(python|javascript|typescript|java|golang|go|rust|c\+\+|ruby|php|swift|kotlin)\b",
        ),
        (
            SkillCategory::Framework,
            r"(?i)\b(react|next\.?js|vue|angular|node\.?js|express|django|flask|spring|rails)\b",
        ),
        (
            SkillCategory::Cloud,
            r"(?i)\b(aws|azure|gcp|google cloud|kubernetes|docker|terraform|ansible)\b",
        ),
        (
            SkillCategory::Data,
            r"(?i)\b(postgresql|mysql|mongodb|redis|elasticsearch|snowflake|bigquery|spark|kafka)\b",
        ),
        (
            SkillCategory::AiMl,
            r"(?i)\b(tensorflow|pytorch|scikit-learn|pandas|numpy|huggingface|openai|anthropic|langchain)\b",
        ),
        (
            SkillCategory::Tools,
            r"(?i)\b(git|github|gitlab|jira|confluence|figma|tableau|power bi|salesforce|hubspot)\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| SkillPattern {
        category,
        regex: Regex::new(pattern).expect("skill pattern must compile"),
    })
    .collect()
});

/// Sentence boundary used for evidence and source-achievement lookup.
pub static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Returns the first sentence of `text` whose lowercase form contains `needle_lower`.
pub fn first_sentence_containing<'a>(text: &'a str, needle_lower: &str) -> Option<&'a str> {
    SENTENCE_SPLIT_RE
        .split(text)
        .find(|s| s.to_lowercase().contains(needle_lower))
}

/// Trims `s` and keeps at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.trim().chars().take(max_chars).collect()
}
