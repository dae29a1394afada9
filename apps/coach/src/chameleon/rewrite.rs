//! Rule-based bullet rewriting.
//!
//! Bullets are pulled from resume text, then each archetype's substitution
//! rules run in order over the bullet. Rules are sequential: a later rule sees
//! the output of the earlier ones.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chameleon::archetypes::{Archetype, SAMPLE_REWRITES};

const MAX_BULLETS: usize = 10;
const BULLET_MIN_EXCLUSIVE: usize = 20;
const BULLET_MAX_EXCLUSIVE: usize = 300;

static BULLET_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+").unwrap());
/// Capitalized word ending in "e"/"ed" followed by whitespace, e.g. "Reduced ", "Drove ".
static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+ed?\s").unwrap());

type RuleSet = Vec<(Regex, &'static str)>;

fn compile_rules(rules: &[(&str, &'static str)]) -> RuleSet {
    rules
        .iter()
        .map(|(word, replacement)| {
            let re = Regex::new(&format!(r"(?i)\b{word}\b")).expect("rewrite rule must compile");
            (re, *replacement)
        })
        .collect()
}

static SPEED_RULES: Lazy<RuleSet> = Lazy::new(|| {
    compile_rules(&[
        ("managed", "accelerated"),
        ("process", "system"),
        ("created", "shipped"),
        ("developed", "rapidly deployed"),
        ("implemented", "fast-tracked"),
    ])
});

static SAFETY_RULES: Lazy<RuleSet> = Lazy::new(|| {
    compile_rules(&[
        ("fast", "reliable"),
        ("built", "secured"),
        ("shipped", "deployed with oversight"),
        ("quickly", "with full compliance"),
        ("automated", "governed automation of"),
    ])
});

static CREATIVE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    compile_rules(&[
        ("optimized", "invented"),
        ("improved", "reimagined"),
        ("built", "pioneered"),
        ("implemented", "prototyped"),
        ("developed", "designed first-of-kind"),
    ])
});

static ECOSYSTEM_RULES: Lazy<RuleSet> = Lazy::new(|| {
    compile_rules(&[
        ("managed", "orchestrated across partners"),
        ("led", "coordinated ecosystem-wide"),
        ("built", "scaled through partnerships"),
        ("generated", "enabled network-driven"),
        ("individual", "collective"),
    ])
});

fn rules_for(archetype: Archetype) -> &'static RuleSet {
    match archetype {
        Archetype::Speed => &SPEED_RULES,
        Archetype::Safety => &SAFETY_RULES,
        Archetype::Creative => &CREATIVE_RULES,
        Archetype::Ecosystem => &ECOSYSTEM_RULES,
    }
}

/// One original/rewritten bullet pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChameleonMetric {
    pub id: String,
    pub original: String,
    pub rewritten: String,
    pub archetype: Archetype,
}

/// Pulls up to 10 bullet-like lines from resume text, in line order.
///
/// A line qualifies if it starts with a `-`/`*` marker (marker stripped), or if it
/// opens with a capitalized past-tense-looking word and contains a digit.
pub fn extract_bullet_points(resume_text: &str) -> Vec<String> {
    let mut bullets = Vec::new();

    for line in resume_text.split('\n') {
        let trimmed = line.trim();

        let candidate = if BULLET_MARKER_RE.is_match(trimmed) {
            BULLET_MARKER_RE.replace(trimmed, "").trim().to_string()
        } else if ACTION_VERB_RE.is_match(trimmed) && trimmed.chars().any(|c| c.is_ascii_digit()) {
            trimmed.to_string()
        } else {
            continue;
        };

        let len = candidate.chars().count();
        if len > BULLET_MIN_EXCLUSIVE && len < BULLET_MAX_EXCLUSIVE {
            bullets.push(candidate);
        }
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

/// Applies the archetype's substitution rules in order.
pub fn transform_bullet(bullet: &str, archetype: Archetype) -> String {
    rules_for(archetype)
        .iter()
        .fold(bullet.to_string(), |text, (re, replacement)| {
            re.replace_all(&text, *replacement).into_owned()
        })
}

/// The built-in sample set, rewritten for `archetype`.
pub fn get_sample_rewrites(archetype: Archetype) -> Vec<ChameleonMetric> {
    SAMPLE_REWRITES
        .iter()
        .map(|s| ChameleonMetric {
            id: s.id.to_string(),
            original: s.original.to_string(),
            rewritten: s.for_archetype(archetype).to_string(),
            archetype,
        })
        .collect()
}

/// Rewrites the resume's bullets for `archetype`.
///
/// Falls back to the sample set when no bullets can be extracted.
pub fn generate_chameleon_metrics(resume_text: &str, archetype: Archetype) -> Vec<ChameleonMetric> {
    let bullets = extract_bullet_points(resume_text);

    if bullets.is_empty() {
        return get_sample_rewrites(archetype);
    }

    bullets
        .into_iter()
        .enumerate()
        .map(|(index, bullet)| ChameleonMetric {
            id: format!("bullet-{index}"),
            rewritten: transform_bullet(&bullet, archetype),
            original: bullet,
            archetype,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_rules_apply_in_order() {
        assert_eq!(
            transform_bullet("Managed a process that created results", Archetype::Speed),
            "accelerated a system that shipped results"
        );
    }

    #[test]
    fn test_safety_rules_rewrite_every_hit() {
        assert_eq!(
            transform_bullet("Built and shipped quickly", Archetype::Safety),
            "secured and deployed with oversight with full compliance"
        );
    }

    #[test]
    fn test_whole_word_only() {
        // "breakfast" must not become "breakreliable"
        assert_eq!(
            transform_bullet("Hosted a fast breakfast", Archetype::Safety),
            "Hosted a reliable breakfast"
        );
    }

    #[test]
    fn test_ecosystem_led_and_generated() {
        assert_eq!(
            transform_bullet("Led sales and generated $2M", Archetype::Ecosystem),
            "coordinated ecosystem-wide sales and enabled network-driven $2M"
        );
    }

    #[test]
    fn test_creative_developed() {
        assert_eq!(
            transform_bullet("Developed and optimized a new search index", Archetype::Creative),
            "designed first-of-kind and invented a new search index"
        );
    }

    #[test]
    fn test_extract_marker_bullets() {
        let text = "Jane Doe\n\
                    - Reduced cloud spend by 30% across 4 business units\n\
                    * Mentored six junior engineers on code review practice\n\
                    - too short\n";
        assert_eq!(
            extract_bullet_points(text),
            vec![
                "Reduced cloud spend by 30% across 4 business units",
                "Mentored six junior engineers on code review practice",
            ]
        );
    }

    #[test]
    fn test_extract_action_verb_lines_need_a_digit() {
        let text = "Increased retention by 12% over two quarters\n\
                    Increased retention substantially over two quarters\n\
                    Drove 3 launches in the enterprise segment";
        assert_eq!(
            extract_bullet_points(text),
            vec![
                "Increased retention by 12% over two quarters",
                "Drove 3 launches in the enterprise segment",
            ]
        );
    }

    #[test]
    fn test_extract_caps_at_ten() {
        let text: String = (0..15)
            .map(|i| format!("- Shipped feature number {i} to production\n"))
            .collect();
        let bullets = extract_bullet_points(&text);
        assert_eq!(bullets.len(), 10);
        assert_eq!(bullets[0], "Shipped feature number 0 to production");
    }

    #[test]
    fn test_no_bullets_falls_back_to_samples() {
        let metrics = generate_chameleon_metrics("I am a candidate.", Archetype::Speed);
        assert_eq!(metrics.len(), 4);
        let ids: Vec<_> = metrics.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["revenue", "automation", "pipeline", "team"]);
        assert_eq!(
            metrics[3].rewritten,
            "Directed a lean 12-person strike team shipping features at 2x industry speed."
        );
        assert!(metrics.iter().all(|m| m.archetype == Archetype::Speed));
    }

    #[test]
    fn test_metrics_ids_follow_bullet_order() {
        let text = "- Managed the quarterly planning process for 5 teams\n\
                    - Implemented automated billing reconciliation";
        let metrics = generate_chameleon_metrics(text, Archetype::Speed);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].id, "bullet-0");
        assert_eq!(
            metrics[0].rewritten,
            "accelerated the quarterly planning system for 5 teams"
        );
        assert_eq!(metrics[1].id, "bullet-1");
        assert_eq!(
            metrics[1].rewritten,
            "fast-tracked automated billing reconciliation"
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "- Built a fast data pipeline serving 200 analysts";
        assert_eq!(
            generate_chameleon_metrics(text, Archetype::Safety),
            generate_chameleon_metrics(text, Archetype::Safety)
        );
    }
}
