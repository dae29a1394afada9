//! Archetype catalog — the four company-culture profiles bullets can be tuned to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Speed,
    Safety,
    Creative,
    Ecosystem,
}

impl Archetype {
    /// Catalog order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Speed,
        Archetype::Safety,
        Archetype::Creative,
        Archetype::Ecosystem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Speed => "speed",
            Archetype::Safety => "safety",
            Archetype::Creative => "creative",
            Archetype::Ecosystem => "ecosystem",
        }
    }

    pub fn config(self) -> &'static ArchetypeConfig {
        match self {
            Archetype::Speed => &SPEED,
            Archetype::Safety => &SAFETY,
            Archetype::Creative => &CREATIVE,
            Archetype::Ecosystem => &ECOSYSTEM,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown archetype '{s}' (expected speed, safety, creative or ecosystem)")
            })
    }
}

/// Display copy for one archetype.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeConfig {
    pub label: &'static str,
    pub tooltip: &'static str,
    pub focus: &'static str,
    pub rewrite_rule: &'static str,
}

const SPEED: ArchetypeConfig = ArchetypeConfig {
    label: "Velocity Culture",
    tooltip: "For fast-moving startups that ship quickly and hate bureaucracy",
    focus: "Removing friction, automation, velocity, immediate impact, anti-bureaucracy.",
    rewrite_rule: "Convert 'managed' to 'accelerated'. Convert 'process' to 'system'. Focus on time-saved and velocity metrics.",
};

const SAFETY: ArchetypeConfig = ArchetypeConfig {
    label: "Reliability Culture",
    tooltip: "For companies that value governance, compliance, and stability",
    focus: "Reliability, governance, audit trails, risk mitigation, stable scaling.",
    rewrite_rule: "Convert 'fast' to 'reliable'. Convert 'built' to 'secured'. Focus on accuracy, up-time, and compliance metrics.",
};

const CREATIVE: ArchetypeConfig = ArchetypeConfig {
    label: "Innovation Culture",
    tooltip: "For zero-to-one builders focused on novel solutions",
    focus: "Innovation, zero-to-one, prototyping, bridging research to product, novelty.",
    rewrite_rule: "Convert 'optimized' to 'invented'. Focus on 'first-of-kind', 'prototypes', and 'novel architectures'.",
};

const ECOSYSTEM: ArchetypeConfig = ArchetypeConfig {
    label: "Scale Culture",
    tooltip: "For platform companies leveraging network effects",
    focus: "Network effects, partnerships, integrations, platform leverage, community.",
    rewrite_rule: "Convert individual metrics to network metrics. Focus on 'attachment rates', 'partner influence', and 'joint value'.",
};

/// One row of `get_all_archetypes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeEntry {
    pub id: Archetype,
    #[serde(flatten)]
    pub config: &'static ArchetypeConfig,
}

pub fn get_all_archetypes() -> Vec<ArchetypeEntry> {
    Archetype::ALL
        .into_iter()
        .map(|id| ArchetypeEntry {
            id,
            config: id.config(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Demo samples (used when a resume has no extractable bullets)
// ────────────────────────────────────────────────────────────────────────────

pub struct SampleRewrite {
    pub id: &'static str,
    pub original: &'static str,
    pub speed: &'static str,
    pub safety: &'static str,
    pub creative: &'static str,
    pub ecosystem: &'static str,
}

impl SampleRewrite {
    pub fn for_archetype(&self, archetype: Archetype) -> &'static str {
        match archetype {
            Archetype::Speed => self.speed,
            Archetype::Safety => self.safety,
            Archetype::Creative => self.creative,
            Archetype::Ecosystem => self.ecosystem,
        }
    }
}

pub const SAMPLE_REWRITES: &[SampleRewrite] = &[
    SampleRewrite {
        id: "revenue",
        original: "Managed $800M in registered deal value.",
        speed: "Removed friction from an $800M revenue pipe, accelerating deal velocity.",
        safety: "Ensured governance and auditability for $800M in sensitive transaction volume.",
        creative: "Designed the deal-flow architecture that processed $800M in value.",
        ecosystem: "Architected the partner ecosystem handling $800M in cross-cloud flow.",
    },
    SampleRewrite {
        id: "automation",
        original: "Reduced deal registration time by 50% through CRM automation.",
        speed: "Slashed 50% of manual drag from deal reg using aggressive automation.",
        safety: "Automated deal reg to eliminate human error, reducing risk and time by 50%.",
        creative: "Invented a novel CRM automation workflow that cut registration time in half.",
        ecosystem: "Streamlined partner access, boosting ecosystem throughput by 50%.",
    },
    SampleRewrite {
        id: "pipeline",
        original: "Built and managed a $150M partner-sourced pipeline.",
        speed: "Accelerated partner pipeline to $150M with zero bureaucratic overhead.",
        safety: "Established a compliant $150M partner pipeline with full audit trails.",
        creative: "Pioneered a new partner sourcing model generating $150M in pipeline.",
        ecosystem: "Scaled partner network to generate $150M in joint pipeline value.",
    },
    SampleRewrite {
        id: "team",
        original: "Led a cross-functional team of 12 engineers.",
        speed: "Directed a lean 12-person strike team shipping features at 2x industry speed.",
        safety: "Managed a 12-person team with clear accountability and zero incidents.",
        creative: "Assembled a 12-person innovation pod shipping first-of-kind features.",
        ecosystem: "Orchestrated 12 engineers across multiple partner integration squads.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_ids() {
        let ids: Vec<_> = get_all_archetypes().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, Archetype::ALL.to_vec());
    }

    #[test]
    fn test_parse_archetype() {
        assert_eq!("speed".parse::<Archetype>().unwrap(), Archetype::Speed);
        assert_eq!(" Ecosystem ".parse::<Archetype>().unwrap(), Archetype::Ecosystem);
        assert!("chaos".parse::<Archetype>().is_err());
    }

    #[test]
    fn test_archetype_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Archetype::Creative).unwrap(), r#""creative""#);
        let a: Archetype = serde_json::from_str(r#""safety""#).unwrap();
        assert_eq!(a, Archetype::Safety);
    }

    #[test]
    fn test_entry_flattens_config_fields() {
        let json = serde_json::to_value(&get_all_archetypes()[0]).unwrap();
        assert_eq!(json["id"], "speed");
        assert_eq!(json["label"], "Velocity Culture");
        assert!(json.get("rewriteRule").is_some());
        assert!(json.get("tooltip").is_some());
        assert!(json.get("focus").is_some());
    }

    #[test]
    fn test_every_sample_has_all_variants() {
        assert_eq!(SAMPLE_REWRITES.len(), 4);
        for sample in SAMPLE_REWRITES {
            for a in Archetype::ALL {
                assert!(!sample.for_archetype(a).is_empty());
            }
        }
    }
}
