//! Chameleon — rewrites resume bullets to fit a company-culture archetype.
//!
//! Deterministic and rule-based. No LLM involvement.

pub mod archetypes;
pub mod rewrite;

pub use archetypes::{get_all_archetypes, Archetype, ArchetypeEntry};
pub use rewrite::{generate_chameleon_metrics, ChameleonMetric};
