//! Hiring Committee — three simulated reviewers scoring the same resume.
//!
//! Each role gets its own prompt and its own chat client. The Nexus analysis is
//! rendered as a markdown pre-analysis block and appended to the resume text so
//! every reviewer sees the same grounded evidence. Model output is parsed
//! defensively: a reviewer that fails never fails the committee.

pub mod prompts;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ApiKeys, Config};
use crate::llm_client::{ChatClient, ChatMessage, GatewayOptions, LlmError, ModelGateway, Provider};
use crate::nexus::NexusAnalysis;

pub const EVALUATION_FAILED: &str = "Evaluation failed - please retry";

const CONTEXT_COMPETENCY_LIMIT: usize = 10;
const CONTEXT_INFERRED_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    #[serde(rename = "Hiring Manager")]
    HiringManager,
    #[serde(rename = "Tech Lead")]
    TechLead,
    #[serde(rename = "HR")]
    Hr,
}

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::HiringManager => "Hiring Manager",
            AgentRole::TechLead => "Tech Lead",
            AgentRole::Hr => "HR",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Hire,
    Interview,
    NoHire,
}

impl Verdict {
    /// Numeric weight used when averaging the committee.
    pub fn score(self) -> u32 {
        match self {
            Verdict::Hire => 90,
            Verdict::Interview => 60,
            Verdict::NoHire => 30,
        }
    }

    /// Anything that isn't a recognised verdict reads as INTERVIEW.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "HIRE" => Verdict::Hire,
            "NO_HIRE" => Verdict::NoHire,
            _ => Verdict::Interview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFeedback {
    pub agent_name: AgentRole,
    pub verdict: Verdict,
    pub concerns: Vec<String>,
    pub praises: Vec<String>,
}

impl AgentFeedback {
    fn failed(role: AgentRole) -> Self {
        Self {
            agent_name: role,
            verdict: Verdict::Interview,
            concerns: vec![EVALUATION_FAILED.to_string()],
            praises: Vec::new(),
        }
    }
}

/// What every reviewer is shown.
#[derive(Debug, Clone, Copy)]
pub struct AgentInput<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub job_title: &'a str,
    pub company: &'a str,
    pub nexus_analysis: Option<&'a NexusAnalysis>,
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt conditioning
// ────────────────────────────────────────────────────────────────────────────

/// Renders the Nexus analysis as a markdown block for reviewer prompts.
/// Sections with nothing to show are omitted.
pub fn format_nexus_context(nexus: &NexusAnalysis) -> String {
    let mut out = String::from("\n## Pre-Analysis (Nexus Engine)\n");
    out.push_str(&format!(
        "**Match Score:** {}% | **Confidence:** {}\n\n",
        nexus.consensus_score, nexus.confidence
    ));

    if !nexus.competency_scores.is_empty() {
        out.push_str("**Competency Depth Scores:**\n");
        for cs in nexus.competency_scores.iter().take(CONTEXT_COMPETENCY_LIMIT) {
            out.push_str(&format!("- {}: {} ({}/5)\n", cs.skill, cs.level, cs.score));
        }
        out.push('\n');
    }

    if !nexus.implicit_skills.is_empty() {
        out.push_str("**Inferred Skills (not explicitly stated):**\n");
        for skill in nexus.implicit_skills.iter().take(CONTEXT_INFERRED_LIMIT) {
            out.push_str(&format!(
                "- {} ({}): {}\n",
                skill.name, skill.confidence, skill.reasoning
            ));
        }
        out.push('\n');
    }

    if !nexus.lead_with.is_empty() {
        out.push_str(&format!("**Strengths to Probe:** {}\n", nexus.lead_with.join(", ")));
    }
    if !nexus.strengthen.is_empty() {
        out.push_str(&format!(
            "**Areas Needing Evidence:** {}\n",
            nexus.strengthen.join(", ")
        ));
    }
    if !nexus.conflicts.is_empty() {
        out.push_str(&format!("**Flags:** {}\n", nexus.conflicts.join("; ")));
    }

    out
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Span from the first `{` to the last `}`, if there is one.
fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Turns free-form model output into feedback. Never fails.
pub fn parse_agent_response(role: AgentRole, raw: &str) -> AgentFeedback {
    let parsed = json_object_span(raw)
        .ok_or_else(|| "no JSON object in response".to_string())
        .and_then(|span| serde_json::from_str::<RawEvaluation>(span).map_err(|e| e.to_string()));

    match parsed {
        Ok(eval) => AgentFeedback {
            agent_name: role,
            verdict: eval
                .recommendation
                .as_deref()
                .map(Verdict::parse_lenient)
                .unwrap_or(Verdict::Interview),
            concerns: eval.concerns,
            praises: eval.strengths,
        },
        Err(reason) => {
            warn!("JSON parse failed for {role}: {reason}");
            AgentFeedback::failed(role)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Committee
// ────────────────────────────────────────────────────────────────────────────

/// Which provider (and key) each role talks to.
///
/// Hiring Manager always uses Anthropic. Tech Lead prefers xAI, then Google.
/// HR prefers OpenAI. Anything unavailable falls back to Anthropic.
pub fn provider_for_role(role: AgentRole, keys: &ApiKeys) -> (Provider, &str) {
    let anthropic = (Provider::Anthropic, keys.anthropic.as_str());
    match role {
        AgentRole::HiringManager => anthropic,
        AgentRole::TechLead => keys
            .xai
            .as_deref()
            .map(|k| (Provider::XAi, k))
            .or_else(|| keys.gemini.as_deref().map(|k| (Provider::Google, k)))
            .unwrap_or(anthropic),
        AgentRole::Hr => keys
            .openai
            .as_deref()
            .map(|k| (Provider::OpenAi, k))
            .unwrap_or(anthropic),
    }
}

#[derive(Clone)]
pub struct Committee {
    hiring_manager: Arc<dyn ChatClient>,
    tech_lead: Arc<dyn ChatClient>,
    hr: Arc<dyn ChatClient>,
}

impl Committee {
    pub fn new(
        hiring_manager: Arc<dyn ChatClient>,
        tech_lead: Arc<dyn ChatClient>,
        hr: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            hiring_manager,
            tech_lead,
            hr,
        }
    }

    /// Builds one gateway per role according to `provider_for_role`.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let gateway_for = |role: AgentRole| -> Result<Arc<dyn ChatClient>, LlmError> {
            let (provider, key) = provider_for_role(role, &config.api_keys);
            let gateway = ModelGateway::new(
                key.to_string(),
                Some(provider),
                GatewayOptions {
                    preferred_model: None,
                    max_retries: config.llm_max_retries,
                    timeout: config.llm_timeout,
                },
            )?;
            info!(
                "{role} reviewer using {}/{}",
                gateway.provider(),
                gateway.current_model()
            );
            Ok(Arc::new(gateway))
        };

        Ok(Self::new(
            gateway_for(AgentRole::HiringManager)?,
            gateway_for(AgentRole::TechLead)?,
            gateway_for(AgentRole::Hr)?,
        ))
    }

    /// Runs all three reviewers concurrently.
    /// Always returns exactly three entries: Hiring Manager, Tech Lead, HR.
    pub async fn evaluate(&self, input: &AgentInput<'_>) -> Vec<AgentFeedback> {
        info!(
            "Starting committee evaluation for {} at {}",
            input.job_title, input.company
        );

        let context = input
            .nexus_analysis
            .map(format_nexus_context)
            .unwrap_or_default();
        let resume_block = format!("{}{}", input.resume_text, context);

        let (hm, tl, hr) = tokio::join!(
            run_agent(AgentRole::HiringManager, self.hiring_manager.as_ref(), input, &resume_block),
            run_agent(AgentRole::TechLead, self.tech_lead.as_ref(), input, &resume_block),
            run_agent(AgentRole::Hr, self.hr.as_ref(), input, &resume_block),
        );

        info!("Committee evaluation complete");
        vec![hm, tl, hr]
    }
}

async fn run_agent(
    role: AgentRole,
    client: &dyn ChatClient,
    input: &AgentInput<'_>,
    resume_block: &str,
) -> AgentFeedback {
    let prompt = prompts::render_prompt(
        role,
        input.job_title,
        input.company,
        input.job_description,
        resume_block,
    );

    match client.chat(&[ChatMessage::user(prompt)]).await {
        Ok(response) => parse_agent_response(role, &response.content),
        Err(e) => {
            warn!("{role} evaluation failed: {e}");
            AgentFeedback::failed(role)
        }
    }
}
