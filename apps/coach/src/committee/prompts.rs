// Prompt templates for the simulated hiring committee.
// Placeholders are substituted once each by `render_prompt`.

use crate::committee::AgentRole;

const INSTRUCTIONS: &str = "\
## Job Description
{{JOB_DESCRIPTION}}

## Resume
{{RESUME_TEXT}}

## Instructions
Score each dimension (0-100). Then provide:
- Overall Score (0-100)
- Top 3 Strengths
- Top 3 Concerns
- Recommendation: HIRE | INTERVIEW | NO_HIRE
- One-sentence rationale

Output as JSON only:
{\"overallScore\": <number>, \"strengths\": [...], \"concerns\": [...], \"recommendation\": \"...\", \"rationale\": \"...\"}";

const HIRING_MANAGER_PREAMBLE: &str = "\
You are a VP of Partnerships evaluating a resume for {{JOB_TITLE}} at {{COMPANY}}.
Your focus is business impact: revenue outcomes, leadership scope, strategic alignment.";

const TECH_LEAD_PREAMBLE: &str = "\
You are a Principal Engineer evaluating a resume for {{JOB_TITLE}} at {{COMPANY}}.
Your focus is technical depth: architecture decisions, systems thinking, tool proficiency.";

const HR_PREAMBLE: &str = "\
You are a Senior HR Business Partner evaluating a resume for {{JOB_TITLE}} at {{COMPANY}}.
Your focus is cultural fit: collaboration evidence, growth mindset, red flags.";

pub fn template_for(role: AgentRole) -> String {
    let preamble = match role {
        AgentRole::HiringManager => HIRING_MANAGER_PREAMBLE,
        AgentRole::TechLead => TECH_LEAD_PREAMBLE,
        AgentRole::Hr => HR_PREAMBLE,
    };
    format!("{preamble}\n\n{INSTRUCTIONS}")
}

/// Fills the role template. `resume_block` is the resume text with any
/// pre-analysis context already appended.
pub fn render_prompt(
    role: AgentRole,
    job_title: &str,
    company: &str,
    job_description: &str,
    resume_block: &str,
) -> String {
    template_for(role)
        .replacen("{{JOB_TITLE}}", job_title, 1)
        .replacen("{{COMPANY}}", company, 1)
        .replacen("{{JOB_DESCRIPTION}}", job_description, 1)
        .replacen("{{RESUME_TEXT}}", resume_block, 1)
}
