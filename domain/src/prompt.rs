//! Prompt construction for strategy briefs.
//!
//! The retrieval query, system prompt and user prompt are plain strings so the
//! same text can be previewed from the CLI without calling a model.

use crate::engagement::EngagementType;
use crate::models::BusinessChallenge;

/// Separator placed between retrieved framework chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

const BASE_SYSTEM_PROMPT: &str = "You are a senior Strategy & Operations consultant.

Your task is to analyze business challenges and provide actionable recommendations using proven consulting frameworks.

Key principles:
- Data-driven and realistic
- Break complex problems into actionable steps
- Balance technical and business perspectives
- Provide specific metrics and timelines
- Professional but clear communication

Output a comprehensive strategy brief with these sections:
1. EXECUTIVE SUMMARY (3-4 key bullets)
2. CURRENT STATE ASSESSMENT
3. GAP ANALYSIS
4. PRIORITIZED RECOMMENDATIONS (with effort/impact scores)
5. IMPLEMENTATION ROADMAP (phased timeline)
6. SUCCESS METRICS
7. RISK REGISTER

Use concrete examples and specific numbers where possible.";

/// Sections every brief is asked to contain, in order.
pub const BRIEF_SECTIONS: [&str; 7] = [
    "EXECUTIVE SUMMARY",
    "CURRENT STATE ASSESSMENT",
    "GAP ANALYSIS",
    "PRIORITIZED RECOMMENDATIONS",
    "IMPLEMENTATION ROADMAP",
    "SUCCESS METRICS",
    "RISK REGISTER",
];

/// Text embedded for similarity search: `"{engagement}: {industry} - {challenge}"`.
pub fn build_query(challenge: &BusinessChallenge) -> String {
    format!(
        "{}: {} - {}",
        challenge.engagement_type.label(),
        challenge.industry.trim(),
        challenge.challenge.trim()
    )
}

pub fn system_prompt(engagement: EngagementType) -> String {
    format!(
        "{BASE_SYSTEM_PROMPT}\n\nEngagement focus ({}): {}\nPrioritize these frameworks where they apply: {}.",
        engagement.label(),
        engagement.focus(),
        engagement.focus_frameworks().join(", ")
    )
}

pub fn user_prompt(challenge: &BusinessChallenge, frameworks_context: &str) -> String {
    format!(
        "
RELEVANT CONSULTING FRAMEWORKS:
{frameworks_context}

CLIENT CHALLENGE:
Engagement Type: {}
Industry: {}
Challenge: {}
Constraints: {}

Using the frameworks above, generate a comprehensive strategy brief for this challenge.
",
        challenge.engagement_type.label(),
        challenge.industry.trim(),
        challenge.challenge.trim(),
        challenge.constraints_or_default()
    )
}
