use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of consulting engagement. Selects the framework emphasis and the
/// focus paragraph appended to the base system prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngagementType {
    #[default]
    StrategyExecution,
    ProcessImprovement,
    OperationalTransformation,
    OrganizationalDesign,
    MnaIntegration,
}

impl EngagementType {
    pub const ALL: [EngagementType; 5] = [
        EngagementType::StrategyExecution,
        EngagementType::ProcessImprovement,
        EngagementType::OperationalTransformation,
        EngagementType::OrganizationalDesign,
        EngagementType::MnaIntegration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrategyExecution => "Strategy & Execution",
            Self::ProcessImprovement => "Process Improvement",
            Self::OperationalTransformation => "Operational Transformation",
            Self::OrganizationalDesign => "Organizational Design",
            Self::MnaIntegration => "M&A Integration",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::StrategyExecution => "strategy",
            Self::ProcessImprovement => "process",
            Self::OperationalTransformation => "operations",
            Self::OrganizationalDesign => "org-design",
            Self::MnaIntegration => "mna",
        }
    }

    /// Frameworks the brief should lean on for this engagement.
    pub fn focus_frameworks(&self) -> &'static [&'static str] {
        match self {
            Self::StrategyExecution => &["Gap Analysis", "RACI Matrix"],
            Self::ProcessImprovement => &["Process Improvement", "Gap Analysis"],
            Self::OperationalTransformation => {
                &["Process Improvement", "Gap Analysis", "RACI Matrix"]
            }
            Self::OrganizationalDesign => &["RACI Matrix", "Gap Analysis"],
            Self::MnaIntegration => &["M&A Integration", "RACI Matrix", "Gap Analysis"],
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Self::StrategyExecution => {
                "Connect strategic intent to execution: clarify the target state, \
                 the few initiatives that close the gap, and who owns each one."
            }
            Self::ProcessImprovement => {
                "Map the current process, quantify waste and bottlenecks, and \
                 sequence quick wins ahead of structural redesign."
            }
            Self::OperationalTransformation => {
                "Design operations that scale faster than headcount: automation \
                 candidates, operating cadence, and change management for the team."
            }
            Self::OrganizationalDesign => {
                "Define structure, decision rights and governance; make roles \
                 and accountabilities explicit and keep process overhead proportional."
            }
            Self::MnaIntegration => {
                "Plan the post-merger integration: Day 1 priorities, a 100-day plan, \
                 synergy capture and tracking, talent retention, and customer continuity."
            }
        }
    }

    fn expected_values() -> String {
        Self::ALL
            .iter()
            .map(|e| e.slug())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EngagementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EngagementType {
    type Err = DomainError;

    /// Accepts either the display label or the slug, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.slug() == needle || e.label().to_lowercase() == needle)
            .ok_or_else(|| {
                DomainError::UnknownEngagementType(s.trim().to_string(), Self::expected_values())
            })
    }
}
