use crate::engagement::EngagementType;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A knowledge-base chunk with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub path: String,
}

/// A framework chunk returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedFramework {
    pub id: String,
    pub text: String,
    pub source: String,
    pub score: f32,
}

/// The client problem captured by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessChallenge {
    pub engagement_type: EngagementType,
    pub industry: String,
    pub challenge: String,
    pub constraints: Option<String>,
}

impl BusinessChallenge {
    pub fn new(engagement_type: EngagementType, challenge: impl Into<String>) -> Self {
        Self {
            engagement_type,
            challenge: challenge.into(),
            ..Self::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.challenge.trim().is_empty() {
            return Err(DomainError::EmptyChallenge);
        }
        Ok(())
    }

    /// Constraints as shown to the model; blank counts as absent.
    pub fn constraints_or_default(&self) -> &str {
        match self.constraints.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => "None specified",
        }
    }
}

/// Generated output for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyBrief {
    pub engagement_type: EngagementType,
    pub industry: String,
    pub content: String,
    pub sources: Vec<String>,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_challenge_is_rejected() {
        let challenge = BusinessChallenge::new(EngagementType::MnaIntegration, "  \n ");
        assert_eq!(challenge.validate(), Err(DomainError::EmptyChallenge));
    }

    #[test]
    fn blank_constraints_render_as_none_specified() {
        let challenge = BusinessChallenge::new(EngagementType::StrategyExecution, "Grow")
            .with_constraints("   ");
        assert_eq!(challenge.constraints_or_default(), "None specified");

        let challenge = challenge.with_constraints("Budget under $1M");
        assert_eq!(challenge.constraints_or_default(), "Budget under $1M");
    }
}
