use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please describe the challenge before generating a brief.")]
    EmptyChallenge,

    #[error("unknown engagement type '{0}' (expected one of: {1})")]
    UnknownEngagementType(String, String),

    #[error("unknown sample scenario '{0}'")]
    UnknownScenario(String),
}
