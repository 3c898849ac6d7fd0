use crate::engagement::EngagementType;
use crate::error::DomainError;
use crate::models::BusinessChallenge;

/// Pre-filled example challenge offered by the front-end.
#[derive(Debug, Clone, Copy)]
pub struct SampleScenario {
    pub name: &'static str,
    pub engagement_type: EngagementType,
    pub industry: &'static str,
    pub challenge: &'static str,
    pub constraints: &'static str,
}

impl SampleScenario {
    pub fn to_challenge(&self) -> BusinessChallenge {
        BusinessChallenge::new(self.engagement_type, self.challenge)
            .with_industry(self.industry)
            .with_constraints(self.constraints)
    }
}

pub const SAMPLE_SCENARIOS: [SampleScenario; 3] = [
    SampleScenario {
        name: "Post-M&A Tech Integration",
        engagement_type: EngagementType::MnaIntegration,
        industry: "Technology / SaaS",
        challenge: "Two companies recently merged. Need to integrate different tech stacks (one on AWS, one on Google Cloud), combine engineering teams, and show synergies to investors within 90 days.",
        constraints: "Limited budget for migration, key engineers considering leaving, customers worried about service disruption",
    },
    SampleScenario {
        name: "Scaling Operations 3x",
        engagement_type: EngagementType::OperationalTransformation,
        industry: "E-commerce",
        challenge: "Company growing 300% year-over-year but operations team can't keep up. Current processes are manual and breaking down. Need to scale without proportional headcount increase.",
        constraints: "Can't afford expensive enterprise software, need solutions in 6 months, team resistant to change",
    },
    SampleScenario {
        name: "Building Strategic PMO",
        engagement_type: EngagementType::OrganizationalDesign,
        industry: "Financial Services",
        challenge: "Multiple strategic initiatives happening simultaneously with no coordination. Projects are delayed, resources over-allocated, unclear priorities. Need to establish Project Management Office.",
        constraints: "Decentralized organization, no existing PMO expertise, executives skeptical of process overhead",
    },
];

/// Case-insensitive lookup by scenario name.
pub fn find_scenario(name: &str) -> Result<&'static SampleScenario, DomainError> {
    let needle = name.trim().to_lowercase();
    SAMPLE_SCENARIOS
        .iter()
        .find(|s| s.name.to_lowercase() == needle)
        .ok_or_else(|| DomainError::UnknownScenario(name.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_are_valid_challenges() {
        for scenario in &SAMPLE_SCENARIOS {
            let challenge = scenario.to_challenge();
            assert!(challenge.validate().is_ok());
            assert_eq!(challenge.constraints_or_default(), scenario.constraints);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let scenario = find_scenario("scaling operations 3x").unwrap();
        assert_eq!(scenario.industry, "E-commerce");
        assert!(matches!(
            find_scenario("Unknown"),
            Err(DomainError::UnknownScenario(_))
        ));
    }
}
