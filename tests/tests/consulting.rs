use application::consulting_service::{prepare_brief, ConsultingService};
use domain::engagement::EngagementType;
use domain::error::DomainError;
use domain::models::BusinessChallenge;
use domain::scenario::find_scenario;
use tests::{BagOfWordsEmbedder, Fixture, ScriptedGenerator};

const BRIEF: &str = "## 1. EXECUTIVE SUMMARY\n- Stand up an integration office in week one";

async fn service(fixture: &Fixture, generator: std::sync::Arc<ScriptedGenerator>) -> ConsultingService {
    let knowledge = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    knowledge.ensure_ready().await.unwrap();
    ConsultingService::new(knowledge, generator, 3, 4000)
}

#[tokio::test]
async fn brief_is_grounded_in_retrieved_frameworks() {
    let fixture = Fixture::new();
    let generator = ScriptedGenerator::new(BRIEF);
    let service = service(&fixture, generator.clone()).await;

    let challenge = find_scenario("Post-M&A Tech Integration")
        .unwrap()
        .to_challenge();
    let brief = service.generate_brief(&challenge).await.unwrap();

    assert_eq!(brief.content, BRIEF);
    assert_eq!(brief.engagement_type, EngagementType::MnaIntegration);
    assert_eq!(brief.industry, "Technology / SaaS");
    assert_eq!(brief.model, "scripted-model");
    assert!(brief.sources[0].ends_with("mna_integration.txt"));

    let request = generator.last_request().expect("generator was called");
    assert_eq!(request.max_tokens, 4000);
    assert!(request.system.contains("Engagement focus (M&A Integration)"));
    assert!(request.user.contains("Day 1 readiness"));
    assert!(request.user.contains("Engagement Type: M&A Integration"));
    assert!(request
        .user
        .contains("Constraints: Limited budget for migration"));
}

#[tokio::test]
async fn blank_challenge_never_reaches_the_model() {
    let fixture = Fixture::new();
    let generator = ScriptedGenerator::new(BRIEF);
    let service = service(&fixture, generator.clone()).await;

    let challenge = BusinessChallenge::new(EngagementType::StrategyExecution, "   ");
    let err = service.generate_brief(&challenge).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::EmptyChallenge)
    );
    assert!(generator.last_request().is_none());
}

#[tokio::test]
async fn empty_completion_is_an_error() {
    let fixture = Fixture::new();
    let service = service(&fixture, ScriptedGenerator::new("  \n")).await;

    let challenge = BusinessChallenge::new(EngagementType::ProcessImprovement, "Orders ship late")
        .with_industry("E-commerce");
    let err = service.generate_brief(&challenge).await.unwrap_err();
    assert!(err.to_string().contains("empty strategy brief"));
}

#[tokio::test]
async fn prepared_prompts_separate_chunks_and_respect_top_k() {
    let fixture = Fixture::new();
    let knowledge = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    knowledge.ensure_ready().await.unwrap();

    let challenge = BusinessChallenge::new(
        EngagementType::OrganizationalDesign,
        "Unclear accountability for every activity across teams",
    )
    .with_industry("Financial Services");
    let prepared = prepare_brief(&knowledge, &challenge, 2, 1000).await.unwrap();

    assert_eq!(
        prepared.query,
        "Organizational Design: Financial Services - Unclear accountability for every activity across teams"
    );
    assert_eq!(prepared.frameworks.len(), 2);
    assert!(prepared.frameworks[0].source.ends_with("raci_matrix.txt"));
    assert!(prepared.request.user.contains("\n\n---\n\n"));
    assert!(prepared.request.user.contains("Constraints: None specified"));
    assert_eq!(prepared.request.max_tokens, 1000);
}
