//! Per-request orchestration: validate the challenge, retrieve frameworks,
//! build the prompts and ask the completion provider for a strategy brief.

use crate::knowledge_service::KnowledgeService;
use anyhow::bail;
use domain::models::{BusinessChallenge, RetrievedFramework, StrategyBrief};
use domain::prompt::{build_query, system_prompt, user_prompt};
use domain::provider::{CompletionProvider, CompletionRequest};
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;

/// Everything sent to the model for one brief.
#[derive(Debug, Clone)]
pub struct PreparedBrief {
    pub query: String,
    pub frameworks: Vec<RetrievedFramework>,
    pub request: CompletionRequest,
}

impl PreparedBrief {
    /// Distinct framework sources in rank order.
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for framework in &self.frameworks {
            if !sources.contains(&framework.source) {
                sources.push(framework.source.clone());
            }
        }
        sources
    }
}

/// Build the retrieval query and prompts for a challenge. Needs only the
/// knowledge base, so prompts can be previewed without a model credential.
pub async fn prepare_brief(
    knowledge: &KnowledgeService,
    challenge: &BusinessChallenge,
    top_k: usize,
    max_tokens: u32,
) -> Result<PreparedBrief> {
    challenge.validate()?;
    let query = build_query(challenge);
    let frameworks = knowledge.get_relevant_frameworks(&query, top_k).await?;
    let context = KnowledgeService::format_context(&frameworks);
    let request = CompletionRequest {
        system: system_prompt(challenge.engagement_type),
        user: user_prompt(challenge, &context),
        max_tokens,
    };
    Ok(PreparedBrief {
        query,
        frameworks,
        request,
    })
}

pub struct ConsultingService {
    knowledge: KnowledgeService,
    generator: Arc<dyn CompletionProvider>,
    top_k: usize,
    max_tokens: u32,
}

impl ConsultingService {
    pub fn new(
        knowledge: KnowledgeService,
        generator: Arc<dyn CompletionProvider>,
        top_k: usize,
        max_tokens: u32,
    ) -> Self {
        Self {
            knowledge,
            generator,
            top_k,
            max_tokens,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeService {
        &self.knowledge
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Validate, retrieve and build prompts without calling the model.
    pub async fn prepare(&self, challenge: &BusinessChallenge) -> Result<PreparedBrief> {
        prepare_brief(&self.knowledge, challenge, self.top_k, self.max_tokens).await
    }

    pub async fn generate_brief(&self, challenge: &BusinessChallenge) -> Result<StrategyBrief> {
        let prepared = self.prepare(challenge).await?;
        tracing::info!(
            engagement = %challenge.engagement_type,
            frameworks = prepared.frameworks.len(),
            model = self.generator.model_name(),
            "generating strategy brief"
        );

        let timer = Telemetry::start("generation");
        let content = self.generator.complete(&prepared.request).await?;
        timer.finish();
        if content.trim().is_empty() {
            bail!("the model returned an empty strategy brief");
        }

        Ok(StrategyBrief {
            engagement_type: challenge.engagement_type,
            industry: challenge.industry.trim().to_string(),
            content: content.trim().to_string(),
            sources: prepared.sources(),
            model: self.generator.model_name().to_string(),
        })
    }
}
