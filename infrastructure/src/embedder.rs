use domain::models::Embedding;
use domain::provider::EmbeddingProvider;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::types::Result;
use std::sync::Arc;

const BATCH_SIZE: usize = 32;
const CONCURRENT_REQUESTS: usize = 8;

pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub id: String,
    pub path: String,
    pub text: String,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.provider.embed(text).await
    }

    /// Embed inputs in batches; output order matches input order.
    pub async fn generate_embeddings(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(inputs.len());
        for (batch_no, batch) in inputs.chunks(BATCH_SIZE).enumerate() {
            tracing::debug!(batch = batch_no, chunks = batch.len(), "embedding batch");
            embeddings.extend(self.generate_batch_embeddings(batch).await?);
        }
        Ok(embeddings)
    }

    async fn generate_batch_embeddings(&self, inputs: &[EmbeddingInput]) -> Result<Vec<Embedding>> {
        stream::iter(inputs)
            .map(|input| async move {
                let vector = self.provider.embed(&input.text).await?;
                Ok::<_, anyhow::Error>(Embedding {
                    id: input.id.clone(),
                    vector,
                    text: input.text.clone(),
                    path: input.path.clone(),
                })
            })
            .buffered(CONCURRENT_REQUESTS)
            .try_collect()
            .await
    }
}
