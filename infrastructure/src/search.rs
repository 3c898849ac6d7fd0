use domain::models::{Embedding, RetrievedFramework};
use std::cmp::Ordering;

pub struct SearchEngine;

impl SearchEngine {
    /// Cosine similarity; 0.0 for empty, zero-norm or mismatched vectors.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.is_empty() || a.len() != b.len() {
            return 0.0;
        }
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;
        if denom <= f32::EPSILON || !denom.is_finite() {
            return 0.0;
        }
        dot_product / denom
    }

    /// Top `top_k` chunks by descending similarity. Vectors whose dimension
    /// differs from the query are skipped; ties are ordered by id.
    pub fn find_relevant(
        query_embedding: &[f32],
        embeddings: &[Embedding],
        top_k: usize,
    ) -> Vec<RetrievedFramework> {
        let mut scored: Vec<(f32, &Embedding)> = embeddings
            .iter()
            .filter(|emb| emb.vector.len() == query_embedding.len())
            .map(|emb| {
                let score = Self::cosine_similarity(query_embedding, &emb.vector);
                (if score.is_nan() { 0.0 } else { score }, emb)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored
            .into_iter()
            .take(top_k)
            .map(|(score, emb)| RetrievedFramework {
                id: emb.id.clone(),
                text: emb.text.clone(),
                source: emb.path.clone(),
                score,
            })
            .collect()
    }
}
