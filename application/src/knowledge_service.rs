//! Retrieval layer: keeps the framework vector store in sync with the
//! knowledge-base directory and answers similarity queries against it.

use anyhow::bail;
use domain::models::{Embedding, RetrievedFramework};
use domain::prompt::CONTEXT_SEPARATOR;
use domain::provider::EmbeddingProvider;
use infrastructure::{
    config::Config,
    embedder::{Embedder, EmbeddingInput},
    embedding_storage::EmbeddingStorage,
    file_scanner::FileScanner,
    search::SearchEngine,
    text_splitter::TextSplitter,
};
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_removed: usize,
    pub files_skipped: usize,
    pub chunks_embedded: usize,
    pub total_chunks: usize,
    /// The store was wiped because the embedding model changed.
    pub model_reset: bool,
}

impl IndexReport {
    pub fn is_up_to_date(&self) -> bool {
        self.files_changed == 0 && self.files_removed == 0 && !self.model_reset
    }
}

pub struct KnowledgeService {
    scanner: FileScanner,
    storage: EmbeddingStorage,
    embedder: Embedder,
}

impl KnowledgeService {
    pub fn new(
        scanner: FileScanner,
        storage: EmbeddingStorage,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            scanner,
            storage,
            embedder: Embedder::new(provider),
        }
    }

    pub fn from_config(config: &Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap)?;
        let scanner = FileScanner::new(&config.knowledge_base_path, splitter);
        let storage = EmbeddingStorage::new(&config.db_path)?;
        Ok(Self::new(scanner, storage, provider))
    }

    pub fn knowledge_base_path(&self) -> PathBuf {
        self.scanner.root_path().to_path_buf()
    }

    pub fn chunk_count(&self) -> Result<usize> {
        self.storage.count()
    }

    /// Succeeds when the store already holds chunks embedded with the
    /// configured model; returns the chunk count.
    pub fn load_existing(&self) -> Result<usize> {
        let count = self.storage.count()?;
        if count == 0 {
            bail!(
                "knowledge base not initialized; run `ai-consultant index` to embed {}",
                self.scanner.root_path().display()
            );
        }
        if let Some(stored) = self.storage.embedding_model()? {
            if stored != self.embedder.model_name() {
                bail!(
                    "vector store was built with '{stored}' but EMBEDDING_MODEL is '{}'; run `ai-consultant index --rebuild`",
                    self.embedder.model_name()
                );
            }
        }
        Ok(count)
    }

    /// Load the existing store, building it first when it is unusable.
    pub async fn ensure_ready(&self) -> Result<()> {
        match self.load_existing() {
            Ok(count) => {
                tracing::info!(chunks = count, "loaded existing knowledge base");
                Ok(())
            }
            Err(reason) => {
                tracing::info!(%reason, "building knowledge base");
                let report = self.build_knowledge_base().await?;
                if report.total_chunks == 0 {
                    bail!(
                        "no framework documents found in {}",
                        self.scanner.root_path().display()
                    );
                }
                Ok(())
            }
        }
    }

    /// Wipe the store and index every document again.
    pub async fn rebuild(&self) -> Result<IndexReport> {
        self.storage.clear()?;
        self.build_knowledge_base().await
    }

    /// Incremental index: only documents whose content hash changed are
    /// re-embedded, and documents no longer on disk are purged.
    pub async fn build_knowledge_base(&self) -> Result<IndexReport> {
        let timer = Telemetry::start("index");
        let mut report = IndexReport::default();

        let model = self.embedder.model_name().to_string();
        if let Some(stored) = self.storage.embedding_model()? {
            if stored != model {
                tracing::warn!(%stored, configured = %model, "embedding model changed; clearing vector store");
                self.storage.clear()?;
                report.model_reset = true;
            }
        }

        let files = self.scanner.collect_files()?;
        let scans = self.scanner.scan_paths(&files)?;
        report.files_scanned = scans.len();

        // A skipped document counts as gone: its old vectors must not outlive it.
        let indexable: HashSet<&str> = scans
            .iter()
            .filter(|s| !s.is_skipped())
            .map(|s| s.path.as_str())
            .collect();
        for path in self.storage.indexed_paths()? {
            if !indexable.contains(path.as_str()) {
                tracing::info!(%path, "purging document no longer in the knowledge base");
                self.storage.remove_path(&path)?;
                report.files_removed += 1;
            }
        }

        let mut inputs: Vec<EmbeddingInput> = Vec::new();
        let mut changed: Vec<(&str, &str)> = Vec::new();
        for scan in &scans {
            if scan.is_skipped() {
                report.files_skipped += 1;
                continue;
            }
            let previous_hash = self.storage.get_file_hash(&scan.path)?;
            if previous_hash.as_deref() == Some(scan.hash.as_str()) {
                continue;
            }
            tracing::debug!(path = %scan.path, chunks = scan.chunks.len(), "document changed");
            changed.push((scan.path.as_str(), scan.hash.as_str()));
            inputs.extend(scan.chunks.iter().map(|chunk| EmbeddingInput {
                id: chunk.id(),
                path: chunk.path.clone(),
                text: chunk.text.clone(),
            }));
        }
        report.files_changed = changed.len();

        let embeddings: Vec<Embedding> = if inputs.is_empty() {
            Vec::new()
        } else {
            tracing::info!(chunks = inputs.len(), files = changed.len(), "embedding framework chunks");
            self.embedder.generate_embeddings(&inputs).await?
        };

        // Old chunks are replaced only once the new vectors exist, so a failed
        // embedding run leaves the previous index intact.
        for (path, _) in &changed {
            self.storage.delete_embeddings_for_path(path)?;
        }
        self.storage.insert_embeddings(&embeddings)?;
        for (path, hash) in &changed {
            self.storage.upsert_file_hash(path, hash)?;
        }
        self.storage.set_embedding_model(&model)?;

        report.chunks_embedded = embeddings.len();
        report.total_chunks = self.storage.count()?;
        timer.finish();
        tracing::info!(?report, "knowledge base indexed");
        Ok(report)
    }

    /// Top `k` framework chunks for a query.
    pub async fn get_relevant_frameworks(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedFramework>> {
        self.load_existing()?;
        let query_embedding = self.embedder.embed_query(query).await?;
        let all_embeddings = self.storage.get_all_embeddings()?;
        let frameworks = SearchEngine::find_relevant(&query_embedding, &all_embeddings, k);
        tracing::debug!(
            candidates = all_embeddings.len(),
            returned = frameworks.len(),
            "retrieved frameworks"
        );
        Ok(frameworks)
    }

    /// Prompt context: chunk texts in rank order separated by a rule.
    pub fn format_context(frameworks: &[RetrievedFramework]) -> String {
        frameworks
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framework(text: &str) -> RetrievedFramework {
        RetrievedFramework {
            id: format!("{text}:0"),
            text: text.to_string(),
            source: "kb.txt".to_string(),
            score: 1.0,
        }
    }

    #[test]
    fn context_joins_chunks_with_rule() {
        let context =
            KnowledgeService::format_context(&[framework("Gap analysis"), framework("RACI")]);
        assert_eq!(context, "Gap analysis\n\n---\n\nRACI");
        assert_eq!(KnowledgeService::format_context(&[]), "");
    }

    #[test]
    fn report_tracks_freshness() {
        let mut report = IndexReport::default();
        assert!(report.is_up_to_date());
        report.files_removed = 1;
        assert!(!report.is_up_to_date());
    }
}
