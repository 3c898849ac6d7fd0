//! Deterministic stand-ins for the embedding and completion services, plus
//! a small on-disk knowledge base used by the integration tests.

use application::knowledge_service::KnowledgeService;
use async_trait::async_trait;
use domain::provider::{CompletionProvider, CompletionRequest, EmbeddingProvider};
use infrastructure::embedding_storage::EmbeddingStorage;
use infrastructure::file_scanner::FileScanner;
use infrastructure::text_splitter::TextSplitter;
use shared::types::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const DIMENSIONS: usize = 256;

/// Hashed bag-of-words vectors: texts sharing words point the same way.
pub struct BagOfWordsEmbedder {
    model: String,
    calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    pub fn new(model: &str) -> Arc<Self> {
        Arc::new(Self {
            model: model.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bucket(word: &str) -> usize {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in word.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        (hash % DIMENSIONS as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0f32; DIMENSIONS];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 3)
        {
            vector[Self::bucket(word)] += 1.0;
        }
        Ok(vector)
    }
}

/// Returns a fixed reply and remembers the last request it was given.
pub struct ScriptedGenerator {
    reply: String,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            last_request: Mutex::new(None),
        })
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl CompletionProvider for ScriptedGenerator {
    fn model_name(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        Ok(self.reply.clone())
    }
}

pub const MNA_FRAMEWORK: &str = "M&A Integration Framework\n\n\
Post-merger integration starts with Day 1 readiness: leadership announcements, \
customer communication and a clean handover of systems. The integration \
management office tracks synergy capture against the deal model.\n\n\
Retain key talent with stay bonuses and clear roles. When two merged \
companies run different tech stacks, integrate cloud platforms in waves, \
combine engineering teams early and report synergies to investors.";

pub const RACI_FRAMEWORK: &str = "RACI Matrix\n\n\
Each activity lists who is Responsible for doing the work, who is Accountable \
for the outcome, who must be Consulted and who is kept Informed. Exactly one \
person is accountable per activity. Use it whenever accountability across \
teams is unclear.";

pub const PROCESS_FRAMEWORK: &str = "Process Improvement\n\n\
Map the value stream, measure cycle time, remove waste and bottlenecks, \
standardize the improved workflow and automate repetitive manual steps.";

/// Temporary knowledge-base directory with the three sample frameworks and
/// a vector store path beside it.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("knowledge_base")).expect("kb dir");
        let fixture = Self { dir };
        fixture.write("mna_integration.txt", MNA_FRAMEWORK);
        fixture.write("raci_matrix.txt", RACI_FRAMEWORK);
        fixture.write("process_improvement.md", PROCESS_FRAMEWORK);
        fixture
    }

    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("knowledge_base")).expect("kb dir");
        Self { dir }
    }

    pub fn kb_path(&self) -> PathBuf {
        self.dir.path().join("knowledge_base")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("vector_db/frameworks.db")
    }

    pub fn doc_path(&self, name: &str) -> PathBuf {
        self.kb_path().join(name)
    }

    pub fn write(&self, name: &str, body: &str) {
        std::fs::write(self.doc_path(name), body).expect("write framework");
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.doc_path(name)).expect("remove framework");
    }

    pub fn knowledge_service(&self, provider: Arc<dyn EmbeddingProvider>) -> KnowledgeService {
        knowledge_service_at(&self.kb_path(), &self.db_path(), provider)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn knowledge_service_at(
    kb_path: &Path,
    db_path: &Path,
    provider: Arc<dyn EmbeddingProvider>,
) -> KnowledgeService {
    let splitter = TextSplitter::new(1000, 200).expect("splitter");
    let storage = EmbeddingStorage::new(db_path).expect("storage");
    KnowledgeService::new(FileScanner::new(kb_path, splitter), storage, provider)
}
