use anyhow::{anyhow, bail, Context};
use dotenvy::dotenv;
use shared::types::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!(
                "LLM_PROVIDER must be 'anthropic' or 'ollama', got '{other}'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm_provider: LlmProvider,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub max_tokens: u32,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub embedding_model: String,
    pub knowledge_base_path: PathBuf,
    pub db_path: PathBuf,
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Config {
    /// Read `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            llm_provider: get("LLM_PROVIDER", "anthropic").parse()?,
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty()),
            anthropic_base_url: get("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
            anthropic_model: get("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
            max_tokens: parse_number(&lookup, "MAX_TOKENS", 4000)?,
            ollama_base_url: get("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: get("OLLAMA_MODEL", "qwen2.5:7b-instruct"),
            embedding_model: get("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            knowledge_base_path: PathBuf::from(get("KNOWLEDGE_BASE_PATH", "./knowledge_base")),
            db_path: PathBuf::from(get("DB_PATH", "./vector_db/frameworks.db")),
            top_k: parse_number(&lookup, "RAG_TOP_K", 3)?,
            chunk_size: parse_number(&lookup, "CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_number(&lookup, "CHUNK_OVERLAP", 200)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            bail!("RAG_TOP_K must be at least 1");
        }
        if self.chunk_size == 0 {
            bail!("CHUNK_SIZE must be at least 1");
        }
        if self.chunk_overlap >= self.chunk_size {
            bail!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.max_tokens == 0 {
            bail!("MAX_TOKENS must be at least 1");
        }
        Ok(())
    }

    /// The API key, required only once generation is attempted.
    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key.as_deref().ok_or_else(|| {
            anyhow!("ANTHROPIC_API_KEY is not set; add it to .env or the environment")
        })
    }
}

fn parse_number<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a positive integer, got '{raw}'")),
        None => Ok(default),
    }
}
