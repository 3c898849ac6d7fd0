pub mod anthropic_client;
pub mod brief_cache;
pub mod config;
pub mod document_reader;
pub mod embedder;
pub mod embedding_storage;
pub mod file_scanner;
pub mod ollama_client;
pub mod search;
pub mod text_splitter;
