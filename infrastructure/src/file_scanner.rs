use crate::document_reader::read_document;
use crate::text_splitter::TextSplitter;
use rayon::prelude::*;
use shared::types::Result;
use shared::utils::is_supported_file;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Walks the knowledge-base directory and turns each framework document
/// into hashed, chunked text.
pub struct FileScanner {
    root_path: PathBuf,
    ignored_dirs: HashSet<String>,
    max_file_bytes: u64,
    splitter: TextSplitter,
}

impl FileScanner {
    pub fn new(root_path: impl Into<PathBuf>, splitter: TextSplitter) -> Self {
        Self {
            root_path: root_path.into(),
            ignored_dirs: [".git", "target", "node_modules", ".cache", "__pycache__"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_file_bytes: 2 * 1024 * 1024,
            splitter,
        }
    }

    /// Documents larger than this are skipped (default 2 MiB).
    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn scan_files(&self) -> Result<Vec<FileScanResult>> {
        let files = self.collect_files()?;
        self.scan_paths(&files)
    }

    pub fn scan_paths(&self, paths: &[PathBuf]) -> Result<Vec<FileScanResult>> {
        tracing::debug!(files = paths.len(), "scanning knowledge base files");
        let results: Vec<Result<FileScanResult>> = paths
            .par_iter()
            .map(|path| self.load_and_chunk_file(path))
            .collect();
        let mut scans = results.into_iter().collect::<Result<Vec<_>>>()?;
        scans.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(scans)
    }

    /// Supported documents under the root, sorted. A missing root is an error
    /// so a mistyped `KNOWLEDGE_BASE_PATH` does not look like an empty index.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            anyhow::bail!(
                "knowledge base directory {} does not exist",
                self.root_path.display()
            );
        }
        let mut files = Vec::new();
        self.collect_files_recursive(&self.root_path, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn collect_files_recursive(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name.starts_with('.') || self.ignored_dirs.contains(name) {
                        continue;
                    }
                }
                self.collect_files_recursive(&path, files)?;
            } else if is_supported_file(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn load_and_chunk_file(&self, path: &Path) -> Result<FileScanResult> {
        let path_str = path.to_string_lossy().to_string();
        if let Ok(meta) = path.metadata() {
            if meta.len() > self.max_file_bytes {
                tracing::warn!(path = %path_str, bytes = meta.len(), "skipping oversized document");
                return Ok(FileScanResult::skipped(path_str));
            }
        }
        let content = match read_document(path) {
            Ok(Some(content)) => content,
            Ok(None) => return Ok(FileScanResult::skipped(path_str)),
            Err(e) => {
                tracing::warn!(path = %path_str, error = %e, "skipping unreadable document");
                return Ok(FileScanResult::skipped(path_str));
            }
        };
        let hash = format!("{:x}", md5::compute(content.as_bytes()));
        let chunks = self.chunk_text(&content, &path_str);
        Ok(FileScanResult {
            path: path_str,
            hash,
            chunks,
        })
    }

    fn chunk_text(&self, text: &str, path: &str) -> Vec<FileChunk> {
        let mut seen_hashes = HashSet::new();
        self.splitter
            .split(text)
            .into_iter()
            .filter(|chunk| seen_hashes.insert(md5::compute(chunk.text.as_bytes()).0))
            .map(|chunk| FileChunk {
                path: path.to_string(),
                text: chunk.text,
                start_offset: chunk.start_offset,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FileChunk {
    pub path: String,
    pub text: String,
    pub start_offset: usize,
}

impl FileChunk {
    pub fn id(&self) -> String {
        format!("{}:{}", self.path, self.start_offset)
    }
}

#[derive(Debug, Clone)]
pub struct FileScanResult {
    pub path: String,
    /// Empty when the file was skipped.
    pub hash: String,
    pub chunks: Vec<FileChunk>,
}

impl FileScanResult {
    fn skipped(path: String) -> Self {
        Self {
            path,
            hash: String::new(),
            chunks: Vec::new(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.hash.is_empty()
    }
}
