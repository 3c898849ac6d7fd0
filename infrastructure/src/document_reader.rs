use anyhow::{anyhow, Context};
use docx_rs::{read_docx, DocumentChild};
use memmap2::Mmap;
use shared::types::Result;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Extract the text of a knowledge-base document. `Ok(None)` means the
/// format is not one the knowledge base indexes.
pub fn read_document(path: &Path) -> Result<Option<String>> {
    let Some(kind) = DocumentKind::from_path(path) else {
        return Ok(None);
    };
    let text = match kind {
        DocumentKind::PlainText => read_plain_text(path)?,
        DocumentKind::Pdf => pdf_extract::extract_text(path)
            .map_err(|e| anyhow!("extracting text from PDF {}: {e}", path.display()))?,
        DocumentKind::Docx => read_docx_text(path)?,
    };
    Ok(Some(text))
}

fn read_plain_text(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };
    // Lossy conversion keeps a stray non-UTF-8 byte from failing the whole index.
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

fn read_docx_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let docx =
        read_docx(&bytes).map_err(|e| anyhow!("parsing DOCX {}: {e}", path.display()))?;
    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                text.push_str(&p.raw_text());
                text.push('\n');
            }
            DocumentChild::Table(_) => {
                tracing::debug!(path = %path.display(), "skipping table content in DOCX");
            }
            _ => {}
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/Gap.TXT")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("a/deck.pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_path(Path::new("a/notes.csv")), None);
    }

    #[test]
    fn reads_plain_text_and_skips_unknown_formats() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("raci.txt");
        std::fs::write(&txt, "RACI: Responsible, Accountable, Consulted, Informed").unwrap();
        let csv = dir.path().join("data.csv");
        std::fs::write(&csv, "a,b").unwrap();
        let empty = dir.path().join("empty.md");
        std::fs::write(&empty, "").unwrap();

        assert_eq!(
            read_document(&txt).unwrap().as_deref(),
            Some("RACI: Responsible, Accountable, Consulted, Informed")
        );
        assert_eq!(read_document(&csv).unwrap(), None);
        assert_eq!(read_document(&empty).unwrap().as_deref(), Some(""));
    }
}
