//! Recursive character splitting for knowledge-base documents.
//!
//! Text is cut on the coarsest separator present (paragraphs, then lines,
//! then words, then characters). Pieces that still exceed the chunk size are
//! split again with the next separator; small neighbouring pieces are merged
//! back up to the chunk size, carrying up to `chunk_overlap` characters of
//! trailing context into the next chunk.
//!
//! Chunks are always sub-slices of the source text, so offsets come straight
//! from pointer arithmetic and lengths are measured in characters.

use anyhow::bail;
use shared::types::Result;
use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    /// Byte offset of the chunk in the source text.
    pub start_offset: usize,
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            bail!("chunk size must be at least 1");
        }
        if chunk_overlap >= chunk_size {
            bail!("chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})");
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        self.split_recursive(text, text, &SEPARATORS)
            .into_iter()
            .map(|span| TextChunk {
                text: span.to_string(),
                start_offset: offset_in(text, span),
            })
            .collect()
    }

    fn split_recursive<'a>(
        &self,
        root: &'a str,
        text: &'a str,
        separators: &[&'static str],
    ) -> Vec<&'a str> {
        let (separator, remaining) = pick_separator(text, separators);
        let mut chunks = Vec::new();
        let mut pending: Vec<&'a str> = Vec::new();

        for piece in split_on(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(root, &pending, separator));
                pending.clear();
            }
            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed);
                }
            } else {
                chunks.extend(self.split_recursive(root, piece, remaining));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(root, &pending, separator));
        }
        chunks
    }

    /// Greedily pack consecutive pieces into spans of at most `chunk_size`
    /// characters, keeping a tail of at most `chunk_overlap` characters.
    fn merge<'a>(&self, root: &'a str, pieces: &[&'a str], separator: &str) -> Vec<&'a str> {
        let sep_len = char_len(separator);
        let mut spans = Vec::new();
        let mut current: VecDeque<&'a str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { sep_len };
            if total + len + joiner > self.chunk_size && !current.is_empty() {
                if let Some(span) = span_of(root, &current) {
                    spans.push(span);
                }
                loop {
                    let joiner = if current.is_empty() { 0 } else { sep_len };
                    let keeps_too_much = total > self.chunk_overlap;
                    let leaves_no_room = total > 0 && total + len + joiner > self.chunk_size;
                    if !(keeps_too_much || leaves_no_room) {
                        break;
                    }
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    let dropped_joiner = if current.is_empty() { 0 } else { sep_len };
                    total = total.saturating_sub(char_len(front) + dropped_joiner);
                }
            }
            current.push_back(piece);
            let joiner = if current.len() > 1 { sep_len } else { 0 };
            total += len + joiner;
        }
        if let Some(span) = span_of(root, &current) {
            spans.push(span);
        }
        spans
    }
}

fn pick_separator<'s>(
    text: &str,
    separators: &'s [&'static str],
) -> (&'static str, &'s [&'static str]) {
    for (i, &separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return (separator, &[]);
        }
        if text.contains(separator) {
            return (separator, &separators[i + 1..]);
        }
    }
    ("", &[])
}

fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).collect()
    }
}

/// Trimmed slice of `root` covering the first through last piece.
fn span_of<'a>(root: &'a str, pieces: &VecDeque<&'a str>) -> Option<&'a str> {
    let first = pieces.front()?;
    let last = pieces.back()?;
    let start = offset_in(root, first);
    let end = offset_in(root, last) + last.len();
    let trimmed = root[start..end].trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn offset_in(root: &str, part: &str) -> usize {
    part.as_ptr() as usize - root.as_ptr() as usize
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
