use anyhow::Context;
use docx_rs::{Docx, Paragraph, Run};
use domain::models::StrategyBrief;
use shared::types::Result;
use shared::utils::slugify;
use std::fs::{self, File};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Docx,
}

impl ExportFormat {
    /// Picked from the file extension; anything unrecognised is plain text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") => Self::Markdown,
            Some("docx") => Self::Docx,
            _ => Self::Text,
        }
    }
}

pub fn default_filename(brief: &StrategyBrief) -> String {
    format!("strategy_brief_{}.txt", slugify(&brief.industry))
}

pub fn save_brief(brief: &StrategyBrief, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match ExportFormat::from_path(path) {
        ExportFormat::Text => fs::write(path, format!("{}\n", brief.content))?,
        ExportFormat::Markdown => fs::write(path, to_markdown(brief))?,
        ExportFormat::Docx => write_docx(brief, path)?,
    }
    tracing::info!(path = %path.display(), "saved strategy brief");
    Ok(())
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

fn to_markdown(brief: &StrategyBrief) -> String {
    let mut out = format!("# Strategy Brief: {}", brief.engagement_type);
    if !brief.industry.is_empty() {
        out.push_str(&format!(" ({})", brief.industry));
    }
    out.push_str("\n\n");
    out.push_str(&brief.content);
    out.push_str("\n\n---\n\n");
    if !brief.sources.is_empty() {
        out.push_str("Frameworks consulted:\n");
        for source in &brief.sources {
            out.push_str(&format!("- {source}\n"));
        }
    }
    out.push_str(&format!("\nGenerated by {}\n", brief.model));
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Block {
    Heading(usize, String),
    Bullet(String),
    Text(String),
}

/// Line-level reading of the markdown the model returns.
fn blocks(content: &str) -> Vec<Block> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "---")
        .map(|line| {
            let hashes = line.chars().take_while(|c| *c == '#').count();
            if hashes > 0 && line[hashes..].starts_with(' ') {
                return Block::Heading(hashes, strip_emphasis(line[hashes..].trim()));
            }
            if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                return Block::Bullet(strip_emphasis(rest));
            }
            Block::Text(strip_emphasis(line))
        })
        .collect()
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

fn write_docx(brief: &StrategyBrief, path: &Path) -> Result<()> {
    let mut doc = Docx::new().add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(format!("Strategy Brief: {}", brief.engagement_type))
                .bold()
                .size(36),
        ),
    );
    if !brief.industry.is_empty() {
        doc = doc.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(format!("Industry: {}", brief.industry))),
        );
    }
    for block in blocks(&brief.content) {
        let paragraph = match block {
            Block::Heading(level, text) => {
                let size = match level {
                    1 => 32,
                    2 => 28,
                    _ => 24,
                };
                Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
            }
            Block::Bullet(text) => Paragraph::new().add_run(Run::new().add_text(format!("• {text}"))),
            Block::Text(text) => Paragraph::new().add_run(Run::new().add_text(text)),
        };
        doc = doc.add_paragraph(paragraph);
    }
    if !brief.sources.is_empty() {
        doc = doc.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("Frameworks consulted").bold()),
        );
        for source in &brief.sources {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(format!("• {source}"))));
        }
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    doc.build().pack(file)?;
    Ok(())
}
