//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        clean_pdf_text(&text)
    }
}

/// Strip bullet markers at line starts and any character outside
/// letters, digits, whitespace and `@ , . +`
pub fn clean_pdf_text(text: &str) -> Result<String> {
    let bullets = Regex::new(r"(?m)^[ \t]*[-*][ \t]*")
        .map_err(|e| AtsError::PdfExtraction(e.to_string()))?;
    let disallowed = Regex::new(r"[^a-zA-Z0-9\s@,.+]")
        .map_err(|e| AtsError::PdfExtraction(e.to_string()))?;

    let without_bullets = bullets.replace_all(text, "");
    Ok(disallowed.replace_all(&without_bullets, "").into_owned())
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        markdown_to_text(&markdown_content)
    }
}

/// Render Markdown to HTML and reduce it to trimmed, non-empty text lines
pub fn markdown_to_text(markdown: &str) -> Result<String> {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let tags = Regex::new(r"<[^>]*>").map_err(|e| AtsError::InvalidInput(e.to_string()))?;
    let clean_text = tags.replace_all(&text, "").replace("&amp;", "&");

    let lines: Vec<&str> = clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_clean_pdf_text_strips_bullets_and_symbols() {
        let raw = "- Built APIs (Rust/Go)\n  * Email: ada@example.com\nScore: 95% + more";
        let cleaned = clean_pdf_text(raw).unwrap();
        assert_eq!(cleaned, "Built APIs RustGo\nEmail ada@example.com\nScore 95 + more");
    }

    #[test]
    fn test_markdown_to_text() {
        let text = markdown_to_text("# Jane Doe\n\n**Skills**: Rust & Go\n\n- Built a parser").unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Rust & Go\nBuilt a parser");
    }

    #[tokio::test]
    async fn test_plain_text_extractor() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Education\nExperience").unwrap();
        let text = PlainTextExtractor.extract(file.path()).await.unwrap();
        assert_eq!(text, "Education\nExperience");
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_extraction_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not a pdf").unwrap();
        let result = PdfExtractor.extract(file.path()).await;
        assert!(matches!(result, Err(AtsError::PdfExtraction(_))));
    }
}
