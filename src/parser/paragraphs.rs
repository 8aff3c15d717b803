use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

/// One paragraph as the document reader produced it. Text is untrimmed;
/// `style` is the free-form style name and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub text: String,
    #[serde(default)]
    pub style: String,
}

impl ParagraphRecord {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(text, "Normal")
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(text, format!("Heading {}", level))
    }

    pub fn is_heading_style(&self) -> bool {
        self.style.to_lowercase().contains("heading")
    }
}

impl AsRef<ParagraphRecord> for ParagraphRecord {
    fn as_ref(&self) -> &ParagraphRecord {
        self
    }
}

/// What the document reader hands to the classifier: either the full
/// paragraph sequence or the reason none could be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraphs {
    Available(Vec<ParagraphRecord>),
    Unavailable(String),
}

impl Paragraphs {
    pub fn len(&self) -> usize {
        match self {
            Paragraphs::Available(p) => p.len(),
            Paragraphs::Unavailable(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Paragraphs::Available(_))
    }
}

/// Read plain text or Markdown as paragraphs, one per line.
/// `# title` lines become `Heading N` records carrying only the title.
pub fn classify_lines(text: &str) -> Vec<ParagraphRecord> {
    text.lines()
        .map(|line| match HEADING_RE.captures(line.trim()) {
            Some(caps) => ParagraphRecord::heading(caps[1].len() as u8, &caps[2]),
            None => ParagraphRecord::body(line),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_line() {
        let records = classify_lines("## Phase 2 – Design");
        assert_eq!(records, vec![ParagraphRecord::new("Phase 2 – Design", "Heading 2")]);
        assert!(records[0].is_heading_style());
    }

    #[test]
    fn body_lines_keep_whitespace() {
        let records = classify_lines("  indented text  \n\nnext");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text, "  indented text  ");
        assert_eq!(records[0].style, "Normal");
        assert!(records[1].text.is_empty());
        assert!(!records[2].is_heading_style());
    }

    #[test]
    fn hashes_without_space_are_body() {
        let records = classify_lines("#hashtag");
        assert_eq!(records[0].style, "Normal");
        assert_eq!(records[0].text, "#hashtag");
    }

    #[test]
    fn heading_style_is_case_insensitive() {
        assert!(ParagraphRecord::new("x", "heading 1").is_heading_style());
        assert!(ParagraphRecord::new("x", "SubHeading").is_heading_style());
        assert!(!ParagraphRecord::new("x", "Title").is_heading_style());
        assert!(!ParagraphRecord::new("x", "").is_heading_style());
    }

    #[test]
    fn style_defaults_when_missing_from_json() {
        let record: ParagraphRecord = serde_json::from_str(r#"{"text": "Roadmap"}"#).unwrap();
        assert_eq!(record, ParagraphRecord::new("Roadmap", ""));
    }

    #[test]
    fn unavailable_is_empty() {
        let p = Paragraphs::Unavailable("no reader".into());
        assert!(p.is_empty());
        assert!(!p.is_available());
        assert_eq!(Paragraphs::Available(classify_lines("a\nb")).len(), 2);
    }
}
