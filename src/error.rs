use std::path::PathBuf;

use thiserror::Error;

use crate::parser::phases::Phase;

/// Failures of the document-reading side. The classifier never sees these:
/// they are folded into `Paragraphs::Unavailable` before extraction.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("document is missing part {0}")]
    MissingPart(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed paragraph list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected phase rule configuration.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("unknown phase: {0}")]
    UnknownPhase(String),

    #[error("invalid pattern for {phase}: {source}")]
    Pattern {
        phase: Phase,
        #[source]
        source: regex::Error,
    },
}
