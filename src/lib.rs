//! Phase navigation for facilitation guidebooks: reads a document's
//! paragraphs and splits them into the six workshop phases.

pub mod config;
pub mod docx;
pub mod error;
pub mod navigator;
pub mod parser;
pub mod source;

pub use error::{RuleError, SourceError};
pub use navigator::{Navigator, View};
pub use parser::paragraphs::{ParagraphRecord, Paragraphs};
pub use parser::phases::{Phase, PhaseRule, RuleSet};
pub use parser::sections::{extract_document, extract_sections, ExtractionResult, PLACEHOLDER};
