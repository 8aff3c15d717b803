pub mod paragraphs;
pub mod phases;
pub mod sections;

use paragraphs::Paragraphs;
use phases::RuleSet;
use sections::ExtractionResult;

/// Two-step pipeline: document → paragraphs → phase sections.
pub fn process_document(doc: &Paragraphs, rules: &RuleSet) -> ExtractionResult {
    sections::extract_document(doc, rules)
}
