use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::paragraphs::{ParagraphRecord, Paragraphs};
use super::phases::{Phase, RuleSet};

pub const PLACEHOLDER: &str = "(no section content found)";

/// Classifier state between paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    NoActivePhase,
    ActivePhase(Phase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Heading(String),
    Body(String),
}

impl Fragment {
    pub fn render(&self) -> String {
        match self {
            Fragment::Heading(t) => format!("### {}", t),
            Fragment::Body(t) => t.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub cursor: Cursor,
    pub emitted: Option<(Phase, Fragment)>,
}

impl Transition {
    fn stay(cursor: Cursor) -> Self {
        Self { cursor, emitted: None }
    }

    fn switch(phase: Phase, text: &str) -> Self {
        Self {
            cursor: Cursor::ActivePhase(phase),
            emitted: Some((phase, Fragment::Heading(text.to_string()))),
        }
    }
}

/// Classify one paragraph. Heading-styled text matching a rule switches
/// phase; otherwise short or upper-case text matching a rule does; anything
/// else is body text for the active phase, or dropped when none is active.
pub fn step(cursor: Cursor, record: &ParagraphRecord, rules: &RuleSet) -> Transition {
    let text = record.text.trim();
    if text.is_empty() {
        return Transition::stay(cursor);
    }

    if record.is_heading_style() {
        if let Some(phase) = rules.first_match(text) {
            return Transition::switch(phase, text);
        }
    }

    if rules.looks_like_heading(text) {
        if let Some(phase) = rules.first_match(text) {
            return Transition::switch(phase, text);
        }
    }

    match cursor {
        Cursor::ActivePhase(phase) => Transition {
            cursor,
            emitted: Some((phase, Fragment::Body(text.to_string()))),
        },
        Cursor::NoActivePhase => Transition::stay(cursor),
    }
}

/// Fragments per phase for one extraction pass.
#[derive(Debug, Default)]
pub struct SectionBuckets {
    buckets: [Vec<Fragment>; 6],
}

impl SectionBuckets {
    pub fn push(&mut self, phase: Phase, fragment: Fragment) {
        self.buckets[phase.index()].push(fragment);
    }

    pub fn fragments(&self, phase: Phase) -> &[Fragment] {
        &self.buckets[phase.index()]
    }

    pub fn assemble(self) -> ExtractionResult {
        let mut result = ExtractionResult::placeholder();
        for (i, fragments) in self.buckets.into_iter().enumerate() {
            if fragments.is_empty() {
                continue;
            }
            result.counts[i] = fragments.len();
            result.sections[i] = fragments
                .iter()
                .map(Fragment::render)
                .collect::<Vec<_>>()
                .join("\n\n");
        }
        result
    }
}

/// Assembled text for every phase; phases without content hold the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    sections: [String; 6],
    counts: [usize; 6],
}

impl ExtractionResult {
    pub fn placeholder() -> Self {
        Self {
            sections: std::array::from_fn(|_| PLACEHOLDER.to_string()),
            counts: [0; 6],
        }
    }

    pub fn get(&self, phase: Phase) -> &str {
        &self.sections[phase.index()]
    }

    pub fn fragment_count(&self, phase: Phase) -> usize {
        self.counts[phase.index()]
    }

    pub fn has_content(&self, phase: Phase) -> bool {
        self.fragment_count(phase) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &str)> + '_ {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Phase::ALL.len()))?;
        for (phase, text) in self.iter() {
            map.serialize_entry(phase.as_str(), text)?;
        }
        map.end()
    }
}

/// Partition paragraphs into phase sections in a single forward pass.
pub fn extract_sections<I>(paragraphs: I, rules: &RuleSet) -> ExtractionResult
where
    I: IntoIterator,
    I::Item: AsRef<ParagraphRecord>,
{
    let mut buckets = SectionBuckets::default();
    let mut cursor = Cursor::NoActivePhase;

    for record in paragraphs {
        let t = step(cursor, record.as_ref(), rules);
        if t.cursor != cursor {
            debug!(from = ?cursor, to = ?t.cursor, "phase switch");
        }
        if let Some((phase, fragment)) = t.emitted {
            buckets.push(phase, fragment);
        }
        cursor = t.cursor;
    }

    buckets.assemble()
}

/// Like [`extract_sections`], with unavailable documents mapping to the
/// all-placeholder result.
pub fn extract_document(doc: &Paragraphs, rules: &RuleSet) -> ExtractionResult {
    match doc {
        Paragraphs::Available(records) => extract_sections(records, rules),
        Paragraphs::Unavailable(_) => ExtractionResult::placeholder(),
    }
}

// ── Tests ──
