use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::RuleError;

/// Guidebook phases. Declaration order is display order and rule evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Discovery,
    Design,
    Requirements,
    Integration,
    Roadmap,
    Finalization,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Discovery,
        Phase::Design,
        Phase::Requirements,
        Phase::Integration,
        Phase::Roadmap,
        Phase::Finalization,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Discovery => "DISCOVERY",
            Phase::Design => "DESIGN",
            Phase::Requirements => "REQUIREMENTS",
            Phase::Integration => "INTEGRATION",
            Phase::Roadmap => "ROADMAP",
            Phase::Finalization => "FINALIZATION",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RuleError::UnknownPhase(s.to_string()))
    }
}

const DEFAULT_PATTERNS: [(Phase, &str); 6] = [
    (Phase::Discovery, r"\bdiscovery\b"),
    (Phase::Design, r"\bdesign\b"),
    (Phase::Requirements, r"\brequirements?\b"),
    (Phase::Integration, r"\bintegrations?\b"),
    (Phase::Roadmap, r"\broadmap\b"),
    (Phase::Finalization, r"\b(?:finali[sz]ation|final readout|approval)\b"),
];

pub const DEFAULT_PSEUDO_HEADING_MAX_WORDS: usize = 6;

#[derive(Debug, Clone)]
pub struct PhaseRule {
    pub phase: Phase,
    pub pattern: Regex,
}

impl PhaseRule {
    pub fn new(phase: Phase, pattern: &str) -> Result<Self, RuleError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::Pattern { phase, source })?;
        Ok(Self { phase, pattern })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Immutable phase detection configuration: one rule per phase, held in
/// declared phase order, plus the pseudo-heading word limit.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PhaseRule>,
    pseudo_heading_max_words: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        let rules = DEFAULT_PATTERNS
            .iter()
            .map(|&(phase, pattern)| PhaseRule::new(phase, pattern).unwrap())
            .collect();
        Self {
            rules,
            pseudo_heading_max_words: DEFAULT_PSEUDO_HEADING_MAX_WORDS,
        }
    }
}

impl RuleSet {
    /// Default vocabulary with the named phases' patterns replaced.
    /// Keys are phase labels, matched case-insensitively.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, RuleError> {
        let mut set = Self::default();
        for (name, pattern) in overrides {
            let phase: Phase = name.parse()?;
            set.rules[phase.index()] = PhaseRule::new(phase, pattern)?;
        }
        Ok(set)
    }

    pub fn with_pseudo_heading_max_words(mut self, max_words: usize) -> Self {
        self.pseudo_heading_max_words = max_words;
        self
    }

    pub fn rules(&self) -> &[PhaseRule] {
        &self.rules
    }

    pub fn pseudo_heading_max_words(&self) -> usize {
        self.pseudo_heading_max_words
    }

    /// First phase, in declared order, whose pattern matches `text`.
    pub fn first_match(&self, text: &str) -> Option<Phase> {
        self.rules.iter().find(|r| r.matches(text)).map(|r| r.phase)
    }

    /// Brevity/case test that lets body-styled text act as a heading.
    pub fn looks_like_heading(&self, text: &str) -> bool {
        is_upper(text) || text.split_whitespace().count() <= self.pseudo_heading_max_words
    }
}

/// True when the text has at least one cased character and no lower-case ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}
