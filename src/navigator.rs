use crate::parser::phases::Phase;
use crate::parser::sections::ExtractionResult;

/// What the display layer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Dashboard,
    Section { phase: Phase, content: &'a str },
}

/// Holds one extraction and the current section selection.
/// No selection means the dashboard is shown.
#[derive(Debug, Clone)]
pub struct Navigator {
    sections: ExtractionResult,
    current: Option<Phase>,
}

impl Navigator {
    pub fn new(sections: ExtractionResult) -> Self {
        Self { sections, current: None }
    }

    pub fn select(&mut self, phase: Phase) {
        self.current = Some(phase);
    }

    pub fn show_dashboard(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Phase> {
        self.current
    }

    pub fn sections(&self) -> &ExtractionResult {
        &self.sections
    }

    pub fn view(&self) -> View<'_> {
        match self.current {
            Some(phase) => View::Section {
                phase,
                content: self.sections.get(phase),
            },
            None => View::Dashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::paragraphs::classify_lines;
    use crate::parser::phases::RuleSet;
    use crate::parser::sections::{extract_sections, PLACEHOLDER};

    #[test]
    fn starts_on_dashboard() {
        let nav = Navigator::new(ExtractionResult::placeholder());
        assert_eq!(nav.current(), None);
        assert_eq!(nav.view(), View::Dashboard);
    }

    #[test]
    fn select_and_return() {
        let records = classify_lines("# Design\nStoryboard the sessions with the team.");
        let mut nav = Navigator::new(extract_sections(&records, &RuleSet::default()));

        nav.select(Phase::Design);
        assert_eq!(
            nav.view(),
            View::Section {
                phase: Phase::Design,
                content: "### Design\n\nStoryboard the sessions with the team.",
            }
        );

        nav.select(Phase::Roadmap);
        assert_eq!(
            nav.view(),
            View::Section { phase: Phase::Roadmap, content: PLACEHOLDER }
        );

        nav.show_dashboard();
        assert_eq!(nav.view(), View::Dashboard);
    }
}
