use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::RuleError;
use crate::parser::phases::{RuleSet, DEFAULT_PSEUDO_HEADING_MAX_WORDS};

const DEFAULT_CONFIG_FILE: &str = "navigator.toml";
const ENV_PREFIX: &str = "NAVIGATOR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub guidebook_path: PathBuf,
    pub dashboard_path: PathBuf,
    pub pseudo_heading_max_words: usize,
    /// Phase label → replacement pattern.
    pub rules: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            guidebook_path: PathBuf::from("data/guidebook.docx"),
            dashboard_path: PathBuf::from("data/dashboard.pdf"),
            pseudo_heading_max_words: DEFAULT_PSEUDO_HEADING_MAX_WORDS,
            rules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Layer an optional TOML file under `NAVIGATOR_*` environment variables.
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .add_source(source)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    pub fn rule_set(&self) -> Result<RuleSet, RuleError> {
        Ok(RuleSet::with_overrides(&self.rules)?
            .with_pseudo_heading_max_words(self.pseudo_heading_max_words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::phases::Phase;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.pseudo_heading_max_words, 6);
        assert!(s.rules.is_empty());
        let rules = s.rule_set().unwrap();
        assert_eq!(rules.first_match("Roadmap"), Some(Phase::Roadmap));
    }

    #[test]
    fn toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigator.toml");
        std::fs::write(
            &path,
            r#"
guidebook_path = "docs/handbook.docx"
pseudo_heading_max_words = 4

[rules]
ROADMAP = '\btimeline\b'
"#,
        )
        .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.guidebook_path, PathBuf::from("docs/handbook.docx"));
        assert_eq!(s.dashboard_path, PathBuf::from("data/dashboard.pdf"));

        let rules = s.rule_set().unwrap();
        assert_eq!(rules.pseudo_heading_max_words(), 4);
        assert_eq!(rules.first_match("Delivery timeline"), Some(Phase::Roadmap));
    }

    #[test]
    fn explicit_file_must_exist() {
        assert!(Settings::load(Some(Path::new("does/not/exist.toml"))).is_err());
    }

    #[test]
    fn bad_rule_surfaces_at_startup() {
        let mut s = Settings::default();
        s.rules.insert("DESIGN".into(), "[".into());
        assert!(s.rule_set().is_err());
    }
}
