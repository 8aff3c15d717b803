use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::docx::read_docx;
use crate::error::SourceError;
use crate::parser::paragraphs::{classify_lines, ParagraphRecord, Paragraphs};

/// Read a document's paragraphs, picking the reader by file extension.
pub fn read_paragraphs(path: &Path) -> Result<Vec<ParagraphRecord>, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "docx" => read_docx(BufReader::new(File::open(path)?)),
        "md" | "markdown" | "txt" => Ok(classify_lines(&std::fs::read_to_string(path)?)),
        "json" => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
        other => Err(SourceError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            format!(".{}", other)
        })),
    }
}

/// Load a document for extraction; any failure becomes `Unavailable`.
pub fn load_paragraphs(path: &Path) -> Paragraphs {
    match read_paragraphs(path) {
        Ok(records) => {
            info!(path = %path.display(), paragraphs = records.len(), "document loaded");
            Paragraphs::Available(records)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "document unavailable");
            Paragraphs::Unavailable(e.to_string())
        }
    }
}

/// Load an uploaded DOCX held in memory.
pub fn load_docx_bytes(bytes: &[u8]) -> Paragraphs {
    match read_docx(Cursor::new(bytes)) {
        Ok(records) => {
            info!(bytes = bytes.len(), paragraphs = records.len(), "uploaded document loaded");
            Paragraphs::Available(records)
        }
        Err(e) => {
            warn!(error = %e, "uploaded document unavailable");
            Paragraphs::Unavailable(format!("failed to open uploaded document: {}", e))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub guidebook_path: PathBuf,
    pub guidebook_found: bool,
    pub guidebook_paragraphs: Option<usize>,
    pub guidebook_error: Option<String>,
    pub dashboard_path: PathBuf,
    pub dashboard_found: bool,
}

impl Diagnostics {
    pub fn collect(guidebook: &Path, dashboard: &Path) -> Self {
        let (paragraphs, error) = match read_paragraphs(guidebook) {
            Ok(records) => (Some(records.len()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            guidebook_path: guidebook.to_path_buf(),
            guidebook_found: guidebook.is_file(),
            guidebook_paragraphs: paragraphs,
            guidebook_error: error,
            dashboard_path: dashboard.to_path_buf(),
            dashboard_found: dashboard.is_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::tests::sample_docx;

    #[test]
    fn missing_file_is_not_found() {
        let err = read_paragraphs(Path::new("tests/fixtures/nope.docx")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let doc = load_paragraphs(Path::new("tests/fixtures/nope.docx"));
        match doc {
            Paragraphs::Unavailable(reason) => assert!(reason.contains("nope.docx")),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[test]
    fn markdown_fixture() {
        let doc = load_paragraphs(Path::new("tests/fixtures/guidebook.md"));
        assert!(doc.is_available());
        assert!(doc.len() > 20);
    }

    #[test]
    fn json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paragraphs.JSON");
        std::fs::write(
            &path,
            r#"[{"text": "Roadmap", "style": "Heading 1"}, {"text": "Quarterly milestones."}]"#,
        )
        .unwrap();
        let records = read_paragraphs(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].style, "");
    }

    #[test]
    fn malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paragraphs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_paragraphs(&path), Err(SourceError::Json(_))));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        match read_paragraphs(&path) {
            Err(SourceError::UnsupportedFormat(ext)) => assert_eq!(ext, ".pdf"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn docx_from_path_and_bytes() {
        let bytes = sample_docx();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guidebook.docx");
        std::fs::write(&path, &bytes).unwrap();

        let from_path = load_paragraphs(&path);
        let from_bytes = load_docx_bytes(&bytes);
        assert!(from_path.is_available());
        assert_eq!(from_path, from_bytes);
    }

    #[test]
    fn corrupt_upload_is_unavailable() {
        let doc = load_docx_bytes(b"not a zip");
        assert!(matches!(doc, Paragraphs::Unavailable(r) if r.starts_with("failed to open")));
    }

    #[test]
    fn diagnostics_report() {
        let d = Diagnostics::collect(
            Path::new("tests/fixtures/guidebook.md"),
            Path::new("tests/fixtures/missing.pdf"),
        );
        assert!(d.guidebook_found);
        assert!(d.guidebook_paragraphs.is_some());
        assert!(d.guidebook_error.is_none());
        assert!(!d.dashboard_found);
    }
}
