use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::SourceError;
use crate::parser::paragraphs::ParagraphRecord;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Read the body paragraphs of a DOCX container, in document order.
pub fn read_docx<R: Read + Seek>(reader: R) -> Result<Vec<ParagraphRecord>, SourceError> {
    let mut archive = ZipArchive::new(reader)?;

    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_style_names(&xml)?,
        None => HashMap::new(),
    };
    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or(SourceError::MissingPart(DOCUMENT_PART))?;

    let paragraphs = parse_paragraphs(&document, &styles)?;
    debug!(paragraphs = paragraphs.len(), styles = styles.len(), "docx parsed");
    Ok(paragraphs)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SourceError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut xml = String::new();
            file.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>, SourceError> {
    match e.try_get_attribute(key)? {
        Some(a) => Ok(Some(a.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Map style ids (what paragraphs reference) to display names ("Heading 1").
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, SourceError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"style" => {
                current_id = attr(&e, b"w:styleId")?;
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr(&e, b"w:val")?) {
                    names.insert(id.clone(), name);
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"style" => current_id = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(names)
}

/// Walk `w:body`, emitting one record per paragraph outside tables.
/// Paragraphs nested in text boxes contribute nothing to their host.
fn parse_paragraphs(
    xml: &str,
    styles: &HashMap<String, String>,
) -> Result<Vec<ParagraphRecord>, SourceError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut table_depth = 0usize;
    let mut nested_depth = 0usize;
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut text = String::new();
    let mut style = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if in_paragraph => nested_depth += 1,
                b"p" if table_depth == 0 => {
                    in_paragraph = true;
                    text.clear();
                    style.clear();
                }
                b"t" if in_paragraph && nested_depth == 0 && table_depth == 0 => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_paragraph && nested_depth == 0 && table_depth == 0 => {
                match e.local_name().as_ref() {
                    b"pStyle" => {
                        if let Some(id) = attr(&e, b"w:val")? {
                            style = styles.get(&id).cloned().unwrap_or(id);
                        }
                    }
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_text => {
                text.push_str(&e.unescape()?);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" if nested_depth > 0 => nested_depth -= 1,
                b"p" if in_paragraph => {
                    paragraphs.push(ParagraphRecord::new(
                        std::mem::take(&mut text),
                        std::mem::take(&mut style),
                    ));
                    in_paragraph = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}
