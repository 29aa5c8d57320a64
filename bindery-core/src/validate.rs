//! Validator: XML well-formedness checks for generated documents
//!
//! Validation never fails the caller. A malformed document yields a
//! [`ValidationReport`] and the caller decides whether to log, collect or
//! abort.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

/// A well-formedness failure with the offending source line
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub message: String,

    /// 1-based line number
    pub line_number: usize,

    /// Literal text of that line
    pub line: String,
}

/// A validation failure tied to the archive entry it came from
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MarkupDiagnostic {
    pub path: String,
    pub report: ValidationReport,
}

impl std::fmt::Display for MarkupDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (line {}): {}",
            self.path,
            self.report.message,
            self.report.line_number,
            self.report.line.trim()
        )
    }
}

/// Parse `document` as XML and report the first well-formedness error
pub fn validate(document: &str) -> Option<ValidationReport> {
    let mut reader = Reader::from_str(document);
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut first = true;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Some(report_at(document, reader.error_position() as usize, e.to_string()));
            }
        };
        let position = reader.buffer_position() as usize;
        let at_start = std::mem::replace(&mut first, false);
        let fail = |message: String| Some(report_at(document, position, message));

        match event {
            Event::Decl(_) if !at_start => {
                return fail("XML declaration not at start of document".into());
            }
            Event::Start(e) => {
                if open.is_empty() && seen_root {
                    return fail("junk after document element".into());
                }
                if let Err(message) = check_element(&e) {
                    return fail(message);
                }
                seen_root = true;
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Empty(e) => {
                if open.is_empty() && seen_root {
                    return fail("junk after document element".into());
                }
                if let Err(message) = check_element(&e) {
                    return fail(message);
                }
                seen_root = true;
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(t) => {
                if open.is_empty() && !t.iter().all(u8::is_ascii_whitespace) {
                    return fail("text outside the document element".into());
                }
                let checked = t
                    .unescape()
                    .map_err(|e| e.to_string())
                    .and_then(|text| check_chars(&text));
                if let Err(message) = checked {
                    return fail(message);
                }
            }
            Event::CData(c) => {
                if let Err(message) = check_chars(&String::from_utf8_lossy(&c)) {
                    return fail(message);
                }
            }
            Event::Eof => {
                if let Some(name) = open.last() {
                    return fail(format!("unclosed element <{name}>"));
                }
                if !seen_root {
                    return fail("no document element".into());
                }
                return None;
            }
            _ => {}
        }
    }
}

/// Whether `c` matches the XML `Char` production
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

fn check_name(kind: &str, name: &[u8]) -> Result<(), String> {
    let name = String::from_utf8_lossy(name);
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(format!("invalid {kind} name '{name}'"))
    }
}

fn check_chars(text: &str) -> Result<(), String> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(format!("invalid character U+{:04X}", c as u32)),
        None => Ok(()),
    }
}

fn check_element(e: &BytesStart<'_>) -> Result<(), String> {
    check_name("element", e.name().as_ref())?;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        check_name("attribute", attr.key.as_ref())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        check_chars(&value)?;
    }
    Ok(())
}

fn report_at(document: &str, position: usize, message: String) -> ValidationReport {
    let end = position.min(document.len());
    let line_number = document.as_bytes()[..end]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1;
    let line = document
        .lines()
        .nth(line_number - 1)
        .unwrap_or_default()
        .to_string();

    ValidationReport {
        message,
        line_number,
        line,
    }
}
