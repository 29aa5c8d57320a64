//! Character entity normalization and heading extraction for chapter bodies

use crate::validate::is_xml_char;
use quick_xml::escape::{resolve_html5_entity, unescape};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Named, decimal and hexadecimal character references
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

/// First heading of any level; `.` spans newlines
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h[1-9]>(.*?)</h[1-9]>").unwrap());

/// The only entities every reader is guaranteed to understand
const XML_SAFE: [&str; 5] = ["apos", "quot", "gt", "lt", "amp"];

/// Expand character references into literal text, leaving the five
/// XML-safe entities untouched.
///
/// A reference that expands to one of the XML special characters is
/// rewritten to the matching safe entity instead. Unknown names are left
/// as they are so validation can point at them.
pub fn normalize_entities(content: &str) -> String {
    ENTITY_RE
        .replace_all(content, |caps: &Captures| {
            let whole = &caps[0];
            let body = &caps[1];
            if XML_SAFE.contains(&body) {
                return whole.to_string();
            }
            match resolve(body) {
                Some(text) => protect(&text),
                None => whole.to_string(),
            }
        })
        .into_owned()
}

fn resolve(body: &str) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|c| is_xml_char(*c)).map(String::from);
    }
    resolve_html5_entity(body).map(str::to_string)
}

fn protect(text: &str) -> String {
    match text {
        "<" => "&lt;".to_string(),
        ">" => "&gt;".to_string(),
        "&" => "&amp;".to_string(),
        "\"" => "&quot;".to_string(),
        "'" => "&apos;".to_string(),
        other => other.to_string(),
    }
}

/// Raw markup inside the first `<h1>`..`<h9>` element, if any
pub fn heading_markup(content: &str) -> Option<&str> {
    HEADING_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Plain text of a heading; markup that fails to unescape is kept verbatim
pub fn heading_text(markup: &str) -> String {
    unescape(markup)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| markup.to_string())
}

/// Plain text of the first heading, if any
pub fn chapter_title(content: &str) -> Option<String> {
    heading_markup(content).map(heading_text)
}
