//! XML escaping for interpolated text

/// Escape the five XML special characters in a single pass.
///
/// Each input character is replaced at most once, so entity text produced
/// here is never escaped again.
pub fn escape(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}
