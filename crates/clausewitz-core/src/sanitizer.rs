//! Line sanitizer: comment stripping, trimming, blank-line removal.
//!
//! A `#` starts a comment that runs to the end of the line. This applies even
//! inside quoted strings, so `name = "Issue #1"` loses everything after the
//! `#` (and then fails as an unterminated string).

/// A sanitized line together with its 1-based position in the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Strip comments and surrounding whitespace, dropping lines left empty.
///
/// Surviving lines keep their relative order. Never fails; empty input
/// produces empty output.
///
/// ```
/// use clausewitz_core::sanitize;
///
/// let lines = sanitize(&["a=1 # comment", "  # only comment  ", " x "]);
/// assert_eq!(lines, ["a=1", "x"]);
/// ```
pub fn sanitize<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    sanitize_numbered(lines)
        .into_iter()
        .map(|line| line.text.to_string())
        .collect()
}

pub(crate) fn sanitize_numbered<S: AsRef<str>>(lines: &[S]) -> Vec<SourceLine<'_>> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let text = strip_comment(raw.as_ref()).trim();
            (!text.is_empty()).then_some(SourceLine {
                number: idx + 1,
                text,
            })
        })
        .collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
