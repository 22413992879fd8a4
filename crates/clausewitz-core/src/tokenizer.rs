//! Tokenizer: sanitized lines → flat token stream.
//!
//! Line breaks and whitespace only separate tokens, so the stream carries no
//! layout; a script written on one line and the same script spread across
//! many lines tokenize identically (apart from line numbers).
//!
//! Token classes:
//!
//! - `{`, `}` and `=` are single-character tokens
//! - `"..."` is a quoted token running to the very next `"` on the same line;
//!   the quotes are dropped and inner whitespace kept
//! - anything else is a bare token: a maximal run of characters that are not
//!   whitespace, braces, `=` or `"`
//!
//! No structural validation happens here. Unbalanced braces or a dangling `=`
//! pass through untouched and are reported by the parser.

use crate::error::{Result, ScriptError};
use crate::sanitizer::{sanitize_numbered, SourceLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted word: identifier, number, date, operator-like text.
    Bare(String),
    /// Quoted text with the quotes removed.
    Quoted(String),
    /// `=`
    Equals,
    /// `{`
    Open,
    /// `}`
    Close,
}

impl TokenKind {
    /// Text of a key or scalar token, `None` for punctuation.
    pub fn text(&self) -> Option<&str> {
        match self {
            TokenKind::Bare(s) | TokenKind::Quoted(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Bare(s) => format!("`{s}`"),
            TokenKind::Quoted(s) => format!("\"{s}\""),
            TokenKind::Equals => "`=`".to_string(),
            TokenKind::Open => "`{`".to_string(),
            TokenKind::Close => "`}`".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line in the raw input.
    pub line: usize,
}

/// Sanitize raw lines and split them into tokens.
///
/// Fails only on a quote left open at the end of its line.
pub fn tokenize<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for line in sanitize_numbered(lines) {
        tokenize_line(line, &mut tokens)?;
    }
    Ok(tokens)
}

fn tokenize_line(line: SourceLine<'_>, out: &mut Vec<Token>) -> Result<()> {
    let text = line.text;
    let token = |kind| Token {
        kind,
        line: line.number,
    };

    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '{' => out.push(token(TokenKind::Open)),
            '}' => out.push(token(TokenKind::Close)),
            '=' => out.push(token(TokenKind::Equals)),
            '"' => {
                let body = start + 1;
                let end = text[body..]
                    .find('"')
                    .map(|p| p + body)
                    .ok_or_else(|| {
                        ScriptError::malformed(line.number, "unterminated quoted string")
                    })?;
                out.push(token(TokenKind::Quoted(text[body..end].to_string())));
                // Resume after the closing quote.
                while chars.next_if(|&(i, _)| i <= end).is_some() {}
            }
            _ => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if is_delimiter(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                out.push(token(TokenKind::Bare(text[start..end].to_string())));
            }
        }
    }
    Ok(())
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '=' | '"')
}

/// Render raw lines as one normalized text blob.
///
/// Every key and scalar is wrapped in double quotes, and tokens are joined by
/// single spaces, so two scripts that differ only in layout, comments or
/// quoting of simple words normalize to the same text.
///
/// ```
/// use clausewitz_core::normalize;
///
/// let text = normalize(&["a = yes # note", "b={ c=\"two words\" }"]).unwrap();
/// assert_eq!(text, r#""a" = "yes" "b" = { "c" = "two words" }"#);
/// ```
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> Result<String> {
    let tokens = tokenize(lines)?;
    let rendered: Vec<String> = tokens
        .iter()
        .map(|token| match &token.kind {
            TokenKind::Bare(s) | TokenKind::Quoted(s) => format!("\"{s}\""),
            TokenKind::Equals => "=".to_string(),
            TokenKind::Open => "{".to_string(),
            TokenKind::Close => "}".to_string(),
        })
        .collect();
    Ok(rendered.join(" "))
}
