//! Tree builder: turns the token stream into a document tree.
//!
//! The builder is a recursive descent over half-open token spans. Each call
//! owns one span `[start, end)` and walks it as a sequence of
//! `key = value` entries:
//!
//! - a bare or quoted value becomes a [`Node::Scalar`]
//! - `{` is matched with its closing `}` by a nesting counter local to the
//!   call, and the span between them is built recursively into a
//!   [`Node::Object`]
//! - repeated keys are merged with [`insert_merged`], so a key seen twice
//!   holds an array of both values in source order
//!
//! # Key design decisions
//!
//! - **Block scan before descent**: the matching `}` is located before the
//!   child span is built. Inside any span found this way braces are balanced,
//!   so an unterminated block can only be detected at the level where it was
//!   opened, and the error points at the opening line.
//! - **List blocks**: a non-empty block with no `=` at its own level (for
//!   example `tags = { a b c }`, `{ { ... } { ... } }` or a comparison such as
//!   `{ num_of_cities > 5 }`) is a list. Lists are not represented in the
//!   tree; `ListPolicy` decides between dropping the pair and failing the
//!   parse. A block mixing entries and bare values is malformed.
//! - **Depth limit**: every `{` counts one level against
//!   `ParseOptions::max_depth`. The block scan checks nested braces too, so
//!   a list block is bounded even though it is never descended into.

use crate::config::{ListPolicy, ParseOptions};
use crate::error::{Result, ScriptError};
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::types::{insert_merged, Node, Object};
use tracing::debug;

/// Parse raw script lines with default options.
///
/// ```
/// use clausewitz_core::{parse, Node};
///
/// let doc = parse(&["a = 1", "a = 2", "b = { c = yes }"]).unwrap();
/// assert_eq!(doc["a"], Node::Array(vec!["1".into(), "2".into()]));
/// assert_eq!(doc["b"].get("c").and_then(Node::as_scalar), Some("yes"));
/// ```
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Object> {
    parse_with(lines, &ParseOptions::default())
}

/// Parse raw script lines: sanitize, tokenize, then build the tree.
pub fn parse_with<S: AsRef<str>>(lines: &[S], options: &ParseOptions) -> Result<Object> {
    let tokens = tokenize(lines)?;
    debug!(lines = lines.len(), tokens = tokens.len(), "parsing script");
    let root = build_tree(&tokens, options)?;
    debug!(keys = root.len(), "parsed script");
    Ok(root)
}

/// Parse a whole script held in one string.
pub fn parse_str(text: &str) -> Result<Object> {
    let lines: Vec<&str> = text.lines().collect();
    parse(&lines)
}

/// Build the document root from an already tokenized script.
pub fn build_tree(tokens: &[Token], options: &ParseOptions) -> Result<Object> {
    TreeBuilder { tokens, options }.build_object(0, tokens.len(), 0)
}

/// A `{ ... }` block located by [`TreeBuilder::scan_block`].
#[derive(Debug)]
struct Block {
    /// Index of the matching `}`.
    close: usize,
    /// An `=` sits directly inside the block, outside any nested braces.
    has_entries: bool,
}

impl Block {
    /// Non-empty and without `key =` entries at its own level.
    fn is_list(&self, open: usize) -> bool {
        self.close > open + 1 && !self.has_entries
    }
}

struct TreeBuilder<'a> {
    tokens: &'a [Token],
    options: &'a ParseOptions,
}

impl TreeBuilder<'_> {
    /// Token at `idx` if it lies inside the span ending at `end`.
    fn token(&self, idx: usize, end: usize) -> Option<&Token> {
        if idx < end {
            self.tokens.get(idx)
        } else {
            None
        }
    }

    /// Build the object held by the span `[start, end)` at nesting `depth`.
    fn build_object(&self, start: usize, end: usize, depth: usize) -> Result<Object> {
        let mut object = Object::new();
        let mut cursor = start;

        while cursor < end {
            let key_token = &self.tokens[cursor];
            let key = match &key_token.kind {
                TokenKind::Bare(s) | TokenKind::Quoted(s) => s.clone(),
                TokenKind::Close => {
                    return Err(ScriptError::malformed(
                        key_token.line,
                        "unmatched `}` with no opening `{`",
                    ));
                }
                other => {
                    return Err(ScriptError::malformed(
                        key_token.line,
                        format!("expected a key, found {}", other.describe()),
                    ));
                }
            };

            match self.token(cursor + 1, end) {
                Some(Token {
                    kind: TokenKind::Equals,
                    ..
                }) => {}
                Some(other) => {
                    return Err(ScriptError::malformed(
                        other.line,
                        format!(
                            "expected `=` after key `{key}`, found {}",
                            other.kind.describe()
                        ),
                    ));
                }
                None => {
                    return Err(ScriptError::malformed(
                        key_token.line,
                        format!("key `{key}` has no `=` or value"),
                    ));
                }
            }

            let value_idx = cursor + 2;
            let value = self.token(value_idx, end).ok_or_else(|| {
                ScriptError::malformed(
                    self.tokens[cursor + 1].line,
                    format!("dangling `=` after key `{key}`"),
                )
            })?;

            cursor = match &value.kind {
                TokenKind::Bare(s) | TokenKind::Quoted(s) => {
                    insert_merged(&mut object, key, Node::Scalar(s.clone()));
                    value_idx + 1
                }
                TokenKind::Open => {
                    let block = self.scan_block(value_idx, end, depth + 1)?;
                    if block.is_list(value_idx) {
                        self.handle_list(&key, value.line)?;
                    } else {
                        let child = self.build_object(value_idx + 1, block.close, depth + 1)?;
                        insert_merged(&mut object, key, Node::Object(child));
                    }
                    block.close + 1
                }
                other => {
                    return Err(ScriptError::malformed(
                        value.line,
                        format!(
                            "expected a value for key `{key}`, found {}",
                            other.describe()
                        ),
                    ));
                }
            };
        }

        Ok(object)
    }

    /// Find the `}` matching the `{` at `open`, searching up to `end`.
    ///
    /// `depth` is the nesting level of the block itself; every brace nested
    /// inside it is checked against the depth limit on the way.
    fn scan_block(&self, open: usize, end: usize, depth: usize) -> Result<Block> {
        self.check_depth(depth, self.tokens[open].line)?;
        let mut nesting = 0usize;
        let mut has_entries = false;
        for idx in open + 1..end {
            let token = &self.tokens[idx];
            match token.kind {
                TokenKind::Open => {
                    nesting += 1;
                    self.check_depth(depth + nesting, token.line)?;
                }
                TokenKind::Close if nesting == 0 => {
                    return Ok(Block {
                        close: idx,
                        has_entries,
                    });
                }
                TokenKind::Close => nesting -= 1,
                TokenKind::Equals if nesting == 0 => has_entries = true,
                _ => {}
            }
        }
        Err(ScriptError::malformed(
            self.tokens[open].line,
            "unterminated block: `{` is never closed",
        ))
    }

    fn check_depth(&self, depth: usize, line: usize) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(ScriptError::malformed(
                line,
                format!(
                    "block nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
            ));
        }
        Ok(())
    }

    fn handle_list(&self, key: &str, line: usize) -> Result<()> {
        match self.options.list_policy {
            ListPolicy::Discard => {
                debug!(key, line, "discarding bare-value list block");
                Ok(())
            }
            ListPolicy::Reject => Err(ScriptError::unsupported(
                line,
                format!("bare-value list for key `{key}`"),
            )),
        }
    }
}
