//! # clausewitz-core
//!
//! Parser for the **Clausewitz** script syntax used by Paradox strategy games
//! and their mods (`key = value`, `key = { nested block }`, `#` comments,
//! repeated keys).
//!
//! Scripts are parsed into a generic, order-preserving document tree so that
//! mod tooling, validators and editors can walk the data instead of re-parsing
//! text. Scalars are kept as text; objects keep their keys in source order; a
//! key that occurs more than once holds an array of all its values.
//!
//! ## Quick start
//!
//! ```rust
//! use clausewitz_core::{parse_str, Node};
//!
//! let script = "\
//! can_start = { has_dlc = \"Rights of Man\" } # trigger
//! modifier = { stability = -1 }
//! modifier = { prestige = 2 }
//! ";
//! let doc = parse_str(script).unwrap();
//!
//! let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
//! assert_eq!(keys, ["can_start", "modifier"]);
//! assert_eq!(doc["modifier"].as_array().map(<[Node]>::len), Some(2));
//! assert_eq!(
//!     doc["can_start"].get("has_dlc").and_then(Node::as_scalar),
//!     Some("Rights of Man")
//! );
//! ```
//!
//! ## Modules
//!
//! - [`sanitizer`]: comment stripping and blank-line removal
//! - [`tokenizer`]: sanitized lines → token stream, plus `normalize`
//! - [`parser`]: token stream → document tree (`parse`, `parse_with`)
//! - [`types`]: `Node` tree and the duplicate-key merge rule
//! - [`filter`]: strip keys by dotted pattern (`filter_keys`)
//! - [`config`]: `ParseOptions` (depth limit, list policy)
//! - [`error`]: error types for malformed or unsupported input

pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod sanitizer;
pub mod tokenizer;
pub mod types;

pub use config::{ListPolicy, ParseOptions, DEFAULT_MAX_DEPTH};
pub use error::ScriptError;
pub use filter::filter_keys;
pub use parser::{build_tree, parse, parse_str, parse_with};
pub use sanitizer::sanitize;
pub use tokenizer::{normalize, tokenize, Token, TokenKind};
pub use types::{insert_merged, Node, Object};
