//! Key filtering -- strip unwanted keys from a parsed document.
//!
//! Mod tooling often wants a document without its noise: AI weighting blocks,
//! localisation hooks, editor-only fields. This module removes keys by
//! dot-separated key paths and returns a new tree.
//!
//! # Pattern syntax
//!
//! A pattern is matched against the full path of a key, from the document
//! root down to the key itself:
//!
//! - `"ai_will_do"` -- strip the top-level key named `ai_will_do`
//! - `"option.ai_chance"` -- strip `ai_chance` directly inside `option`
//! - `"*.ai_chance"` -- strip `ai_chance` at any depth
//! - `"country.*.ai"` -- strip `ai` anywhere under `country`
//!
//! `*` stands for any run of keys, including none, so `"country.*.ai"` also
//! strips `country.ai`.
//!
//! Arrays produced by repeated keys add nothing to the path: every occurrence
//! of `option` is reached by `"option.ai_chance"`, whether the key appeared
//! once or ten times.

use crate::types::{Node, Object};

/// Remove keys matching any of `patterns` from `object`.
///
/// ```
/// use clausewitz_core::{filter_keys, parse_str};
///
/// let doc = parse_str("name = x\nai_will_do = { factor = 1 }").unwrap();
/// let filtered = filter_keys(&doc, &["ai_will_do"]);
/// assert!(filtered.contains_key("name"));
/// assert!(!filtered.contains_key("ai_will_do"));
/// ```
pub fn filter_keys(object: &Object, patterns: &[&str]) -> Object {
    if patterns.is_empty() {
        return object.clone();
    }
    let filter = KeyFilter {
        patterns: patterns.iter().map(|p| p.split('.').collect()).collect(),
    };
    filter.object(object, &mut Vec::new())
}

struct KeyFilter<'p> {
    patterns: Vec<Vec<&'p str>>,
}

impl KeyFilter<'_> {
    /// Copy `map` without the keys whose path (`path` + key) is matched.
    fn object<'a>(&self, map: &'a Object, path: &mut Vec<&'a str>) -> Object {
        let mut kept = Object::with_capacity(map.len());
        for (key, child) in map {
            path.push(key.as_str());
            if !self.strips(path) {
                kept.insert(key.clone(), self.node(child, path));
            }
            path.pop();
        }
        kept
    }

    fn node<'a>(&self, node: &'a Node, path: &mut Vec<&'a str>) -> Node {
        match node {
            Node::Object(map) => Node::Object(self.object(map, path)),
            Node::Array(items) => {
                Node::Array(items.iter().map(|item| self.node(item, path)).collect())
            }
            Node::Scalar(_) => node.clone(),
        }
    }

    fn strips(&self, path: &[&str]) -> bool {
        self.patterns
            .iter()
            .any(|pattern| path_matches(pattern, path))
    }
}

/// Glob match of pattern segments against a key path; `*` spans zero or
/// more keys.
fn path_matches(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"*", rest)) => (0..=path.len()).any(|skip| path_matches(rest, &path[skip..])),
        Some((&segment, rest)) => match path.split_first() {
            Some((&key, tail)) => key == segment && path_matches(rest, tail),
            None => false,
        },
    }
}
