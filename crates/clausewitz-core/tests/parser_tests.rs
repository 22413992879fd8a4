use clausewitz_core::{
    parse, parse_str, parse_with, ListPolicy, Node, Object, ParseOptions, ScriptError,
};

fn scalar(s: &str) -> Node {
    Node::Scalar(s.to_string())
}

fn object(entries: &[(&str, Node)]) -> Node {
    Node::Object(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

fn keys(obj: &Object) -> Vec<&str> {
    obj.keys().map(String::as_str).collect()
}

fn assert_malformed(input: &str) -> usize {
    match parse_str(input) {
        Err(ScriptError::MalformedDocument { line, .. }) => line,
        other => panic!("expected MalformedDocument for {input:?}, got {other:?}"),
    }
}

// ============================================================================
// Flat objects
// ============================================================================

#[test]
fn parse_empty_document() {
    assert!(parse_str("").unwrap().is_empty());
    assert!(parse_str("# nothing here\n\n   \n").unwrap().is_empty());
}

#[test]
fn parse_single_pair() {
    let doc = parse_str("a = 1").unwrap();
    assert_eq!(doc["a"], scalar("1"));
}

#[test]
fn parse_preserves_key_order() {
    let doc = parse_str("a=1\nb=2\nc=3").unwrap();
    assert_eq!(keys(&doc), ["a", "b", "c"]);
}

#[test]
fn parse_does_not_sort_keys() {
    let doc = parse_str("zeta = 1\nalpha = 2\nmid = 3").unwrap();
    assert_eq!(keys(&doc), ["zeta", "alpha", "mid"]);
}

#[test]
fn parse_scalars_stay_text() {
    let doc = parse_str("n = 42\nf = -0.25\nb = yes\nd = 1444.11.11").unwrap();
    assert_eq!(doc["n"], scalar("42"));
    assert_eq!(doc["f"], scalar("-0.25"));
    assert_eq!(doc["b"], scalar("yes"));
    assert_eq!(doc["d"], scalar("1444.11.11"));
}

#[test]
fn parse_strips_quotes() {
    let doc = parse_str(r#"name = "Rights of Man""#).unwrap();
    assert_eq!(doc["name"], scalar("Rights of Man"));
}

#[test]
fn parse_quoted_key() {
    let doc = parse_str(r#""quoted key" = value"#).unwrap();
    assert_eq!(doc["quoted key"], scalar("value"));
}

#[test]
fn parse_several_pairs_on_one_line() {
    let doc = parse_str("a = 1 b = 2 c = { d = 3 } e = 4").unwrap();
    assert_eq!(keys(&doc), ["a", "b", "c", "e"]);
}

#[test]
fn parse_ignores_comments() {
    let doc = parse_str("# header\na = 1 # trailing\n# b = 2\nc = 3").unwrap();
    assert_eq!(keys(&doc), ["a", "c"]);
}

#[test]
fn parse_accepts_raw_line_slices() {
    let doc = parse(&[" a = 1 ", "", "b = { c = 2 }"]).unwrap();
    assert_eq!(keys(&doc), ["a", "b"]);
}

// ============================================================================
// Nested objects
// ============================================================================

#[test]
fn parse_nested_objects() {
    let doc = parse_str("outer={ inner={ k=v } }").unwrap();
    let expected = object(&[("outer", object(&[("inner", object(&[("k", scalar("v"))]))]))]);
    assert_eq!(Node::Object(doc), expected);
}

#[test]
fn parse_nested_objects_across_lines() {
    let script = "\
outer = {
    inner = {
        k = v
    }
    sibling = 2
}
after = 3";
    let doc = parse_str(script).unwrap();
    assert_eq!(keys(&doc), ["outer", "after"]);
    let outer = doc["outer"].as_object().unwrap();
    assert_eq!(keys(outer), ["inner", "sibling"]);
    assert_eq!(outer["inner"].get("k"), Some(&scalar("v")));
}

#[test]
fn parse_empty_block_is_empty_object() {
    let doc = parse_str("a = { }\nb = {}").unwrap();
    assert_eq!(doc["a"], Node::Object(Object::new()));
    assert_eq!(doc["b"], Node::Object(Object::new()));
}

#[test]
fn parse_sibling_after_nested_block() {
    let doc = parse_str("a = { b = { c = 1 } } d = 2").unwrap();
    assert_eq!(doc["d"], scalar("2"));
    assert_eq!(doc["a"].get("b").and_then(|b| b.get("c")), Some(&scalar("1")));
}

// ============================================================================
// Duplicate-key promotion
// ============================================================================

#[test]
fn parse_duplicate_key_promotes_to_array() {
    let doc = parse_str("a=1\na=2").unwrap();
    assert_eq!(doc["a"], Node::Array(vec![scalar("1"), scalar("2")]));
}

#[test]
fn parse_triple_duplicate_is_flat() {
    let doc = parse_str("a=1\na=2\na=3").unwrap();
    assert_eq!(
        doc["a"],
        Node::Array(vec![scalar("1"), scalar("2"), scalar("3")])
    );
}

#[test]
fn parse_duplicate_keeps_first_position() {
    let doc = parse_str("a=1\nb=2\na=3").unwrap();
    assert_eq!(keys(&doc), ["a", "b"]);
}

#[test]
fn parse_duplicate_mixed_kinds() {
    let doc = parse_str("m = x\nm = { y = 1 }\nm = z").unwrap();
    assert_eq!(
        doc["m"],
        Node::Array(vec![
            scalar("x"),
            object(&[("y", scalar("1"))]),
            scalar("z"),
        ])
    );
}

#[test]
fn parse_duplicate_blocks_merge_per_level() {
    let script = "\
option = { name = a ai_chance = { factor = 1 } }
option = { name = b ai_chance = { factor = 2 } modifier = x modifier = y }";
    let doc = parse_str(script).unwrap();
    let options = doc["option"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].get("name"), Some(&scalar("a")));
    assert_eq!(
        options[1].get("modifier"),
        Some(&Node::Array(vec![scalar("x"), scalar("y")]))
    );
}

#[test]
fn parse_values_iterates_occurrences() {
    let doc = parse_str("once = 1\ntwice = 1\ntwice = 2").unwrap();
    assert_eq!(doc["once"].values().count(), 1);
    let all: Vec<&str> = doc["twice"].values().filter_map(Node::as_scalar).collect();
    assert_eq!(all, ["1", "2"]);
}

// ============================================================================
// Bare-scalar list blocks
// ============================================================================

#[test]
fn parse_list_block_is_discarded_by_default() {
    let doc = parse_str("tags={ 1 2 3 }").unwrap();
    assert!(!doc.contains_key("tags"));
}

#[test]
fn parse_list_block_discard_keeps_siblings() {
    let doc = parse_str("before = 1\ntags = { a b c }\nafter = 2").unwrap();
    assert_eq!(keys(&doc), ["before", "after"]);
}

#[test]
fn parse_list_of_blocks_is_discarded() {
    let doc = parse_str("groups = { { a = 1 } { a = 2 } }\nx = y").unwrap();
    assert_eq!(keys(&doc), ["x"]);
}

#[test]
fn parse_nested_list_block_is_discarded() {
    let doc = parse_str("country = { name = X provinces = { 1 2 3 } }").unwrap();
    assert_eq!(doc["country"], object(&[("name", scalar("X"))]));
}

#[test]
fn parse_list_block_rejected_when_strict() {
    let opts = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    let err = parse_with(&["a = 1", "tags={ 1 2 3 }"], &opts).unwrap_err();
    assert_eq!(
        err,
        ScriptError::UnsupportedConstruct {
            line: 2,
            reason: "bare-value list for key `tags`".to_string(),
        }
    );
}

#[test]
fn parse_strict_still_accepts_objects() {
    let opts = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    let doc = parse_with(&["a = { b = 1 }", "c = { }"], &opts).unwrap();
    assert_eq!(keys(&doc), ["a", "c"]);
}

#[test]
fn parse_block_with_entry_after_bare_value_fails() {
    let strict = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    for opts in [ParseOptions::default(), strict] {
        let err = parse_with(&["tags = { a b = c }", "after = 1"], &opts).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MalformedDocument {
                line: 1,
                reason: "expected `=` after key `a`, found `b`".to_string(),
            }
        );
    }
    assert_malformed("tags = { b = c a }");
}

#[test]
fn parse_list_of_blocks_with_inner_entries_is_still_a_list() {
    let opts = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    let err = parse_with(&["groups = { { a = 1 } b }"], &opts).unwrap_err();
    assert!(matches!(err, ScriptError::UnsupportedConstruct { line: 1, .. }));
}

#[test]
fn parse_comparison_block_follows_list_policy() {
    let script = ["trigger = {", "  num_of_cities > 5", "}", "after = 1"];

    let doc = parse(&script).unwrap();
    assert_eq!(keys(&doc), ["after"]);

    let opts = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    let err = parse_with(&script, &opts).unwrap_err();
    assert_eq!(
        err,
        ScriptError::UnsupportedConstruct {
            line: 1,
            reason: "bare-value list for key `trigger`".to_string(),
        }
    );
}

#[test]
fn parse_comparison_next_to_entries_fails() {
    assert_eq!(assert_malformed("trigger = { has_dlc = x num_of_cities > 5 }"), 1);
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn parse_unterminated_block_fails() {
    assert_eq!(assert_malformed("a={ b=1"), 1);
}

#[test]
fn parse_unterminated_block_reports_opening_line() {
    assert_eq!(assert_malformed("x = 1\ny = {\n  z = {\n  }\n"), 2);
}

#[test]
fn parse_unterminated_string_fails() {
    assert_malformed("a = \"never closed");
}

#[test]
fn parse_stray_closing_brace_fails() {
    assert_eq!(assert_malformed("a = 1\n}\nb = 2"), 2);
}

#[test]
fn parse_dangling_equals_fails() {
    assert_malformed("a = 1\nb =");
}

#[test]
fn parse_dangling_equals_inside_block_fails() {
    assert_malformed("a = { b = }");
}

#[test]
fn parse_key_without_equals_fails() {
    assert_malformed("a = 1\nlonely");
}

#[test]
fn parse_missing_equals_between_tokens_fails() {
    assert_malformed("a b = 1");
}

#[test]
fn parse_double_equals_fails() {
    assert_malformed("a = = 1");
}

#[test]
fn parse_bare_block_at_top_level_fails() {
    assert_malformed("{ a = 1 }");
}

#[test]
fn parse_mixed_block_fails() {
    // Starts as an object, then a bare value without `=`.
    assert_malformed("a = { b = 1 c }");
}

#[test]
fn parse_error_message_names_problem() {
    let err = parse_str("a={ b=1").unwrap_err();
    assert_eq!(err.line(), 1);
    let msg = err.to_string();
    assert!(msg.contains("line 1"), "{msg}");
    assert!(msg.contains("unterminated block"), "{msg}");
}

// ============================================================================
// Depth limit
// ============================================================================

fn nested(depth: usize) -> String {
    let mut s = String::new();
    for _ in 0..depth {
        s.push_str("a = { ");
    }
    s.push_str("leaf = x");
    for _ in 0..depth {
        s.push_str(" }");
    }
    s
}

#[test]
fn parse_within_depth_limit() {
    let opts = ParseOptions::default().with_max_depth(5);
    let doc = parse_with(&[nested(5)], &opts).unwrap();
    let mut node = &doc["a"];
    for _ in 1..5 {
        node = node.get("a").unwrap();
    }
    assert_eq!(node.get("leaf"), Some(&scalar("x")));
}

#[test]
fn parse_beyond_depth_limit_fails() {
    let opts = ParseOptions::default().with_max_depth(5);
    let err = parse_with(&[nested(6)], &opts).unwrap_err();
    assert!(matches!(err, ScriptError::MalformedDocument { .. }));
    assert!(err.to_string().contains("maximum depth of 5"));
}

#[test]
fn parse_default_depth_handles_deep_files() {
    assert!(parse_str(&nested(100)).is_ok());
    assert!(parse_str(&nested(10_000)).is_err());
}

#[test]
fn parse_zero_depth_allows_only_scalars() {
    let opts = ParseOptions::default().with_max_depth(0);
    assert!(parse_with(&["a = 1"], &opts).is_ok());
    assert!(parse_with(&["a = { }"], &opts).is_err());
}

fn nested_list(depth: usize) -> String {
    format!("a = {}x{}", "{ ".repeat(depth), " }".repeat(depth))
}

#[test]
fn parse_list_block_within_depth_limit() {
    let opts = ParseOptions::default().with_max_depth(5);
    let doc = parse_with(&[nested_list(5), "b = 1".to_string()], &opts).unwrap();
    assert_eq!(keys(&doc), ["b"]);
}

#[test]
fn parse_deep_list_block_fails_under_both_policies() {
    let strict = ParseOptions::default().with_list_policy(ListPolicy::Reject);
    for opts in [ParseOptions::default(), strict] {
        let err = parse_with(&[nested_list(200_000)], &opts).unwrap_err();
        assert!(matches!(err, ScriptError::MalformedDocument { line: 1, .. }));
        assert!(err.to_string().contains("maximum depth of 128"));
    }
}

#[test]
fn parse_deep_list_inside_object_fails() {
    let opts = ParseOptions::default().with_max_depth(4);
    let script = ["country = {", "  groups = { { { { a } } } }", "}"];
    let err = parse_with(&script, &opts).unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(err.to_string().contains("maximum depth of 4"));
}

// ============================================================================
// Determinism and concurrency
// ============================================================================

#[test]
fn parse_is_deterministic() {
    let script = "a = 1\nb = { c = 2 c = 3 }\na = { d = 4 }";
    assert_eq!(parse_str(script).unwrap(), parse_str(script).unwrap());
}

#[test]
fn parse_in_parallel_threads() {
    let scripts: Vec<String> = (0..8).map(|i| format!("id = {i}\nid = {}", i + 1)).collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = scripts
            .iter()
            .map(|script| scope.spawn(move || parse_str(script)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let doc = handle.join().unwrap().unwrap();
            assert_eq!(
                doc["id"],
                Node::Array(vec![scalar(&i.to_string()), scalar(&(i + 1).to_string())])
            );
        }
    });
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn parse_serializes_as_ordered_json() {
    let doc = parse_str("b = 1\na = { x = y }\nb = 2").unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(json, r#"{"b":["1","2"],"a":{"x":"y"}}"#);
}
