//! Integration tests for rule application through the public API.

use std::sync::{Arc, Mutex};
use yamlfmt::document::node::{YamlNode, YamlValue};
use yamlfmt::document::parser::parse_yaml;
use yamlfmt::format::{
    lint, lint_bytes, lint_str, simple_ordering, string_ordering, validate, FormatError, OrderFn,
    Rule,
};

fn fmt(input: &str, rules: &[Rule]) -> String {
    lint_str(input, rules).unwrap()
}

#[test]
fn test_empty_input_is_returned_unchanged() {
    let rules = vec![Rule::new("$", vec![string_ordering()])];
    assert_eq!(lint_bytes(b"", &rules).unwrap(), Vec::<u8>::new());
    assert_eq!(lint_str("", &rules).unwrap(), "");
}

#[test]
fn test_sort_root_mapping() {
    let out = fmt(
        "c: cv\nb: bv\na: av\n",
        &[Rule::new("$", vec![string_ordering()])],
    );
    assert_eq!(out, "a: av\nb: bv\nc: cv\n");
}

#[test]
fn test_sort_sequence() {
    let out = fmt(
        "list:\n  - c\n  - b\n  - a\n",
        &[Rule::new("$.list", vec![string_ordering()])],
    );
    assert_eq!(out, "list:\n  - a\n  - b\n  - c\n");
}

#[test]
fn test_simple_ordering_keeps_rest_in_place() {
    let out = fmt(
        "c: 1\nf: 2\nb: 3\ne: 4\na: 5\n",
        &[Rule::new("$", vec![simple_ordering(["a", "b", "c"])])],
    );
    assert_eq!(out, "a: 5\nb: 3\nc: 1\nf: 2\ne: 4\n");
}

#[test]
fn test_nested_absolute_rule_leaves_siblings() {
    let input = "z:\n  b: 1\n  a: 2\ny:\n  b: 1\n  a: 2\n";
    let out = fmt(input, &[Rule::new("$.z", vec![string_ordering()])]);
    assert_eq!(out, "z:\n  a: 2\n  b: 1\ny:\n  b: 1\n  a: 2\n");
}

#[test]
fn test_case_insensitive_key_match() {
    let out = fmt(
        "Info:\n  b: 1\n  a: 2\n",
        &[Rule::new("$.info", vec![string_ordering()])],
    );
    assert_eq!(out, "Info:\n  a: 2\n  b: 1\n");
}

#[test]
fn test_relative_rule_applies_at_every_depth() {
    let input = "meta:\n  z: 1\n  a: 2\nnested:\n  deeper:\n    meta:\n      z: 1\n      a: 2\n";
    let out = fmt(input, &[Rule::new(".meta", vec![string_ordering()])]);
    assert_eq!(
        out,
        "meta:\n  a: 2\n  z: 1\nnested:\n  deeper:\n    meta:\n      a: 2\n      z: 1\n"
    );
}

#[test]
fn test_key_wildcard() {
    let input = "a:\n  x:\n    b: 1\n    a: 2\n  y:\n    d: 1\n    c: 2\n";
    let out = fmt(input, &[Rule::new("$.a.*", vec![string_ordering()])]);
    assert_eq!(
        out,
        "a:\n  x:\n    a: 2\n    b: 1\n  y:\n    c: 2\n    d: 1\n"
    );
}

#[test]
fn test_index_wildcard_over_sequence() {
    let input = "items:\n  - b: 1\n    a: 2\n  - d: 1\n    c: 2\n";
    let out = fmt(input, &[Rule::new("$.items[*]", vec![string_ordering()])]);
    assert_eq!(out, "items:\n  - a: 2\n    b: 1\n  - c: 2\n    d: 1\n");
}

#[test]
fn test_index_rule_targets_one_element() {
    let input = "items:\n  - b: 1\n    a: 2\n  - d: 1\n    c: 2\n";
    let out = fmt(input, &[Rule::new("$.items[1]", vec![string_ordering()])]);
    assert_eq!(out, "items:\n  - b: 1\n    a: 2\n  - c: 2\n    d: 1\n");
}

#[test]
fn test_actions_run_in_attachment_order() {
    let input = "foo: bar\ntest: value\nabc: def\n";

    let sort_then_pull = fmt(
        input,
        &[Rule::new(
            "$",
            vec![string_ordering(), simple_ordering(["test"])],
        )],
    );
    assert_eq!(sort_then_pull, "test: value\nabc: def\nfoo: bar\n");

    let pull_then_sort = fmt(
        input,
        &[Rule::new(
            "$",
            vec![simple_ordering(["test"]), string_ordering()],
        )],
    );
    assert_eq!(pull_then_sort, "abc: def\nfoo: bar\ntest: value\n");
}

#[test]
fn test_rules_apply_cumulatively() {
    let rules = vec![
        Rule::new("$", vec![string_ordering()]),
        Rule::new("$", vec![simple_ordering(["z"])]),
    ];
    assert_eq!(fmt("b: 1\nz: 2\na: 3\n", &rules), "z: 2\na: 3\nb: 1\n");
}

#[test]
fn test_functions_receive_rendered_paths() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let record: OrderFn = Arc::new(move |path: &str, _: &mut YamlNode| {
        sink.lock().unwrap().push(path.to_string());
    });

    let mut doc = parse_yaml("paths:\n  /pets:\n    get:\n      parameters:\n        - name: x\n")
        .unwrap();
    lint(
        &mut doc,
        &[Rule::new("$.paths[*][*].parameters[*]", vec![record])],
    )
    .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["$.paths./pets.get.parameters[0]".to_string()]
    );
}

#[test]
fn test_validate_reports_every_bad_path() {
    let rules = vec![
        Rule::new("$[[", vec![string_ordering()]),
        Rule::new("$.ok", vec![string_ordering()]),
        Rule::new("$]", vec![string_ordering()]),
    ];
    let err = validate(&rules).unwrap_err();
    assert_eq!(err.len(), 2);
    assert_eq!(err.errors()[0].path(), "$[[");
    assert_eq!(err.errors()[1].path(), "$]");
    assert_eq!(err.to_string().lines().count(), 2);
}

#[test]
fn test_malformed_rule_is_fatal() {
    let err = lint_str(
        "b: 1\na: 2\n",
        &[
            Rule::new("$", vec![string_ordering()]),
            Rule::new("$..a", vec![string_ordering()]),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, FormatError::Path(_)));
}

#[test]
fn test_scalar_styles_survive() {
    let input = "b: 'single'\na: \"double\"\nc: |\n  line one\n  line two\n";
    let out = fmt(input, &[Rule::new("$", vec![string_ordering()])]);
    assert_eq!(
        out,
        "a: \"double\"\nb: 'single'\nc: |\n  line one\n  line two\n"
    );

    let doc = parse_yaml(&out).unwrap();
    let content = doc.content().unwrap();
    assert_eq!(content.keys(), vec!["a", "b", "c"]);
    assert_eq!(
        content.get("c").and_then(|n| n.scalar_text()),
        Some("line one\nline two\n")
    );
    assert_eq!(content.get("b").and_then(|n| n.scalar_text()), Some("single"));
}

#[test]
fn test_quoted_numbers_stay_strings() {
    let out = fmt(
        "b: '200'\na: 200\n",
        &[Rule::new("$", vec![string_ordering()])],
    );
    let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(value["a"], serde_yaml::Value::from(200));
    assert_eq!(value["b"], serde_yaml::Value::from("200"));
}

#[test]
fn test_document_with_scalar_root() {
    let out = fmt("hello\n", &[Rule::new("$", vec![string_ordering()])]);
    assert_eq!(out, "hello\n");
}

#[test]
fn test_lint_non_document_node() {
    let mut node = YamlNode::sequence(vec![YamlNode::plain("b"), YamlNode::plain("a")]);
    lint(&mut node, &[Rule::new("$", vec![string_ordering()])]).unwrap();
    match node.value() {
        YamlValue::Sequence(items) => {
            assert_eq!(items[0].scalar_text(), Some("a"));
            assert_eq!(items[1].scalar_text(), Some("b"));
        }
        other => panic!("expected sequence, got {:?}", other),
    }
}

#[test]
fn test_round_trip_without_rules_is_exact() {
    let input = "# api description\nhex: 0x1F\noct: 0o17\nbase: &b\n  x: 1\ncopy: *b\nref: !Ref foo\nk: v # trailing\n";
    assert_eq!(fmt(input, &[]), input);
}

#[test]
fn test_sorting_keeps_comments_tags_and_anchors() {
    let input = "z: !!str 10 # ten\n# about base\nbase: &b\n  y: 2\n  x: 1\ncopy: *b\n";
    let out = fmt(input, &[Rule::new("$", vec![string_ordering()])]);
    assert_eq!(
        out,
        "# about base\nbase: &b\n  y: 2\n  x: 1\ncopy: *b\nz: !!str 10 # ten\n"
    );
}

#[test]
fn test_alias_sorted_before_its_anchor_stays_valid() {
    let out = fmt(
        "b: &x\n  k: v\na: *x\n",
        &[Rule::new("$", vec![string_ordering()])],
    );
    assert_eq!(out, "a: &x\n  k: v\nb: *x\n");
    let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(value["a"], value["b"]);
}

#[test]
fn test_duplicate_keys_survive_formatting() {
    assert_eq!(fmt("z: 1\na: 2\nz: 3\n", &[]), "z: 1\na: 2\nz: 3\n");
    assert_eq!(
        fmt("z: 1\na: 2\nz: 3\n", &[Rule::new("$", vec![string_ordering()])]),
        "a: 2\nz: 1\nz: 3\n"
    );
}

#[test]
fn test_children_keep_labels_from_before_reordering() {
    let out = fmt(
        "- - z\n  - - b\n    - a\n",
        &[Rule::new("[0]", vec![string_ordering()])],
    );
    assert_eq!(out, "- - - b\n    - a\n  - z\n");
}
