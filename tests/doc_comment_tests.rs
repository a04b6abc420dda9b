use php_symbol_parser::parser::{ParseOptions, parse_source};

#[test]
fn test_doc_comment_attaches_to_class() {
    let code = "<?php
/** Frobnicates widgets. */
class Frobnicator {}
";
    let unit = parse_source(code, ParseOptions::default());

    let (_, class) = unit.find("\\Frobnicator").unwrap();
    let doc = class.doc_comment.as_deref().expect("doc comment missing");
    assert!(doc.contains("Frobnicates widgets"));
}

#[test]
fn test_doc_comment_attaches_across_blank_lines() {
    let code = "<?php
/** Returns the answer. */


function answer() {}
";
    let unit = parse_source(code, ParseOptions::default());

    let (_, f) = unit.find("answer").unwrap();
    assert!(f.doc_comment.as_deref().unwrap().contains("Returns the answer"));
}

#[test]
fn test_closest_comment_wins() {
    let code = "<?php
/** Stale. */
/** Fresh. */
class A {}
";
    let unit = parse_source(code, ParseOptions::default());

    let (_, class) = unit.find("\\A").unwrap();
    let doc = class.doc_comment.as_deref().unwrap();
    assert!(doc.contains("Fresh"));
    assert!(!doc.contains("Stale"));
}

#[test]
fn test_intervening_content_blocks_attachment() {
    let code = "<?php
/** Belongs to the assignment below. */
$a = 1;
function g() {}
";
    let unit = parse_source(code, ParseOptions::default());

    let (_, g) = unit.find("g").unwrap();
    assert_eq!(g.doc_comment, None);
}

#[test]
fn test_line_comments_are_not_docs() {
    let code = "<?php
// just a note
function f() {}
";
    let unit = parse_source(code, ParseOptions::default());

    let (_, f) = unit.find("f").unwrap();
    assert_eq!(f.doc_comment, None);
}

#[test]
fn test_member_and_method_docs() {
    let code = "<?php
class A {
    /** Holds the widget count. */
    private $count;

    /** Recalculates everything. */
    public function refresh() {}
}
";
    let unit = parse_source(code, ParseOptions::default());

    let (class_id, _) = unit.find("\\A").unwrap();
    let count = unit.child_named(class_id, "count").unwrap();
    assert!(count.doc_comment.as_deref().unwrap().contains("widget count"));

    let refresh = unit.child_named(class_id, "refresh").unwrap();
    assert!(refresh.doc_comment.as_deref().unwrap().contains("Recalculates"));
}
