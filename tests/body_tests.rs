use php_symbol_parser::entity::Flags;
use php_symbol_parser::parser::{ParseOptions, parse_source};

fn parse_with_bodies(code: &str) -> php_symbol_parser::SourceUnit {
    parse_source(
        code,
        ParseOptions {
            parse_function_body: true,
            file: None,
        },
    )
}

#[test]
fn test_new_expression_becomes_type_hint() {
    let code = "<?php
    function main() {
        $obj = new \\Foo\\Bar(1,2);
    }
    ";
    let unit = parse_with_bodies(code);

    let (main_id, _) = unit.find("main").unwrap();
    let obj = unit.child_named(main_id, "obj").expect("local obj not found");
    assert!(obj.flags.contains(Flags::LOCAL));
    let data = obj.as_variable().unwrap();
    assert_eq!(data.type_hint.as_deref(), Some("\\Foo\\Bar"));
    assert_eq!(data.expression_hint, None);
}

#[test]
fn test_new_with_alias_resolves() {
    let code = "<?php
    namespace App;
    use \\Lib\\Database as DB;
    function boot() {
        $db = new DB();
        $local = new Helper();
    }
    ";
    let unit = parse_with_bodies(code);

    let (boot_id, _) = unit.find("boot").unwrap();
    let db = unit.child_named(boot_id, "db").unwrap();
    assert_eq!(db.as_variable().unwrap().type_hint.as_deref(), Some("\\Lib\\Database"));

    let local = unit.child_named(boot_id, "local").unwrap();
    assert_eq!(local.as_variable().unwrap().type_hint.as_deref(), Some("\\App\\Helper"));
}

#[test]
fn test_plain_expression_kept_as_hint() {
    let code = "<?php
    function main() {
        $name = $obj->getName();
    }
    ";
    let unit = parse_with_bodies(code);

    let (main_id, _) = unit.find("main").unwrap();
    let name = unit
        .children(main_id)
        .find(|entity| entity.name == "name")
        .unwrap();
    let data = name.as_variable().unwrap();
    assert_eq!(data.type_hint, None);
    assert_eq!(data.expression_hint.as_deref(), Some("$obj->getName()"));
}

#[test]
fn test_bare_variable_still_declared() {
    let code = "<?php
    function main() {
        $untouched;
    }
    ";
    let unit = parse_with_bodies(code);

    let (main_id, _) = unit.find("main").unwrap();
    let bare = unit.child_named(main_id, "untouched").unwrap();
    assert!(bare.flags.contains(Flags::LOCAL));
    let data = bare.as_variable().unwrap();
    assert_eq!(data.type_hint, None);
    assert_eq!(data.expression_hint, None);
}

#[test]
fn test_locals_off_by_default() {
    let code = "<?php
    function main() {
        $obj = new Widget();
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (main_id, _) = unit.find("main").unwrap();
    assert_eq!(unit.children(main_id).count(), 0);
}

#[test]
fn test_closure_assignment_stops_at_brace() {
    let code = "<?php
    function main() {
        $cb = function () { $inner = 1; };
        $after = 2;
    }
    ";
    let unit = parse_with_bodies(code);

    let (main_id, _) = unit.find("main").unwrap();
    let cb = unit.child_named(main_id, "cb").unwrap();
    // the closure literal ends the simple-expression read
    assert_eq!(cb.as_variable().unwrap().expression_hint.as_deref(), Some("function()"));
    assert!(unit.child_named(main_id, "after").is_some());
}

#[test]
fn test_nested_blocks_stay_in_function_scope() {
    let code = "<?php
    function main($flag) {
        if ($flag) {
            $inner = 1;
        }
        $outer = 2;
    }
    ";
    let unit = parse_with_bodies(code);

    let (main_id, _) = unit.find("main").unwrap();
    let names: Vec<&str> = unit.children(main_id).map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"flag"));
    assert!(names.contains(&"inner"));
    assert!(names.contains(&"outer"));
}
