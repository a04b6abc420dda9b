use php_symbol_parser::parser::resolve::{AliasTable, make_absolute};

#[test]
fn test_primitive_passthrough() {
    let aliases = AliasTable::new();
    assert_eq!(make_absolute(&aliases, "\\N", "int"), "int");
    assert_eq!(make_absolute(&aliases, "\\N", "array"), "array");
    assert_eq!(make_absolute(&aliases, "\\N", "string"), "string");
    assert_eq!(make_absolute(&aliases, "\\N", "boolean"), "boolean");
}

#[test]
fn test_empty_input() {
    let aliases = AliasTable::new();
    assert_eq!(make_absolute(&aliases, "\\N", ""), "");
    assert_eq!(make_absolute(&aliases, "\\N", "   "), "");
}

#[test]
fn test_absolute_name_unchanged() {
    let aliases = AliasTable::new();
    assert_eq!(make_absolute(&aliases, "\\N", "\\Foo\\Bar"), "\\Foo\\Bar");
}

#[test]
fn test_namespace_relative_fallback() {
    let aliases = AliasTable::new();
    assert_eq!(make_absolute(&aliases, "\\N\\M", "Foo"), "\\N\\M\\Foo");
}

#[test]
fn test_root_namespace_single_separator() {
    let aliases = AliasTable::new();
    assert_eq!(make_absolute(&aliases, "\\", "Foo"), "\\Foo");
}

#[test]
fn test_alias_wins_over_namespace() {
    let mut aliases = AliasTable::new();
    aliases.insert("D", "\\A\\B\\C");
    assert_eq!(make_absolute(&aliases, "\\N", "D"), "\\A\\B\\C");
}

#[test]
fn test_resolution_is_idempotent() {
    let mut aliases = AliasTable::new();
    aliases.insert("D", "\\A\\B\\C");
    for raw in ["Foo", "D", "\\Already\\Abs", "int", "Nested\\Name"] {
        let once = make_absolute(&aliases, "\\N\\M", raw);
        let twice = make_absolute(&aliases, "\\N\\M", &once);
        assert_eq!(once, twice, "resolution of {:?} is not idempotent", raw);
    }
}
