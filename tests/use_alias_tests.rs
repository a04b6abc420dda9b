use php_symbol_parser::parser::{ParseOptions, parse_source};

#[test]
fn test_use_with_explicit_alias() {
    let code = "<?php
    namespace N;
    use \\A\\B\\C as D;
    ";
    let unit = parse_source(code, ParseOptions::default());
    assert_eq!(unit.aliases.get("D"), Some("\\A\\B\\C"));
}

#[test]
fn test_use_without_alias_takes_last_segment() {
    let code = "<?php
    use \\Vendor\\Package\\Widget;
    ";
    let unit = parse_source(code, ParseOptions::default());
    assert_eq!(unit.aliases.get("Widget"), Some("\\Vendor\\Package\\Widget"));
}

#[test]
fn test_use_with_multiple_imports() {
    let code = "<?php
    namespace N;
    use X\\Y, P\\Q as R;
    ";
    let unit = parse_source(code, ParseOptions::default());
    assert_eq!(unit.aliases.len(), 2);
    assert_eq!(unit.aliases.get("Y"), Some("\\N\\X\\Y"));
    assert_eq!(unit.aliases.get("R"), Some("\\N\\P\\Q"));
}

#[test]
fn test_alias_applied_to_class_header() {
    let code = "<?php
    namespace N;
    use \\A\\B\\C as D;
    class E extends D implements D {}
    ";
    let unit = parse_source(code, ParseOptions::default());
    let (_, class) = unit.find("\\N\\E").expect("class E not found");
    let data = class.as_class().unwrap();
    assert_eq!(data.extends.as_deref(), Some("\\A\\B\\C"));
    assert_eq!(data.implements, vec!["\\A\\B\\C"]);
}
