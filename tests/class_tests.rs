use php_symbol_parser::entity::Flags;
use php_symbol_parser::parser::{ParseOptions, parse_source};

#[test]
fn test_class_header_with_duplicate_interface() {
    let code = "<?php
    namespace N;
    class A extends B implements C, D, C {}
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (_, class) = unit.find("\\N\\A").expect("class A not found");
    let data = class.as_class().unwrap();
    assert_eq!(data.extends.as_deref(), Some("\\N\\B"));
    assert_eq!(data.implements, vec!["\\N\\C", "\\N\\D"]);
}

#[test]
fn test_member_vs_method_disambiguation() {
    let code = "<?php
    class A {
        public $x;
        public function y() {}
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (class_id, _) = unit.find("\\A").expect("class A not found");
    let member = unit.child_named(class_id, "x").expect("member x not found");
    assert!(member.is_variable());
    assert!(member.flags.contains(Flags::PUBLIC | Flags::MEMBER));

    let method = unit.child_named(class_id, "y").expect("method y not found");
    assert!(method.is_function());
    assert!(method.flags.contains(Flags::PUBLIC));
}

#[test]
fn test_member_visibility_and_static() {
    let code = "<?php
    class A {
        private static $count;
        protected $name;
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (class_id, _) = unit.find("\\A").unwrap();
    let count = unit.child_named(class_id, "count").unwrap();
    assert!(count.flags.contains(Flags::PRIVATE | Flags::STATIC | Flags::MEMBER));

    let name = unit.child_named(class_id, "name").unwrap();
    assert!(name.flags.contains(Flags::PROTECTED | Flags::MEMBER));
    assert!(!name.flags.contains(Flags::STATIC));
}

#[test]
fn test_typed_member_records_hint() {
    let code = "<?php
    namespace N;
    class A {
        public string $label;
        public Widget $widget;
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (class_id, _) = unit.find("\\N\\A").unwrap();
    let label = unit.child_named(class_id, "label").unwrap();
    assert_eq!(label.as_variable().unwrap().type_hint.as_deref(), Some("string"));

    let widget = unit.child_named(class_id, "widget").unwrap();
    assert_eq!(
        widget.as_variable().unwrap().type_hint.as_deref(),
        Some("\\N\\Widget")
    );
}

#[test]
fn test_class_constant() {
    let code = "<?php
    class A {
        const VERSION = 2;
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (class_id, _) = unit.find("\\A").unwrap();
    let constant = unit.child_named(class_id, "VERSION").unwrap();
    assert!(constant.is_variable());
    assert!(constant.flags.contains(Flags::MEMBER | Flags::CONSTANT));
}

#[test]
fn test_abstract_class_flags() {
    let code = "<?php
    abstract class Base {}
    final class Leaf {}
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (_, base) = unit.find("\\Base").unwrap();
    assert!(base.flags.contains(Flags::ABSTRACT));

    let (_, leaf) = unit.find("\\Leaf").unwrap();
    assert!(leaf.flags.contains(Flags::FINAL));
}

#[test]
fn test_interface_and_trait_are_class_like() {
    let code = "<?php
    namespace N;
    interface Runner extends Stoppable {
        public function run();
    }
    trait Mixin {
        public function helper() {}
    }
    ";
    let unit = parse_source(code, ParseOptions::default());

    let (runner_id, runner) = unit.find("\\N\\Runner").expect("interface not found");
    assert!(runner.is_class());
    assert!(runner.flags.contains(Flags::INTERFACE));
    assert_eq!(runner.as_class().unwrap().extends.as_deref(), Some("\\N\\Stoppable"));
    assert!(unit.child_named(runner_id, "run").unwrap().is_function());

    let (mixin_id, mixin) = unit.find("\\N\\Mixin").expect("trait not found");
    assert!(mixin.flags.contains(Flags::TRAIT));
    assert!(unit.child_named(mixin_id, "helper").unwrap().is_function());
}

#[test]
fn test_nested_class_members_attach_to_class() {
    let code = "<?php
    namespace App;
    class Outer {
        public function make() {}
    }
    function top() {}
    ";
    let unit = parse_source(code, ParseOptions::default());

    let root = unit.root();
    assert!(root.is_namespace());
    assert_eq!(root.name, "\\App");

    let (class_id, class) = unit.find("\\App\\Outer").unwrap();
    assert_eq!(class.parent, Some(unit.root));
    let make = unit.child_named(class_id, "make").unwrap();
    assert_eq!(make.parent, Some(class_id));

    // the free function is a sibling of the class, not a child of it
    let top = unit.child_named(unit.root, "top").unwrap();
    assert!(top.is_function());
}
