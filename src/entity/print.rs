use std::fmt::Write;

use crate::entity::{EntityId, EntityKind, SourceUnit};

/// Indented text rendering of a finished unit, one entity per line.
pub fn render_tree(unit: &SourceUnit) -> String {
    let mut out = String::new();
    render_entity(unit, unit.root, 0, &mut out);
    out
}

fn render_entity(unit: &SourceUnit, id: EntityId, indent: usize, out: &mut String) {
    let entity = unit.get(id);
    for _ in 0..indent {
        out.push_str("  ");
    }
    match &entity.kind {
        EntityKind::Namespace => {
            let _ = write!(out, "namespace {}", entity.name);
        }
        EntityKind::Class(data) => {
            let _ = write!(out, "class {}", entity.name);
            if let Some(base) = &data.extends {
                let _ = write!(out, " extends {}", base);
            }
            if !data.implements.is_empty() {
                let _ = write!(out, " implements {}", data.implements.join(", "));
            }
        }
        EntityKind::Function => {
            let name = if entity.name.is_empty() { "{anonymous}" } else { &entity.name };
            let _ = write!(out, "function {}", name);
        }
        EntityKind::Variable(data) => {
            let _ = write!(out, "${}", entity.name);
            if let Some(hint) = &data.type_hint {
                let _ = write!(out, ": {}", hint);
            }
            if let Some(default) = &data.default_value {
                let _ = write!(out, " = {}", default);
            }
        }
    }
    if !entity.flags.is_empty() {
        let _ = write!(out, " [{}]", entity.flags.names().join(" "));
    }
    let _ = writeln!(out, " @{}", entity.line);

    for &child in &entity.children {
        render_entity(unit, child, indent + 1, out);
    }
}
