pub mod print;

use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

use serde::Serialize;

use crate::parser::resolve::AliasTable;

/// Index of an entity inside its [`EntityArena`]. Parent links are plain ids,
/// so the tree has a single owning edge per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityId(pub u32);

impl EntityId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Visibility, modifier and role bits carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Flags(pub u32);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const PUBLIC: Flags = Flags(1 << 0);
    pub const PRIVATE: Flags = Flags(1 << 1);
    pub const PROTECTED: Flags = Flags(1 << 2);
    pub const STATIC: Flags = Flags(1 << 3);
    pub const ABSTRACT: Flags = Flags(1 << 4);
    pub const FINAL: Flags = Flags(1 << 5);
    pub const MEMBER: Flags = Flags(1 << 6);
    pub const ARGUMENT: Flags = Flags(1 << 7);
    pub const LOCAL: Flags = Flags(1 << 8);
    pub const CONSTANT: Flags = Flags(1 << 9);
    pub const INTERFACE: Flags = Flags(1 << 10);
    pub const TRAIT: Flags = Flags(1 << 11);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn names(self) -> Vec<&'static str> {
        const TABLE: &[(Flags, &str)] = &[
            (Flags::PUBLIC, "public"),
            (Flags::PRIVATE, "private"),
            (Flags::PROTECTED, "protected"),
            (Flags::STATIC, "static"),
            (Flags::ABSTRACT, "abstract"),
            (Flags::FINAL, "final"),
            (Flags::MEMBER, "member"),
            (Flags::ARGUMENT, "argument"),
            (Flags::LOCAL, "local"),
            (Flags::CONSTANT, "constant"),
            (Flags::INTERFACE, "interface"),
            (Flags::TRAIT, "trait"),
        ];
        TABLE
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
            .collect()
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassData {
    /// Absolute name of the base class, when one was declared.
    pub extends: Option<String>,
    /// Absolute interface names, deduplicated, in declaration order.
    pub implements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableData {
    /// Absolute type name or primitive keyword.
    pub type_hint: Option<String>,
    /// Raw default-value expression for parameters; never evaluated.
    pub default_value: Option<String>,
    /// Raw right-hand-side text for locals assigned a non-`new` expression.
    pub expression_hint: Option<String>,
    /// Parameter passed by reference (`&$x`).
    pub is_reference: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityKind {
    Namespace,
    Class(ClassData),
    Function,
    Variable(VariableData),
}

/// A node of the symbol tree.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Namespaces and classes carry absolute names; functions and variables
    /// carry their bare name (empty for anonymous functions).
    pub name: String,
    pub file: Option<PathBuf>,
    pub line: u32,
    pub flags: Flags,
    pub doc_comment: Option<String>,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            file: None,
            line,
            flags: Flags::NONE,
            doc_comment: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, EntityKind::Namespace)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntityKind::Class(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, EntityKind::Function)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, EntityKind::Variable(_))
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.kind {
            EntityKind::Class(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableData> {
        match &self.kind {
            EntityKind::Variable(data) => Some(data),
            _ => None,
        }
    }
}

/// Flat storage for one source unit's entities. Children hold the owning
/// edges; parent links are back-references by id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityArena {
    nodes: Vec<Entity>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.nodes.len() as u32);
        self.nodes.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> &Entity {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.nodes[id.index()]
    }

    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.nodes.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.nodes.len() as u32).map(EntityId)
    }
}

/// The finished output of parsing one source unit: the entity tree rooted at
/// a namespace, the alias table the unit declared, and a marker telling
/// whether end of input was reached with scopes still open.
#[derive(Debug, Clone, Serialize)]
pub struct SourceUnit {
    pub arena: EntityArena,
    pub root: EntityId,
    pub file: Option<PathBuf>,
    pub aliases: AliasTable,
    pub truncated: bool,
}

impl SourceUnit {
    pub fn get(&self, id: EntityId) -> &Entity {
        self.arena.get(id)
    }

    pub fn root(&self) -> &Entity {
        self.arena.get(self.root)
    }

    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
        self.arena.get(id).children.iter().map(|&child| self.arena.get(child))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.arena.iter()
    }

    /// First entity with the given name, in creation (document) order.
    pub fn find(&self, name: &str) -> Option<(EntityId, &Entity)> {
        self.arena
            .ids()
            .map(|id| (id, self.arena.get(id)))
            .find(|(_, entity)| entity.name == name)
    }

    pub fn child_named(&self, id: EntityId, name: &str) -> Option<&Entity> {
        self.children(id).find(|entity| entity.name == name)
    }
}
