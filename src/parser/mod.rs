pub mod resolve;
pub mod stream;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::entity::{ClassData, Entity, EntityId, EntityKind, EntityArena, Flags, SourceUnit, VariableData};
use crate::lexer::Lexer;
use crate::lexer::token::{Token, TokenKind};
use resolve::AliasTable;
use stream::{TokenSource, TokenStream};

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Record local variables found inside function bodies. Off by default:
    /// bulk indexing only needs the outer symbols.
    pub parse_function_body: bool,
    /// Path recorded on every produced entity and on the unit.
    pub file: Option<PathBuf>,
}

/// Parse an in-memory source string.
pub fn parse_source(source: &str, options: ParseOptions) -> SourceUnit {
    Parser::new(Lexer::new(source), options).parse()
}

/// Parse a file, decoding lossily as UTF-8. The recorded path is absolute.
pub fn parse_file(path: &Path, mut options: ParseOptions) -> io::Result<SourceUnit> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    options.file = Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()));
    Ok(Parser::new(Lexer::new(&text), options).parse())
}

/// Single-pass symbol parser for one source unit.
///
/// The driver dispatches on one token at a time and keeps no grammar state
/// beyond the scope stack, the brace depth and a lookback window of recently
/// read tokens. Malformed input is never an error: a construct that does not
/// parse is abandoned and the driver resumes, and input that ends early
/// leaves its unclosed scopes on the stack, which marks the unit truncated.
pub struct Parser<S> {
    stream: TokenStream<S>,
    options: ParseOptions,
    arena: EntityArena,
    scopes: Vec<EntityId>,
    /// Raw tokens read since the last statement boundary (`=`, `{`, `}`,
    /// `;`). Used only to recover modifier keywords and leading type hints
    /// once a construct is recognized.
    lookback: Vec<Token>,
    aliases: AliasTable,
}

fn trim_sigil(text: &str) -> &str {
    text.strip_prefix('$').unwrap_or(text)
}

fn visibility_flag(kind: TokenKind) -> Flags {
    match kind {
        TokenKind::Public => Flags::PUBLIC,
        TokenKind::Private => Flags::PRIVATE,
        TokenKind::Protected => Flags::PROTECTED,
        _ => Flags::NONE,
    }
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S, options: ParseOptions) -> Self {
        Self {
            stream: TokenStream::new(source),
            options,
            arena: EntityArena::new(),
            scopes: Vec::new(),
            lookback: Vec::new(),
            aliases: AliasTable::new(),
        }
    }

    /// Run to end of input and hand off the finished unit.
    pub fn parse(mut self) -> SourceUnit {
        self.parse_scope(None);
        let root = self.namespace_id();
        let truncated = self.scopes.len() > 1;
        self.attach_doc_comments();
        SourceUnit {
            arena: self.arena,
            root,
            file: self.options.file,
            aliases: self.aliases,
            truncated,
        }
    }

    // ---- token plumbing -------------------------------------------------

    fn next_token(&mut self) -> Option<Token> {
        let token = self.stream.next()?;
        self.lookback.push(token.clone());
        Some(token)
    }

    fn unget(&mut self, token: Token) {
        self.lookback.pop();
        self.stream.unget(token);
    }

    fn read_until(&mut self, kind: TokenKind) -> Option<Token> {
        while let Some(token) = self.next_token() {
            if token.kind == kind {
                return Some(token);
            }
        }
        None
    }

    fn read_until_one_of(&mut self, first: TokenKind, second: TokenKind) -> Option<Token> {
        while let Some(token) = self.next_token() {
            if token.kind == first || token.kind == second {
                return Some(token);
            }
        }
        None
    }

    fn consume_until(&mut self, kind: TokenKind) -> bool {
        self.read_until(kind).is_some()
    }

    // ---- scopes and naming ----------------------------------------------

    /// The root namespace, created lazily when nothing declared one.
    fn namespace_id(&mut self) -> EntityId {
        if self.scopes.is_empty() {
            let entity = self.new_entity(EntityKind::Namespace, "\\", 0);
            let id = self.arena.alloc(entity);
            self.scopes.push(id);
        }
        self.scopes[0]
    }

    fn current_scope(&mut self) -> EntityId {
        self.namespace_id();
        *self.scopes.last().unwrap()
    }

    fn namespace_name(&mut self) -> String {
        let id = self.namespace_id();
        self.arena.get(id).name.clone()
    }

    fn make_absolute(&mut self, raw: &str) -> String {
        let namespace = self.namespace_name();
        resolve::make_absolute(&self.aliases, &namespace, raw)
    }

    fn new_entity(&self, kind: EntityKind, name: &str, line: u32) -> Entity {
        let mut entity = Entity::new(kind, name, line);
        entity.file = self.options.file.clone();
        entity
    }

    /// Append to whichever entity is on top of the scope stack right now.
    fn append(&mut self, entity: Entity) -> EntityId {
        let parent = self.current_scope();
        let id = self.arena.alloc(entity);
        self.arena.add_child(parent, id);
        id
    }

    // ---- lookback extraction --------------------------------------------

    fn lookback_flags(&self) -> Flags {
        let mut flags = Flags::NONE;
        for token in &self.lookback {
            match token.kind {
                TokenKind::Abstract => flags |= Flags::ABSTRACT,
                TokenKind::Final => flags |= Flags::FINAL,
                TokenKind::Static => flags |= Flags::STATIC,
                TokenKind::Public => flags |= Flags::PUBLIC,
                TokenKind::Private => flags |= Flags::PRIVATE,
                TokenKind::Protected => flags |= Flags::PROTECTED,
                _ => {}
            }
        }
        flags
    }

    /// Identifier/`\` run sitting immediately before the variable token at
    /// the end of the lookback window; the raw text of a leading type hint.
    fn lookback_type_hint(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for token in self.lookback.iter().rev() {
            match token.kind {
                TokenKind::Variable if parts.is_empty() => continue,
                TokenKind::Identifier | TokenKind::NsSeparator => parts.push(&token.text),
                _ => break,
            }
        }
        parts.reverse();
        parts.concat()
    }

    // ---- statement driver -----------------------------------------------

    /// The dispatch loop. With `exit_depth` set this parses a class body and
    /// returns once the depth counter drops back to it; with `None` it is
    /// the whole-unit loop and exits only at end of input.
    fn parse_scope(&mut self, exit_depth: Option<i32>) {
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Eq | TokenKind::OpenBrace | TokenKind::SemiColon => {
                    self.lookback.clear();
                }
                TokenKind::CloseBrace => {
                    self.lookback.clear();
                    if exit_depth == Some(self.stream.depth()) {
                        return;
                    }
                }
                TokenKind::Public | TokenKind::Private | TokenKind::Protected => {
                    self.on_visibility(token.kind);
                }
                TokenKind::Const => {
                    self.on_const();
                    self.lookback.clear();
                }
                TokenKind::Require
                | TokenKind::RequireOnce
                | TokenKind::Include
                | TokenKind::IncludeOnce => {
                    // file inclusion is not followed
                    self.lookback.clear();
                }
                TokenKind::Use => {
                    self.on_use();
                    self.lookback.clear();
                }
                TokenKind::Class => {
                    self.on_class(Flags::NONE);
                    self.lookback.clear();
                }
                TokenKind::Interface => {
                    self.on_class(Flags::INTERFACE);
                    self.lookback.clear();
                }
                TokenKind::Trait => {
                    self.on_class(Flags::TRAIT);
                    self.lookback.clear();
                }
                TokenKind::Namespace => {
                    self.on_namespace();
                    self.lookback.clear();
                }
                TokenKind::Function => {
                    self.on_function();
                    self.lookback.clear();
                }
                _ => {
                    // stays in the lookback window
                }
            }
        }
    }

    /// `public`/`private`/`protected` inside a class body starts either a
    /// member variable or a method; scan forward to whichever token settles
    /// it. The lookback window is kept: modifiers that preceded the
    /// visibility keyword still count for the flag scan.
    fn on_visibility(&mut self, keyword: TokenKind) {
        let scope = self.current_scope();
        if !self.arena.get(scope).is_class() {
            return;
        }

        match self.read_until_one_of(TokenKind::Variable, TokenKind::Function) {
            Some(found) if found.kind == TokenKind::Variable => {
                let mut data = VariableData::default();
                let hint = self.lookback_type_hint();
                if !hint.is_empty() {
                    data.type_hint = Some(self.make_absolute(&hint));
                }
                let mut entity = self.new_entity(
                    EntityKind::Variable(data),
                    trim_sigil(&found.text),
                    found.line,
                );
                entity.flags = visibility_flag(keyword) | Flags::MEMBER;
                if self.lookback_flags().contains(Flags::STATIC) {
                    entity.flags |= Flags::STATIC;
                }
                self.append(entity);
                // the terminating `;` is consumed here, past the driver, so
                // the statement boundary clears the window too
                self.consume_until(TokenKind::SemiColon);
                self.lookback.clear();
            }
            Some(_) => {
                self.on_function();
                self.lookback.clear();
            }
            None => {}
        }
    }

    /// `const NAME = value;` — recorded as a constant member.
    fn on_const(&mut self) {
        let Some(name) = self.read_until(TokenKind::Identifier) else {
            return;
        };
        let mut entity = self.new_entity(
            EntityKind::Variable(VariableData::default()),
            &name.text,
            name.line,
        );
        entity.flags = Flags::MEMBER | Flags::CONSTANT;
        self.append(entity);
        self.consume_until(TokenKind::SemiColon);
    }

    /// `use Full\Name as Alias, Other\Name;` — feeds the alias table. With
    /// no alias given the last path segment is the alias.
    fn on_use(&mut self) {
        let mut fullname = String::new();
        let mut alias = String::new();
        let mut temp = String::new();
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Comma | TokenKind::SemiColon => {
                    if fullname.is_empty() {
                        std::mem::swap(&mut fullname, &mut temp);
                    } else if alias.is_empty() {
                        std::mem::swap(&mut alias, &mut temp);
                    }
                    if alias.is_empty() {
                        alias = fullname.rsplit('\\').next().unwrap_or("").to_string();
                    }
                    if !fullname.is_empty() && !alias.is_empty() {
                        let absolute = self.make_absolute(&fullname);
                        self.aliases.insert(std::mem::take(&mut alias), absolute);
                    }
                    temp.clear();
                    fullname.clear();
                    alias.clear();
                    if token.kind == TokenKind::SemiColon {
                        return;
                    }
                }
                TokenKind::As => {
                    fullname = std::mem::take(&mut temp);
                }
                _ => {
                    if !token.is_comment() {
                        temp.push_str(&token.text);
                    }
                }
            }
        }
    }

    /// `namespace A\B;` — only meaningful before any other content; a
    /// namespace declared later is a source error and is ignored.
    fn on_namespace(&mut self) {
        let mut path = String::new();
        let mut line = 0;
        while let Some(token) = self.next_token() {
            if token.kind == TokenKind::SemiColon {
                break;
            }
            if token.kind == TokenKind::OpenBrace {
                self.unget(token);
                break;
            }
            if token.is_comment() {
                continue;
            }
            if line == 0 {
                line = token.line;
            }
            // the namespace path is always kept absolute
            if path.is_empty() && token.kind != TokenKind::NsSeparator {
                path.push('\\');
            }
            path.push_str(&token.text);
        }

        if self.scopes.is_empty() {
            let name = if path.is_empty() { "\\".to_string() } else { path };
            let entity = self.new_entity(EntityKind::Namespace, &name, line);
            let id = self.arena.alloc(entity);
            self.scopes.push(id);
        }
    }

    /// `function name(...)`, or an anonymous `function (...)`. The new
    /// function becomes the current scope for its parameters and body.
    fn on_function(&mut self) {
        let Some(token) = self.next_token() else {
            return;
        };
        let (name, line, signature_depth) = match token.kind {
            TokenKind::Identifier => (token.text.clone(), token.line, 0),
            TokenKind::OpenParen => (String::new(), token.line, 1),
            _ => return, // not a function declaration after all
        };

        // modifiers read before the `function` keyword
        let flags = self.lookback_flags();

        let mut entity = self.new_entity(EntityKind::Function, &name, line);
        entity.flags = flags;
        let id = self.append(entity);
        self.scopes.push(id);

        self.parse_signature(signature_depth);

        match self.read_until_one_of(TokenKind::OpenBrace, TokenKind::SemiColon) {
            Some(token) if token.kind == TokenKind::OpenBrace => {
                if self.options.parse_function_body {
                    self.parse_function_body();
                } else {
                    self.consume_function_body();
                }
            }
            Some(_) => {
                // `;` — declaration only (abstract or interface method)
            }
            None => {}
        }

        if !self.stream.eof_reached() {
            self.scopes.pop();
        }
        self.lookback.clear();
    }

    /// Parameter list. Entered at nesting depth 1 (just past the opening
    /// paren) unless the paren is still ahead. Commas and parens inside
    /// default-value expressions are tracked so a nested call never ends a
    /// parameter early.
    fn parse_signature(&mut self, starting_depth: i32) {
        let mut depth = starting_depth;
        if depth == 0 {
            loop {
                let Some(token) = self.next_token() else {
                    return;
                };
                if token.kind == TokenKind::OpenParen {
                    depth = 1;
                    break;
                }
            }
        }

        let mut type_hint = String::new();
        let mut default_value = String::new();
        let mut collecting_default = false;
        let mut param: Option<Entity> = None;

        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Variable => {
                    let mut data = VariableData::default();
                    let mut hint = std::mem::take(&mut type_hint);
                    if let Some(stripped) = hint.strip_suffix('&') {
                        data.is_reference = true;
                        hint = stripped.to_string();
                    }
                    let hint = hint.trim_start_matches('?');
                    if !hint.is_empty() {
                        data.type_hint = Some(self.make_absolute(hint));
                    }
                    let mut entity = self.new_entity(
                        EntityKind::Variable(data),
                        trim_sigil(&token.text),
                        token.line,
                    );
                    entity.flags = Flags::ARGUMENT;
                    param = Some(entity);
                }
                TokenKind::OpenParen => {
                    depth += 1;
                    if collecting_default {
                        default_value.push('(');
                    }
                }
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth < 1 {
                        if let Some(entity) = param.take() {
                            self.commit_parameter(entity, &default_value);
                        }
                        return;
                    }
                    if collecting_default {
                        default_value.push(')');
                    }
                }
                TokenKind::OpenBracket => {
                    depth += 1;
                    if collecting_default {
                        default_value.push('[');
                    }
                }
                TokenKind::CloseBracket => {
                    depth -= 1;
                    if collecting_default {
                        default_value.push(']');
                    }
                }
                TokenKind::Eq => collecting_default = true,
                TokenKind::Comma if depth == 1 => {
                    if let Some(entity) = param.take() {
                        self.commit_parameter(entity, &default_value);
                    }
                    type_hint.clear();
                    default_value.clear();
                    collecting_default = false;
                }
                TokenKind::Public
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Static => {
                    // promoted-property modifiers, not part of the type hint
                }
                _ if token.is_comment() => {}
                _ if token.kind == TokenKind::Other && token.text == "..." => {
                    // variadic marker, not part of the type hint
                }
                _ => {
                    if collecting_default {
                        default_value.push_str(&token.text);
                    } else {
                        type_hint.push_str(&token.text);
                    }
                }
            }
        }
    }

    fn commit_parameter(&mut self, mut entity: Entity, default_value: &str) {
        if !default_value.is_empty() {
            if let EntityKind::Variable(data) = &mut entity.kind {
                data.default_value = Some(default_value.to_string());
            }
        }
        self.append(entity);
    }

    /// Skip a function body, tracking depth only.
    fn consume_function_body(&mut self) {
        let depth = self.stream.depth();
        while let Some(token) = self.next_token() {
            if token.kind == TokenKind::CloseBrace && self.stream.depth() < depth {
                return;
            }
        }
    }

    /// Scan a function body for local variables. A variable followed by `=`
    /// gets its right-hand side captured; `new X(...)` becomes a resolved
    /// type hint, anything else is kept as raw expression text. A bare
    /// variable is recorded as a declaration and nothing more.
    fn parse_function_body(&mut self) {
        self.lookback.clear();
        let exit_depth = self.stream.depth() - 1;
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::OpenBrace | TokenKind::SemiColon => self.lookback.clear(),
                TokenKind::CloseBrace => {
                    self.lookback.clear();
                    if self.stream.depth() == exit_depth {
                        return;
                    }
                }
                TokenKind::Variable => {
                    let mut entity = self.new_entity(
                        EntityKind::Variable(VariableData::default()),
                        trim_sigil(&token.text),
                        token.line,
                    );
                    entity.flags = Flags::LOCAL;
                    let id = self.append(entity);

                    let Some(next) = self.next_token() else {
                        return;
                    };
                    if next.kind != TokenKind::Eq {
                        self.lookback.clear();
                        self.unget(next);
                        continue;
                    }
                    let Some(expression) = self.read_expression() else {
                        return;
                    };
                    let bytes = expression.as_bytes();
                    if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"new ") {
                        let class_name = expression[4..]
                            .split('(')
                            .next()
                            .unwrap_or("")
                            .trim()
                            .to_string();
                        let hint = self.make_absolute(&class_name);
                        if let EntityKind::Variable(data) = &mut self.arena.get_mut(id).kind {
                            data.type_hint = Some(hint);
                        }
                    } else if let EntityKind::Variable(data) = &mut self.arena.get_mut(id).kind {
                        data.expression_hint = Some(expression);
                    }
                }
                _ => {}
            }
        }
    }

    /// Capture raw expression text up to `;` (consumed) or `{` (pushed
    /// back, a closure or block ends the simple read). Comments are skipped;
    /// `new` keeps a trailing space so the following class name stays
    /// separable; a close paren past depth zero is trailing cruft and is
    /// dropped.
    fn read_expression(&mut self) -> Option<String> {
        let mut expression = String::new();
        let mut depth = 0;
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::SemiColon => return Some(expression),
                TokenKind::OpenBrace => {
                    self.unget(token);
                    return Some(expression);
                }
                _ if token.is_comment() => {}
                TokenKind::OpenParen => {
                    depth += 1;
                    expression.push('(');
                }
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth >= 0 {
                        expression.push(')');
                    } else {
                        depth = 0;
                    }
                }
                TokenKind::New => {
                    expression.push_str(&token.text);
                    expression.push(' ');
                }
                _ => expression.push_str(&token.text),
            }
        }
        None
    }

    /// `class A extends B implements C, D { ... }` — also entered for
    /// `interface` and `trait` with the matching kind flag.
    fn on_class(&mut self, kind_flags: Flags) {
        let name_token = loop {
            let Some(token) = self.next_token() else {
                return;
            };
            if token.is_comment() {
                continue;
            }
            if token.kind != TokenKind::Identifier {
                return; // expected the class name; abandon the construct
            }
            break token;
        };

        let absolute = self.make_absolute(&name_token.text);
        let mut entity = self.new_entity(
            EntityKind::Class(ClassData::default()),
            &absolute,
            name_token.line,
        );
        entity.flags = self.lookback_flags() | kind_flags;
        let id = self.append(entity);
        self.scopes.push(id);

        while let Some(token) = self.next_token() {
            if token.is_comment() {
                continue;
            }
            match token.kind {
                TokenKind::Extends => {
                    let Some(base) = self.read_until(TokenKind::Identifier) else {
                        return;
                    };
                    let absolute = self.make_absolute(&base.text);
                    if let EntityKind::Class(data) = &mut self.arena.get_mut(id).kind {
                        data.extends = Some(absolute);
                    }
                }
                TokenKind::Implements => {
                    let Some(list) = self.read_interface_list(TokenKind::OpenBrace) else {
                        return;
                    };
                    if let EntityKind::Class(data) = &mut self.arena.get_mut(id).kind {
                        data.implements = list;
                    }
                }
                TokenKind::OpenBrace => {
                    let exit_depth = self.stream.depth() - 1;
                    self.parse_scope(Some(exit_depth));
                    if !self.stream.eof_reached() {
                        self.scopes.pop();
                    }
                    return;
                }
                _ => {}
            }
        }
    }

    /// Comma-separated names up to (not including) `delim`. Each entry is
    /// resolved; duplicates of an already-resolved name are suppressed.
    fn read_interface_list(&mut self, delim: TokenKind) -> Option<Vec<String>> {
        let mut list: Vec<String> = Vec::new();
        let mut temp = String::new();
        while let Some(token) = self.next_token() {
            if token.is_comment() {
                continue;
            }
            if token.kind == delim {
                if !temp.trim().is_empty() {
                    let absolute = self.make_absolute(&temp);
                    if !list.contains(&absolute) {
                        list.push(absolute);
                    }
                }
                self.unget(token);
                return Some(list);
            }
            match token.kind {
                TokenKind::Comma => {
                    if !temp.trim().is_empty() {
                        let absolute = self.make_absolute(&temp);
                        if !list.contains(&absolute) {
                            list.push(absolute);
                        }
                    }
                    temp.clear();
                }
                _ => temp.push_str(&token.text),
            }
        }
        None
    }

    // ---- phase two -------------------------------------------------------

    /// Attach each buffered block comment to the entity declared on the
    /// comment's attached line. When several comments claim the same line
    /// the closest one wins; unclaimed comments are dropped.
    fn attach_doc_comments(&mut self) {
        let comments = self.stream.take_comments();
        let mut by_line: HashMap<u32, &str> = HashMap::new();
        for comment in &comments {
            if let Some(line) = comment.attached_line {
                by_line.insert(line, &comment.text);
            }
        }
        for entity in self.arena.iter_mut() {
            if let Some(text) = by_line.get(&entity.line) {
                entity.doc_comment = Some((*text).to_string());
            }
        }
    }
}
