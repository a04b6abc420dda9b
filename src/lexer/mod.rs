pub mod token;

use memchr::{memchr, memmem};
use token::{Token, TokenKind};

/// Byte-cursor lexer producing the token stream the symbol parser consumes.
///
/// Raw text outside `<?php ... ?>` regions is skipped. Strings and heredocs
/// are consumed as single tokens so that braces and semicolons inside them
/// never reach the parser's depth bookkeeping.
pub struct Lexer<'src> {
    input: &'src [u8],
    cursor: usize,
    line: u32,
    in_script: bool,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_part(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            input: input.as_bytes(),
            cursor: 0,
            line: 1,
            in_script: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.input.get(self.cursor + n).copied()
    }

    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.cursor += 1;
    }

    /// Move the cursor to an absolute position, counting the newlines that
    /// were skipped over.
    fn advance_to(&mut self, pos: usize) {
        let pos = pos.min(self.input.len());
        if pos > self.cursor {
            let skipped = &self.input[self.cursor..pos];
            self.line += memchr::memchr_iter(b'\n', skipped).count() as u32;
            self.cursor = pos;
        }
    }

    fn text_from(&self, start: usize) -> &'src str {
        // The input came from &str and token boundaries fall on ASCII
        // delimiters, so the slice stays valid UTF-8.
        std::str::from_utf8(&self.input[start..self.cursor]).unwrap_or("")
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Skip raw HTML until the next open tag. Returns the open-tag token, or
    /// None when the input ends first.
    fn enter_script(&mut self) -> Option<Token> {
        let rest = &self.input[self.cursor..];
        let Some(found) = memmem::find(rest, b"<?") else {
            self.advance_to(self.input.len());
            return None;
        };
        self.advance_to(self.cursor + found);
        let line = self.line;
        let start = self.cursor;
        self.cursor += 2;
        if self.input[self.cursor..].len() >= 3
            && self.input[self.cursor..self.cursor + 3].eq_ignore_ascii_case(b"php")
        {
            self.cursor += 3;
        } else if self.peek() == Some(b'=') {
            self.cursor += 1;
        }
        self.in_script = true;
        Some(Token::new(TokenKind::OpenTag, self.text_from(start), line))
    }

    fn read_identifier(&mut self) {
        while let Some(c) = self.peek() {
            if is_ident_part(c) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        if self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X') | Some(b'b') | Some(b'B') | Some(b'o') | Some(b'O'))
        {
            self.bump();
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() || c == b'_' {
                    self.bump();
                } else {
                    break;
                }
            }
            return TokenKind::LNumber;
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == b'_' {
                self.bump();
            } else if c == b'.' && !is_float && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                is_float = true;
                self.bump();
            } else if c == b'e' || c == b'E' {
                is_float = true;
                self.bump();
                if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        if is_float { TokenKind::DNumber } else { TokenKind::LNumber }
    }

    /// Quoted string, consumed wholesale. `quote` is `'`, `"` or a backtick.
    fn read_quoted(&mut self, quote: u8) {
        self.bump(); // opening quote
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.bump();
                if self.peek().is_some() {
                    self.bump();
                }
            } else if c == quote {
                self.bump();
                break;
            } else {
                self.bump();
            }
        }
    }

    /// `<<<LABEL ... LABEL` (and nowdoc `<<<'LABEL'`). The closing label may
    /// be indented and is found at line granularity.
    fn read_heredoc(&mut self) {
        self.cursor += 3; // <<<
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.bump();
        }
        let quoted = matches!(self.peek(), Some(b'\'') | Some(b'"'));
        if quoted {
            self.bump();
        }
        let label_start = self.cursor;
        self.read_identifier();
        let label = self.input[label_start..self.cursor].to_vec();
        if quoted {
            self.bump();
        }
        if label.is_empty() {
            return;
        }
        // scan line by line for the terminator
        loop {
            let rest = &self.input[self.cursor..];
            let Some(nl) = memchr(b'\n', rest) else {
                self.advance_to(self.input.len());
                return;
            };
            self.advance_to(self.cursor + nl + 1);
            let mut p = self.cursor;
            while matches!(self.input.get(p), Some(b' ') | Some(b'\t')) {
                p += 1;
            }
            if self.input[p..].starts_with(&label)
                && !self.input.get(p + label.len()).copied().is_some_and(is_ident_part)
            {
                self.advance_to(p + label.len());
                return;
            }
        }
    }

    /// Comment starting at `//`, `#` or `/*`. The cursor sits on the first
    /// character. Line comments do not consume their newline.
    fn read_comment(&mut self) -> TokenKind {
        if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'*') {
            let is_doc = self.peek_at(2) == Some(b'*') && self.peek_at(3) != Some(b'/');
            let body = self.cursor + 2;
            match memmem::find(&self.input[body..], b"*/") {
                Some(end) => self.advance_to(body + end + 2),
                None => self.advance_to(self.input.len()),
            }
            if is_doc { TokenKind::DocComment } else { TokenKind::BlockComment }
        } else {
            // // or # to end of line; a close tag also ends it
            let rest = &self.input[self.cursor..];
            let eol = memchr(b'\n', rest).unwrap_or(rest.len());
            let stop = memmem::find(&rest[..eol], b"?>").unwrap_or(eol);
            self.advance_to(self.cursor + stop);
            TokenKind::Comment
        }
    }

    /// `#[Attr(...)]` — skipped at bracket granularity, no token produced.
    fn skip_attribute(&mut self) {
        self.cursor += 2; // #[
        let mut depth = 1i32;
        while let Some(c) = self.peek() {
            match c {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                b'\'' | b'"' => {
                    self.read_quoted(c);
                    continue;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Emit an operator/punctuation token of `len` bytes.
    fn op(&mut self, kind: TokenKind, len: usize) -> Token {
        let line = self.line;
        let start = self.cursor;
        self.cursor += len;
        Token::new(kind, self.text_from(start), line)
    }

    fn starts_with(&self, pat: &[u8]) -> bool {
        self.input[self.cursor..].starts_with(pat)
    }

    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if !self.in_script {
                return self.enter_script();
            }

            self.skip_whitespace();
            let c = self.peek()?;
            let line = self.line;
            let start = self.cursor;

            match c {
                b'?' => {
                    if self.peek_at(1) == Some(b'>') {
                        self.in_script = false;
                        return Some(self.op(TokenKind::CloseTag, 2));
                    }
                    if self.starts_with(b"?->") {
                        return Some(self.op(TokenKind::Other, 3));
                    }
                    if self.starts_with(b"??=") {
                        return Some(self.op(TokenKind::Other, 3));
                    }
                    if self.starts_with(b"??") {
                        return Some(self.op(TokenKind::Other, 2));
                    }
                    return Some(self.op(TokenKind::Question, 1));
                }
                b'$' => {
                    if self.peek_at(1).is_some_and(is_ident_start) {
                        self.bump();
                        self.read_identifier();
                        return Some(Token::new(TokenKind::Variable, self.text_from(start), line));
                    }
                    return Some(self.op(TokenKind::Other, 1));
                }
                b'\\' => return Some(self.op(TokenKind::NsSeparator, 1)),
                b'/' => {
                    if matches!(self.peek_at(1), Some(b'/') | Some(b'*')) {
                        let kind = self.read_comment();
                        return Some(Token::new(kind, self.text_from(start), line));
                    }
                    if self.starts_with(b"/=") {
                        return Some(self.op(TokenKind::Other, 2));
                    }
                    return Some(self.op(TokenKind::Other, 1));
                }
                b'#' => {
                    if self.peek_at(1) == Some(b'[') {
                        self.skip_attribute();
                        continue;
                    }
                    let kind = self.read_comment();
                    return Some(Token::new(kind, self.text_from(start), line));
                }
                b'\'' | b'"' | b'`' => {
                    self.read_quoted(c);
                    return Some(Token::new(TokenKind::StringLiteral, self.text_from(start), line));
                }
                b'<' => {
                    if self.starts_with(b"<<<") {
                        self.read_heredoc();
                        return Some(Token::new(TokenKind::StringLiteral, self.text_from(start), line));
                    }
                    for pat in [&b"<=>"[..], b"<<=", b"<<", b"<="] {
                        if self.starts_with(pat) {
                            return Some(self.op(TokenKind::Other, pat.len()));
                        }
                    }
                    return Some(self.op(TokenKind::Other, 1));
                }
                b'0'..=b'9' => {
                    let kind = self.read_number();
                    return Some(Token::new(kind, self.text_from(start), line));
                }
                b'{' => return Some(self.op(TokenKind::OpenBrace, 1)),
                b'}' => return Some(self.op(TokenKind::CloseBrace, 1)),
                b'(' => return Some(self.op(TokenKind::OpenParen, 1)),
                b')' => return Some(self.op(TokenKind::CloseParen, 1)),
                b'[' => return Some(self.op(TokenKind::OpenBracket, 1)),
                b']' => return Some(self.op(TokenKind::CloseBracket, 1)),
                b';' => return Some(self.op(TokenKind::SemiColon, 1)),
                b',' => return Some(self.op(TokenKind::Comma, 1)),
                b'=' => {
                    for pat in [&b"==="[..], b"==", b"=>"] {
                        if self.starts_with(pat) {
                            return Some(self.op(TokenKind::Other, pat.len()));
                        }
                    }
                    return Some(self.op(TokenKind::Eq, 1));
                }
                b'&' => {
                    if self.starts_with(b"&&") || self.starts_with(b"&=") {
                        return Some(self.op(TokenKind::Other, 2));
                    }
                    return Some(self.op(TokenKind::Ampersand, 1));
                }
                _ => {
                    if is_ident_start(c) {
                        self.read_identifier();
                        let text = self.text_from(start);
                        let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
                        return Some(Token::new(kind, text, line));
                    }
                    // remaining operators, longest match first
                    for pat in [
                        &b"!=="[..], b"**=", b"...", b">>=",
                        b"->", b"::", b"!=", b">=", b"||", b"|=", b"^=",
                        b"**", b"++", b"--", b"+=", b"-=", b"*=", b".=", b"%=", b">>",
                    ] {
                        if self.starts_with(pat) {
                            return Some(self.op(TokenKind::Other, pat.len()));
                        }
                    }
                    return Some(self.op(TokenKind::Other, 1));
                }
            }
        }
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    // PHP keywords are case-insensitive
    let lower = text.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "namespace" => TokenKind::Namespace,
        "use" => TokenKind::Use,
        "as" => TokenKind::As,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "trait" => TokenKind::Trait,
        "extends" => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        "function" => TokenKind::Function,
        "const" => TokenKind::Const,
        "new" => TokenKind::New,
        "public" => TokenKind::Public,
        "protected" => TokenKind::Protected,
        "private" => TokenKind::Private,
        "static" => TokenKind::Static,
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "include" => TokenKind::Include,
        "include_once" => TokenKind::IncludeOnce,
        "require" => TokenKind::Require,
        "require_once" => TokenKind::RequireOnce,
        _ => return None,
    };
    Some(kind)
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
