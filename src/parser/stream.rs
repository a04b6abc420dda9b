use crate::lexer::Lexer;
use crate::lexer::token::{Token, TokenKind};

/// The lexer seam: anything that can hand out tokens until end of input.
pub trait TokenSource {
    fn next_token(&mut self) -> Option<Token>;
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Option<Token> {
        Lexer::next_token(self)
    }
}

/// A block or doc comment waiting for the association pass. `attached_line`
/// is the line of the first content token read after the comment; an entity
/// declared on that line claims the comment.
#[derive(Debug, Clone)]
pub struct PendingComment {
    pub text: String,
    pub line: u32,
    pub attached_line: Option<u32>,
}

/// Adapter over a [`TokenSource`] adding the bookkeeping the parser relies
/// on: a one-slot pushback buffer, the brace-depth counter, the side buffer
/// of block comments, and a sticky end-of-input flag.
///
/// Side effects (depth, comment buffering) are applied when a token is
/// served and exactly reversed by [`unget`](Self::unget), so pushback never
/// desynchronizes the depth counter from the real nesting.
pub struct TokenStream<S> {
    source: S,
    slot: Option<Token>,
    depth: i32,
    eof: bool,
    comments: Vec<PendingComment>,
}

impl<S: TokenSource> TokenStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: None,
            depth: 0,
            eof: false,
            comments: Vec::new(),
        }
    }

    pub fn next(&mut self) -> Option<Token> {
        let token = match self.slot.take() {
            Some(token) => token,
            None => match self.source.next_token() {
                Some(token) => token,
                None => {
                    self.eof = true;
                    return None;
                }
            },
        };
        self.observe(&token);
        Some(token)
    }

    /// Restore exactly the last consumed token. One slot only.
    pub fn unget(&mut self, token: Token) {
        debug_assert!(self.slot.is_none(), "only one token of pushback");
        match token.kind {
            TokenKind::OpenBrace => self.depth -= 1,
            TokenKind::CloseBrace => self.depth += 1,
            TokenKind::BlockComment | TokenKind::DocComment => {
                self.comments.pop();
            }
            _ => {}
        }
        self.slot = Some(token);
    }

    fn observe(&mut self, token: &Token) {
        match token.kind {
            TokenKind::BlockComment | TokenKind::DocComment => {
                self.comments.push(PendingComment {
                    text: token.text.clone(),
                    line: token.line,
                    attached_line: None,
                });
                return;
            }
            TokenKind::Comment => return,
            TokenKind::OpenBrace => self.depth += 1,
            TokenKind::CloseBrace => self.depth -= 1,
            _ => {}
        }
        // a content token claims every comment still waiting for one
        for comment in self.comments.iter_mut().rev() {
            if comment.attached_line.is_none() {
                comment.attached_line = Some(token.line);
            } else {
                break;
            }
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn eof_reached(&self) -> bool {
        self.eof
    }

    pub fn take_comments(&mut self) -> Vec<PendingComment> {
        std::mem::take(&mut self.comments)
    }
}
