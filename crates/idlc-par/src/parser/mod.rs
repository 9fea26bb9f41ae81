//! Parser driver: lookahead, scope stack, and the top-level file loop.
//!
//! The parser tracks the start and end tokens of every AST node with a
//! stack of in-progress [`SourceElement`] placeholders. Opening a scope
//! pushes a placeholder whose start token is `NotAToken`; the next token
//! consumed fills in the start of every placeholder still waiting for one;
//! sealing the scope records the previous token as the end. A suppression
//! flag lets lookahead-only scopes stay out of the gap bookkeeping.
//!
//! Scopes are only ever opened and closed through [`Parser::in_scope`], so
//! the stack stays balanced on every exit path, including early returns on
//! syntax errors.

mod decls;
mod interface;
mod types;

use idlc_lex::{Lexer, Token, TokenKind, TokenSubkind};
use idlc_util::{Diagnostic, ErrorCode, Handler, SourceSpan};

use crate::ast::{CompoundIdentifier, File, Identifier, SourceElement};

/// Tracks whether a doc-comment block was interrupted by an ordinary
/// comment and then resumed, which deserves a warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CommentState {
    Normal,
    /// The token just pulled was a doc comment.
    DocCommentLast,
    /// An ordinary comment directly followed a doc-comment block.
    DocCommentThenComment,
}

/// An open span-tracking scope. Produced and consumed by
/// [`Parser::in_scope`]; holds the stack slot and the suppression flag to
/// restore on close.
pub(crate) struct Scope {
    index: usize,
    saved_suppress: bool,
}

/// Recursive-descent parser over one token stream.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    handler: &'src Handler,

    /// Placeholders for the currently open scopes, innermost last.
    active_scopes: Vec<SourceElement<'src>>,
    /// Most recent start of a gap: uninteresting source before a token.
    gap_start: SourceSpan<'src>,
    /// The last sealed element was the start of a gap.
    last_was_gap_start: bool,
    /// Gap bookkeeping is suspended for the innermost scope.
    suppress_gap_checks: bool,

    /// The token before `last_token`.
    previous_token: Token<'src>,
    /// One-token lookahead.
    last_token: Token<'src>,
    state: CommentState,

    /// Every token pulled from the lexer, comments included.
    tokens: Vec<Token<'src>>,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>, handler: &'src Handler) -> Self {
        let mut parser = Self {
            lexer,
            handler,
            active_scopes: Vec::new(),
            gap_start: SourceSpan::invalid(),
            last_was_gap_start: false,
            suppress_gap_checks: false,
            previous_token: Token::not_a_token(),
            last_token: Token::not_a_token(),
            state: CommentState::Normal,
            tokens: Vec::new(),
        };
        parser.last_token = parser.lex_past_comments();
        parser
    }

    /// Pulls the next token worth handing to the grammar: plain comments are
    /// recorded and skipped, doc comments come through.
    fn lex_past_comments(&mut self) -> Token<'src> {
        loop {
            let token = self.lexer.lex();
            self.tokens.push(token);

            match token.kind() {
                TokenKind::Comment => {
                    if self.state == CommentState::DocCommentLast {
                        self.state = CommentState::DocCommentThenComment;
                    }
                }
                TokenKind::DocComment => {
                    if self.state == CommentState::DocCommentThenComment {
                        self.handler.report(
                            Diagnostic::warning(
                                "doc comment block resumed after an ordinary comment",
                            )
                            .at(token.span().position_str()),
                        );
                    }
                    self.state = CommentState::DocCommentLast;
                    return token;
                }
                _ => {
                    self.state = CommentState::Normal;
                    return token;
                }
            }
        }
    }

    pub(crate) fn peek(&self) -> Token<'src> {
        self.last_token
    }

    fn consumed_eof(&self) -> bool {
        self.previous_token.kind() == TokenKind::EndOfFile
    }

    /// Description of the lookahead token for diagnostics.
    pub(crate) fn found_description(&self) -> String {
        let token = &self.last_token;
        match token.kind() {
            TokenKind::Identifier | TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                format!("`{}`", token.data())
            }
            kind => kind.description().to_string(),
        }
    }

    pub(crate) fn error_at_lookahead(&self, code: ErrorCode, message: impl Into<String>) {
        self.handler.report(
            Diagnostic::error(code, message).at(self.last_token.span().position_str()),
        );
    }

    /// Accepts the lookahead token unconditionally and advances.
    fn advance(&mut self) -> Token<'src> {
        debug_assert!(!self.consumed_eof(), "advanced past end of file");
        let mut token = self.last_token;
        self.previous_token = token;
        // Don't pull more tokens once the end of file is in hand.
        if token.kind() != TokenKind::EndOfFile {
            self.last_token = self.lex_past_comments();
        }
        self.update_marks(&mut token);
        token
    }

    /// Consumes the lookahead if it has the expected kind; otherwise records
    /// a `ConsumeNotExpected` diagnostic and leaves the token in place.
    pub(crate) fn consume_kind(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.last_token.kind() != kind {
            self.error_at_lookahead(
                ErrorCode::ConsumeNotExpected,
                format!(
                    "expected {}, found {}",
                    kind.description(),
                    self.found_description()
                ),
            );
            return None;
        }
        Some(self.advance())
    }

    /// Consumes the lookahead if it is an identifier with the expected
    /// keyword tag.
    pub(crate) fn consume_keyword(&mut self, subkind: TokenSubkind) -> Option<Token<'src>> {
        if !self.last_token.is_keyword(subkind) {
            self.error_at_lookahead(
                ErrorCode::ConsumeNotExpected,
                format!(
                    "expected `{}`, found {}",
                    subkind.spelling(),
                    self.found_description()
                ),
            );
            return None;
        }
        Some(self.advance())
    }

    /// Records where the consumed token lands in every waiting scope and
    /// maintains the gap bookkeeping.
    fn update_marks(&mut self, token: &mut Token<'src>) {
        debug_assert!(
            !self.active_scopes.is_empty(),
            "unbalanced parse scope stack"
        );

        if !self.suppress_gap_checks {
            // If the end of the last node was the start of a gap, record it.
            if self.last_was_gap_start && self.previous_token.kind() != TokenKind::NotAToken {
                self.gap_start = token.previous_end();
                self.last_was_gap_start = false;
            }

            // A scope still waiting for its start token means this token
            // ends a gap.
            if self
                .active_scopes
                .last()
                .map(|scope| scope.is_placeholder())
                .unwrap_or(false)
            {
                self.last_was_gap_start = true;
            }
        }

        // Rewrite the token's gap to start where the previous node ended.
        if self.gap_start.valid() {
            token.set_previous_end(self.gap_start);
        }

        for scope in &mut self.active_scopes {
            if scope.is_placeholder() {
                scope.start = *token;
            }
        }

        self.previous_token = *token;
    }

    /// Runs `f` inside a fresh span-tracking scope.
    pub(crate) fn in_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &Scope) -> Option<T>,
    ) -> Option<T> {
        self.in_scope_suppressed(false, f)
    }

    /// Like [`Parser::in_scope`], but with gap tracking suppressed when the
    /// scope is only lookahead.
    pub(crate) fn in_scope_suppressed<T>(
        &mut self,
        suppress: bool,
        f: impl FnOnce(&mut Self, &Scope) -> Option<T>,
    ) -> Option<T> {
        let scope = self.open_scope(suppress);
        let result = f(self, &scope);
        self.close_scope(scope);
        result
    }

    fn open_scope(&mut self, suppress: bool) -> Scope {
        let saved_suppress = self.suppress_gap_checks;
        self.suppress_gap_checks = suppress;
        self.active_scopes
            .push(SourceElement::new(Token::not_a_token(), Token::not_a_token()));
        Scope {
            index: self.active_scopes.len() - 1,
            saved_suppress,
        }
    }

    /// Seals the scope: its end token becomes the most recently consumed
    /// token. The scope stays open; sealing may happen once per scope, right
    /// before the node is built.
    pub(crate) fn scope_element(&mut self, scope: &Scope) -> SourceElement<'src> {
        let mut element = self.active_scopes[scope.index];
        element.end = self.previous_token;
        self.active_scopes[scope.index].end = self.previous_token;
        if !self.suppress_gap_checks {
            self.last_was_gap_start = true;
        }
        element
    }

    fn close_scope(&mut self, scope: Scope) {
        debug_assert_eq!(scope.index, self.active_scopes.len() - 1);
        self.suppress_gap_checks = scope.saved_suppress;
        self.active_scopes.pop();
    }

    /// Parses the whole file.
    ///
    /// Returns the tree even when syntax errors were recorded along the way
    /// (with the offending declarations dropped); returns `None` only when
    /// the file structure itself could not be recovered. Check the handler
    /// for overall success.
    pub fn parse(mut self) -> Option<File<'src>> {
        let scope = self.open_scope(false);

        let mut module_name: Option<CompoundIdentifier<'src>> = None;
        let mut const_declarations = Vec::new();
        let mut struct_declarations = Vec::new();
        let mut union_declarations = Vec::new();
        let mut enum_declarations = Vec::new();
        let mut interface_declarations = Vec::new();

        // Attribute waiting for the interface declaration it precedes.
        let mut pending_attribute: Option<Identifier<'src>> = None;

        loop {
            match (self.last_token.kind(), self.last_token.subkind()) {
                (TokenKind::EndOfFile, _) => break,

                (TokenKind::At, _) => {
                    if self.consume_kind(TokenKind::At).is_some() {
                        pending_attribute = self.parse_identifier();
                    }
                }

                // Closing brace of the module body.
                (TokenKind::RightCurly, _) => {
                    self.advance();
                }

                (TokenKind::Identifier, TokenSubkind::Module) => {
                    let parsed = self.in_scope(|parser, scope| parser.parse_module_name(scope));
                    if let Some(parsed) = parsed {
                        if module_name.is_some() {
                            self.handler.report(
                                Diagnostic::warning("repeated `module` declaration ignored")
                                    .at(parsed.element.span().position_str()),
                            );
                        } else {
                            module_name = Some(parsed);
                        }
                    }
                }

                (TokenKind::Identifier, TokenSubkind::Const) => {
                    let parsed =
                        self.in_scope(|parser, scope| parser.parse_const_declaration(scope));
                    if let Some(decl) = parsed {
                        const_declarations.push(decl);
                    }
                }

                (TokenKind::Identifier, TokenSubkind::Struct) => {
                    let parsed =
                        self.in_scope(|parser, scope| parser.parse_struct_declaration(scope));
                    if let Some(decl) = parsed {
                        struct_declarations.push(decl);
                    }
                }

                (TokenKind::Identifier, TokenSubkind::Union) => {
                    let parsed =
                        self.in_scope(|parser, scope| parser.parse_union_declaration(scope));
                    if let Some(decl) = parsed {
                        union_declarations.push(decl);
                    }
                }

                (TokenKind::Identifier, TokenSubkind::Enum) => {
                    let parsed =
                        self.in_scope(|parser, scope| parser.parse_enum_declaration(scope));
                    if let Some(decl) = parsed {
                        enum_declarations.push(decl);
                    }
                }

                (TokenKind::Identifier, TokenSubkind::Interface) => {
                    let attribute = pending_attribute.take();
                    let parsed = self.in_scope(|parser, scope| {
                        parser.parse_interface_declaration(scope, attribute)
                    });
                    if let Some(decl) = parsed {
                        interface_declarations.push(decl);
                    }
                }

                // Not the start of a declaration; skip the token and
                // resynchronize. Declaration productions stop at the first
                // unexpected token, so this is also the error recovery path.
                _ => {
                    self.advance();
                }
            }
        }

        let end = match self.consume_kind(TokenKind::EndOfFile) {
            Some(token) => token,
            None => {
                self.close_scope(scope);
                return None;
            }
        };

        if module_name.is_none() {
            self.handler.error(
                ErrorCode::ConsumeNotExpected,
                "missing `module` declaration",
            );
        }

        let element = self.scope_element(&scope);
        self.close_scope(scope);

        Some(File {
            element,
            module_name,
            const_declarations,
            struct_declarations,
            union_declarations,
            enum_declarations,
            interface_declarations,
            tokens: std::mem::take(&mut self.tokens),
            end,
        })
    }
}

#[cfg(test)]
mod tests;
