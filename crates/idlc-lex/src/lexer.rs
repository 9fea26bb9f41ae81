//! The hand-written lexer.
//!
//! Two byte offsets advance through the source: `token_start` marks where
//! the pending token begins and `current` is the read cursor. `skip`
//! advances both (discarding whitespace), `consume` advances only `current`
//! (growing the pending token). A third offset, `previous_end`, remembers
//! where the last non-comment token ended so each emitted token can carry
//! the gap span preceding it. Comment tokens deliberately leave
//! `previous_end` alone, which folds comment text into the gap before the
//! next real token.

use idlc_util::{ErrorCode, Handler, SourceFile, SourceSpan};

use crate::token::{keyword_subkind, Token, TokenKind, TokenSubkind};

fn is_identifier_body(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Permissive numeric body; validation is deferred to the parser.
fn is_numeric_literal_body(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' | b'x' | b'X' | b'.' | b'_' | b'-')
}

/// Produces the token stream for one source file.
///
/// The lexer does not own the text it operates on; it borrows the
/// [`SourceFile`] and produces tokens whose spans point back into it.
/// [`Lexer::lex`] must not be called again after it has returned an
/// `EndOfFile` token.
pub struct Lexer<'src> {
    source: &'src SourceFile,
    handler: &'src Handler,
    /// Read cursor (byte offset).
    current: usize,
    /// Start of the pending token (byte offset).
    token_start: usize,
    /// End of the last non-comment token (byte offset).
    previous_end: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src SourceFile, handler: &'src Handler) -> Self {
        Self {
            source,
            handler,
            current: 0,
            token_start: 0,
            previous_end: 0,
        }
    }

    fn data(&self) -> &'src str {
        self.source.data()
    }

    /// Byte at the read cursor, or the `0` sentinel at end of input.
    fn peek(&self) -> u8 {
        self.data().as_bytes().get(self.current).copied().unwrap_or(0)
    }

    /// Advances both offsets, discarding the byte under the cursor.
    fn skip(&mut self) {
        self.current += 1;
        self.token_start += 1;
    }

    /// Advances the read cursor, growing the pending token. At end of input
    /// the cursor stays put and the sentinel is returned.
    fn consume(&mut self) -> u8 {
        let byte = self.peek();
        if self.current < self.data().len() {
            self.current += 1;
        }
        byte
    }

    /// Closes the pending token: returns its span and rearms `token_start`.
    /// Comment tokens do not move `previous_end`.
    fn reset(&mut self, kind: TokenKind) -> SourceSpan<'src> {
        let span = SourceSpan::new(self.token_start, self.current, self.source);
        if kind != TokenKind::Comment {
            self.previous_end = self.current;
        }
        self.token_start = self.current;
        span
    }

    fn finish(&mut self, kind: TokenKind) -> Token<'src> {
        debug_assert!(kind != TokenKind::Identifier);
        let previous = SourceSpan::new(self.previous_end, self.token_start, self.source);
        let span = self.reset(kind);
        Token::new(previous, span, kind, TokenSubkind::None)
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\n' | b'\r' | b'\t' => self.skip(),
                _ => return,
            }
        }
    }

    fn pending_position(&self) -> String {
        SourceSpan::new(self.token_start, self.current, self.source).position_str()
    }

    /// Drops rejected bytes from the pending token. They end up covered by
    /// the gap span of the next token, so gap and token spans still tile the
    /// file, and `token_start` can never be left inside a multi-byte
    /// character.
    fn discard_pending(&mut self) {
        self.token_start = self.current;
    }

    fn lex_end_of_stream(&mut self) -> Token<'src> {
        self.finish(TokenKind::EndOfFile)
    }

    fn lex_numeric_literal(&mut self) -> Token<'src> {
        while is_numeric_literal_body(self.peek()) {
            self.consume();
        }
        self.finish(TokenKind::NumericLiteral)
    }

    fn lex_identifier(&mut self) -> Token<'src> {
        while is_identifier_body(self.peek()) {
            self.consume();
        }
        let previous = SourceSpan::new(self.previous_end, self.token_start, self.source);
        let span = self.reset(TokenKind::Identifier);
        let subkind = keyword_subkind(span.data());
        Token::new(previous, span, TokenKind::Identifier, subkind)
    }

    fn lex_string_literal(&mut self) -> Token<'src> {
        let mut last = self.peek();

        // Scan to the next unescaped delimiter. The escape check looks only
        // at the immediately preceding character, so the input `"\\"` is
        // still taken as an escaped quote; a known limitation.
        loop {
            let next = self.consume();
            match next {
                0 => {
                    self.handler.error_at(
                        ErrorCode::LexUnterminatedString,
                        "end of input inside string literal",
                        self.pending_position(),
                    );
                    return self.lex_end_of_stream();
                }
                b'"' if last != b'\\' => return self.finish(TokenKind::StringLiteral),
                _ => last = next,
            }
        }
    }

    fn lex_comment_or_doc_comment(&mut self) -> Token<'src> {
        // Consume the second `/`.
        debug_assert_eq!(self.peek(), b'/');
        self.consume();

        let mut kind = TokenKind::Comment;
        if self.peek() == b'/' {
            kind = TokenKind::DocComment;
            self.consume();
            // Four or more slashes is likely a section break, not
            // documentation.
            if self.peek() == b'/' {
                kind = TokenKind::Comment;
            }
        }

        // Line comment runs to the end of the line or file.
        loop {
            match self.peek() {
                0 | b'\n' => return self.finish(kind),
                _ => {
                    self.consume();
                }
            }
        }
    }

    fn lex_block_comment(&mut self) -> Token<'src> {
        // Consume the `*`.
        debug_assert_eq!(self.peek(), b'*');
        self.consume();

        loop {
            match self.peek() {
                0 => {
                    self.handler.error_at(
                        ErrorCode::LexUnterminatedComment,
                        "end of input inside block comment",
                        self.pending_position(),
                    );
                    return self.finish(TokenKind::Comment);
                }
                b'*' => {
                    self.consume();
                    if self.peek() == b'/' {
                        self.consume();
                        return self.finish(TokenKind::Comment);
                    }
                }
                _ => {
                    self.consume();
                }
            }
        }
    }

    /// Lexes and returns the next token.
    ///
    /// Unknown bytes are reported and skipped without producing a token;
    /// they fall into the gap span of the next token, so gap and token
    /// spans still tile the file exactly.
    pub fn lex(&mut self) -> Token<'src> {
        debug_assert!(
            self.token_start <= self.data().len(),
            "lex() called after end of input"
        );

        loop {
            self.skip_whitespace();

            let consumed = self.consume();
            match consumed {
                0 => return self.lex_end_of_stream(),

                b'-' => {
                    // Maybe the start of an arrow.
                    if self.peek() == b'>' {
                        self.consume();
                        return self.finish(TokenKind::Arrow);
                    }
                    return self.lex_numeric_literal();
                }
                b'0'..=b'9' => return self.lex_numeric_literal(),

                b'a'..=b'z' | b'A'..=b'Z' => return self.lex_identifier(),

                b'"' => return self.lex_string_literal(),

                b'/' => match self.peek() {
                    b'/' => return self.lex_comment_or_doc_comment(),
                    b'*' => return self.lex_block_comment(),
                    other => {
                        self.handler.error_at(
                            ErrorCode::LexUnexpectedChar,
                            format!("`/` not followed by `/` or `*` (found `{}`)", other as char),
                            self.pending_position(),
                        );
                        self.discard_pending();
                        continue;
                    }
                },

                b'(' => return self.finish(TokenKind::LeftParen),
                b')' => return self.finish(TokenKind::RightParen),
                b'[' => return self.finish(TokenKind::LeftSquare),
                b']' => return self.finish(TokenKind::RightSquare),
                b'{' => return self.finish(TokenKind::LeftCurly),
                b'}' => return self.finish(TokenKind::RightCurly),
                b'<' => return self.finish(TokenKind::LeftAngle),
                b'>' => return self.finish(TokenKind::RightAngle),

                b'@' => return self.finish(TokenKind::At),
                b'.' => return self.finish(TokenKind::Dot),
                b',' => return self.finish(TokenKind::Comma),
                b';' => return self.finish(TokenKind::Semicolon),
                b':' => return self.finish(TokenKind::Colon),
                b'?' => return self.finish(TokenKind::Question),
                b'=' => return self.finish(TokenKind::Equal),
                b'&' => return self.finish(TokenKind::Ampersand),
                b'|' => return self.finish(TokenKind::Pipe),

                other => {
                    self.handler.error_at(
                        ErrorCode::LexUnexpectedChar,
                        format!("byte 0x{other:02x} does not begin any token"),
                        self.pending_position(),
                    );
                    self.discard_pending();
                    continue;
                }
            }
        }
    }
}
