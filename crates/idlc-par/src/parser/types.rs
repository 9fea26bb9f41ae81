//! Identifiers, literals, constants, and type constructors.

use std::collections::VecDeque;

use idlc_lex::{TokenKind, TokenSubkind};
use idlc_util::{strings, Diagnostic, ErrorCode};

use crate::ast::{Constant, Identifier, Literal, LiteralKind, TypeConstructor};
use crate::parser::Parser;

impl<'src> Parser<'src> {
    pub(crate) fn parse_identifier(&mut self) -> Option<Identifier<'src>> {
        self.parse_identifier_discarded(false)
    }

    /// `discarded` suppresses gap tracking for identifiers consumed during
    /// lookahead that will not become part of a node.
    pub(crate) fn parse_identifier_discarded(
        &mut self,
        discarded: bool,
    ) -> Option<Identifier<'src>> {
        self.in_scope_suppressed(discarded, |parser, scope| {
            let token = parser.consume_kind(TokenKind::Identifier)?;
            if !strings::is_valid_identifier_component(token.data()) {
                parser.handler.report(
                    Diagnostic::error(
                        ErrorCode::InvalidIdentifier,
                        format!("`{}` is not a valid identifier", token.data()),
                    )
                    .at(token.span().position_str()),
                );
                return None;
            }
            Some(Identifier {
                element: parser.scope_element(scope),
            })
        })
    }

    fn parse_literal_of(&mut self, kind: LiteralKind) -> Option<Literal<'src>> {
        self.in_scope(|parser, scope| {
            match kind {
                LiteralKind::String => parser.consume_kind(TokenKind::StringLiteral)?,
                LiteralKind::Numeric => parser.consume_kind(TokenKind::NumericLiteral)?,
                LiteralKind::True => parser.consume_keyword(TokenSubkind::True)?,
                LiteralKind::False => parser.consume_keyword(TokenSubkind::False)?,
            };
            Some(Literal {
                element: parser.scope_element(scope),
                kind,
            })
        })
    }

    pub(crate) fn parse_numeric_literal(&mut self) -> Option<Literal<'src>> {
        self.parse_literal_of(LiteralKind::Numeric)
    }

    pub(crate) fn parse_literal(&mut self) -> Option<Literal<'src>> {
        let token = self.peek();
        match (token.kind(), token.subkind()) {
            (TokenKind::StringLiteral, _) => self.parse_literal_of(LiteralKind::String),
            (TokenKind::NumericLiteral, _) => self.parse_literal_of(LiteralKind::Numeric),
            (TokenKind::Identifier, TokenSubkind::True) => self.parse_literal_of(LiteralKind::True),
            (TokenKind::Identifier, TokenSubkind::False) => {
                self.parse_literal_of(LiteralKind::False)
            }
            _ => None,
        }
    }

    /// Only literal constants are supported; anything else is a
    /// `ConstantBody` error. Numeric values must fit a signed 64-bit
    /// integer.
    pub(crate) fn parse_constant(&mut self) -> Option<Constant<'src>> {
        let token = self.peek();
        let is_literal = matches!(
            (token.kind(), token.subkind()),
            (TokenKind::StringLiteral, _)
                | (TokenKind::NumericLiteral, _)
                | (TokenKind::Identifier, TokenSubkind::True)
                | (TokenKind::Identifier, TokenSubkind::False)
        );
        if !is_literal {
            self.error_at_lookahead(
                ErrorCode::ConstantBody,
                format!(
                    "only literals may be used as constant values, found {}",
                    self.found_description()
                ),
            );
            return None;
        }
        let literal = self.parse_literal()?;
        if literal.kind == LiteralKind::Numeric {
            self.numeric_value(&literal)?;
        }
        Some(Constant::Literal(literal))
    }

    /// Parses the numeric value of a literal as a signed 64-bit integer.
    /// Decimal and `0x`-prefixed hexadecimal are accepted.
    pub(crate) fn numeric_value(&mut self, literal: &Literal<'src>) -> Option<i64> {
        let text = literal.element.text();
        match strings::parse_numeric_i64(text) {
            Some(value) => Some(value),
            None => {
                self.handler.report(
                    Diagnostic::error(
                        ErrorCode::InvalidNumericLiteral,
                        format!("`{text}` is not a valid signed 64-bit integer"),
                    )
                    .at(literal.element.span().position_str()),
                );
                None
            }
        }
    }

    /// The compound type spellings recognized beyond single identifiers:
    /// `unsigned long long`, `unsigned long`, `unsigned short`, `long long`
    /// and `long`.
    fn parse_single_type(&mut self, components: &mut Vec<Identifier<'src>>) -> Option<()> {
        if self.peek().is_keyword(TokenSubkind::Unsigned) {
            components.push(self.parse_identifier()?);
            if self.peek().is_keyword(TokenSubkind::Long) {
                components.push(self.parse_identifier()?);
                if self.peek().is_keyword(TokenSubkind::Long) {
                    components.push(self.parse_identifier()?);
                }
            } else if self.peek().is_keyword(TokenSubkind::Short) {
                components.push(self.parse_identifier()?);
            } else {
                self.error_at_lookahead(
                    ErrorCode::TypeDeclareCompound,
                    format!(
                        "expected `long` or `short` after `unsigned`, found {}",
                        self.found_description()
                    ),
                );
                return None;
            }
        } else if self.peek().is_keyword(TokenSubkind::Long) {
            components.push(self.parse_identifier()?);
            if self.peek().is_keyword(TokenSubkind::Long) {
                components.push(self.parse_identifier()?);
            }
        } else {
            components.push(self.parse_identifier()?);
        }
        Some(())
    }

    /// `Type := ('sequence' '<')* TypeCore (',' NumLit)? '>'*`
    ///
    /// Sequence sizes are recorded outside-in; `-1` marks an unbounded
    /// wrapper. Mismatched wrapper counts are a `SequenceFormat` error.
    pub(crate) fn parse_type_constructor(&mut self) -> Option<TypeConstructor<'src>> {
        self.in_scope(|parser, scope| {
            let mut components = Vec::new();
            let mut sequence_sizes = VecDeque::new();

            let mut opened = 0usize;
            while parser.peek().is_keyword(TokenSubkind::Sequence) {
                parser.consume_keyword(TokenSubkind::Sequence)?;
                parser.consume_kind(TokenKind::LeftAngle)?;
                opened += 1;
            }

            parser.parse_single_type(&mut components)?;

            let mut closed = 0usize;
            while matches!(
                parser.peek().kind(),
                TokenKind::Comma | TokenKind::RightAngle
            ) {
                if parser.peek().kind() == TokenKind::Comma {
                    parser.consume_kind(TokenKind::Comma)?;
                    let size = parser.parse_numeric_literal()?;
                    let value = parser.numeric_value(&size)?;
                    sequence_sizes.push_front(value);
                } else {
                    sequence_sizes.push_front(-1);
                }
                parser.consume_kind(TokenKind::RightAngle)?;
                closed += 1;
            }

            if opened != closed {
                parser.error_at_lookahead(
                    ErrorCode::SequenceFormat,
                    format!("`sequence<` opened {opened} times but closed {closed} times"),
                );
                return None;
            }

            Some(TypeConstructor {
                element: parser.scope_element(scope),
                components,
                sequence_sizes,
            })
        })
    }
}
