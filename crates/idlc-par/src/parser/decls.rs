//! Module name, const, struct, union and enum declarations.

use idlc_lex::{TokenKind, TokenSubkind};
use idlc_util::{Diagnostic, ErrorCode};

use crate::ast::{
    CompoundIdentifier, ConstDeclaration, ElementKind, EnumDeclaration, EnumMember, Literal,
    StructDeclaration, StructMember, UnionDeclaration, UnionMember,
};
use crate::parser::{Parser, Scope};

impl<'src> Parser<'src> {
    /// `'module' Ident ('.' Ident)* '{'`
    ///
    /// The matching `}` is consumed by the file loop.
    pub(crate) fn parse_module_name(
        &mut self,
        scope: &Scope,
    ) -> Option<CompoundIdentifier<'src>> {
        let mut components = Vec::new();

        self.consume_keyword(TokenSubkind::Module)?;
        loop {
            components.push(self.parse_identifier()?);
            if self.peek().kind() == TokenKind::Dot {
                self.consume_kind(TokenKind::Dot)?;
                continue;
            }
            break;
        }
        self.consume_kind(TokenKind::LeftCurly)?;

        Some(CompoundIdentifier {
            element: self.scope_element(scope),
            components,
        })
    }

    /// `'const' Type Ident '=' Literal ';'`
    pub(crate) fn parse_const_declaration(
        &mut self,
        scope: &Scope,
    ) -> Option<ConstDeclaration<'src>> {
        self.consume_keyword(TokenSubkind::Const)?;
        let ty = self.parse_type_constructor()?;
        let name = self.parse_identifier()?;
        self.consume_kind(TokenKind::Equal)?;
        let value = self.parse_constant()?;
        self.consume_kind(TokenKind::Semicolon)?;

        Some(ConstDeclaration {
            element: self.scope_element(scope).with_kind(ElementKind::Const),
            ty,
            name,
            value,
        })
    }

    fn parse_struct_members(&mut self) -> Option<Vec<StructMember<'src>>> {
        let mut members = Vec::new();
        while self.peek().kind() != TokenKind::RightCurly {
            let member = self.in_scope(|parser, scope| {
                let ty = parser.parse_type_constructor()?;
                let name = parser.parse_identifier()?;
                parser.consume_kind(TokenKind::Semicolon)?;
                Some(StructMember {
                    element: parser.scope_element(scope),
                    ty,
                    name,
                })
            })?;
            members.push(member);
        }
        Some(members)
    }

    /// `'struct' Ident '{' (Type Ident ';')* '}' ';'`
    pub(crate) fn parse_struct_declaration(
        &mut self,
        scope: &Scope,
    ) -> Option<StructDeclaration<'src>> {
        self.consume_keyword(TokenSubkind::Struct)?;
        let name = self.parse_identifier()?;
        self.consume_kind(TokenKind::LeftCurly)?;
        let members = self.parse_struct_members()?;
        self.consume_kind(TokenKind::RightCurly)?;
        self.consume_kind(TokenKind::Semicolon)?;

        Some(StructDeclaration {
            element: self.scope_element(scope).with_kind(ElementKind::Struct),
            name,
            members,
        })
    }

    /// `('case' NumLit | 'default') ':' Type Ident ';'` — `case_value` is
    /// `None` for the default arm.
    fn parse_union_member_body(
        &mut self,
        scope: &Scope,
        case_value: Option<Literal<'src>>,
    ) -> Option<UnionMember<'src>> {
        self.consume_kind(TokenKind::Colon)?;
        let ty = self.parse_type_constructor()?;
        let name = self.parse_identifier()?;
        self.consume_kind(TokenKind::Semicolon)?;

        Some(UnionMember {
            element: self.scope_element(scope),
            ty,
            name,
            case_value,
        })
    }

    fn parse_union_members(&mut self) -> Option<Vec<UnionMember<'src>>> {
        let mut members = Vec::new();
        loop {
            match (self.peek().kind(), self.peek().subkind()) {
                (TokenKind::RightCurly, _) => return Some(members),

                (TokenKind::Identifier, TokenSubkind::Case) => {
                    let member = self.in_scope(|parser, scope| {
                        parser.consume_keyword(TokenSubkind::Case)?;
                        let case_value = parser.parse_numeric_literal()?;
                        parser.numeric_value(&case_value)?;
                        parser.parse_union_member_body(scope, Some(case_value))
                    })?;
                    members.push(member);
                }

                (TokenKind::Identifier, TokenSubkind::Default) => {
                    let member = self.in_scope(|parser, scope| {
                        parser.consume_keyword(TokenSubkind::Default)?;
                        parser.parse_union_member_body(scope, None)
                    })?;
                    members.push(member);
                }

                // Anything else ends the member list; the enclosing `}`
                // consume reports the stray token.
                _ => return Some(members),
            }
        }
    }

    /// `'union' Ident 'switch' '(' Type ')' '{' UnionCase* '}' ';'`
    pub(crate) fn parse_union_declaration(
        &mut self,
        scope: &Scope,
    ) -> Option<UnionDeclaration<'src>> {
        self.consume_keyword(TokenSubkind::Union)?;
        let name = self.parse_identifier()?;
        self.consume_keyword(TokenSubkind::Switch)?;
        self.consume_kind(TokenKind::LeftParen)?;
        let select_type = self.parse_type_constructor()?;
        self.consume_kind(TokenKind::RightParen)?;
        self.consume_kind(TokenKind::LeftCurly)?;
        let members = self.parse_union_members()?;
        self.consume_kind(TokenKind::RightCurly)?;
        self.consume_kind(TokenKind::Semicolon)?;

        Some(UnionDeclaration {
            element: self.scope_element(scope).with_kind(ElementKind::Union),
            name,
            members,
            select_type,
        })
    }

    /// `'@' 'value' '(' NumLit ')'` before an enum member name.
    fn parse_enum_member_value(&mut self) -> Option<i64> {
        self.consume_kind(TokenKind::At)?;
        self.consume_keyword(TokenSubkind::Value)?;
        self.consume_kind(TokenKind::LeftParen)?;
        let literal = self.parse_numeric_literal()?;
        self.consume_kind(TokenKind::RightParen)?;
        self.numeric_value(&literal)
    }

    /// Members take `previous + 1` unless pinned with `@value(N)`; the
    /// baseline is 0, so the first implicit member is 1. Comma is a
    /// separator and one trailing comma before `}` is allowed.
    fn parse_enum_members(&mut self) -> Option<Vec<EnumMember<'src>>> {
        let mut members = Vec::new();
        let mut value: i64 = 0;

        loop {
            if self.peek().kind() == TokenKind::RightCurly {
                return Some(members);
            }

            let member = self.in_scope(|parser, scope| {
                let pinned = if parser.peek().kind() == TokenKind::At {
                    Some(parser.parse_enum_member_value()?)
                } else {
                    None
                };
                let name = parser.parse_identifier()?;
                let member_value = match pinned {
                    Some(pinned) => pinned,
                    None => match value.checked_add(1) {
                        Some(next) => next,
                        None => {
                            parser.handler.report(
                                Diagnostic::error(
                                    ErrorCode::InvalidNumericLiteral,
                                    "implicit enum member value overflows a signed 64-bit integer",
                                )
                                .at(name.element.span().position_str()),
                            );
                            return None;
                        }
                    },
                };
                Some(EnumMember {
                    element: parser.scope_element(scope),
                    name,
                    value: member_value,
                })
            })?;
            value = member.value;
            members.push(member);

            if self.peek().kind() == TokenKind::Comma {
                self.consume_kind(TokenKind::Comma)?;
            } else if self.peek().kind() != TokenKind::RightCurly {
                self.error_at_lookahead(
                    ErrorCode::ConsumeNotExpected,
                    format!(
                        "expected `,` or `}}` after enum member, found {}",
                        self.found_description()
                    ),
                );
                return None;
            }
        }
    }

    /// `'enum' Ident '{' EnumMember (',' EnumMember)* ','? '}' ';'`
    pub(crate) fn parse_enum_declaration(
        &mut self,
        scope: &Scope,
    ) -> Option<EnumDeclaration<'src>> {
        self.consume_keyword(TokenSubkind::Enum)?;
        let name = self.parse_identifier()?;
        self.consume_kind(TokenKind::LeftCurly)?;
        let members = self.parse_enum_members()?;
        self.consume_kind(TokenKind::RightCurly)?;
        self.consume_kind(TokenKind::Semicolon)?;

        Some(EnumDeclaration {
            element: self.scope_element(scope).with_kind(ElementKind::Enum),
            name,
            members,
        })
    }
}
