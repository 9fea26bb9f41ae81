//! Interface declarations: methods and event types.

use idlc_lex::{TokenKind, TokenSubkind};
use idlc_util::ErrorCode;

use crate::ast::{
    ElementKind, EventDeclaration, EventMember, Identifier, InterfaceDeclaration,
    MethodDeclaration, MethodParameter, MethodReturn,
};
use crate::parser::{Parser, Scope};

impl<'src> Parser<'src> {
    /// `Param := ('in'|'out'|'inout')? Type Ident`, comma-separated up to
    /// the closing `)`. The direction keyword is accepted and dropped.
    fn parse_method_parameters(&mut self) -> Option<Vec<MethodParameter<'src>>> {
        let mut parameters = Vec::new();

        while self.peek().kind() != TokenKind::RightParen {
            let parameter = self.in_scope(|parser, scope| {
                if matches!(
                    parser.peek().subkind(),
                    TokenSubkind::In | TokenSubkind::Out | TokenSubkind::Inout
                ) {
                    parser.consume_kind(TokenKind::Identifier)?;
                }
                let ty = parser.parse_type_constructor()?;
                let name = parser.parse_identifier()?;
                if parser.peek().kind() != TokenKind::RightParen {
                    parser.consume_kind(TokenKind::Comma)?;
                }
                Some(MethodParameter {
                    element: parser.scope_element(scope),
                    name,
                    ty,
                })
            })?;
            parameters.push(parameter);
        }
        Some(parameters)
    }

    /// `MethodDecl := Type Ident '(' Param (',' Param)* ')' ';'`
    ///
    /// Return types and the method name are parsed uniformly as a list of
    /// type constructors until `(` is reached; the last slot must be a
    /// single identifier and is peeled off as the method name. Zero returns
    /// means the name occupies the only slot.
    fn parse_interface_method(&mut self) -> Option<MethodDeclaration<'src>> {
        self.in_scope(|parser, scope| {
            let mut returns_and_name: Vec<MethodReturn<'src>> = Vec::new();
            while parser.peek().kind() != TokenKind::LeftParen {
                let slot = parser.in_scope(|parser, scope| {
                    let ty = parser.parse_type_constructor()?;
                    Some(MethodReturn {
                        element: parser.scope_element(scope),
                        ty,
                    })
                })?;
                returns_and_name.push(slot);
            }

            let name_slot = match returns_and_name.pop() {
                Some(slot) => slot,
                None => {
                    parser.error_at_lookahead(
                        ErrorCode::ConsumeNotExpected,
                        "method must have a name before `(`",
                    );
                    return None;
                }
            };

            if name_slot.ty.components.len() != 1 {
                parser.error_at_lookahead(
                    ErrorCode::ConsumeNotExpected,
                    "method name must be a single identifier",
                );
                return None;
            }
            let name: Identifier<'src> = name_slot.ty.components.into_iter().next()?;

            parser.consume_kind(TokenKind::LeftParen)?;
            let parameters = parser.parse_method_parameters()?;
            parser.consume_kind(TokenKind::RightParen)?;
            parser.consume_kind(TokenKind::Semicolon)?;

            Some(MethodDeclaration {
                element: parser.scope_element(scope),
                name,
                returns: returns_and_name,
                parameters,
            })
        })
    }

    /// `Ident Type Ident ';'` — attribute, type, then member name.
    fn parse_event_members(&mut self) -> Option<Vec<EventMember<'src>>> {
        let mut members = Vec::new();

        while self.peek().kind() != TokenKind::RightCurly {
            let member = self.in_scope(|parser, scope| {
                let attribute = parser.parse_identifier()?;
                let ty = parser.parse_type_constructor()?;
                let name = parser.parse_identifier()?;
                parser.consume_kind(TokenKind::Semicolon)?;
                Some(EventMember {
                    element: parser.scope_element(scope),
                    name,
                    attribute,
                    ty,
                })
            })?;
            members.push(member);
        }
        Some(members)
    }

    /// `EventDecl := 'eventtype' Ident '{' EventMember* '}' ';'`
    fn parse_interface_event(&mut self) -> Option<EventDeclaration<'src>> {
        self.in_scope(|parser, scope| {
            parser.consume_keyword(TokenSubkind::Eventtype)?;
            let name = parser.parse_identifier()?;
            parser.consume_kind(TokenKind::LeftCurly)?;
            let members = parser.parse_event_members()?;
            parser.consume_kind(TokenKind::RightCurly)?;
            parser.consume_kind(TokenKind::Semicolon)?;

            Some(EventDeclaration {
                element: parser.scope_element(scope),
                name,
                members,
            })
        })
    }

    /// `AttrInterfaceDecl := '@' Ident 'interface' Ident '{' ... '}' ';'`
    ///
    /// The attribute is consumed by the file loop before this production
    /// runs. An interface without one is an error, but the body is still
    /// parsed so the file loop always moves past the `interface` keyword.
    pub(crate) fn parse_interface_declaration(
        &mut self,
        scope: &Scope,
        attribute: Option<Identifier<'src>>,
    ) -> Option<InterfaceDeclaration<'src>> {
        if attribute.is_none() {
            self.error_at_lookahead(
                ErrorCode::ConsumeNotExpected,
                "interface declaration requires a preceding `@attribute`",
            );
        }

        let mut methods = Vec::new();
        let mut events = Vec::new();

        self.consume_keyword(TokenSubkind::Interface)?;
        let name = self.parse_identifier()?;
        self.consume_kind(TokenKind::LeftCurly)?;

        while self.peek().kind() != TokenKind::RightCurly {
            if self.peek().is_keyword(TokenSubkind::Eventtype) {
                events.push(self.parse_interface_event()?);
            } else {
                methods.push(self.parse_interface_method()?);
            }
        }

        self.consume_kind(TokenKind::RightCurly)?;
        self.consume_kind(TokenKind::Semicolon)?;

        let attribute = attribute?;

        Some(InterfaceDeclaration {
            element: self.scope_element(scope).with_kind(ElementKind::Interface),
            name,
            attribute,
            methods,
            events,
        })
    }
}
