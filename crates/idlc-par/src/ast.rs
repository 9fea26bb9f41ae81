//! Raw AST node definitions.
//!
//! ASTs fresh out of the parser: a tree of nodes corresponding closely to
//! the grammar of a single IDL file. [`File`] is the root and owns the
//! declaration lists; every node embeds a [`SourceElement`] recording its
//! start and end tokens, so the exact source text of any node (including
//! interior whitespace and comments) can be recovered.
//!
//! All spans borrow from the [`idlc_util::SourceFile`] the tokens were lexed
//! from; the file must outlive the tree.

use std::collections::VecDeque;

use idlc_lex::{Token, TokenKind};
use idlc_util::{strings, SourceSpan};

/// Declaration category of a node, carried on the element so the AST
/// compiler can order declarations without downcasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Const,
    Struct,
    Union,
    Enum,
    Interface,
    /// Sub-node that is not a top-level declaration.
    Component,
}

/// Start and end tokens of a syntax node.
///
/// The start token's `previous_end` points at the gap following the previous
/// node, and the end token closes the node's text. A node's span is the
/// closed token interval `[start.span().start, end.span().end)`.
#[derive(Clone, Copy, Debug)]
pub struct SourceElement<'src> {
    pub start: Token<'src>,
    pub end: Token<'src>,
    pub kind: ElementKind,
}

impl<'src> SourceElement<'src> {
    pub fn new(start: Token<'src>, end: Token<'src>) -> Self {
        Self {
            start,
            end,
            kind: ElementKind::Component,
        }
    }

    /// Returns a copy of this element retagged as `kind`.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether both boundary tokens are valid and point into the same file.
    pub fn has_span(&self) -> bool {
        let (start, end) = (self.start.span(), self.end.span());
        match (start.source_file(), end.source_file()) {
            (Some(left), Some(right)) => std::ptr::eq(left, right),
            _ => false,
        }
    }

    /// The span from the start token's first byte to the end token's last
    /// byte; invalid when the boundary tokens are not set.
    pub fn span(&self) -> SourceSpan<'src> {
        if !self.has_span() {
            return SourceSpan::invalid();
        }
        match self.start.span().source_file() {
            Some(file) => SourceSpan::new(self.start.span().start(), self.end.span().end(), file),
            None => SourceSpan::invalid(),
        }
    }

    /// The source text the node covers.
    pub fn text(&self) -> &'src str {
        self.span().data()
    }

    /// Whether the element still carries placeholder boundary tokens.
    pub fn is_placeholder(&self) -> bool {
        self.start.kind() == TokenKind::NotAToken
    }
}

/// Literal values. Only the forms that can appear as constant values are
/// represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Numeric,
    True,
    False,
}

/// A literal token wrapped as a node.
#[derive(Clone, Copy, Debug)]
pub struct Literal<'src> {
    pub element: SourceElement<'src>,
    pub kind: LiteralKind,
}

impl<'src> Literal<'src> {
    /// For string literals: the contents without the surrounding quotes.
    pub fn string_contents(&self) -> &'src str {
        strings::strip_string_literal_quotes(self.element.text()).unwrap_or("")
    }
}

/// A constant value. Only literal-valued constants are supported.
#[derive(Clone, Copy, Debug)]
pub enum Constant<'src> {
    Literal(Literal<'src>),
}

/// A single identifier.
#[derive(Clone, Copy, Debug)]
pub struct Identifier<'src> {
    pub element: SourceElement<'src>,
}

impl<'src> Identifier<'src> {
    pub fn text(&self) -> &'src str {
        self.element.text()
    }
}

/// A dot-separated identifier sequence, as used for module names.
#[derive(Clone, Debug)]
pub struct CompoundIdentifier<'src> {
    pub element: SourceElement<'src>,
    pub components: Vec<Identifier<'src>>,
}

/// The surface syntax of a type: the (possibly multi-word) type spelling
/// plus the sizes of any `sequence<...>` wrappers around it.
///
/// `sequence_sizes` is recorded outside-in: the front entry belongs to the
/// outermost wrapper. `-1` denotes an unbounded sequence.
#[derive(Clone, Debug)]
pub struct TypeConstructor<'src> {
    pub element: SourceElement<'src>,
    pub components: Vec<Identifier<'src>>,
    pub sequence_sizes: VecDeque<i64>,
}

/// `const Type Name = literal;`
#[derive(Clone, Debug)]
pub struct ConstDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub ty: TypeConstructor<'src>,
    pub name: Identifier<'src>,
    pub value: Constant<'src>,
}

/// One `Type name;` field of a struct.
#[derive(Clone, Debug)]
pub struct StructMember<'src> {
    pub element: SourceElement<'src>,
    pub ty: TypeConstructor<'src>,
    pub name: Identifier<'src>,
}

/// `struct Name { members };`
#[derive(Clone, Debug)]
pub struct StructDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub members: Vec<StructMember<'src>>,
}

/// One arm of a union: `case N: Type name;` or `default: Type name;`.
/// `case_value` is `None` for the default arm.
#[derive(Clone, Debug)]
pub struct UnionMember<'src> {
    pub element: SourceElement<'src>,
    pub ty: TypeConstructor<'src>,
    pub name: Identifier<'src>,
    pub case_value: Option<Literal<'src>>,
}

impl UnionMember<'_> {
    pub fn is_default(&self) -> bool {
        self.case_value.is_none()
    }
}

/// `union Name switch (SelectType) { members };`
#[derive(Clone, Debug)]
pub struct UnionDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub members: Vec<UnionMember<'src>>,
    pub select_type: TypeConstructor<'src>,
}

/// One enum member with its resolved value.
#[derive(Clone, Copy, Debug)]
pub struct EnumMember<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub value: i64,
}

/// `enum Name { members };`
#[derive(Clone, Debug)]
pub struct EnumDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub members: Vec<EnumMember<'src>>,
}

/// One method parameter. The `in`/`out`/`inout` direction keyword is
/// accepted by the grammar but not recorded.
#[derive(Clone, Debug)]
pub struct MethodParameter<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub ty: TypeConstructor<'src>,
}

/// One method return type.
#[derive(Clone, Debug)]
pub struct MethodReturn<'src> {
    pub element: SourceElement<'src>,
    pub ty: TypeConstructor<'src>,
}

/// `Return Name(params);` inside an interface.
#[derive(Clone, Debug)]
pub struct MethodDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub returns: Vec<MethodReturn<'src>>,
    pub parameters: Vec<MethodParameter<'src>>,
}

/// One `attribute Type name;` member of an event type.
#[derive(Clone, Debug)]
pub struct EventMember<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub attribute: Identifier<'src>,
    pub ty: TypeConstructor<'src>,
}

/// `eventtype Name { members };` inside an interface.
#[derive(Clone, Debug)]
pub struct EventDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub members: Vec<EventMember<'src>>,
}

/// `interface Name { methods and events };`, introduced by an `@attribute`.
#[derive(Clone, Debug)]
pub struct InterfaceDeclaration<'src> {
    pub element: SourceElement<'src>,
    pub name: Identifier<'src>,
    pub attribute: Identifier<'src>,
    pub methods: Vec<MethodDeclaration<'src>>,
    pub events: Vec<EventDeclaration<'src>>,
}

/// The root of the tree for one source file.
///
/// Declaration lists preserve source order. `tokens` is the ordered list of
/// every token in the file, comments included; the `end` token's
/// `previous_end` covers any trailing whitespace or comment text not owned
/// by a node.
#[derive(Clone, Debug)]
pub struct File<'src> {
    pub element: SourceElement<'src>,
    pub module_name: Option<CompoundIdentifier<'src>>,
    pub const_declarations: Vec<ConstDeclaration<'src>>,
    pub struct_declarations: Vec<StructDeclaration<'src>>,
    pub union_declarations: Vec<UnionDeclaration<'src>>,
    pub enum_declarations: Vec<EnumDeclaration<'src>>,
    pub interface_declarations: Vec<InterfaceDeclaration<'src>>,
    pub tokens: Vec<Token<'src>>,
    pub end: Token<'src>,
}
