//! Token model: kinds, keyword subkinds, and the token value itself.

use idlc_util::SourceSpan;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// The closed set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    NumericLiteral,
    StringLiteral,
    Comment,
    DocComment,
    Arrow,
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    LeftCurly,
    RightCurly,
    LeftAngle,
    RightAngle,
    At,
    Dot,
    Comma,
    Semicolon,
    Colon,
    Question,
    Equal,
    Ampersand,
    Pipe,
    EndOfFile,
    /// Placeholder kind for tokens that have not been filled in yet.
    NotAToken,
}

impl TokenKind {
    /// Human-readable description, used in diagnostics.
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::NumericLiteral => "numeric literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Comment => "comment",
            TokenKind::DocComment => "doc comment",
            TokenKind::Arrow => "`->`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftSquare => "`[`",
            TokenKind::RightSquare => "`]`",
            TokenKind::LeftCurly => "`{`",
            TokenKind::RightCurly => "`}`",
            TokenKind::LeftAngle => "`<`",
            TokenKind::RightAngle => "`>`",
            TokenKind::At => "`@`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Question => "`?`",
            TokenKind::Equal => "`=`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::EndOfFile => "end of file",
            TokenKind::NotAToken => "nothing",
        }
    }
}

/// Keyword tag carried by identifier tokens whose spelling matches a
/// reserved word. Non-identifier tokens always carry [`TokenSubkind::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSubkind {
    None,
    Module,
    Const,
    Struct,
    Union,
    Enum,
    Interface,
    Switch,
    Case,
    Default,
    Eventtype,
    Value,
    In,
    Out,
    Inout,
    Sequence,
    True,
    False,
    Unsigned,
    Long,
    Short,
    Array,
    Vector,
    String,
    Request,
}

impl TokenSubkind {
    /// The reserved spelling, for diagnostics. `None` has no spelling.
    pub fn spelling(&self) -> &'static str {
        match self {
            TokenSubkind::None => "",
            TokenSubkind::Module => "module",
            TokenSubkind::Const => "const",
            TokenSubkind::Struct => "struct",
            TokenSubkind::Union => "union",
            TokenSubkind::Enum => "enum",
            TokenSubkind::Interface => "interface",
            TokenSubkind::Switch => "switch",
            TokenSubkind::Case => "case",
            TokenSubkind::Default => "default",
            TokenSubkind::Eventtype => "eventtype",
            TokenSubkind::Value => "value",
            TokenSubkind::In => "in",
            TokenSubkind::Out => "out",
            TokenSubkind::Inout => "inout",
            TokenSubkind::Sequence => "sequence",
            TokenSubkind::True => "true",
            TokenSubkind::False => "false",
            TokenSubkind::Unsigned => "unsigned",
            TokenSubkind::Long => "long",
            TokenSubkind::Short => "short",
            TokenSubkind::Array => "array",
            TokenSubkind::Vector => "vector",
            TokenSubkind::String => "string",
            TokenSubkind::Request => "request",
        }
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenSubkind>> = Lazy::new(|| {
    [
        ("module", TokenSubkind::Module),
        ("const", TokenSubkind::Const),
        ("struct", TokenSubkind::Struct),
        ("union", TokenSubkind::Union),
        ("enum", TokenSubkind::Enum),
        ("interface", TokenSubkind::Interface),
        ("switch", TokenSubkind::Switch),
        ("case", TokenSubkind::Case),
        ("default", TokenSubkind::Default),
        ("eventtype", TokenSubkind::Eventtype),
        ("value", TokenSubkind::Value),
        ("in", TokenSubkind::In),
        ("out", TokenSubkind::Out),
        ("inout", TokenSubkind::Inout),
        ("sequence", TokenSubkind::Sequence),
        ("true", TokenSubkind::True),
        ("false", TokenSubkind::False),
        ("unsigned", TokenSubkind::Unsigned),
        ("long", TokenSubkind::Long),
        ("short", TokenSubkind::Short),
        ("array", TokenSubkind::Array),
        ("vector", TokenSubkind::Vector),
        ("string", TokenSubkind::String),
        ("request", TokenSubkind::Request),
    ]
    .into_iter()
    .collect()
});

/// Looks up the keyword subkind for an identifier spelling.
pub fn keyword_subkind(identifier: &str) -> TokenSubkind {
    KEYWORDS
        .get(identifier)
        .copied()
        .unwrap_or(TokenSubkind::None)
}

/// One lexed token.
///
/// `previous_end` covers the gap of whitespace and comments between the end
/// of the previous non-comment token and the start of this one; `span`
/// covers the token text itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    previous_end: SourceSpan<'src>,
    span: SourceSpan<'src>,
    kind: TokenKind,
    subkind: TokenSubkind,
}

impl<'src> Token<'src> {
    /// Creates a token.
    pub fn new(
        previous_end: SourceSpan<'src>,
        span: SourceSpan<'src>,
        kind: TokenKind,
        subkind: TokenSubkind,
    ) -> Self {
        Self {
            previous_end,
            span,
            kind,
            subkind,
        }
    }

    /// A placeholder token with invalid spans.
    pub fn not_a_token() -> Self {
        Self {
            previous_end: SourceSpan::invalid(),
            span: SourceSpan::invalid(),
            kind: TokenKind::NotAToken,
            subkind: TokenSubkind::None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn subkind(&self) -> TokenSubkind {
        self.subkind
    }

    pub fn span(&self) -> SourceSpan<'src> {
        self.span
    }

    /// The gap span preceding this token.
    pub fn previous_end(&self) -> SourceSpan<'src> {
        self.previous_end
    }

    /// Rewrites the gap span; used by the parser to extend gaps back to the
    /// end of the previous syntax node.
    pub fn set_previous_end(&mut self, span: SourceSpan<'src>) {
        self.previous_end = span;
    }

    /// The token text.
    pub fn data(&self) -> &'src str {
        self.span.data()
    }

    /// Whether this is an identifier carrying the given keyword tag.
    pub fn is_keyword(&self, subkind: TokenSubkind) -> bool {
        self.kind == TokenKind::Identifier && self.subkind == subkind
    }
}

impl Default for Token<'_> {
    fn default() -> Self {
        Self::not_a_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_subkind("module"), TokenSubkind::Module);
        assert_eq!(keyword_subkind("eventtype"), TokenSubkind::Eventtype);
        assert_eq!(keyword_subkind("sequence"), TokenSubkind::Sequence);
        assert_eq!(keyword_subkind("unsigned"), TokenSubkind::Unsigned);
    }

    #[test]
    fn test_non_keyword_lookup() {
        assert_eq!(keyword_subkind("Display"), TokenSubkind::None);
        assert_eq!(keyword_subkind("Module"), TokenSubkind::None);
        assert_eq!(keyword_subkind(""), TokenSubkind::None);
    }

    #[test]
    fn test_keyword_spellings_round_trip() {
        for (spelling, subkind) in super::KEYWORDS.iter() {
            assert_eq!(subkind.spelling(), *spelling);
        }
    }

    #[test]
    fn test_not_a_token() {
        let token = Token::not_a_token();
        assert_eq!(token.kind(), TokenKind::NotAToken);
        assert_eq!(token.subkind(), TokenSubkind::None);
        assert!(!token.span().valid());
        assert_eq!(token.data(), "");
    }

    #[test]
    fn test_is_keyword() {
        let file = idlc_util::SourceFile::new("a.idl", "struct");
        let span = SourceSpan::new(0, 6, &file);
        let token = Token::new(
            SourceSpan::new(0, 0, &file),
            span,
            TokenKind::Identifier,
            TokenSubkind::Struct,
        );
        assert!(token.is_keyword(TokenSubkind::Struct));
        assert!(!token.is_keyword(TokenSubkind::Union));
        assert_eq!(token.data(), "struct");
    }
}
