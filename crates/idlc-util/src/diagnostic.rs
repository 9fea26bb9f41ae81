//! Diagnostic accumulation for a single compilation.
//!
//! Every stage reports problems into a shared [`Handler`] instead of
//! aborting; the driver inspects the handler after each stage. A compilation
//! succeeds iff the handler holds no error-level diagnostics.

use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Prevents the compilation from producing output.
    Error,
    /// Reported but does not fail the compilation.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// The closed set of error kinds the compiler can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// A byte does not begin any valid token.
    LexUnexpectedChar,
    /// End of input reached inside a string literal.
    LexUnterminatedString,
    /// End of input reached inside a block comment.
    LexUnterminatedComment,
    /// The parser expected one token kind and found another.
    ConsumeNotExpected,
    /// An identifier does not match the identifier pattern.
    InvalidIdentifier,
    /// A multi-word type spelling is malformed (`unsigned` not followed by
    /// `long`/`short`, and similar).
    TypeDeclareCompound,
    /// A non-literal was used as a constant value.
    ConstantBody,
    /// Unbalanced `sequence<...>` wrappers.
    SequenceFormat,
    /// A numeric literal is not representable as a signed 64-bit integer.
    InvalidNumericLiteral,
    /// Two declarations share a name.
    DuplicateDeclaration,
    /// A type component is neither a built-in nor a declared name.
    UndefinedReference,
    /// The declaration dependency graph contains a cycle.
    DependencyCycle,
}

impl ErrorCode {
    /// Stable name used in rendered diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::LexUnexpectedChar => "lex-unexpected-char",
            ErrorCode::LexUnterminatedString => "lex-unterminated-string",
            ErrorCode::LexUnterminatedComment => "lex-unterminated-comment",
            ErrorCode::ConsumeNotExpected => "consume-not-expected",
            ErrorCode::InvalidIdentifier => "invalid-identifier",
            ErrorCode::TypeDeclareCompound => "type-declare-compound",
            ErrorCode::ConstantBody => "constant-body",
            ErrorCode::SequenceFormat => "sequence-format",
            ErrorCode::InvalidNumericLiteral => "invalid-numeric-literal",
            ErrorCode::DuplicateDeclaration => "duplicate-declaration",
            ErrorCode::UndefinedReference => "undefined-reference",
            ErrorCode::DependencyCycle => "dependency-cycle",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic: severity, optional typed code, message, and an
/// optional `file:line:column` location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub location: Option<String>,
}

impl Diagnostic {
    /// Creates an error diagnostic with a typed code.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            code: Some(code),
            message: message.into(),
            location: None,
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            code: None,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a `file:line:column` location.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

/// Collects the diagnostics of one compilation.
///
/// The handler is shared by reference between the lexer, parser, and AST
/// compiler of a single compilation; interior mutability keeps the reporting
/// API usable from shared borrows.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Records a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Records an error without a location.
    pub fn error(&self, code: ErrorCode, message: impl Into<String>) {
        self.report(Diagnostic::error(code, message));
    }

    /// Records an error at a `file:line:column` location.
    pub fn error_at(&self, code: ErrorCode, message: impl Into<String>, location: impl Into<String>) {
        self.report(Diagnostic::error(code, message).at(location));
    }

    /// Records a warning.
    pub fn warning(&self, message: impl Into<String>) {
        self.report(Diagnostic::warning(message));
    }

    /// Whether any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// A snapshot of all recorded diagnostics, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", Level::Error), "error");
        assert_eq!(format!("{}", Level::Warning), "warning");
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::error(ErrorCode::ConsumeNotExpected, "expected `;`")
            .at("a.idl:3:10");
        assert_eq!(
            format!("{diagnostic}"),
            "error[consume-not-expected]: expected `;` at a.idl:3:10"
        );
    }

    #[test]
    fn test_warning_display_has_no_code() {
        let diagnostic = Diagnostic::warning("doc comment block interrupted");
        assert_eq!(format!("{diagnostic}"), "warning: doc comment block interrupted");
    }

    #[test]
    fn test_handler_starts_clean() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
        assert_eq!(handler.warning_count(), 0);
    }

    #[test]
    fn test_handler_counts() {
        let handler = Handler::new();
        handler.error(ErrorCode::LexUnexpectedChar, "unexpected character `$`");
        handler.warning("something mild");
        handler.error_at(ErrorCode::InvalidIdentifier, "bad name", "a.idl:1:1");
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 2);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.diagnostics().len(), 3);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let handler = Handler::new();
        handler.warning("only a warning");
        assert!(!handler.has_errors());
    }
}
