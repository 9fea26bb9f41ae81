//! idlc-par - Recursive-descent parser for the IDL grammar.
//!
//! The parser consumes the token stream of one source file and produces an
//! owned [`ast::File`]. Syntax errors are recorded on the shared diagnostic
//! handler; the driver keeps parsing past them to maximize diagnostic
//! coverage, and the overall parse succeeds only when no error was recorded.

pub mod ast;
pub mod parser;

pub use parser::Parser;
