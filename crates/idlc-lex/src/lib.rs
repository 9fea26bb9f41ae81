//! idlc-lex - Lexical analysis for the IDL compiler.
//!
//! The lexer turns the bytes of one [`idlc_util::SourceFile`] into a stream
//! of [`Token`]s. Every token carries two spans: the token text itself, and
//! the "gap" of whitespace and comments immediately preceding it. Together
//! the gaps and the non-comment token spans tile the source file exactly,
//! which lets later stages reconstruct formatting and compute the outer span
//! of any syntax node.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{keyword_subkind, Token, TokenKind, TokenSubkind};
