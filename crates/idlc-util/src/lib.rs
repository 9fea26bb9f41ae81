//! idlc-util - Foundation types for the idlc compiler.
//!
//! This crate provides the types shared by every pipeline stage:
//! - `source_file` - Owned source text with lazy line-offset indexing
//! - `span` - Byte ranges tied to their backing [`SourceFile`]
//! - `diagnostic` - Typed, accumulating error and warning reporting
//! - `strings` - Identifier validation and string-literal helpers

pub mod diagnostic;
pub mod source_file;
pub mod span;
pub mod strings;

pub use diagnostic::{Diagnostic, ErrorCode, Handler, Level};
pub use source_file::{Position, SourceFile};
pub use span::SourceSpan;
