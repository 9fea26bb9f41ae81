//! idlc-ast - Name resolution and declaration ordering.
//!
//! Takes the raw AST of one file, registers every top-level declaration in
//! a symbol table, extracts the dependency edges implied by type-constructor
//! components, and produces a deterministic topological order for
//! downstream code generators that require definitions before uses.

pub mod compiled;

pub use compiled::{CompileError, CompiledAst, Declaration};
