//! idlc-json - The JSON artifact emitter.
//!
//! A small streaming writer with explicit indentation state, and a
//! generator that visits the compiled AST to produce the artifact consumed
//! by downstream code generators. Output bytes are emitted in a single
//! forward pass; for a fixed input the artifact is byte-identical across
//! runs.

pub mod generator;
pub mod writer;

pub use generator::JsonGenerator;
pub use writer::{JsonWriter, Position};
