//! Streaming JSON writer.
//!
//! The writer keeps one piece of state: the current indentation level.
//! Members and array elements announce their position explicitly
//! ([`Position::First`] indents and opens a new line, anything later emits
//! a separator), so the emitted text needs no buffering or back-patching.

use std::fmt::Write as _;

const INDENT: &str = "  ";

/// Whether a member or element is the first inside its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    First,
    Subsequent,
}

/// Accumulates indented JSON text.
pub struct JsonWriter {
    out: String,
    indent_level: usize,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent_level: 0,
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn outdent(&mut self) {
        debug_assert!(self.indent_level > 0);
        self.indent_level -= 1;
    }

    pub fn emit_newline(&mut self) {
        self.out.push('\n');
    }

    pub fn emit_newline_with_indent(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent_level {
            self.out.push_str(INDENT);
        }
    }

    pub fn emit_object_begin(&mut self) {
        self.out.push('{');
    }

    pub fn emit_object_end(&mut self) {
        self.out.push('}');
    }

    pub fn emit_array_begin(&mut self) {
        self.out.push('[');
    }

    pub fn emit_array_end(&mut self) {
        self.out.push(']');
    }

    /// Leading punctuation for a member or element: first entries indent
    /// and open a fresh line, later ones separate with a comma.
    pub fn emit_punctuation(&mut self, position: Position) {
        match position {
            Position::First => {
                self.indent();
                self.emit_newline_with_indent();
            }
            Position::Subsequent => {
                self.out.push(',');
                self.emit_newline_with_indent();
            }
        }
    }

    pub fn emit_object_key(&mut self, key: &str) {
        self.emit_string(key);
        self.out.push_str(": ");
    }

    /// Emits a quoted, escaped JSON string.
    pub fn emit_string(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    pub fn emit_integer(&mut self, value: i64) {
        let _ = write!(self.out, "{value}");
    }

    pub fn emit_boolean(&mut self, value: bool) {
        self.out.push_str(if value { "true" } else { "false" });
    }

    /// `"key": "value"` string member with its leading punctuation.
    pub fn member_string(&mut self, key: &str, value: &str, position: Position) {
        self.emit_punctuation(position);
        self.emit_object_key(key);
        self.emit_string(value);
    }

    /// `"key": 42` integer member.
    pub fn member_integer(&mut self, key: &str, value: i64, position: Position) {
        self.emit_punctuation(position);
        self.emit_object_key(key);
        self.emit_integer(value);
    }

    /// `"key": ["a", "b"]` member holding an array of strings.
    pub fn member_string_array(&mut self, key: &str, values: &[&str], position: Position) {
        self.emit_punctuation(position);
        self.emit_object_key(key);
        let level = self.indent_level;
        self.emit_array_begin();
        for (index, value) in values.iter().enumerate() {
            self.emit_punctuation(if index == 0 {
                Position::First
            } else {
                Position::Subsequent
            });
            self.emit_string(value);
        }
        if self.indent_level > level {
            self.outdent();
            self.emit_newline_with_indent();
        }
        self.emit_array_end();
    }

    pub fn into_string(self) -> String {
        debug_assert_eq!(self.indent_level, 0);
        self.out
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
