//! AST-to-JSON generation.
//!
//! Visits the compiled AST once and streams the artifact through
//! [`JsonWriter`]. Field order is fixed: `version`, `module_name`, the five
//! per-category declaration lists in source order, then the topologically
//! sorted `declarations_order`.

use idlc_ast::{CompiledAst, Declaration};
use idlc_par::ast::{
    ConstDeclaration, Constant, EnumDeclaration, EnumMember, EventDeclaration, EventMember,
    InterfaceDeclaration, LiteralKind, MethodDeclaration, MethodParameter, MethodReturn,
    StructDeclaration, StructMember, TypeConstructor, UnionDeclaration, UnionMember,
};
use idlc_util::strings;

use crate::writer::{JsonWriter, Position};

/// Artifact format version.
const VERSION: &str = "0.0.1";

/// Produces the JSON artifact for one compiled file.
pub struct JsonGenerator<'c, 'ast, 'src> {
    writer: JsonWriter,
    compiled: &'c CompiledAst<'ast, 'src>,
}

impl<'c, 'ast, 'src> JsonGenerator<'c, 'ast, 'src> {
    pub fn new(compiled: &'c CompiledAst<'ast, 'src>) -> Self {
        Self {
            writer: JsonWriter::new(),
            compiled,
        }
    }

    /// Generates the whole artifact, ending with a newline.
    pub fn produce(mut self) -> String {
        self.generate_file();
        self.writer.emit_newline();
        self.writer.into_string()
    }

    /// Emits `{ ... }` around `body`, closing the line and outdenting if the
    /// body added members.
    fn object(&mut self, body: impl FnOnce(&mut Self)) {
        let level = self.writer.indent_level();
        self.writer.emit_object_begin();
        body(self);
        if self.writer.indent_level() > level {
            self.writer.outdent();
            self.writer.emit_newline_with_indent();
        }
        self.writer.emit_object_end();
    }

    /// Emits `"key": <value>` where `value` is produced by `body`.
    fn member_node(&mut self, key: &str, position: Position, body: impl FnOnce(&mut Self)) {
        self.writer.emit_punctuation(position);
        self.writer.emit_object_key(key);
        body(self);
    }

    /// Emits `"key": [ ... ]` with one `emit` call per item.
    fn member_list<T>(
        &mut self,
        key: &str,
        items: &[T],
        position: Position,
        emit: impl Fn(&mut Self, &T),
    ) {
        self.writer.emit_punctuation(position);
        self.writer.emit_object_key(key);
        let level = self.writer.indent_level();
        self.writer.emit_array_begin();
        for (index, item) in items.iter().enumerate() {
            self.writer.emit_punctuation(if index == 0 {
                Position::First
            } else {
                Position::Subsequent
            });
            emit(self, item);
        }
        if self.writer.indent_level() > level {
            self.writer.outdent();
            self.writer.emit_newline_with_indent();
        }
        self.writer.emit_array_end();
    }

    fn generate_file(&mut self) {
        let file = self.compiled.file();
        let order = self.compiled.declaration_order();

        self.object(|gen| {
            gen.writer.member_string("version", VERSION, Position::First);

            let module: Vec<&str> = file
                .module_name
                .as_ref()
                .map(|name| name.components.iter().map(|c| c.text()).collect())
                .unwrap_or_default();
            gen.writer
                .member_string_array("module_name", &module, Position::Subsequent);

            gen.member_list(
                "const_declarations",
                &file.const_declarations,
                Position::Subsequent,
                Self::generate_const_declaration,
            );
            gen.member_list(
                "enum_declarations",
                &file.enum_declarations,
                Position::Subsequent,
                Self::generate_enum_declaration,
            );
            gen.member_list(
                "struct_declarations",
                &file.struct_declarations,
                Position::Subsequent,
                Self::generate_struct_declaration,
            );
            gen.member_list(
                "union_declarations",
                &file.union_declarations,
                Position::Subsequent,
                Self::generate_union_declaration,
            );
            gen.member_list(
                "interface_declarations",
                &file.interface_declarations,
                Position::Subsequent,
                Self::generate_interface_declaration,
            );
            gen.member_list(
                "declarations_order",
                order,
                Position::Subsequent,
                Self::generate_order_entry,
            );
        });
    }

    /// Nested `type_name` objects, one level per recorded sequence size;
    /// the innermost level carries the component list. With no sequence
    /// wrappers there is a single level and no `sequence_size` field.
    fn generate_type_name(&mut self, index: usize, ty: &TypeConstructor<'src>) {
        let sizes = &ty.sequence_sizes;
        if sizes.is_empty() || index + 1 >= sizes.len() {
            let components: Vec<&str> = ty.components.iter().map(|c| c.text()).collect();
            self.writer
                .member_string_array("type_name", &components, Position::First);
            if let Some(&size) = sizes.get(index) {
                self.writer
                    .member_integer("sequence_size", size, Position::Subsequent);
            }
            return;
        }

        self.writer.emit_punctuation(Position::First);
        self.writer.emit_object_key("type_name");
        self.object(|gen| gen.generate_type_name(index + 1, ty));
        self.writer
            .member_integer("sequence_size", sizes[index], Position::Subsequent);
    }

    fn generate_type(&mut self, ty: &TypeConstructor<'src>) {
        self.object(|gen| gen.generate_type_name(0, ty));
    }

    fn generate_constant(&mut self, constant: &Constant<'src>) {
        let Constant::Literal(literal) = constant;
        match literal.kind {
            LiteralKind::True => self.writer.emit_boolean(true),
            LiteralKind::False => self.writer.emit_boolean(false),
            LiteralKind::String => self.writer.emit_string(literal.string_contents()),
            LiteralKind::Numeric => {
                // Validated during parsing.
                let value =
                    strings::parse_numeric_i64(literal.element.text()).unwrap_or_default();
                self.writer.emit_integer(value);
            }
        }
    }

    fn generate_const_declaration(&mut self, decl: &ConstDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", decl.name.text(), Position::First);
            gen.member_node("type", Position::Subsequent, |gen| {
                gen.generate_type(&decl.ty)
            });
            gen.member_node("value", Position::Subsequent, |gen| {
                gen.generate_constant(&decl.value)
            });
        });
    }

    fn generate_enum_member(&mut self, member: &EnumMember<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", member.name.text(), Position::First);
            gen.writer
                .member_integer("value", member.value, Position::Subsequent);
        });
    }

    fn generate_enum_declaration(&mut self, decl: &EnumDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", decl.name.text(), Position::First);
            gen.member_list(
                "members",
                &decl.members,
                Position::Subsequent,
                Self::generate_enum_member,
            );
        });
    }

    fn generate_struct_member(&mut self, member: &StructMember<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", member.name.text(), Position::First);
            gen.member_node("type", Position::Subsequent, |gen| {
                gen.generate_type(&member.ty)
            });
        });
    }

    fn generate_struct_declaration(&mut self, decl: &StructDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", decl.name.text(), Position::First);
            gen.member_list(
                "members",
                &decl.members,
                Position::Subsequent,
                Self::generate_struct_member,
            );
        });
    }

    /// `case_value` is omitted for the default arm.
    fn generate_union_member(&mut self, member: &UnionMember<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", member.name.text(), Position::First);
            if let Some(case_value) = &member.case_value {
                let value =
                    strings::parse_numeric_i64(case_value.element.text()).unwrap_or_default();
                gen.writer
                    .member_integer("case_value", value, Position::Subsequent);
            }
            gen.member_node("type", Position::Subsequent, |gen| {
                gen.generate_type(&member.ty)
            });
        });
    }

    fn generate_union_declaration(&mut self, decl: &UnionDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", decl.name.text(), Position::First);
            let select: Vec<&str> = decl.select_type.components.iter().map(|c| c.text()).collect();
            gen.writer
                .member_string_array("select_type", &select, Position::Subsequent);
            gen.member_list(
                "members",
                &decl.members,
                Position::Subsequent,
                Self::generate_union_member,
            );
        });
    }

    fn generate_method_return(&mut self, ret: &MethodReturn<'src>) {
        self.object(|gen| {
            gen.member_node("type", Position::First, |gen| gen.generate_type(&ret.ty));
        });
    }

    fn generate_method_parameter(&mut self, parameter: &MethodParameter<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", parameter.name.text(), Position::First);
            gen.member_node("type", Position::Subsequent, |gen| {
                gen.generate_type(&parameter.ty)
            });
        });
    }

    fn generate_method(&mut self, method: &MethodDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("method_name", method.name.text(), Position::First);
            gen.member_list(
                "method_return",
                &method.returns,
                Position::Subsequent,
                Self::generate_method_return,
            );
            gen.member_list(
                "method_parameter",
                &method.parameters,
                Position::Subsequent,
                Self::generate_method_parameter,
            );
        });
    }

    fn generate_event_member(&mut self, member: &EventMember<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", member.name.text(), Position::First);
            gen.member_node("type", Position::Subsequent, |gen| {
                gen.generate_type(&member.ty)
            });
            gen.writer
                .member_string("attribute", member.attribute.text(), Position::Subsequent);
        });
    }

    fn generate_event(&mut self, event: &EventDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("event_name", event.name.text(), Position::First);
            gen.member_list(
                "members",
                &event.members,
                Position::Subsequent,
                Self::generate_event_member,
            );
        });
    }

    fn generate_interface_declaration(&mut self, decl: &InterfaceDeclaration<'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", decl.name.text(), Position::First);
            gen.writer
                .member_string("attribute", decl.attribute.text(), Position::Subsequent);
            gen.member_list(
                "method_list",
                &decl.methods,
                Position::Subsequent,
                Self::generate_method,
            );
            gen.member_list(
                "event_list",
                &decl.events,
                Position::Subsequent,
                Self::generate_event,
            );
        });
    }

    fn generate_order_entry(&mut self, declaration: &Declaration<'ast, 'src>) {
        self.object(|gen| {
            gen.writer
                .member_string("name", declaration.name(), Position::First);
            gen.writer
                .member_string("category", declaration.category(), Position::Subsequent);
        });
    }
}
