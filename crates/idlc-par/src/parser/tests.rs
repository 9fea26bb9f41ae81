use idlc_lex::{Lexer, TokenKind};
use idlc_util::{ErrorCode, Handler, SourceFile};

use crate::ast::{Constant, File, LiteralKind};
use crate::parser::Parser;

fn parse<'src>(file: &'src SourceFile, handler: &'src Handler) -> Option<File<'src>> {
    Parser::new(Lexer::new(file, handler), handler).parse()
}

fn parse_ok<'src>(file: &'src SourceFile, handler: &'src Handler) -> File<'src> {
    let ast = parse(file, handler).expect("file structure should parse");
    let errors: Vec<String> = handler
        .diagnostics()
        .iter()
        .map(|d| d.to_string())
        .collect();
    assert!(!handler.has_errors(), "unexpected errors: {errors:?}");
    ast
}

fn recorded_codes(handler: &Handler) -> Vec<ErrorCode> {
    handler
        .diagnostics()
        .iter()
        .filter_map(|d| d.code)
        .collect()
}

#[test]
fn test_empty_module() {
    let file = SourceFile::new("a.idl", "module foo { };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let module = ast.module_name.expect("module name");
    let components: Vec<&str> = module.components.iter().map(|c| c.text()).collect();
    assert_eq!(components, vec!["foo"]);
    assert!(ast.const_declarations.is_empty());
    assert!(ast.struct_declarations.is_empty());
    assert!(ast.union_declarations.is_empty());
    assert!(ast.enum_declarations.is_empty());
    assert!(ast.interface_declarations.is_empty());
}

#[test]
fn test_dotted_module_name() {
    let file = SourceFile::new("a.idl", "module com.example.gfx { };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let module = ast.module_name.expect("module name");
    let components: Vec<&str> = module.components.iter().map(|c| c.text()).collect();
    assert_eq!(components, vec!["com", "example", "gfx"]);
}

#[test]
fn test_const_declaration() {
    let file = SourceFile::new("a.idl", "module m { const long X = 7; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    assert_eq!(ast.const_declarations.len(), 1);
    let decl = &ast.const_declarations[0];
    assert_eq!(decl.name.text(), "X");
    let type_names: Vec<&str> = decl.ty.components.iter().map(|c| c.text()).collect();
    assert_eq!(type_names, vec!["long"]);
    let Constant::Literal(literal) = &decl.value;
    assert_eq!(literal.kind, LiteralKind::Numeric);
    assert_eq!(literal.element.text(), "7");
}

#[test]
fn test_const_string_and_bool() {
    let file = SourceFile::new(
        "a.idl",
        "module m { const string NAME = \"gfx\"; const boolean ON = true; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    assert_eq!(ast.const_declarations.len(), 2);
    let Constant::Literal(name) = &ast.const_declarations[0].value;
    assert_eq!(name.kind, LiteralKind::String);
    assert_eq!(name.string_contents(), "gfx");
    let Constant::Literal(on) = &ast.const_declarations[1].value;
    assert_eq!(on.kind, LiteralKind::True);
}

#[test]
fn test_multi_word_type_spellings() {
    let file = SourceFile::new(
        "a.idl",
        "module m { struct S { unsigned long long a; unsigned short b; long long c; long d; }; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let members = &ast.struct_declarations[0].members;
    let spellings: Vec<Vec<&str>> = members
        .iter()
        .map(|m| m.ty.components.iter().map(|c| c.text()).collect())
        .collect();
    assert_eq!(
        spellings,
        vec![
            vec!["unsigned", "long", "long"],
            vec!["unsigned", "short"],
            vec!["long", "long"],
            vec!["long"],
        ]
    );
}

#[test]
fn test_enum_member_values() {
    let file = SourceFile::new("a.idl", "module m { enum E { A, B, @value(10) C, D }; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let members = &ast.enum_declarations[0].members;
    let values: Vec<i64> = members.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![1, 2, 10, 11]);
    let names: Vec<&str> = members.iter().map(|m| m.name.text()).collect();
    assert_eq!(names, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_enum_value_at_start() {
    let file = SourceFile::new("a.idl", "module m { enum E { @value(5) A, B, C }; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let values: Vec<i64> = ast.enum_declarations[0].members.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![5, 6, 7]);
}

#[test]
fn test_enum_trailing_comma() {
    let file = SourceFile::new("a.idl", "module m { enum E { A, B, }; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);
    assert_eq!(ast.enum_declarations[0].members.len(), 2);
}

#[test]
fn test_enum_double_comma_is_error() {
    let file = SourceFile::new("a.idl", "module m { enum E { A,, B }; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(handler.has_errors());
    assert!(recorded_codes(&handler).contains(&ErrorCode::ConsumeNotExpected));
}

#[test]
fn test_union_declaration() {
    let file = SourceFile::new(
        "a.idl",
        "module m { union U switch (long) { case 1: long a; default: string b; }; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let union_decl = &ast.union_declarations[0];
    assert_eq!(union_decl.name.text(), "U");
    let select: Vec<&str> = union_decl.select_type.components.iter().map(|c| c.text()).collect();
    assert_eq!(select, vec!["long"]);

    assert_eq!(union_decl.members.len(), 2);
    let case = &union_decl.members[0];
    assert!(!case.is_default());
    assert_eq!(case.case_value.map(|v| v.element.text()), Some("1"));
    assert_eq!(case.name.text(), "a");
    let default = &union_decl.members[1];
    assert!(default.is_default());
    assert_eq!(default.name.text(), "b");
}

#[test]
fn test_interface_with_method_and_event() {
    let file = SourceFile::new(
        "a.idl",
        "module m { @Svc interface I { long foo(in long a, out string b); eventtype Ev { attr long v; }; }; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let interface = &ast.interface_declarations[0];
    assert_eq!(interface.name.text(), "I");
    assert_eq!(interface.attribute.text(), "Svc");

    assert_eq!(interface.methods.len(), 1);
    let method = &interface.methods[0];
    assert_eq!(method.name.text(), "foo");
    assert_eq!(method.returns.len(), 1);
    let ret: Vec<&str> = method.returns[0].ty.components.iter().map(|c| c.text()).collect();
    assert_eq!(ret, vec!["long"]);
    assert_eq!(method.parameters.len(), 2);
    assert_eq!(method.parameters[0].name.text(), "a");
    assert_eq!(method.parameters[1].name.text(), "b");

    assert_eq!(interface.events.len(), 1);
    let event = &interface.events[0];
    assert_eq!(event.name.text(), "Ev");
    assert_eq!(event.members.len(), 1);
    assert_eq!(event.members[0].attribute.text(), "attr");
    assert_eq!(event.members[0].name.text(), "v");
}

#[test]
fn test_method_with_zero_returns() {
    let file = SourceFile::new("a.idl", "module m { @A interface I { ping(); }; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let method = &ast.interface_declarations[0].methods[0];
    assert_eq!(method.name.text(), "ping");
    assert!(method.returns.is_empty());
    assert!(method.parameters.is_empty());
}

#[test]
fn test_method_name_must_be_single_identifier() {
    let file = SourceFile::new("a.idl", "module m { @A interface I { unsigned long(in long a); }; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(handler.has_errors());
}

#[test]
fn test_interface_requires_attribute() {
    let file = SourceFile::new("a.idl", "module m { interface I { }; };");
    let handler = Handler::new();
    let ast = parse(&file, &handler).expect("file structure should survive");
    assert!(handler.has_errors());
    assert!(ast.interface_declarations.is_empty());
}

#[test]
fn test_interface_without_attribute_keeps_later_declarations() {
    let file = SourceFile::new(
        "a.idl",
        "module m { interface I { }; const long X = 1; };",
    );
    let handler = Handler::new();
    let ast = parse(&file, &handler).expect("file structure should survive");

    assert!(handler.has_errors());
    assert!(ast.interface_declarations.is_empty());
    assert_eq!(ast.const_declarations.len(), 1);
    assert_eq!(ast.const_declarations[0].name.text(), "X");
}

#[test]
fn test_sequence_sizes_outside_in() {
    let file = SourceFile::new(
        "a.idl",
        "module m { struct S { sequence<sequence<uint8,16>,4> frames; sequence<string> names; }; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let members = &ast.struct_declarations[0].members;
    let nested: Vec<i64> = members[0].ty.sequence_sizes.iter().copied().collect();
    assert_eq!(nested, vec![4, 16]);
    let inner: Vec<&str> = members[0].ty.components.iter().map(|c| c.text()).collect();
    assert_eq!(inner, vec!["uint8"]);

    let unbounded: Vec<i64> = members[1].ty.sequence_sizes.iter().copied().collect();
    assert_eq!(unbounded, vec![-1]);
}

#[test]
fn test_sequence_unbalanced_is_error() {
    let file = SourceFile::new("a.idl", "module m { struct S { sequence<long x; }; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::SequenceFormat));
}

#[test]
fn test_missing_semicolon_is_error() {
    let file = SourceFile::new("a.idl", "module m { const long X = 7 };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::ConsumeNotExpected));
}

#[test]
fn test_non_literal_constant_is_error() {
    let file = SourceFile::new("a.idl", "module m { const long X = Y; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::ConstantBody));
}

#[test]
fn test_unsigned_without_width_is_error() {
    let file = SourceFile::new("a.idl", "module m { const unsigned X = 1; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::TypeDeclareCompound));
}

#[test]
fn test_trailing_underscore_identifier_is_error() {
    let file = SourceFile::new("a.idl", "module m { struct S { long x_; }; };");
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::InvalidIdentifier));
}

#[test]
fn test_out_of_range_numeric_is_error() {
    let file = SourceFile::new(
        "a.idl",
        "module m { enum E { @value(99999999999999999999) A }; };",
    );
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::InvalidNumericLiteral));
}

#[test]
fn test_enum_implicit_value_overflow_is_error() {
    let file = SourceFile::new(
        "a.idl",
        "module m { enum E { @value(9223372036854775807) A, B }; };",
    );
    let handler = Handler::new();
    parse(&file, &handler);
    assert!(recorded_codes(&handler).contains(&ErrorCode::InvalidNumericLiteral));
}

#[test]
fn test_hex_enum_value() {
    let file = SourceFile::new("a.idl", "module m { enum E { @value(0x10) A, B }; };");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);
    let values: Vec<i64> = ast.enum_declarations[0].members.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![16, 17]);
}

#[test]
fn test_missing_module_is_error() {
    let file = SourceFile::new("a.idl", "struct S { long x; };");
    let handler = Handler::new();
    let ast = parse(&file, &handler);
    assert!(ast.is_some());
    assert!(handler.has_errors());
}

#[test]
fn test_error_recovery_keeps_later_declarations() {
    let file = SourceFile::new(
        "a.idl",
        "module m { const long = 7; const long Y = 8; };",
    );
    let handler = Handler::new();
    let ast = parse(&file, &handler).expect("file structure should survive");

    assert!(handler.has_errors());
    assert_eq!(ast.const_declarations.len(), 1);
    assert_eq!(ast.const_declarations[0].name.text(), "Y");
}

#[test]
fn test_doc_comment_interrupted_warns() {
    let file = SourceFile::new(
        "a.idl",
        "/// doc\n// plain\n/// resumed\nmodule m { };",
    );
    let handler = Handler::new();
    parse_ok(&file, &handler);
    assert_eq!(handler.warning_count(), 1);
}

#[test]
fn test_uninterrupted_doc_comments_do_not_warn() {
    let file = SourceFile::new("a.idl", "/// one\n/// two\nmodule m { };");
    let handler = Handler::new();
    parse_ok(&file, &handler);
    assert_eq!(handler.warning_count(), 0);
}

#[test]
fn test_node_spans_cover_source_text() {
    let source = "module m { struct Point { long x; long y; }; };";
    let file = SourceFile::new("a.idl", source);
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let decl = &ast.struct_declarations[0];
    assert!(decl.element.has_span());
    assert_eq!(decl.element.text(), "struct Point { long x; long y; };");
    assert_eq!(decl.members[0].element.text(), "long x;");
}

#[test]
fn test_node_span_invariants() {
    let file = SourceFile::new(
        "a.idl",
        "module m { enum E { A }; struct S { sequence<long,4> xs; }; };",
    );
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let mut elements = vec![ast.element];
    for decl in &ast.enum_declarations {
        elements.push(decl.element);
        elements.extend(decl.members.iter().map(|m| m.element));
    }
    for decl in &ast.struct_declarations {
        elements.push(decl.element);
        for member in &decl.members {
            elements.push(member.element);
            elements.push(member.ty.element);
        }
    }

    for element in elements {
        assert!(element.has_span());
        assert!(element.start.span().start() <= element.end.span().end());
    }
}

#[test]
fn test_all_tokens_recorded_in_order() {
    let file = SourceFile::new("a.idl", "module m { // note\n};\n");
    let handler = Handler::new();
    let ast = parse_ok(&file, &handler);

    let kinds: Vec<TokenKind> = ast.tokens.iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::LeftCurly,
            TokenKind::Comment,
            TokenKind::RightCurly,
            TokenKind::Semicolon,
            TokenKind::EndOfFile,
        ]
    );
    let starts: Vec<usize> = ast.tokens.iter().map(|t| t.span().start()).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}
