//! Symbol table, dependency extraction, and topological sort.

use std::collections::{BTreeSet, VecDeque};

use indexmap::IndexMap;
use thiserror::Error;

use idlc_par::ast::{
    ConstDeclaration, EnumDeclaration, File, InterfaceDeclaration, StructDeclaration,
    TypeConstructor, UnionDeclaration,
};
use idlc_util::{Diagnostic, ErrorCode, Handler};

/// Type names that never create declaration dependencies.
const BUILT_IN_TYPES: [&str; 11] = [
    "boolean", "int8", "uint8", "short", "long", "unsigned", "float", "double", "string",
    "sequence", "void",
];

/// A borrowed view of one top-level declaration, tagged by category.
#[derive(Clone, Copy, Debug)]
pub enum Declaration<'ast, 'src> {
    Const(&'ast ConstDeclaration<'src>),
    Struct(&'ast StructDeclaration<'src>),
    Union(&'ast UnionDeclaration<'src>),
    Enum(&'ast EnumDeclaration<'src>),
    Interface(&'ast InterfaceDeclaration<'src>),
}

impl<'ast, 'src> Declaration<'ast, 'src> {
    /// The declared name.
    pub fn name(&self) -> &'src str {
        match *self {
            Declaration::Const(decl) => decl.name.text(),
            Declaration::Struct(decl) => decl.name.text(),
            Declaration::Union(decl) => decl.name.text(),
            Declaration::Enum(decl) => decl.name.text(),
            Declaration::Interface(decl) => decl.name.text(),
        }
    }

    /// The category label used in the JSON artifact.
    pub fn category(&self) -> &'static str {
        match self {
            Declaration::Const(_) => "const",
            Declaration::Struct(_) => "struct",
            Declaration::Union(_) => "union",
            Declaration::Enum(_) => "enum",
            Declaration::Interface(_) => "interface",
        }
    }

    /// Every type constructor appearing in the declaration. Only these are
    /// walked for dependencies; value positions and member names are not.
    /// Enums reference no types at all.
    fn type_constructors(&self) -> Vec<&'ast TypeConstructor<'src>> {
        match *self {
            Declaration::Const(decl) => vec![&decl.ty],
            Declaration::Struct(decl) => decl.members.iter().map(|m| &m.ty).collect(),
            Declaration::Union(decl) => {
                let mut types = vec![&decl.select_type];
                types.extend(decl.members.iter().map(|m| &m.ty));
                types
            }
            Declaration::Enum(_) => Vec::new(),
            Declaration::Interface(decl) => {
                let mut types = Vec::new();
                for method in &decl.methods {
                    types.extend(method.returns.iter().map(|r| &r.ty));
                    types.extend(method.parameters.iter().map(|p| &p.ty));
                }
                for event in &decl.events {
                    types.extend(event.members.iter().map(|m| &m.ty));
                }
                types
            }
        }
    }
}

/// Failures that abort the compile step.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("undefined declaration `{name}` used")]
    UndefinedReference { name: String },
    #[error("declaration dependency graph contains a cycle")]
    DependencyCycle,
}

/// The compiled view of one file: its symbol table and the topological
/// declaration order.
#[derive(Debug)]
pub struct CompiledAst<'ast, 'src> {
    file: &'ast File<'src>,
    declaration_order: Vec<Declaration<'ast, 'src>>,
}

impl<'ast, 'src> CompiledAst<'ast, 'src> {
    /// Registers declarations, extracts dependencies, and topologically
    /// sorts them.
    ///
    /// Duplicate names are reported on `handler` and do not abort; the first
    /// registration wins. Undefined references and dependency cycles abort
    /// with an error, also mirrored on `handler`.
    pub fn compile(file: &'ast File<'src>, handler: &Handler) -> Result<Self, CompileError> {
        let (declarations, names) = Self::register_declarations(file, handler);

        // Edges and degrees per declaration index; `inverse` records, for
        // each declaration, the declarations that depend on it.
        let mut degrees = vec![0u32; declarations.len()];
        let mut inverse: Vec<Vec<usize>> = vec![Vec::new(); declarations.len()];
        for (index, declaration) in declarations.iter().enumerate() {
            let dependencies = Self::declaration_dependencies(declaration, &names, handler)?;
            degrees[index] = dependencies.len() as u32;
            for dependency in dependencies {
                inverse[dependency].push(index);
            }
        }

        // Kahn's algorithm with a FIFO worklist: declarations with no
        // remaining dependencies leave in registration order, which makes
        // the output deterministic and resolves ties by category and then
        // source order.
        let mut worklist: VecDeque<usize> = degrees
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(index, _)| index)
            .collect();

        let mut order = Vec::with_capacity(declarations.len());
        while let Some(index) = worklist.pop_front() {
            order.push(index);
            for &dependent in &inverse[index] {
                degrees[dependent] -= 1;
                if degrees[dependent] == 0 {
                    worklist.push_back(dependent);
                }
            }
        }

        if order.len() != declarations.len() {
            handler.error(
                ErrorCode::DependencyCycle,
                "declarations form a dependency cycle",
            );
            return Err(CompileError::DependencyCycle);
        }

        let declaration_order = order.into_iter().map(|index| declarations[index]).collect();
        Ok(Self {
            file,
            declaration_order,
        })
    }

    /// Builds the symbol table by walking the five declaration lists in
    /// fixed order.
    fn register_declarations(
        file: &'ast File<'src>,
        handler: &Handler,
    ) -> (
        Vec<Declaration<'ast, 'src>>,
        IndexMap<&'src str, usize>,
    ) {
        let mut declarations: Vec<Declaration<'ast, 'src>> = Vec::new();
        let mut names: IndexMap<&'src str, usize> = IndexMap::new();

        let mut register = |declaration: Declaration<'ast, 'src>,
                            declarations: &mut Vec<Declaration<'ast, 'src>>| {
            let name = declaration.name();
            if names.contains_key(name) {
                handler.report(
                    Diagnostic::error(
                        ErrorCode::DuplicateDeclaration,
                        format!("duplicate declaration of `{name}`"),
                    ),
                );
                return;
            }
            names.insert(name, declarations.len());
            declarations.push(declaration);
        };

        for decl in &file.const_declarations {
            register(Declaration::Const(decl), &mut declarations);
        }
        for decl in &file.struct_declarations {
            register(Declaration::Struct(decl), &mut declarations);
        }
        for decl in &file.union_declarations {
            register(Declaration::Union(decl), &mut declarations);
        }
        for decl in &file.enum_declarations {
            register(Declaration::Enum(decl), &mut declarations);
        }
        for decl in &file.interface_declarations {
            register(Declaration::Interface(decl), &mut declarations);
        }

        (declarations, names)
    }

    /// Classifies every type-constructor component of `declaration`:
    /// built-ins are ignored, declared names become edges, anything else is
    /// an undefined reference.
    fn declaration_dependencies(
        declaration: &Declaration<'ast, 'src>,
        names: &IndexMap<&'src str, usize>,
        handler: &Handler,
    ) -> Result<BTreeSet<usize>, CompileError> {
        let mut edges = BTreeSet::new();

        for ty in declaration.type_constructors() {
            for component in &ty.components {
                let name = component.text();
                if BUILT_IN_TYPES.contains(&name) {
                    continue;
                }
                match names.get(name) {
                    Some(&index) => {
                        edges.insert(index);
                    }
                    None => {
                        handler.report(
                            Diagnostic::error(
                                ErrorCode::UndefinedReference,
                                format!("undefined declaration `{name}` used"),
                            )
                            .at(component.element.span().position_str()),
                        );
                        return Err(CompileError::UndefinedReference {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        Ok(edges)
    }

    /// The raw AST this view was compiled from.
    pub fn file(&self) -> &'ast File<'src> {
        self.file
    }

    /// Declarations in dependency order: definitions before uses.
    pub fn declaration_order(&self) -> &[Declaration<'ast, 'src>] {
        &self.declaration_order
    }
}
