//! Depth-first walk over a parsed file that emits accepted definitions

use super::docstring::take_docstring;
use super::filter::FilterSpec;
use super::render::{INDENT, render_body, render_decorators, render_signature};
use super::syntax::{ClassDef, FunctionDef, ParsedFile, Statement, StatementKind};
use super::{BlockKind, FileExtraction};

/// Syntactic parent of the statement being visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Module,
    Class,
    Function,
    Statement,
}

/// Walks one file and renders the definitions the filter accepts
///
/// Classes become a bare header block followed by one block per accepted
/// method. Functions whose parent is not a class become standalone blocks.
/// Every block is paired with the docstring stripped from it.
pub struct Extractor<'f> {
    filter: &'f FilterSpec,
}

impl<'f> Extractor<'f> {
    pub fn new(filter: &'f FilterSpec) -> Self {
        Self { filter }
    }

    /// Run one pass over `file`, consuming it
    ///
    /// Each call starts from an empty [`FileExtraction`], so nothing carries
    /// over between files.
    pub fn extract(&self, mut file: ParsedFile) -> FileExtraction {
        let mut out = FileExtraction::default();
        for statement in &mut file.body {
            self.visit(statement, Parent::Module, &mut out);
        }
        out
    }

    fn visit(&self, statement: &mut Statement, parent: Parent, out: &mut FileExtraction) {
        match &mut statement.kind {
            StatementKind::Class(class) => self.visit_class(class, out),
            StatementKind::Function(function) => self.visit_function(function, parent, out),
            StatementKind::Compound(nested) => {
                for child in nested {
                    self.visit(child, Parent::Statement, out);
                }
            }
            StatementKind::StringLiteral(_) | StatementKind::Pass | StatementKind::Simple => {}
        }
    }

    fn visit_class(&self, class: &mut ClassDef, out: &mut FileExtraction) {
        if self.filter.includes_class(&class.name) {
            tracing::debug!("Emitting class {}", class.name);
            let docstring = take_docstring(&mut class.body);
            let header = format!(
                "{}class {}:",
                render_decorators(&class.decorators, 0),
                class.name
            );
            out.push(&class.name, BlockKind::Class, header, docstring);

            for member in &mut class.body {
                if let StatementKind::Function(method) = &mut member.kind {
                    self.emit_method(method, out);
                }
            }
        } else {
            tracing::debug!("Filtered out class {}", class.name);
        }

        // Second pass: nested classes follow every method of their parent.
        // Rejected classes are still walked so inner classes get their own test
        for member in &mut class.body {
            self.visit(member, Parent::Class, out);
        }
    }

    fn emit_method(&self, method: &mut FunctionDef, out: &mut FileExtraction) {
        if !self.filter.includes_method(&method.name) {
            tracing::debug!("Filtered out method {}", method.name);
            return;
        }
        if method.is_placeholder_constructor() {
            tracing::debug!("Skipping placeholder constructor");
            return;
        }

        let docstring = take_docstring(&mut method.body);
        let code = format!(
            "{}{}{}:\n{}\n",
            render_decorators(&method.decorators, 1),
            INDENT,
            def_line(method),
            render_body(&method.body, 2)
        );
        out.push(&method.name, BlockKind::Method, code, docstring);
    }

    fn visit_function(&self, function: &mut FunctionDef, parent: Parent, out: &mut FileExtraction) {
        // Methods are emitted while their class is processed
        if parent == Parent::Class {
            return;
        }

        if self.filter.includes_method(&function.name) {
            tracing::debug!("Emitting function {} (parent: {:?})", function.name, parent);
            let docstring = take_docstring(&mut function.body);
            let code = format!(
                "{}{}:\n{}\n",
                render_decorators(&function.decorators, 0),
                def_line(function),
                render_body(&function.body, 1)
            );
            out.push(&function.name, BlockKind::Function, code, docstring);
        } else {
            tracing::debug!("Filtered out function {}", function.name);
        }

        for child in &mut function.body {
            self.visit(child, Parent::Function, out);
        }
    }
}

fn def_line(function: &FunctionDef) -> String {
    let keyword = if function.is_async { "async def" } else { "def" };
    format!(
        "{} {}",
        keyword,
        render_signature(&function.name, &function.parameters)
    )
}
