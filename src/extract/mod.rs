//! Definition extraction for Python sources
//!
//! Parses files with tree-sitter, lowers them into an owned statement model,
//! and walks that model to produce re-rendered code blocks for the accepted
//! classes, methods and functions, each paired with its docstring.

mod aggregate;
mod docstring;
mod filter;
mod literal;
mod render;
mod syntax;
mod visitor;

pub use aggregate::{Aggregator, ExtractionResult, FileGroup, OnParseError, SkippedFile};
pub use docstring::{clean_docstring, take_docstring};
pub use filter::{FilterSpec, included};
pub use render::{INDENT, indent, render_body, render_decorators, render_signature};
pub use syntax::{
    ClassDef, FunctionDef, Parameter, ParsedFile, PythonParser, Statement, StatementKind,
};
pub use visitor::Extractor;

/// What kind of definition a code block was rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Bare `class Name:` header, with decorators
    Class,
    /// Function defined directly in an accepted class body
    Method,
    /// Any function not attributed to a class
    Function,
}

/// One rendered, indentation-correct unit of the digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Name of the class or function this block renders
    pub name: String,
    pub kind: BlockKind,
    /// Rendered source text
    pub code: String,
}

/// Documentation paired positionally with a [`CodeBlock`]
///
/// `docstring` is `None` when the definition has no leading string literal,
/// and `Some("")` when the literal is present but empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocstringEntry {
    pub name: String,
    pub docstring: Option<String>,
}

/// Everything one visitor pass produced for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub code_blocks: Vec<CodeBlock>,
    pub docstrings: Vec<DocstringEntry>,
}

impl FileExtraction {
    /// Record an accepted definition, keeping blocks and entries aligned
    pub(crate) fn push(
        &mut self,
        name: &str,
        kind: BlockKind,
        code: String,
        docstring: Option<String>,
    ) {
        self.code_blocks.push(CodeBlock {
            name: name.to_string(),
            kind,
            code,
        });
        self.docstrings.push(DocstringEntry {
            name: name.to_string(),
            docstring,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.code_blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.code_blocks.len()
    }

    /// Aligned (docstring, code block) pairs in source order
    pub fn pairs(&self) -> impl Iterator<Item = (&DocstringEntry, &CodeBlock)> {
        self.docstrings.iter().zip(self.code_blocks.iter())
    }
}

#[cfg(test)]
mod tests;
