//! Python parsing and lowering into an owned statement model
//!
//! Tree-sitter produces a concrete syntax tree that borrows the source.
//! Extraction needs to remove docstrings from bodies and carry definitions
//! across files, so the tree is lowered once into plain owned values. Every
//! statement keeps its own source text shifted to column zero, which is
//! what the renderers emit.

use std::collections::HashSet;

use tree_sitter::{Language, Node, Parser, Point};

use super::literal::decode_string;
use crate::error::ExtractError;

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Module-level statements in source order
    pub body: Vec<Statement>,
}

/// A statement together with its normalized source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Statement text with continuation lines shifted to the statement's
    /// own column and comments removed; decorated definitions include
    /// their decorators
    pub source: String,
    /// Indices of `source` lines that continue a multi-line string literal.
    /// These are part of the literal's value and are never re-indented.
    pub literal_lines: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Class(ClassDef),
    Function(FunctionDef),
    /// Standalone string literal expression, holding the decoded value
    StringLiteral(String),
    Pass,
    /// Statement without nested statements
    Simple,
    /// Statement with nested bodies (`if`, `for`, `try`, `with`, ...),
    /// flattened in source order
    Compound(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    /// Decorator expressions without the leading `@`
    pub decorators: Vec<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub decorators: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub is_async: bool,
}

/// A declared parameter
///
/// Star forms keep their stars in `name` (`*args`, `**kwargs`); the bare
/// `*` and `/` separators appear as parameters named `*` and `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<String>,
}

impl FunctionDef {
    /// `__init__` whose whole body is a single `pass`
    pub fn is_placeholder_constructor(&self) -> bool {
        self.name == "__init__"
            && self.body.len() == 1
            && matches!(self.body[0].kind, StatementKind::Pass)
    }
}

/// Tree-sitter parser configured for Python
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ExtractError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| ExtractError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse and lower one source file
    ///
    /// Any syntax error in the file fails the whole file; the reported
    /// position is that of the first erroneous node.
    pub fn parse(&mut self, source: &str) -> Result<ParsedFile, ExtractError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::Grammar("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error(root).unwrap_or(root).start_position();
            return Err(ExtractError::Parse {
                file: String::new(),
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        let body = Lowering { source }.block(root)?;
        Ok(ParsedFile { body })
    }
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Comments and multi-line string literals found below a statement
#[derive(Debug, Default)]
struct Extras {
    /// Byte offsets where comments start; a comment runs to the end of its line
    comments: Vec<usize>,
    /// Rows that continue a string literal opened on an earlier row
    literal_rows: HashSet<usize>,
}

fn collect_extras(node: Node, extras: &mut Extras) {
    match node.kind() {
        "comment" => {
            extras.comments.push(node.start_byte());
            return;
        }
        "string" => {
            let first = node.start_position().row;
            extras.literal_rows.extend(first + 1..=node.end_position().row);
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_extras(child, extras);
    }
}

/// Normalized text of a node starting at `start_byte`/`start`
///
/// Comments are cut and lines left empty by that are dropped. Lines after
/// the first lose up to `start.column` leading whitespace, except rows
/// inside a string literal, which are kept byte for byte and reported by
/// their index in the result.
fn normalize_lines(
    text: &str,
    start_byte: usize,
    start: Point,
    extras: &Extras,
) -> (String, Vec<usize>) {
    let mut lines: Vec<&str> = Vec::new();
    let mut literal_lines = Vec::new();
    let mut line_start = start_byte;

    for (index, raw) in text.split('\n').enumerate() {
        let offset = line_start;
        line_start += raw.len() + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        let comment = extras
            .comments
            .iter()
            .filter(|&&at| at >= offset && at < offset + raw.len())
            .map(|&at| at - offset)
            .min();
        let line = match comment {
            Some(at) => {
                let kept = raw[..at].trim_end();
                if kept.is_empty() {
                    continue;
                }
                kept
            }
            None => raw,
        };

        if extras.literal_rows.contains(&(start.row + index)) {
            literal_lines.push(lines.len());
            lines.push(line);
        } else if index == 0 {
            lines.push(line);
        } else {
            let strip = line
                .bytes()
                .take(start.column)
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            lines.push(&line[strip..]);
        }
    }
    // A dropped trailing comment can leave blank lines behind
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    (lines.join("\n"), literal_lines)
}

struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node) -> Result<&'s str, ExtractError> {
        node.utf8_text(self.source.as_bytes())
            .map_err(|e| ExtractError::render(node.kind(), e.to_string()))
    }

    fn normalized(&self, node: Node) -> Result<(String, Vec<usize>), ExtractError> {
        let text = self.text(node)?;
        let mut extras = Extras::default();
        collect_extras(node, &mut extras);
        Ok(normalize_lines(
            text,
            node.start_byte(),
            node.start_position(),
            &extras,
        ))
    }

    fn field<'t>(&self, node: Node<'t>, field: &str) -> Result<Node<'t>, ExtractError> {
        node.child_by_field_name(field)
            .ok_or_else(|| ExtractError::render(node.kind(), format!("missing `{field}`")))
    }

    /// Lower the statements directly inside a `module` or `block` node
    fn block(&self, node: Node) -> Result<Vec<Statement>, ExtractError> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: Node) -> Result<Statement, ExtractError> {
        let kind = match node.kind() {
            "class_definition" => StatementKind::Class(self.class(node, Vec::new())?),
            "function_definition" => StatementKind::Function(self.function(node, Vec::new())?),
            "decorated_definition" => {
                let decorators = self.decorators(node)?;
                let definition = self.field(node, "definition")?;
                match definition.kind() {
                    "class_definition" => StatementKind::Class(self.class(definition, decorators)?),
                    "function_definition" => {
                        StatementKind::Function(self.function(definition, decorators)?)
                    }
                    other => {
                        return Err(ExtractError::render(
                            "decorated_definition",
                            format!("unexpected definition `{other}`"),
                        ));
                    }
                }
            }
            "pass_statement" => StatementKind::Pass,
            "expression_statement" => match self.string_literal(node)? {
                Some(value) => StatementKind::StringLiteral(value),
                None => StatementKind::Simple,
            },
            _ => {
                let nested = self.nested(node)?;
                if nested.is_empty() {
                    StatementKind::Simple
                } else {
                    StatementKind::Compound(nested)
                }
            }
        };

        let (source, literal_lines) = self.normalized(node)?;
        Ok(Statement {
            kind,
            source,
            literal_lines,
        })
    }

    /// Statements found in any block below a compound statement
    fn nested(&self, node: Node) -> Result<Vec<Statement>, ExtractError> {
        let mut statements = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "block" {
                statements.extend(self.block(child)?);
            } else {
                statements.extend(self.nested(child)?);
            }
        }
        Ok(statements)
    }

    fn class(&self, node: Node, decorators: Vec<String>) -> Result<ClassDef, ExtractError> {
        let name = self.text(self.field(node, "name")?)?.to_string();
        let body = self.block(self.field(node, "body")?)?;
        Ok(ClassDef {
            name,
            decorators,
            body,
        })
    }

    fn function(&self, node: Node, decorators: Vec<String>) -> Result<FunctionDef, ExtractError> {
        let name = self.text(self.field(node, "name")?)?.to_string();
        let parameters = self.parameters(self.field(node, "parameters")?)?;
        let body = self.block(self.field(node, "body")?)?;
        let is_async = {
            let mut cursor = node.walk();
            node.children(&mut cursor).any(|child| child.kind() == "async")
        };
        Ok(FunctionDef {
            name,
            decorators,
            parameters,
            body,
            is_async,
        })
    }

    fn decorators(&self, node: Node) -> Result<Vec<String>, ExtractError> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .map(|decorator| {
                let mut inner = decorator.walk();
                let expression = decorator
                    .named_children(&mut inner)
                    .find(|child| child.kind() != "comment")
                    .ok_or_else(|| ExtractError::render("decorator", "missing expression"))?;
                let (text, _) = self.normalized(expression)?;
                Ok(text.trim().to_string())
            })
            .collect()
    }

    fn parameters(&self, node: Node) -> Result<Vec<Parameter>, ExtractError> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|param| self.parameter(param))
            .collect()
    }

    fn parameter(&self, node: Node) -> Result<Parameter, ExtractError> {
        let (name, annotation) = match node.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                (self.text(node)?.to_string(), None)
            }
            "keyword_separator" => ("*".to_string(), None),
            "positional_separator" => ("/".to_string(), None),
            "typed_parameter" => {
                let mut cursor = node.walk();
                let target = node
                    .named_children(&mut cursor)
                    .next()
                    .ok_or_else(|| ExtractError::render("typed_parameter", "missing name"))?;
                let annotation = self.one_line(self.field(node, "type")?)?;
                (self.text(target)?.to_string(), Some(annotation))
            }
            "default_parameter" => (self.text(self.field(node, "name")?)?.to_string(), None),
            "typed_default_parameter" => (
                self.text(self.field(node, "name")?)?.to_string(),
                Some(self.one_line(self.field(node, "type")?)?),
            ),
            other => {
                return Err(ExtractError::render(
                    "parameter",
                    format!("unsupported parameter form `{other}`"),
                ));
            }
        };
        Ok(Parameter { name, annotation })
    }

    /// Node text folded onto one line, for annotations inside a signature
    fn one_line(&self, node: Node) -> Result<String, ExtractError> {
        let text = self.text(node)?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Decoded value when the expression statement is a lone `str` literal
    fn string_literal(&self, node: Node) -> Result<Option<String>, ExtractError> {
        let mut cursor = node.walk();
        let expressions: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();
        let [expression] = expressions.as_slice() else {
            return Ok(None);
        };

        match expression.kind() {
            "string" => Ok(decode_string(self.text(*expression)?)),
            "concatenated_string" => {
                let mut value = String::new();
                let mut parts = expression.walk();
                for part in expression.named_children(&mut parts) {
                    if part.kind() == "comment" {
                        continue;
                    }
                    match decode_string(self.text(part)?) {
                        Some(decoded) => value.push_str(&decoded),
                        None => return Ok(None),
                    }
                }
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }
}
