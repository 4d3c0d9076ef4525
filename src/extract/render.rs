//! Text reconstruction for signatures, decorators and bodies

use super::syntax::{Parameter, Statement};

/// One nesting level
pub const INDENT: &str = "    ";

/// `name(param, param: Type, ...)`
pub fn render_signature(name: &str, parameters: &[Parameter]) -> String {
    let params: Vec<String> = parameters
        .iter()
        .map(|param| match &param.annotation {
            Some(annotation) => format!("{}: {}", param.name, annotation),
            None => param.name.clone(),
        })
        .collect();
    format!("{}({})", name, params.join(", "))
}

/// One `@expression` line per decorator at the given level
///
/// Ends with a newline when there is at least one decorator, so the result
/// can be prefixed directly to a `def`/`class` line. No decorators render
/// as the empty string.
pub fn render_decorators(decorators: &[String], level: usize) -> String {
    if decorators.is_empty() {
        return String::new();
    }
    let prefix = INDENT.repeat(level);
    let lines: Vec<String> = decorators
        .iter()
        .map(|decorator| format!("{prefix}@{decorator}"))
        .collect();
    format!("{}\n", lines.join("\n"))
}

/// Statements back to source text, indented by `level` units
///
/// Lines that continue a multi-line string literal are emitted as written,
/// since indenting them would change the literal's value. An empty body
/// renders as `pass` so the enclosing definition stays valid.
pub fn render_body(body: &[Statement], level: usize) -> String {
    if body.is_empty() {
        return indent("pass", level);
    }
    body.iter()
        .map(|statement| indent_except(&statement.source, level, &statement.literal_lines))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every non-blank line with `level` indentation units
pub fn indent(code: &str, level: usize) -> String {
    indent_except(code, level, &[])
}

fn indent_except(code: &str, level: usize, verbatim: &[usize]) -> String {
    let prefix = INDENT.repeat(level);
    code.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if line.trim().is_empty() || verbatim.contains(&index) {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
