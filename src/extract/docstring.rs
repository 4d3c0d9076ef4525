use super::syntax::{Statement, StatementKind};

const TAB_WIDTH: usize = 8;

/// Strip a leading docstring from `body` and return its cleaned text
///
/// Only a first statement that is a standalone string literal counts. The
/// body is modified in place; `None` means no docstring was present, which
/// is distinct from `Some("")` for an empty literal.
pub fn take_docstring(body: &mut Vec<Statement>) -> Option<String> {
    let StatementKind::StringLiteral(value) = &body.first()?.kind else {
        return None;
    };
    let text = clean_docstring(value);
    body.remove(0);
    Some(text)
}

/// Normalize docstring indentation
///
/// Tabs are expanded, the first line loses its leading whitespace, the
/// common indentation of the remaining lines is removed, and blank lines
/// at either end are dropped.
pub fn clean_docstring(raw: &str) -> String {
    let mut lines: Vec<String> = raw.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    for line in lines.iter_mut().skip(1) {
        if line.trim().is_empty() {
            line.clear();
        } else if let Some(margin) = margin {
            let stripped = line.get(margin..).unwrap_or(line.trim_start()).to_string();
            *line = stripped;
        }
    }

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines
        .iter()
        .take_while(|line| line.trim().is_empty())
        .count();

    lines[leading..].join("\n")
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.trim_end_matches('\r').to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for c in line.trim_end_matches('\r').chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
