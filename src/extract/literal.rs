//! Decoding of Python string literal source text

/// Decode the value of a single string literal token such as `r'''x'''`
///
/// Returns `None` for literals that do not evaluate to a plain `str`
/// constant (f-strings, t-strings and bytes).
pub(crate) fn decode_string(literal: &str) -> Option<String> {
    let quote_at = literal.find(['\'', '"'])?;
    let (prefix, quoted) = literal.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains(['f', 'b', 't']) {
        return None;
    }

    let quote = quoted.chars().next()?;
    let triple = quote.to_string().repeat(3);
    let body = if quoted.len() >= 6 && quoted.starts_with(&triple) && quoted.ends_with(&triple) {
        &quoted[3..quoted.len() - 3]
    } else if quoted.len() >= 2 && quoted.ends_with(quote) {
        &quoted[1..quoted.len() - 1]
    } else {
        return None;
    };

    let body = body.replace("\r\n", "\n");
    if prefix.contains('r') {
        Some(body)
    } else {
        Some(unescape(&body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            // line continuation
            '\n' => {}
            '\\' | '\'' | '"' => out.push(escape),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::with_capacity(width);
                while digits.len() < width {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push(escape);
                        out.push_str(&digits);
                    }
                }
            }
            // Unknown escapes (including \N{...}) keep their backslash
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}
