//! Escaping of definitions and lookup keys for Mobipocket markup.

/// Parenthesized enumerators that start a new sense when reflowing.
const ENUMERATORS: [char; 5] = ['⑴', '⑵', '⑶', '⑷', '⑸'];

const INDENT: &str = "&nbsp;&nbsp;";
const REFLOW_BREAK: &str = "<br/>\n&nbsp;&nbsp;";

/// Turn a raw interchange definition into markup.
///
/// Angle brackets are escaped, then the interchange escapes are undone in one
/// pass: `\\` becomes `\` and `\n` becomes `<br/>` plus a newline. The
/// result is trimmed. With `reflow`, each enumerator after the first character
/// also starts a new indented line and escaped angle brackets get a space on
/// their outer side.
pub fn escape_definition(raw: &str, reflow: bool) -> String {
    let escaped = unescape_breaks(&raw.replace('>', "&gt;").replace('<', "&lt;"));
    let escaped = escaped.trim();
    if !reflow {
        return escaped.to_string();
    }
    reflow_definition(escaped).trim().to_string()
}

fn unescape_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('n') => {
                chars.next();
                out.push_str("<br/>\n");
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn reflow_definition(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        if ENUMERATORS.contains(&c) && !out.is_empty() {
            if out.ends_with("<br/>\n") {
                out.push_str(INDENT);
            } else {
                out.push_str(REFLOW_BREAK);
            }
        }
        out.push(c);
    }
    out.replace("&lt;", " &lt;").replace("&gt;", "&gt; ")
}

/// Final normalization shared by lookup keys and their comparison form.
pub fn normalize_key(key: &str) -> String {
    key.replace('"', "'")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Escape a term for display inside an entry heading.
pub(super) fn escape_term(term: &str) -> String {
    term.replace('<', "&lt;").replace('>', "&gt;")
}
