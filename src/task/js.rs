//! JavaScript literal helpers for generated code.

/// Escape text for the inside of a backtick template literal.
pub fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

/// Backtick template literal holding `text` verbatim.
pub fn template_literal(text: &str) -> String {
    format!("`{}`", escape_template(text))
}

/// Double-quoted string literal. JSON string syntax is valid JavaScript.
pub fn string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// True when `name` can be used as a JavaScript variable name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
