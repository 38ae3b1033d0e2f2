//! Naming and literal helpers shared by the generators

/// Words that cannot be used as JavaScript binding names
const JS_RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub fn is_reserved_word(name: &str) -> bool {
    JS_RESERVED_WORDS.contains(&name)
}

/// Check if a string is a valid JavaScript identifier (ASCII subset)
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Binding name for `name`: reserved words get a trailing underscore (`new` -> `new_`)
pub fn safe_identifier(name: &str) -> String {
    if is_reserved_word(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// `user_posts_path` -> `userPostsPath`
pub fn snake_to_camel(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut upper_next = false;

    for (i, c) in input.chars().enumerate() {
        if c == '_' {
            // leading underscores are kept, inner ones start a new word
            if result.is_empty() && i == 0 {
                result.push('_');
            } else {
                upper_next = true;
            }
            continue;
        }
        if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else if result.is_empty() || result == "_" {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Reduce arbitrary text to an identifier token: lowercase, non-alphanumerics become `_`.
/// Returns `None` when nothing usable remains.
pub fn identifier_token(raw: &str) -> Option<String> {
    let mut token = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            token.push(c.to_ascii_lowercase());
        } else if !token.ends_with('_') {
            token.push('_');
        }
    }
    let token = token.trim_matches('_');
    if token.is_empty() {
        return None;
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        Some(format!("_{}", token))
    } else {
        Some(token.to_string())
    }
}

/// Normalize a framework action identifier (`:show`, `"edit"`, `Show`) into `show`/`edit`
pub fn normalize_action(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches(':');
    identifier_token(trimmed)
}

/// Quote a string as a JavaScript string literal
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Object key for `name`: bare when it is an identifier, quoted otherwise
pub fn js_property_key(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// Text safe to embed inside a `/** ... */` block
pub fn doc_safe(text: &str) -> String {
    text.replace("*/", "*\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("user_path"), "userPath");
        assert_eq!(snake_to_camel("admin_user_posts_url"), "adminUserPostsUrl");
        assert_eq!(snake_to_camel("user"), "user");
        assert_eq!(snake_to_camel("_private_path"), "_privatePath");
        assert_eq!(snake_to_camel("api_v1_products_path"), "apiV1ProductsPath");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_valid_identifier("user_path"));
        assert!(is_valid_identifier("$root"));
        assert!(!is_valid_identifier("1user"));
        assert!(!is_valid_identifier("user-path"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_safe_identifier() {
        assert_eq!(safe_identifier("new"), "new_");
        assert_eq!(safe_identifier("delete"), "delete_");
        assert_eq!(safe_identifier("class"), "class_");
        assert_eq!(safe_identifier("show"), "show");
    }

    #[test]
    fn test_identifier_token() {
        assert_eq!(identifier_token("user-settings"), Some("user_settings".to_string()));
        assert_eq!(identifier_token("V1"), Some("v1".to_string()));
        assert_eq!(identifier_token("2fa"), Some("_2fa".to_string()));
        assert_eq!(identifier_token("--"), None);
    }

    #[test]
    fn test_normalize_action() {
        assert_eq!(normalize_action(":index"), Some("index".to_string()));
        assert_eq!(normalize_action("Show"), Some("show".to_string()));
        assert_eq!(normalize_action("  "), None);
    }

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("/users/:id"), "\"/users/:id\"");
        assert_eq!(js_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(js_string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_property_key() {
        assert_eq!(js_property_key("id"), "id");
        assert_eq!(js_property_key("post-id"), "\"post-id\"");
    }
}
