//! Sanitizers for values spliced into generated JavaScript
//!
//! Templates place user-supplied strings inside JavaScript literals. These
//! helpers make sure such a value can never terminate its literal early.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{name}` not already part of a `${...}` interpolation
static OPENAPI_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^$])\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern must compile")
});

/// Escapes a value for a single-quoted JavaScript string literal.
///
/// # Examples
/// ```
/// use routesmith::generation::sanitizers::escape_single_quoted;
///
/// assert_eq!(escape_single_quoted("/o'neil"), "/o\\'neil");
/// ```
pub fn escape_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value for a JavaScript template literal while keeping its
/// `${...}` interpolations live.
pub fn escape_template_literal(input: &str) -> String {
    input.replace('\\', "\\\\").replace('`', "\\`")
}

/// Rewrites OpenAPI-style `{id}` path placeholders into `${params.id}`
/// interpolations. Existing `${...}` interpolations are left alone.
///
/// # Examples
/// ```
/// use routesmith::generation::sanitizers::rewrite_path_placeholders;
///
/// assert_eq!(
///     rewrite_path_placeholders("https://api.example.com/users/{userId}"),
///     "https://api.example.com/users/${params.userId}"
/// );
/// ```
pub fn rewrite_path_placeholders(uri: &str) -> String {
    // Adjacent placeholders share a boundary character, so repeat until stable
    let mut current = uri.to_string();
    loop {
        let next = OPENAPI_PLACEHOLDER
            .replace_all(&current, "${1}$${params.${2}}")
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("/:id"), "/:id");
        assert_eq!(escape_single_quoted("it's"), "it\\'s");
        assert_eq!(escape_single_quoted("a\\b"), "a\\\\b");
        assert_eq!(escape_single_quoted("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_escape_template_literal() {
        assert_eq!(
            escape_template_literal("https://x.test/${params.id}"),
            "https://x.test/${params.id}"
        );
        assert_eq!(escape_template_literal("a`b"), "a\\`b");
        assert_eq!(escape_template_literal("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_rewrite_path_placeholders() {
        assert_eq!(
            rewrite_path_placeholders("https://x.test/posts/{id}"),
            "https://x.test/posts/${params.id}"
        );
        assert_eq!(
            rewrite_path_placeholders("{base}/a/{first}{second}"),
            "${params.base}/a/${params.first}${params.second}"
        );
        assert_eq!(
            rewrite_path_placeholders("https://x.test/posts/${params.id}"),
            "https://x.test/posts/${params.id}"
        );
        assert_eq!(
            rewrite_path_placeholders("https://x.test/todos"),
            "https://x.test/todos"
        );
    }
}
