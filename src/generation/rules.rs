//! Business rules for the generation domain

use crate::generation::GenerationError;

/// JavaScript reserved words, including strict-mode and module-only ones
pub const RESERVED_WORDS: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Names the generated files already bind themselves
pub const TEMPLATE_BINDINGS: &[&str] = &[
    "app",
    "body",
    "controllers",
    "cors",
    "error",
    "express",
    "finalData",
    "helmet",
    "params",
    "port",
    "query",
    "req",
    "res",
    "router",
];

/// Validates a route or service name.
///
/// Names become JavaScript bindings and file names, so they must be
/// non-empty ASCII alphanumerics starting with a lower-case letter, and may
/// not be a reserved word or a binding the templates declare.
pub fn validate_identifier(name: &str) -> Result<(), GenerationError> {
    let invalid = |reason: &str| GenerationError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name cannot be empty"));
    };

    if !first.is_ascii_lowercase() {
        return Err(invalid("name must start with a lower-case letter"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("name must contain only ASCII letters and digits"));
    }

    if RESERVED_WORDS.contains(&name) {
        return Err(invalid("name is a JavaScript reserved word"));
    }

    if TEMPLATE_BINDINGS.contains(&name) {
        return Err(invalid("name is already bound by the generated code"));
    }

    Ok(())
}

/// Validates project folder name format
pub fn validate_project_name(name: &str) -> Result<(), GenerationError> {
    let invalid = |reason: &str| GenerationError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("project name cannot be empty"));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "project name must contain only alphanumeric characters, dashes, and underscores",
        ));
    }

    if name.starts_with('-') || name.starts_with('_') {
        return Err(invalid("project name cannot start with a dash or underscore"));
    }

    Ok(())
}

/// Validates a directory argument that is joined onto the project root.
///
/// Only plain relative paths are accepted; absolute paths and `..`
/// components would let a request write outside the project.
pub fn validate_relative_dir(dir: &str) -> Result<(), GenerationError> {
    use std::path::{Component, Path};

    let invalid = |reason: &str| GenerationError::InvalidIdentifier {
        name: dir.to_string(),
        reason: reason.to_string(),
    };

    if dir.trim().is_empty() {
        return Err(invalid("directory cannot be empty"));
    }

    for component in Path::new(dir).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(invalid("directory must be relative to the project root")),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("orders").is_ok());
        assert!(validate_identifier("getUserOrders").is_ok());
        assert!(validate_identifier("v2Users").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("Orders").is_err());
        assert!(validate_identifier("2orders").is_err());
        assert!(validate_identifier("user-orders").is_err());
        assert!(validate_identifier("user_orders").is_err());
        assert!(validate_identifier("ordérs").is_err());
    }

    #[test]
    fn test_validate_identifier_message() {
        let err = validate_identifier("Orders").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid identifier 'Orders': name must start with a lower-case letter"
        );
    }

    #[test]
    fn test_validate_identifier_reserved_words() {
        for name in ["delete", "new", "class", "await", "default", "import"] {
            let err = validate_identifier(name).unwrap_err();
            assert!(err.to_string().contains("reserved word"), "{name}");
        }
        // only exact matches are reserved
        assert!(validate_identifier("deleteOrder").is_ok());
        assert!(validate_identifier("newUsers").is_ok());
    }

    #[test]
    fn test_validate_identifier_template_bindings() {
        for name in TEMPLATE_BINDINGS {
            let err = validate_identifier(name).unwrap_err();
            assert!(err.to_string().contains("already bound"), "{name}");
        }
        assert!(validate_identifier("routerStatus").is_ok());
        assert!(validate_identifier("expressCheckout").is_ok());
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("node_api").is_ok());
        assert!(validate_project_name("my-project").is_ok());
        assert!(validate_project_name("project123").is_ok());

        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-project").is_err());
        assert!(validate_project_name("_project").is_err());
        assert!(validate_project_name("my project").is_err());
        assert!(validate_project_name("../escape").is_err());
    }

    #[test]
    fn test_validate_relative_dir() {
        assert!(validate_relative_dir("src/controllers").is_ok());
        assert!(validate_relative_dir("./src/services").is_ok());
        assert!(validate_relative_dir("controllers").is_ok());

        assert!(validate_relative_dir("").is_err());
        assert!(validate_relative_dir("/etc").is_err());
        assert!(validate_relative_dir("../outside").is_err());
        assert!(validate_relative_dir("src/../../outside").is_err());
    }
}
