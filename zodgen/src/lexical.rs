//! Lexical checks for names that end up in rendered source text.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{GenError, Result};

/// ECMAScript IdentifierName: ID_Start (plus `$` and `_`) followed by ID_Continue.
static IDENTIFIER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}$_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}$_\x{200C}\x{200D}]*$")
        .expect("identifier pattern compiles")
});

/// Words that may not be used as free-standing identifiers (strict mode included).
/// Kept sorted for binary search.
const RESERVED_WORDS: &[&str] = &[
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
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Returns `true` if `name` is lexically an IdentifierName.
pub fn is_identifier_name(name: &str) -> bool {
    IDENTIFIER_NAME.is_match(name)
}

/// Returns `true` if `name` is a reserved word.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.binary_search(&name).is_ok()
}

/// Checks a name used as a free-standing reference (`z`, `schema`).
pub fn check_identifier(name: &str) -> Result<()> {
    check_property_name(name)?;
    if is_reserved_word(name) {
        return Err(GenError::InvalidName {
            name: name.to_string(),
            reason: "reserved word",
        });
    }
    Ok(())
}

/// Checks a name used after a dot. Reserved words are allowed here (`.default()`, `.enum()`).
pub fn check_property_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GenError::InvalidName {
            name: String::new(),
            reason: "name is empty",
        });
    }
    if !is_identifier_name(name) {
        return Err(GenError::InvalidName {
            name: name.to_string(),
            reason: "not an identifier name",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_sorted() {
        assert!(RESERVED_WORDS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn identifier_names() {
        assert!(is_identifier_name("z"));
        assert!(is_identifier_name("$schema"));
        assert!(is_identifier_name("_private1"));
        assert!(is_identifier_name("startsWith"));
        assert!(is_identifier_name("café"));
        assert!(!is_identifier_name("1abc"));
        assert!(!is_identifier_name("with-dash"));
        assert!(!is_identifier_name("two words"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn reserved_words_only_rejected_as_identifiers() {
        assert!(matches!(
            check_identifier("default"),
            Err(GenError::InvalidName { reason: "reserved word", .. })
        ));
        assert!(check_property_name("default").is_ok());
        assert!(check_property_name("enum").is_ok());
    }

    #[test]
    fn empty_name_is_reported() {
        assert!(matches!(
            check_identifier(""),
            Err(GenError::InvalidName { reason: "name is empty", .. })
        ));
    }
}
