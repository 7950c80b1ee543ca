use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type returned by zodgen builders and creators.
///
/// Every variant describes a contract violation by the caller or a broken
/// token table. Nothing here is transient, so nothing is retried.
#[derive(Debug, Error)]
pub enum GenError {
    /// A free-standing identifier or a property name failed the lexical check.
    #[error("invalid identifier `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A call or property access was chained onto a missing or malformed fragment.
    #[error("cannot chain `{member}` ({context}): {reason}")]
    InvalidTarget {
        member: String,
        context: String,
        reason: &'static str,
    },

    /// A semantic name is absent from both the kind partition and the shared partition.
    #[error("unknown token `{name}` for value kind `{kind}`")]
    UnknownToken { kind: String, name: String },

    /// The registry has no partition for the requested value kind.
    #[error("unknown value kind `{kind}`")]
    UnknownKind { kind: String },

    /// The same value kind was declared more than once in one composition.
    #[error("value kind `{kind}` is declared more than once")]
    DuplicateKind { kind: String },

    /// Two semantic names reachable from one kind resolve to the same method.
    #[error("value kind `{kind}` maps both `{first}` and `{second}` to method `{method}`")]
    LiteralCollision {
        kind: String,
        method: String,
        first: String,
        second: String,
    },

    /// A literal argument could not be represented in the target language.
    #[error("invalid literal: {reason}")]
    InvalidLiteral { reason: String },

    /// The token table could not be deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The token table file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered source text could not be tokenized or parsed.
    #[error("syntax error: {0}")]
    Syntax(#[from] syn::Error),

    /// Rendered source text parsed, but uses a construct fragments cannot describe.
    #[error("unsupported syntax: {construct}")]
    Unsupported { construct: String },
}

impl GenError {
    pub(crate) fn invalid_target(member: impl Into<String>, context: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidTarget {
            member: member.into(),
            context: context.into(),
            reason,
        }
    }

    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GenError> = std::result::Result<T, E>;
