//! Expression fragments and the primitives that build them.
//!
//! An [`Expr`] is an owned tree: each call or property access owns the
//! fragment it extends through a `Box`, so chains are strictly nested and
//! never shared. Fragments are never mutated once built; chaining always
//! allocates a new node around the previous one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{GenError, Result};
use crate::lexical::{check_identifier, check_property_name, is_identifier_name};

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A free-standing name, such as the validation-library namespace.
    Identifier(String),
    /// `target.property`
    PropertyAccess { target: Box<Expr>, property: String },
    /// `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// A scalar literal argument.
    Literal(Literal),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{ key: value }`, entries rendered in insertion order.
    Object(Vec<(String, Expr)>),
}

/// Scalar literal values usable as arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Rendered with the `n` suffix (`10n`).
    BigInt(i128),
    String(String),
    /// Rendered as `/pattern/flags`. Build through [`Expr::regex`].
    Regex { pattern: String, flags: String },
}

/// Builds a reference to a free-standing name.
pub fn identifier(name: impl Into<String>) -> Result<Expr> {
    let name = name.into();
    check_identifier(&name)?;
    Ok(Expr::Identifier(name))
}

/// Builds `target.property`.
///
/// `target` must be present and chainable (see [`Expr::is_chainable`]).
pub fn property_access(target: impl Into<Option<Expr>>, property: impl Into<String>) -> Result<Expr> {
    let property = property.into();
    let target = require_chain(target.into(), &property, || "property access".to_string())?;
    check_property_name(&property)?;
    Ok(Expr::PropertyAccess {
        target: Box::new(target),
        property,
    })
}

/// Builds `callee(args...)`. Argument order is kept as given.
pub fn call(callee: impl Into<Option<Expr>>, args: Vec<Expr>) -> Result<Expr> {
    let callee = require_chain(callee.into(), "call", || "call expression".to_string())?;
    Ok(Expr::Call {
        callee: Box::new(callee),
        args,
    })
}

/// Unwraps a chaining target, rejecting a missing or malformed one.
///
/// `context` is only evaluated on failure.
pub(crate) fn require_chain(target: Option<Expr>, member: &str, context: impl FnOnce() -> String) -> Result<Expr> {
    let Some(target) = target else {
        return Err(GenError::invalid_target(member, context(), "target is missing"));
    };
    if let Some(reason) = target.chain_fault() {
        return Err(GenError::invalid_target(member, context(), reason));
    }
    Ok(target)
}

impl Expr {
    /// A string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn undefined() -> Self {
        Expr::Literal(Literal::Undefined)
    }

    pub fn bigint(value: i128) -> Self {
        Expr::Literal(Literal::BigInt(value))
    }

    pub fn array(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Array(items.into_iter().collect())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Object(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }

    /// A regular-expression literal.
    ///
    /// Unescaped `/` in `pattern` is escaped. Flags must be distinct and drawn
    /// from `dgimsuyv`.
    pub fn regex(pattern: &str, flags: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(GenError::InvalidLiteral {
                reason: "regex pattern is empty".to_string(),
            });
        }
        if pattern.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
            return Err(GenError::InvalidLiteral {
                reason: "regex pattern contains a line terminator".to_string(),
            });
        }
        let mut seen = String::new();
        for flag in flags.chars() {
            if !"dgimsuyv".contains(flag) || seen.contains(flag) {
                return Err(GenError::InvalidLiteral {
                    reason: format!("invalid regex flags `{flags}`"),
                });
            }
            seen.push(flag);
        }

        let mut escaped = String::with_capacity(pattern.len());
        let mut backslash = false;
        for ch in pattern.chars() {
            if ch == '/' && !backslash {
                escaped.push('\\');
            }
            backslash = ch == '\\' && !backslash;
            escaped.push(ch);
        }
        if backslash {
            return Err(GenError::InvalidLiteral {
                reason: "regex pattern ends with a lone backslash".to_string(),
            });
        }

        Ok(Expr::Literal(Literal::Regex {
            pattern: escaped,
            flags: flags.to_string(),
        }))
    }

    /// Returns `true` if calls and property accesses may be chained onto this fragment:
    /// its spine of calls and property accesses ends at a valid identifier.
    pub fn is_chainable(&self) -> bool {
        self.chain_fault().is_none()
    }

    fn chain_fault(&self) -> Option<&'static str> {
        let mut node = self;
        loop {
            match node {
                Expr::Identifier(name) => {
                    return check_identifier(name).err().map(|_| "chain root is not a valid identifier");
                }
                Expr::PropertyAccess { target, property } => {
                    if check_property_name(property).is_err() {
                        return Some("chain contains an invalid property name");
                    }
                    node = target.as_ref();
                }
                Expr::Call { callee, .. } => node = callee.as_ref(),
                Expr::Literal(_) | Expr::Array(_) | Expr::Object(_) => {
                    return Some("chain is not rooted at an identifier");
                }
            }
        }
    }

    /// For a method call `receiver.method(..)`, the receiver.
    pub fn receiver(&self) -> Option<&Expr> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::PropertyAccess { target, .. } => Some(target.as_ref()),
                _ => None,
            },
            _ => None,
        }
    }

    /// For a method call `receiver.method(..)`, the method name.
    pub fn method(&self) -> Option<&str> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::PropertyAccess { property, .. } => Some(property.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Arguments of a call.
    pub fn args(&self) -> Option<&[Expr]> {
        match self {
            Expr::Call { args, .. } => Some(args.as_slice()),
            _ => None,
        }
    }

    /// Method names along a call chain, innermost first.
    ///
    /// `z.string().min(3).optional()` yields `["string", "min", "optional"]`.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods = Vec::new();
        let mut node = self;
        while let Some(method) = node.method() {
            methods.push(method);
            match node.receiver() {
                Some(receiver) => node = receiver,
                None => break,
            }
        }
        methods.reverse();
        methods
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => f.write_str(name),
            Expr::PropertyAccess { target, property } => write!(f, "{target}.{property}"),
            Expr::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Literal(literal) => fmt::Display::fmt(literal, f),
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::Object(entries) if entries.is_empty() => f.write_str("{}"),
            Expr::Object(entries) => {
                f.write_str("{ ")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    if is_identifier_name(key) {
                        f.write_str(key)?;
                    } else {
                        write_string(f, key)?;
                    }
                    write!(f, ": {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Undefined => f.write_str("undefined"),
            Literal::Bool(value) => write!(f, "{value}"),
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Float(value) if value.is_nan() => f.write_str("NaN"),
            Literal::Float(value) if value.is_infinite() => {
                f.write_str(if value.is_sign_positive() { "Infinity" } else { "-Infinity" })
            }
            // Debug formatting keeps a fractional part (`3.0`), so floats re-parse as floats.
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::BigInt(value) => write!(f, "{value}n"),
            Literal::String(value) => write_string(f, value),
            Literal::Regex { pattern, flags } => write!(f, "/{pattern}/{flags}"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let quoted = serde_json::to_string(value).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Expr::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::string(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::string(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }
}

macro_rules! int_literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Expr::Literal(Literal::Int(i64::from(value)))
                }
            }
        )*
    };
}

int_literal_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Expr {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(value) => Expr::Literal(Literal::Int(value)),
            Err(_) => Expr::Literal(Literal::Float(value as f64)),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Literal::Float(value))
    }
}

impl From<f32> for Expr {
    fn from(value: f32) -> Self {
        Expr::Literal(Literal::Float(f64::from(value)))
    }
}

impl From<serde_json::Value> for Expr {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Expr::null(),
            Value::Bool(value) => Expr::from(value),
            Value::Number(number) => {
                // Integers past the i64 range stay plain numbers, never bigints.
                if let Some(value) = number.as_i64() {
                    Expr::Literal(Literal::Int(value))
                } else {
                    Expr::Literal(Literal::Float(number.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(value) => Expr::string(value),
            Value::Array(items) => Expr::Array(items.into_iter().map(Expr::from).collect()),
            Value::Object(entries) => Expr::Object(entries.into_iter().map(|(key, value)| (key, Expr::from(value))).collect()),
        }
    }
}
