//! zodgen: builds zod validator expressions as syntax-tree fragments.
//!
//! A [`TokenRegistry`] maps semantic rule names to the library's method
//! names. From it, [`ValueKinds`] composes one [`ValueKindBuilder`] per value
//! kind: a root creator (`z.string(..)`) carrying refinement creators
//! (`.min(..)`, `.optional()`) that chain onto an existing [`Expr`].
//!
//! ```
//! use zodgen::{ValueKinds, args};
//!
//! let kinds = ValueKinds::builtin()?;
//! let string = kinds.kind("string").expect("string is a built-in kind");
//! let expr = string.create(args![])?;
//! let expr = string.t().get("min").expect("min").apply(expr, args![3])?;
//! let expr = string.t().get("optional").expect("optional").apply(expr, args![])?;
//! assert_eq!(expr.to_string(), "z.string().min(3).optional()");
//! # Ok::<(), zodgen::GenError>(())
//! ```

pub mod config;
pub mod creators;
pub mod describe;
pub mod errors;
pub mod expr;
pub mod kinds;
pub mod lexical;
pub mod parse;
pub mod tokens;

mod macros;

pub use config::GeneratorConfig;
pub use creators::{
    Members, Namespace, NamespaceFactory, RefinementCreator, RootCreator, build_shared_member_creators,
    make_refinement_creator, make_root_creator,
};
pub use describe::{ArgDescription, NestedValidator, ObjectShape, RuleDescription, ValueDescription};
pub use errors::*;
pub use expr::{Expr, Literal, call, identifier, property_access};
pub use kinds::{BUILTIN_KINDS, KindDecl, ValueKindBuilder, ValueKinds};
pub use parse::parse_expr;
pub use tokens::{KindTokens, Token, TokenRegistry};
