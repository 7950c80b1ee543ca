//! Value-kind builders: one root creator plus the merged refinement namespace.
//!
//! Supporting a new kind takes one [`KindDecl`] listing the semantic names to
//! generate creators for; the tree-building logic lives in [`crate::creators`].

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::config::GeneratorConfig;
use crate::creators::{Members, NamespaceFactory, RefinementCreator, RootCreator, build_shared_member_creators};
use crate::errors::{GenError, Result};
use crate::expr::Expr;
use crate::tokens::{Token, TokenRegistry};

/// Declares which kind-specific refinements a value kind exposes.
///
/// Every listed name must exist in the kind's registry partition; shared
/// refinements are always added and need not be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDecl {
    pub kind: &'static str,
    pub members: &'static [&'static str],
}

impl KindDecl {
    pub const fn new(kind: &'static str, members: &'static [&'static str]) -> Self {
        Self { kind, members }
    }
}

pub const STRING: KindDecl = KindDecl::new(
    "string",
    &[
        "min",
        "max",
        "length",
        "email",
        "url",
        "emoji",
        "uuid",
        "nanoid",
        "cuid",
        "cuid2",
        "ulid",
        "regex",
        "includes",
        "starts_with",
        "ends_with",
        "datetime",
        "date",
        "time",
        "duration",
        "ip",
        "cidr",
        "base64",
        "trim",
        "to_lower_case",
        "to_upper_case",
        "nonempty",
    ],
);

pub const NUMBER: KindDecl = KindDecl::new(
    "number",
    &[
        "gt",
        "gte",
        "lt",
        "lte",
        "min",
        "max",
        "int",
        "positive",
        "nonnegative",
        "negative",
        "nonpositive",
        "multiple_of",
        "step",
        "finite",
        "safe",
    ],
);

pub const BIGINT: KindDecl = KindDecl::new(
    "bigint",
    &[
        "gt",
        "gte",
        "lt",
        "lte",
        "min",
        "max",
        "positive",
        "nonnegative",
        "negative",
        "nonpositive",
        "multiple_of",
    ],
);

pub const BOOLEAN: KindDecl = KindDecl::new("boolean", &[]);

pub const DATE: KindDecl = KindDecl::new("date", &["min", "max"]);

pub const ARRAY: KindDecl = KindDecl::new("array", &["min", "max", "length", "nonempty"]);

pub const SET: KindDecl = KindDecl::new("set", &["min", "max", "size", "nonempty"]);

pub const MAP: KindDecl = KindDecl::new("map", &[]);

pub const RECORD: KindDecl = KindDecl::new("record", &[]);

pub const OBJECT: KindDecl = KindDecl::new(
    "object",
    &[
        "strict",
        "passthrough",
        "strip",
        "catchall",
        "partial",
        "deep_partial",
        "required",
        "extend",
        "merge",
        "pick",
        "omit",
        "keyof",
    ],
);

pub const ENUM: KindDecl = KindDecl::new("enum", &["exclude", "extract"]);

pub const LITERAL: KindDecl = KindDecl::new("literal", &[]);

/// Kinds composed by [`ValueKinds::builtin`].
pub const BUILTIN_KINDS: &[KindDecl] = &[
    STRING, NUMBER, BIGINT, BOOLEAN, DATE, ARRAY, SET, MAP, RECORD, OBJECT, ENUM, LITERAL,
];

/// A value kind's root creator carrying its refinement creators.
#[derive(Debug, Clone)]
pub struct ValueKindBuilder {
    root: RootCreator,
    members: Members,
}

impl ValueKindBuilder {
    /// Composes the builder for `decl.kind`.
    ///
    /// The registry is validated first (`InvalidName`, `LiteralCollision`).
    /// Fails with `UnknownKind` if the registry lacks the kind and with
    /// `UnknownToken` if a declared member is in neither the kind's partition
    /// nor the shared one.
    pub fn compose(registry: &TokenRegistry, namespace: Arc<dyn NamespaceFactory>, decl: &KindDecl) -> Result<Self> {
        Self::compose_members(registry, namespace, decl.kind, decl.members.iter().copied())
    }

    fn compose_members<'a>(
        registry: &TokenRegistry,
        namespace: Arc<dyn NamespaceFactory>,
        kind: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        registry.validate()?;
        let kind_token = registry.kind_token(kind)?;
        let root = RootCreator::new(namespace, kind_token.clone())?;

        let mut own = Members::new();
        for name in names {
            match registry.member(kind, name) {
                Ok(token) => {
                    own.insert(RefinementCreator::new(token, kind_token.clone())?);
                }
                // Shared names resolve through the shared bundle below.
                Err(GenError::UnknownToken { .. }) if registry.shared.contains_key(name) => {
                    trace!("kind `{kind}` declares shared member `{name}`");
                }
                Err(err) => return Err(err),
            }
        }
        let own_count = own.len();

        let members = own.merge_shared(build_shared_member_creators(registry, &kind_token)?);
        debug!(
            "composed value kind `{}` ({} own, {} total refinements)",
            kind,
            own_count,
            members.len()
        );

        Ok(Self { root, members })
    }

    pub fn kind(&self) -> &Token {
        self.root.kind()
    }

    pub fn root(&self) -> &RootCreator {
        &self.root
    }

    /// Builds the root expression `ns.kind(args..)`.
    pub fn create(&self, args: Vec<Expr>) -> Result<Expr> {
        self.root.create(args)
    }

    /// Refinement creators by semantic name, kind-specific and shared.
    pub fn t(&self) -> &Members {
        &self.members
    }
}

/// Every value-kind builder composed from one configuration.
#[derive(Debug, Clone, Default)]
pub struct ValueKinds {
    builders: BTreeMap<String, ValueKindBuilder>,
}

impl ValueKinds {
    /// The embedded zod table composed with [`BUILTIN_KINDS`].
    pub fn builtin() -> Result<Self> {
        Self::compose(&GeneratorConfig::builtin()?, BUILTIN_KINDS)
    }

    /// Composes the declared kinds from `config`.
    ///
    /// A kind declared twice is a `DuplicateKind` error.
    pub fn compose(config: &GeneratorConfig, decls: &[KindDecl]) -> Result<Self> {
        config.validate()?;
        let namespace: Arc<dyn NamespaceFactory> = Arc::new(config.namespace_factory()?);

        let mut builders: BTreeMap<String, ValueKindBuilder> = BTreeMap::new();
        for decl in decls {
            if builders.contains_key(decl.kind) {
                return Err(GenError::DuplicateKind {
                    kind: decl.kind.to_string(),
                });
            }
            let builder = ValueKindBuilder::compose(&config.registry, Arc::clone(&namespace), decl)?;
            builders.insert(decl.kind.to_string(), builder);
        }
        Ok(Self { builders })
    }

    /// Composes every registry kind with all of its members.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let namespace: Arc<dyn NamespaceFactory> = Arc::new(config.namespace_factory()?);

        let mut builders = BTreeMap::new();
        for (kind, tokens) in &config.registry.kinds {
            let builder = ValueKindBuilder::compose_members(
                &config.registry,
                Arc::clone(&namespace),
                kind,
                tokens.members.keys().map(String::as_str),
            )?;
            builders.insert(kind.clone(), builder);
        }
        Ok(Self { builders })
    }

    pub fn kind(&self, name: &str) -> Option<&ValueKindBuilder> {
        self.builders.get(name)
    }

    /// Kind names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueKindBuilder)> {
        self.builders.iter().map(|(name, builder)| (name.as_str(), builder))
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}
