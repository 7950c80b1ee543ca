//! Root and refinement creators, built once per token.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::errors::Result;
use crate::expr::{self, Expr, require_chain};
use crate::lexical::{check_identifier, check_property_name};
use crate::tokens::{Token, TokenRegistry};

/// Produces the base fragment a root creator accesses the kind factory on.
pub trait NamespaceFactory: Send + Sync {
    fn namespace(&self) -> Result<Expr>;
}

impl<F> NamespaceFactory for F
where
    F: Fn() -> Result<Expr> + Send + Sync,
{
    fn namespace(&self) -> Result<Expr> {
        self()
    }
}

/// Identifier factory for the validation-library namespace (`z`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
}

impl Namespace {
    /// Validates `name` up front so that later calls cannot fail.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_identifier(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl NamespaceFactory for Namespace {
    fn namespace(&self) -> Result<Expr> {
        expr::identifier(self.name.as_str())
    }
}

/// Builds `ns.kind(args..)`.
#[derive(Clone)]
pub struct RootCreator {
    namespace: Arc<dyn NamespaceFactory>,
    kind: Token,
}

impl RootCreator {
    pub fn new(namespace: Arc<dyn NamespaceFactory>, kind: Token) -> Result<Self> {
        check_property_name(kind.method())?;
        trace!("root creator for kind `{}` -> `{}`", kind.name(), kind.method());
        Ok(Self { namespace, kind })
    }

    pub fn kind(&self) -> &Token {
        &self.kind
    }

    /// Builds a fresh root fragment with the given root-level options.
    pub fn create(&self, args: Vec<Expr>) -> Result<Expr> {
        let base = self.namespace.namespace()?;
        let factory = expr::property_access(base, self.kind.method())?;
        expr::call(factory, args)
    }
}

impl fmt::Debug for RootCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCreator").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Shorthand for [`RootCreator::new`].
pub fn make_root_creator(namespace: Arc<dyn NamespaceFactory>, kind: Token) -> Result<RootCreator> {
    RootCreator::new(namespace, kind)
}

/// Chains one `.method(args..)` call onto an existing fragment.
///
/// The kind token only feeds diagnostics; it never changes the produced shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementCreator {
    refinement: Token,
    kind: Token,
}

impl RefinementCreator {
    pub fn new(refinement: Token, kind: Token) -> Result<Self> {
        check_property_name(refinement.method())?;
        trace!(
            "refinement creator `{}` -> `{}` for kind `{}`",
            refinement.name(),
            refinement.method(),
            kind.name()
        );
        Ok(Self { refinement, kind })
    }

    pub fn token(&self) -> &Token {
        &self.refinement
    }

    pub fn kind(&self) -> &Token {
        &self.kind
    }

    /// Builds `target.method(args..)`.
    ///
    /// Fails with `InvalidTarget` when `target` is `None` or not chainable.
    pub fn apply(&self, target: impl Into<Option<Expr>>, args: Vec<Expr>) -> Result<Expr> {
        let target = require_chain(target.into(), self.refinement.method(), || {
            format!("refinement `{}` of value kind `{}`", self.refinement.name(), self.kind.name())
        })?;
        let member = expr::property_access(target, self.refinement.method())?;
        expr::call(member, args)
    }
}

/// Shorthand for [`RefinementCreator::new`].
pub fn make_refinement_creator(refinement: Token, kind: Token) -> Result<RefinementCreator> {
    RefinementCreator::new(refinement, kind)
}

/// Refinement creators keyed by semantic name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
    entries: BTreeMap<String, RefinementCreator>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a creator under its semantic name, replacing any previous entry.
    pub fn insert(&mut self, creator: RefinementCreator) -> Option<RefinementCreator> {
        self.entries.insert(creator.token().name().to_string(), creator)
    }

    pub fn get(&self, name: &str) -> Option<&RefinementCreator> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Semantic names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefinementCreator)> {
        self.entries.iter().map(|(name, creator)| (name.as_str(), creator))
    }

    /// Adds `shared` entries whose names are not already present. Existing
    /// (kind-specific) entries win.
    pub fn merge_shared(mut self, shared: Members) -> Self {
        for (name, creator) in shared.entries {
            match self.entries.entry(name) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(creator);
                }
                btree_map::Entry::Occupied(slot) => {
                    debug!(
                        "kind `{}` shadows shared member `{}`",
                        creator.kind().name(),
                        slot.key()
                    );
                }
            }
        }
        self
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = (&'a String, &'a RefinementCreator);
    type IntoIter = btree_map::Iter<'a, String, RefinementCreator>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds one fresh refinement creator per shared token, parameterized by `kind`.
pub fn build_shared_member_creators(registry: &TokenRegistry, kind: &Token) -> Result<Members> {
    let mut members = Members::new();
    for token in registry.shared_tokens() {
        members.insert(RefinementCreator::new(token, kind.clone())?);
    }
    Ok(members)
}
