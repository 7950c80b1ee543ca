//! Token registry: semantic rule names mapped to the library's method names.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::errors::{GenError, Result};
use crate::lexical::check_property_name;

/// A semantic name paired with the literal method name it generates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    name: String,
    method: String,
}

impl Token {
    pub fn new(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
        }
    }

    /// Semantic name (`starts_with`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Literal method name (`startsWith`).
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Tokens of one value kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTokens {
    /// Factory method on the namespace. Defaults to the kind name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
    /// Every refinement the library offers for this kind.
    #[serde(default)]
    pub members: BTreeMap<String, String>,
}

/// Read-only token table: one partition per value kind plus a shared partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistry {
    #[serde(default)]
    pub shared: BTreeMap<String, String>,
    #[serde(default)]
    pub kinds: BTreeMap<String, KindTokens>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a kind whose factory method is named after the kind.
    pub fn with_kind<N, M>(self, kind: impl Into<String>, members: impl IntoIterator<Item = (N, M)>) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        self.with_kind_factory(kind, None::<String>, members)
    }

    /// Adds a kind with an explicit factory method name.
    pub fn with_kind_factory<N, M>(
        mut self,
        kind: impl Into<String>,
        factory: Option<impl Into<String>>,
        members: impl IntoIterator<Item = (N, M)>,
    ) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        let tokens = KindTokens {
            factory: factory.map(Into::into),
            members: members.into_iter().map(|(name, method)| (name.into(), method.into())).collect(),
        };
        self.kinds.insert(kind.into(), tokens);
        self
    }

    /// Adds entries to the shared partition.
    pub fn with_shared<N, M>(mut self, members: impl IntoIterator<Item = (N, M)>) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        self.shared
            .extend(members.into_iter().map(|(name, method)| (name.into(), method.into())));
        self
    }

    /// Kind names in sorted order.
    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// The token for a kind's root factory call.
    pub fn kind_token(&self, kind: &str) -> Result<Token> {
        let tokens = self.kinds.get(kind).ok_or_else(|| GenError::UnknownKind {
            kind: kind.to_string(),
        })?;
        Ok(Token::new(kind, tokens.factory.as_deref().unwrap_or(kind)))
    }

    /// Looks a semantic name up in the kind's own partition only.
    pub fn member(&self, kind: &str, name: &str) -> Result<Token> {
        let tokens = self.kinds.get(kind).ok_or_else(|| GenError::UnknownKind {
            kind: kind.to_string(),
        })?;
        tokens
            .members
            .get(name)
            .map(|method| Token::new(name, method.as_str()))
            .ok_or_else(|| GenError::UnknownToken {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    /// All tokens of the kind's own partition.
    pub fn members(&self, kind: &str) -> Result<Vec<Token>> {
        let tokens = self.kinds.get(kind).ok_or_else(|| GenError::UnknownKind {
            kind: kind.to_string(),
        })?;
        Ok(tokens
            .members
            .iter()
            .map(|(name, method)| Token::new(name.as_str(), method.as_str()))
            .collect())
    }

    /// All tokens of the shared partition.
    pub fn shared_tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.shared
            .iter()
            .map(|(name, method)| Token::new(name.as_str(), method.as_str()))
    }

    /// Checks every name lexically and that no two reachable semantic names of a
    /// kind share one method. Shared entries shadowed by a kind entry of the
    /// same semantic name are not reachable from that kind.
    pub fn validate(&self) -> Result<()> {
        for (name, method) in &self.shared {
            check_property_name(name)?;
            check_property_name(method)?;
        }

        for (kind, tokens) in &self.kinds {
            check_property_name(kind)?;
            if let Some(factory) = &tokens.factory {
                check_property_name(factory)?;
            }

            let mut by_method: BTreeMap<&str, &str> = BTreeMap::new();
            let own = tokens.members.iter();
            let shared = self
                .shared
                .iter()
                .filter(|(name, _)| !tokens.members.contains_key(*name));
            for (name, method) in own.chain(shared) {
                check_property_name(name)?;
                check_property_name(method)?;
                match by_method.entry(method.as_str()) {
                    Entry::Vacant(slot) => {
                        slot.insert(name.as_str());
                    }
                    Entry::Occupied(slot) => {
                        return Err(GenError::LiteralCollision {
                            kind: kind.clone(),
                            method: method.clone(),
                            first: slot.get().to_string(),
                            second: name.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
