//! Entity and property identifiers.
//!
//! Wikibase serializes item ids as `Q<n>` and property ids as `P<n>` where
//! `n` is a positive integer without leading zeros. Fragments reference
//! entities through full concept URIs (`http://www.wikidata.org/entity/Q42`),
//! which [`EntityUriParser`] resolves against a configured base.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to interpret an identifier or entity URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("invalid item id: {0:?}")]
    InvalidItemId(String),
    #[error("invalid property id: {0:?}")]
    InvalidPropertyId(String),
    #[error("URI {uri:?} is not under the entity namespace {base:?}")]
    ForeignUri { uri: String, base: String },
}

fn parse_serial(input: &str, prefix: char) -> Option<(String, u64)> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if !first.eq_ignore_ascii_case(&prefix) {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    let numeric: u64 = digits.parse().ok()?;
    Some((format!("{prefix}{digits}"), numeric))
}

/// Identifier of a Wikibase item, e.g. `Q3331189`.
///
/// Lowercase input is accepted and normalized to the canonical uppercase
/// serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    serialization: String,
    numeric: u64,
}

impl ItemId {
    pub fn new(input: &str) -> Result<Self, IdParseError> {
        let (serialization, numeric) = parse_serial(input, 'Q')
            .ok_or_else(|| IdParseError::InvalidItemId(input.to_string()))?;
        Ok(Self {
            serialization,
            numeric,
        })
    }

    /// Builds the id for a known serial without going through validation.
    pub fn from_numeric(numeric: u64) -> Self {
        Self {
            serialization: format!("Q{numeric}"),
            numeric,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.serialization
    }

    pub fn numeric(&self) -> u64 {
        self.numeric
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

impl FromStr for ItemId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.serialization
    }
}

/// Identifier of a Wikibase property, e.g. `P31`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyId {
    serialization: String,
    numeric: u64,
}

impl PropertyId {
    pub fn new(input: &str) -> Result<Self, IdParseError> {
        let (serialization, numeric) = parse_serial(input, 'P')
            .ok_or_else(|| IdParseError::InvalidPropertyId(input.to_string()))?;
        Ok(Self {
            serialization,
            numeric,
        })
    }

    /// Builds the id for a known serial without going through validation.
    pub fn from_numeric(numeric: u64) -> Self {
        Self {
            serialization: format!("P{numeric}"),
            numeric,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.serialization
    }

    pub fn numeric(&self) -> u64 {
        self.numeric
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization)
    }
}

impl FromStr for PropertyId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PropertyId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PropertyId> for String {
    fn from(id: PropertyId) -> Self {
        id.serialization
    }
}

/// Resolves concept URIs against the knowledge base's entity namespace.
#[derive(Debug, Clone)]
pub struct EntityUriParser {
    base: String,
}

impl EntityUriParser {
    /// `base` is the concept base URI, normalized to end with `/`.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full concept URI for an item id.
    pub fn item_uri(&self, id: &ItemId) -> String {
        format!("{}{}", self.base, id)
    }

    /// Extracts the item id from a concept URI under the configured base.
    pub fn parse_item_uri(&self, uri: &str) -> Result<ItemId, IdParseError> {
        let serial = uri
            .strip_prefix(self.base.as_str())
            .ok_or_else(|| IdParseError::ForeignUri {
                uri: uri.to_string(),
                base: self.base.clone(),
            })?;
        ItemId::new(serial)
    }
}
