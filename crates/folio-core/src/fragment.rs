//! Metadata fragments and the reconciled entity graph.
//!
//! Extraction yields a flat list of fragments in document order, following the
//! W3C microdata JSON shape: `{"items": [{"id": ..., "type": [...],
//! "properties": {...}}]}`. Fragments sharing an identity URI are merged into
//! a single graph node; fragments without one share the anonymous bucket.

use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One value under a fragment property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FragmentValue {
    Literal(String),
    Node(RawFragment),
}

impl FragmentValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&RawFragment> {
        match self {
            Self::Literal(_) => None,
            Self::Node(f) => Some(f),
        }
    }
}

// Extractors are loose about scalar types (a year may arrive as a bare JSON
// number), so anything that is not an object is read as a literal.
impl<'de> Deserialize<'de> for FragmentValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw {
            serde_json::Value::Object(_) => serde_json::from_value(raw)
                .map(FragmentValue::Node)
                .map_err(D::Error::custom),
            serde_json::Value::String(s) => Ok(FragmentValue::Literal(s)),
            serde_json::Value::Number(n) => Ok(FragmentValue::Literal(n.to_string())),
            serde_json::Value::Bool(b) => Ok(FragmentValue::Literal(b.to_string())),
            serde_json::Value::Null => Ok(FragmentValue::Literal(String::new())),
            serde_json::Value::Array(_) => {
                Err(D::Error::custom("property values cannot nest arrays"))
            }
        }
    }
}

/// A parsed metadata node: optional identity URI, type URIs, and multi-valued
/// properties in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<FragmentValue>>,
}

impl RawFragment {
    /// Fragment carrying nothing but a `name`, the shape bare-string
    /// references are promoted to before resolution.
    pub fn from_name(name: impl Into<String>) -> Self {
        let mut fragment = Self::default();
        fragment
            .properties
            .insert("name".to_string(), vec![FragmentValue::Literal(name.into())]);
        fragment
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Values under `name`, empty when the property is absent.
    pub fn values(&self, name: &str) -> &[FragmentValue] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value under `name` when it is a literal.
    pub fn first_literal(&self, name: &str) -> Option<&str> {
        self.values(name).first().and_then(FragmentValue::as_literal)
    }

    /// Appends a value to `name`, creating the property if needed.
    pub fn push_value(&mut self, name: &str, value: FragmentValue) {
        self.properties.entry(name.to_string()).or_default().push(value);
    }

    /// Folds `other` into `self`: type lists are set-unioned preserving
    /// first-seen order, property lists are replaced key by key (last write
    /// wins).
    pub fn merge_from(&mut self, other: RawFragment) {
        for ty in other.types {
            if !self.types.contains(&ty) {
                self.types.push(ty);
            }
        }
        for (name, values) in other.properties {
            self.properties.insert(name, values);
        }
    }
}

/// Top-level extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicrodataDocument {
    #[serde(default)]
    pub items: Vec<RawFragment>,
}

/// Fragments reconciled by identity URI.
///
/// The anonymous bucket is always present, so a document that has no
/// identifier yet still resolves to the merged id-less fragments.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    named: BTreeMap<String, RawFragment>,
    anonymous: RawFragment,
}

impl EntityGraph {
    pub fn build(fragments: impl IntoIterator<Item = RawFragment>) -> Self {
        let mut graph = Self::default();
        for fragment in fragments {
            graph.insert(fragment);
        }
        graph
    }

    /// Merges a fragment in, keyed by its identity URI. An absent or empty
    /// identifier lands in the anonymous bucket.
    pub fn insert(&mut self, fragment: RawFragment) {
        match fragment.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => match self.named.get_mut(&id) {
                Some(existing) => existing.merge_from(fragment),
                None => {
                    self.named.insert(id, fragment);
                }
            },
            None => self.anonymous.merge_from(fragment),
        }
    }

    pub fn get(&self, uri: &str) -> Option<&RawFragment> {
        self.named.get(uri)
    }

    pub fn anonymous(&self) -> &RawFragment {
        &self.anonymous
    }

    /// All graph nodes, the anonymous bucket first, then named nodes in URI
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &RawFragment)> {
        std::iter::once((None, &self.anonymous))
            .chain(self.named.iter().map(|(uri, f)| (Some(uri.as_str()), f)))
    }

    /// Number of named nodes, the anonymous bucket excluded.
    pub fn named_len(&self) -> usize {
        self.named.len()
    }
}
