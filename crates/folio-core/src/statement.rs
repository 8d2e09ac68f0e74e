//! Statements, snaks, and references.
//!
//! The wire shape follows the Wikibase entity JSON: statements are grouped
//! under their main snak's property inside `claims`, references group their
//! snaks by property next to a `snaks-order` list. Internally both are kept
//! flat so insertion order survives a full load/serialize cycle.

use crate::datavalue::DataValue;
use crate::ids::PropertyId;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakType {
    Value,
    SomeValue,
    NoValue,
}

/// A property/value pair, the building block of statements and references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snak {
    pub snaktype: SnakType,
    pub property: PropertyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datavalue: Option<DataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl Snak {
    pub fn value(property: PropertyId, datavalue: DataValue) -> Self {
        Self {
            snaktype: SnakType::Value,
            property,
            hash: None,
            datavalue: Some(datavalue),
            datatype: None,
        }
    }
}

/// Provenance block attached to a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub hash: Option<String>,
    pub snaks: Vec<Snak>,
}

impl Reference {
    pub fn new(snaks: Vec<Snak>) -> Self {
        Self { hash: None, snaks }
    }
}

#[derive(Serialize, Deserialize)]
struct RawReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    snaks: BTreeMap<String, Vec<Snak>>,
    #[serde(rename = "snaks-order", default, skip_serializing_if = "Vec::is_empty")]
    snaks_order: Vec<String>,
}

impl Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut snaks: BTreeMap<String, Vec<Snak>> = BTreeMap::new();
        let mut snaks_order = Vec::new();
        for snak in &self.snaks {
            let key = snak.property.as_str().to_string();
            if !snaks_order.contains(&key) {
                snaks_order.push(key.clone());
            }
            snaks.entry(key).or_default().push(snak.clone());
        }
        RawReference {
            hash: self.hash.clone(),
            snaks,
            snaks_order,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = RawReference::deserialize(deserializer)?;
        let mut snaks = Vec::new();
        for property in &raw.snaks_order {
            if let Some(group) = raw.snaks.remove(property) {
                snaks.extend(group);
            }
        }
        // Anything the order list did not mention still counts.
        for group in raw.snaks.into_values() {
            snaks.extend(group);
        }
        Ok(Self {
            hash: raw.hash,
            snaks,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

fn statement_type() -> String {
    "statement".to_string()
}

/// One claim about an item. Statements written by this crate carry no GUID;
/// the knowledge base assigns one on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub mainsnak: Snak,
    #[serde(rename = "type", default = "statement_type")]
    pub statement_type: String,
    #[serde(default)]
    pub rank: Rank,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<serde_json::Value>,
    #[serde(
        rename = "qualifiers-order",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub qualifiers_order: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Statement {
    pub fn new(mainsnak: Snak) -> Self {
        Self {
            id: None,
            mainsnak,
            statement_type: statement_type(),
            rank: Rank::Normal,
            qualifiers: None,
            qualifiers_order: None,
            references: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn property(&self) -> &PropertyId {
        &self.mainsnak.property
    }
}

/// Flat, insertion-ordered statement collection serialized as the grouped
/// `claims` map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementList(Vec<Statement>);

impl StatementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.0.push(statement);
    }

    pub fn has_property(&self, property: &PropertyId) -> bool {
        self.0.iter().any(|s| s.property() == property)
    }

    pub fn by_property<'a>(
        &'a self,
        property: &'a PropertyId,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.0.iter().filter(move |s| s.property() == property)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for StatementList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&Statement>> = HashMap::new();
        for statement in &self.0 {
            let key = statement.property().as_str();
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(statement);
        }
        let mut map = serializer.serialize_map(Some(order.len()))?;
        for key in order {
            map.serialize_entry(key, &groups[key])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatementList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // PHP serializers emit an empty claims map as `[]`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Grouped {
            Map(BTreeMap<String, Vec<Statement>>),
            Seq(Vec<()>),
        }
        Ok(match Grouped::deserialize(deserializer)? {
            Grouped::Map(grouped) => Self(grouped.into_values().flatten().collect()),
            Grouped::Seq(_) => Self::default(),
        })
    }
}
