//! Wikibase items.
//!
//! The serialized shape mirrors the entity JSON returned by `wbgetentities`
//! so that a loaded item can be written back without disturbing content this
//! pipeline does not touch.

use crate::ids::ItemId;
use crate::statement::StatementList;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A language/value pair used for labels, descriptions and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub language: String,
    pub value: String,
}

impl Term {
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            value: value.into(),
        }
    }
}

/// Link from an item to a page on a client wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    pub site: String,
    pub title: String,
    #[serde(default)]
    pub badges: Vec<ItemId>,
}

impl SiteLink {
    pub fn new(site: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            title: title.into(),
            badges: Vec::new(),
        }
    }

    /// Set-union append: a badge already present is not duplicated.
    pub fn add_badge(&mut self, badge: ItemId) {
        if !self.badges.contains(&badge) {
            self.badges.push(badge);
        }
    }
}

fn item_type() -> String {
    "item".to_string()
}

// PHP serializers emit empty associative arrays as `[]`; accept that shape
// wherever an object map is expected.
fn map_or_empty_seq<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrSeq<V> {
        Map(BTreeMap<String, V>),
        Seq(Vec<()>),
    }
    Ok(match MapOrSeq::deserialize(deserializer)? {
        MapOrSeq::Map(map) => map,
        MapOrSeq::Seq(_) => BTreeMap::new(),
    })
}

/// A knowledge-base item: terms, statements, and site links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type", default = "item_type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "map_or_empty_seq")]
    pub labels: BTreeMap<String, Term>,
    #[serde(default, deserialize_with = "map_or_empty_seq")]
    pub descriptions: BTreeMap<String, Term>,
    #[serde(default, deserialize_with = "map_or_empty_seq")]
    pub aliases: BTreeMap<String, Vec<Term>>,
    #[serde(rename = "claims", default)]
    pub statements: StatementList,
    #[serde(default, deserialize_with = "map_or_empty_seq")]
    pub sitelinks: BTreeMap<String, SiteLink>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            entity_type: item_type(),
            id: None,
            labels: BTreeMap::new(),
            descriptions: BTreeMap::new(),
            aliases: BTreeMap::new(),
            statements: StatementList::new(),
            sitelinks: BTreeMap::new(),
        }
    }
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels.get(language).map(|t| t.value.as_str())
    }

    pub fn has_label(&self, language: &str) -> bool {
        self.labels.contains_key(language)
    }

    pub fn set_label(&mut self, language: &str, value: impl Into<String>) {
        self.labels
            .insert(language.to_string(), Term::new(language, value));
    }

    pub fn sitelink(&self, site: &str) -> Option<&SiteLink> {
        self.sitelinks.get(site)
    }

    pub fn sitelink_mut(&mut self, site: &str) -> Option<&mut SiteLink> {
        self.sitelinks.get_mut(site)
    }

    pub fn set_sitelink(&mut self, link: SiteLink) {
        self.sitelinks.insert(link.site.clone(), link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loaded_item_round_trips() {
        let raw = json!({
            "type": "item",
            "id": "Q535",
            "labels": { "fr": { "language": "fr", "value": "Victor Hugo" } },
            "descriptions": { "fr": { "language": "fr", "value": "écrivain français" } },
            "aliases": { "fr": [{ "language": "fr", "value": "V. Hugo" }] },
            "claims": {
                "P31": [{
                    "id": "Q535$aaaa-bbbb",
                    "mainsnak": {
                        "snaktype": "value",
                        "property": "P31",
                        "datavalue": {
                            "value": { "entity-type": "item", "numeric-id": 5, "id": "Q5" },
                            "type": "wikibase-entityid",
                        },
                        "datatype": "wikibase-item",
                    },
                    "type": "statement",
                    "rank": "normal",
                }],
            },
            "sitelinks": {
                "frwikisource": {
                    "site": "frwikisource",
                    "title": "Auteur:Victor Hugo",
                    "badges": [],
                },
            },
        });
        let item: Item = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.id.as_ref().unwrap().as_str(), "Q535");
        assert_eq!(item.label("fr"), Some("Victor Hugo"));
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_accepts_php_empty_array_maps() {
        let raw = json!({
            "type": "item",
            "id": "Q1",
            "labels": [],
            "descriptions": [],
            "aliases": [],
            "claims": [],
            "sitelinks": [],
        });
        let item: Item = serde_json::from_value(raw).unwrap();
        assert!(item.labels.is_empty());
        assert!(item.statements.is_empty());
    }

    #[test]
    fn test_fresh_stub_shape() {
        let mut item = Item::new();
        item.set_sitelink(SiteLink::new("frwikisource", "Les Misérables"));

        let raw = serde_json::to_value(&item).unwrap();
        assert_eq!(raw["type"], "item");
        assert!(raw.get("id").is_none());
        assert_eq!(raw["labels"], json!({}));
        assert_eq!(raw["claims"], json!({}));
        assert_eq!(
            raw["sitelinks"]["frwikisource"],
            json!({ "site": "frwikisource", "title": "Les Misérables", "badges": [] })
        );
    }

    #[test]
    fn test_set_label_fills_language() {
        let mut item = Item::new();
        assert!(!item.has_label("fr"));
        item.set_label("fr", "Les Misérables");
        assert_eq!(item.label("fr"), Some("Les Misérables"));
    }

    #[test]
    fn test_badge_union_skips_duplicates() {
        let mut link = SiteLink::new("frwikisource", "Page");
        link.add_badge(ItemId::from_numeric(17437798));
        link.add_badge(ItemId::from_numeric(17437798));
        link.add_badge(ItemId::from_numeric(20748091));
        assert_eq!(link.badges.len(), 2);
    }
}
