//! Canonical entity resolution.
//!
//! A related value is either a bare name, a fragment carrying an explicit
//! concept URI, or a fragment pointing back at another page of the source
//! project. Exactly one strategy decides each reference; the strategies never
//! fall through to one another.

use crate::error::{EnrichError, EnrichResult};
use crate::vocab;
use folio_core::util::wiki_urldecode;
use folio_core::{
    EntitySearch, EntityUriParser, FolioConfig, FragmentValue, ItemId, ItemLookup, RawFragment,
    SearchCriteria,
};
use std::sync::Arc;
use tracing::debug;

/// Search cap distinguishing "exactly one" from "ambiguous" cheaply.
pub(crate) const DISAMBIGUATION_LIMIT: usize = 2;

/// Non-fatal outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ItemId),
    Unresolved,
}

pub struct EntityResolver {
    lookup: Arc<dyn ItemLookup>,
    search: Arc<dyn EntitySearch>,
    uri_parser: EntityUriParser,
    source_site: String,
    page_base_url: String,
    language: String,
    strict_ids: bool,
}

impl EntityResolver {
    pub fn new(
        lookup: Arc<dyn ItemLookup>,
        search: Arc<dyn EntitySearch>,
        config: &FolioConfig,
    ) -> Self {
        Self {
            lookup,
            search,
            uri_parser: EntityUriParser::new(&config.wikibase.entity_base_uri),
            source_site: config.source.site.clone(),
            page_base_url: config.source.page_base_url.clone(),
            language: config.wikibase.language.clone(),
            strict_ids: config.enrich.strict_ids,
        }
    }

    /// Resolves one related value. Bare strings are promoted to anonymous
    /// fragments carrying only a name, which makes them reachable by the
    /// disambiguation search and nothing else.
    pub async fn resolve(
        &self,
        value: &FragmentValue,
        expected_class: Option<&ItemId>,
    ) -> EnrichResult<Resolution> {
        match value {
            FragmentValue::Node(fragment) => self.resolve_fragment(fragment, expected_class).await,
            FragmentValue::Literal(name) => {
                self.resolve_fragment(&RawFragment::from_name(name.clone()), expected_class)
                    .await
            }
        }
    }

    async fn resolve_fragment(
        &self,
        fragment: &RawFragment,
        expected_class: Option<&ItemId>,
    ) -> EnrichResult<Resolution> {
        if let Some(id) = &fragment.id {
            return self.resolve_explicit_id(id);
        }
        if fragment.has_property(vocab::MAIN_ENTITY_OF_PAGE) {
            return self.resolve_back_reference(fragment).await;
        }
        if let Some(class) = expected_class {
            if let Some(name) = fragment.first_literal(vocab::NAME) {
                return self.resolve_by_name(name, class).await;
            }
        }
        Ok(Resolution::Unresolved)
    }

    fn resolve_explicit_id(&self, id: &str) -> EnrichResult<Resolution> {
        match self.uri_parser.parse_item_uri(id) {
            Ok(item_id) => Ok(Resolution::Resolved(item_id)),
            Err(error) if self.strict_ids => Err(EnrichError::MalformedId(error)),
            Err(error) => {
                debug!(%error, "explicit reference does not parse, leaving unresolved");
                Ok(Resolution::Unresolved)
            }
        }
    }

    /// A fragment naming its own page on the source project resolves to the
    /// item linked from that page. A lookup miss is final: such a fragment
    /// is never retried through the name search.
    async fn resolve_back_reference(&self, fragment: &RawFragment) -> EnrichResult<Resolution> {
        let Some(page_url) = fragment.first_literal(vocab::MAIN_ENTITY_OF_PAGE) else {
            return Ok(Resolution::Unresolved);
        };
        let Some(encoded) = page_url.strip_prefix(self.page_base_url.as_str()) else {
            debug!(page_url, "back-reference leaves the source project");
            return Ok(Resolution::Unresolved);
        };
        let title = wiki_urldecode(encoded);
        let item = self.lookup.item_for_page(&self.source_site, &title).await?;
        match item.and_then(|item| item.id) {
            Some(id) => Ok(Resolution::Resolved(id)),
            None => {
                debug!(%title, "back-referenced page has no item");
                Ok(Resolution::Unresolved)
            }
        }
    }

    async fn resolve_by_name(&self, name: &str, class: &ItemId) -> EnrichResult<Resolution> {
        let criteria = SearchCriteria::LabelInClass {
            label: name.to_string(),
            language: self.language.clone(),
            class: class.clone(),
        };
        let ids = self
            .search
            .entity_ids(&criteria, DISAMBIGUATION_LIMIT)
            .await?;
        match ids.as_slice() {
            [id] => Ok(Resolution::Resolved(id.clone())),
            others => {
                debug!(name, matches = others.len(), "name is ambiguous or unknown");
                Ok(Resolution::Unresolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::test_support::{InMemoryItemLookup, ScriptedEntitySearch};
    use folio_core::Item;
    use serde_json::json;

    fn resolver(lookup: InMemoryItemLookup, search: ScriptedEntitySearch) -> EntityResolver {
        EntityResolver::new(Arc::new(lookup), Arc::new(search), &FolioConfig::default())
    }

    fn node(raw: serde_json::Value) -> FragmentValue {
        FragmentValue::Node(serde_json::from_value(raw).unwrap())
    }

    fn item_with_id(numeric: u64) -> Item {
        let mut item = Item::new();
        item.id = Some(ItemId::from_numeric(numeric));
        item
    }

    #[tokio::test]
    async fn test_explicit_id_needs_no_lookup() {
        let lookup = InMemoryItemLookup::new();
        let search = ScriptedEntitySearch::new();
        let resolver = resolver(lookup.clone(), search.clone());

        let value = node(json!({ "id": "http://www.wikidata.org/entity/Q535" }));
        let resolution = resolver.resolve(&value, None).await.unwrap();

        assert_eq!(resolution, Resolution::Resolved(ItemId::from_numeric(535)));
        assert!(lookup.calls().is_empty());
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_explicit_id_is_fatal_by_default() {
        let resolver = resolver(InMemoryItemLookup::new(), ScriptedEntitySearch::new());
        let value = node(json!({ "id": "http://www.wikidata.org/entity/XYZ" }));
        let error = resolver.resolve(&value, None).await.unwrap_err();
        assert!(matches!(error, EnrichError::MalformedId(_)));
    }

    #[tokio::test]
    async fn test_malformed_explicit_id_tolerated_when_lax() {
        let mut config = FolioConfig::default();
        config.enrich.strict_ids = false;
        let resolver = EntityResolver::new(
            Arc::new(InMemoryItemLookup::new()),
            Arc::new(ScriptedEntitySearch::new()),
            &config,
        );
        let value = node(json!({ "id": "http://www.wikidata.org/entity/XYZ" }));
        let resolution = resolver.resolve(&value, None).await.unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_back_reference_resolves_through_page_lookup() {
        let lookup = InMemoryItemLookup::new().with_item(
            "frwikisource",
            "Les Misérables",
            item_with_id(180736),
        );
        let resolver = resolver(lookup.clone(), ScriptedEntitySearch::new());

        let value = node(json!({
            "properties": {
                "mainEntityOfPage": ["https://fr.wikisource.org/wiki/Les_Mis%C3%A9rables"],
            },
        }));
        let resolution = resolver.resolve(&value, None).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved(ItemId::from_numeric(180736))
        );
        assert_eq!(
            lookup.calls(),
            vec![("frwikisource".to_string(), "Les Misérables".to_string())]
        );
    }

    #[tokio::test]
    async fn test_back_reference_miss_never_reaches_the_name_search() {
        let search = ScriptedEntitySearch::new().with_response(
            SearchCriteria::LabelInClass {
                label: "Les Misérables".to_string(),
                language: "fr".to_string(),
                class: ItemId::from_numeric(386724),
            },
            vec![ItemId::from_numeric(180736)],
        );
        let resolver = resolver(InMemoryItemLookup::new(), search.clone());

        let value = node(json!({
            "properties": {
                "mainEntityOfPage": ["https://fr.wikisource.org/wiki/Absente"],
                "name": ["Les Misérables"],
            },
        }));
        let resolution = resolver
            .resolve(&value, Some(&ItemId::from_numeric(386724)))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Unresolved);
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn test_back_reference_outside_the_source_project() {
        let lookup = InMemoryItemLookup::new();
        let resolver = resolver(lookup.clone(), ScriptedEntitySearch::new());

        let value = node(json!({
            "properties": {
                "mainEntityOfPage": ["https://en.wikisource.org/wiki/Les_Miserables"],
            },
        }));
        let resolution = resolver.resolve(&value, None).await.unwrap();

        assert_eq!(resolution, Resolution::Unresolved);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_back_reference_to_page_without_item() {
        let lookup =
            InMemoryItemLookup::new().with_item("frwikisource", "Nouvelle page", Item::new());
        let resolver = resolver(lookup, ScriptedEntitySearch::new());

        let value = node(json!({
            "properties": {
                "mainEntityOfPage": ["https://fr.wikisource.org/wiki/Nouvelle_page"],
            },
        }));
        let resolution = resolver.resolve(&value, None).await.unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_bare_name_disambiguates_within_expected_class() {
        let search = ScriptedEntitySearch::new().with_response(
            SearchCriteria::LabelInClass {
                label: "Victor Hugo".to_string(),
                language: "fr".to_string(),
                class: ItemId::from_numeric(5),
            },
            vec![ItemId::from_numeric(535)],
        );
        let resolver = resolver(InMemoryItemLookup::new(), search);

        let value = FragmentValue::Literal("Victor Hugo".to_string());
        let resolution = resolver
            .resolve(&value, Some(&ItemId::from_numeric(5)))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Resolved(ItemId::from_numeric(535)));
    }

    #[tokio::test]
    async fn test_ambiguous_name_stays_unresolved() {
        let search = ScriptedEntitySearch::new().with_response(
            SearchCriteria::LabelInClass {
                label: "Victor Hugo".to_string(),
                language: "fr".to_string(),
                class: ItemId::from_numeric(5),
            },
            vec![ItemId::from_numeric(535), ItemId::from_numeric(3558930)],
        );
        let resolver = resolver(InMemoryItemLookup::new(), search);

        let value = FragmentValue::Literal("Victor Hugo".to_string());
        let resolution = resolver
            .resolve(&value, Some(&ItemId::from_numeric(5)))
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_name_without_expected_class_stays_unresolved() {
        let search = ScriptedEntitySearch::new();
        let resolver = resolver(InMemoryItemLookup::new(), search.clone());

        let value = FragmentValue::Literal("Victor Hugo".to_string());
        let resolution = resolver.resolve(&value, None).await.unwrap();

        assert_eq!(resolution, Resolution::Unresolved);
        assert!(search.calls().is_empty());
    }
}
