//! Pipeline configuration.
//!
//! Defaults bind the pipeline to French Wikisource as the fragment source and
//! Wikidata as the knowledge base, which is the deployment the statement
//! schedule was written for. Every binding can be overridden from a config
//! file, so nothing below is load-bearing beyond being the default.

use crate::ids::{ItemId, PropertyId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub source: SourceConfig,
    pub wikibase: WikibaseConfig,
    pub media: MediaConfig,
    pub network: NetworkConfig,
    pub enrich: EnrichConfig,
}

/// Where documents and their embedded metadata come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site id the knowledge base uses for the source project.
    pub site: String,
    /// Base URL of the source project's pages, with trailing slash.
    pub page_base_url: String,
    /// Extraction service returning W3C microdata JSON for a page URL.
    /// When unset, fragments must be supplied from a file.
    pub microdata_endpoint: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            site: "frwikisource".to_string(),
            page_base_url: "https://fr.wikisource.org/wiki/".to_string(),
            microdata_endpoint: None,
        }
    }
}

/// Knowledge-base endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikibaseConfig {
    pub api_url: String,
    pub sparql_url: String,
    /// Concept base URI entity references are resolved against.
    pub entity_base_uri: String,
    /// Working language for labels and disambiguation searches.
    pub language: String,
}

impl Default for WikibaseConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.wikidata.org/w/api.php".to_string(),
            sparql_url: "https://query.wikidata.org/sparql".to_string(),
            entity_base_uri: "http://www.wikidata.org/entity/".to_string(),
            language: "fr".to_string(),
        }
    }
}

/// Shared media repository probed for scan files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub api_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_url: "https://commons.wikimedia.org/w/api.php".to_string(),
        }
    }
}

/// HTTP behavior shared by all clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    /// Retries after the first attempt, for retryable failures only.
    pub retries: u32,
    pub retry_delay_ms: u64,
    /// Upper bound on relation lookups resolved in parallel.
    pub lookup_concurrency: usize,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 2,
            retry_delay_ms: 500,
            lookup_concurrency: 4,
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Statement synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Property of the provenance reference attached to every new statement.
    pub imported_from: PropertyId,
    /// Item the provenance reference points at (the source project).
    pub source_item: ItemId,
    /// Property used for type statements.
    pub instance_of: PropertyId,
    /// Property matching language codes during language resolution.
    pub language_code_property: PropertyId,
    /// Type URI that flips part-of relations to their editorial variant.
    pub chapter_type: String,
    /// Fragment type URI to knowledge-base class, first match wins.
    pub type_mapping: BTreeMap<String, ItemId>,
    /// Fail the conversion when an explicit entity reference does not parse.
    /// When off such references resolve to nothing instead.
    pub strict_ids: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        let type_mapping = BTreeMap::from([
            ("http://schema.org/Book".to_string(), ItemId::from_numeric(3331189)),
            ("http://schema.org/Thesis".to_string(), ItemId::from_numeric(1266946)),
            (
                "http://schema.org/PublicationVolume".to_string(),
                ItemId::from_numeric(28869365),
            ),
            ("http://schema.org/Article".to_string(), ItemId::from_numeric(191067)),
            ("http://schema.org/Chapter".to_string(), ItemId::from_numeric(1980247)),
            ("http://schema.org/Collection".to_string(), ItemId::from_numeric(3331189)),
            (
                "http://schema.org/CreativeWork".to_string(),
                ItemId::from_numeric(3331189),
            ),
        ]);
        Self {
            imported_from: PropertyId::from_numeric(143),
            source_item: ItemId::from_numeric(15156541),
            instance_of: PropertyId::from_numeric(31),
            language_code_property: PropertyId::from_numeric(305),
            chapter_type: "http://schema.org/Chapter".to_string(),
            type_mapping,
            strict_ids: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binding() {
        let config = FolioConfig::default();
        assert_eq!(config.source.site, "frwikisource");
        assert_eq!(config.wikibase.entity_base_uri, "http://www.wikidata.org/entity/");
        assert_eq!(config.enrich.imported_from.as_str(), "P143");
        assert_eq!(config.enrich.source_item.as_str(), "Q15156541");
        assert_eq!(config.enrich.type_mapping.len(), 7);
        assert_eq!(
            config.enrich.type_mapping["http://schema.org/Book"].as_str(),
            "Q3331189"
        );
        assert!(config.enrich.strict_ids);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FolioConfig = toml::from_str(
            r#"
            [source]
            site = "enwikisource"
            page_base_url = "https://en.wikisource.org/wiki/"

            [enrich]
            strict_ids = false
            "#,
        )
        .unwrap();
        assert_eq!(config.source.site, "enwikisource");
        assert!(!config.enrich.strict_ids);
        // Untouched sections fall back to the defaults.
        assert_eq!(config.wikibase.language, "fr");
        assert_eq!(config.network.retries, 2);
        assert_eq!(config.enrich.type_mapping.len(), 7);
    }

    #[test]
    fn test_type_mapping_overridable_from_toml() {
        let config: FolioConfig = toml::from_str(
            r#"
            [enrich.type_mapping]
            "http://schema.org/Book" = "Q571"
            "#,
        )
        .unwrap();
        assert_eq!(config.enrich.type_mapping.len(), 1);
        assert_eq!(
            config.enrich.type_mapping["http://schema.org/Book"].as_str(),
            "Q571"
        );
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = FolioConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: FolioConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.enrich.type_mapping, config.enrich.type_mapping);
        assert_eq!(back.network.lookup_concurrency, 4);
    }
}
