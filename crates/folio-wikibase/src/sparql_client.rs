//! Disambiguation search against a SPARQL endpoint.

use crate::api::{check_status, map_reqwest_error, with_retries, ApiClientConfig};
use async_trait::async_trait;
use folio_core::{EntitySearch, EntityUriParser, ItemId, LookupError, LookupResult, SearchCriteria};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Instance-of with subclass closure, the usual "is a" path.
const CLASS_PATH: &str = "wdt:P31/wdt:P279*";

/// Runs bounded `SELECT DISTINCT ?entity` queries and decodes the bindings.
pub struct SparqlSearchClient {
    client: Client,
    endpoint: String,
    uri_parser: EntityUriParser,
    config: ApiClientConfig,
}

impl SparqlSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        uri_parser: EntityUriParser,
        config: ApiClientConfig,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            uri_parser,
            config,
        }
    }

    fn render_query(criteria: &SearchCriteria, limit: usize) -> String {
        let pattern = match criteria {
            SearchCriteria::LabelInClass {
                label,
                language,
                class,
            } => {
                let literal = sparql_string(label);
                format!(
                    "{{ ?entity rdfs:label {literal}@{language} }} UNION \
                     {{ ?entity skos:altLabel {literal}@{language} }} . \
                     ?entity {CLASS_PATH} wd:{class}"
                )
            }
            SearchCriteria::PropertyValue { property, value } => {
                let literal = sparql_string(value);
                format!("?entity wdt:{property} {literal}")
            }
        };
        format!("SELECT DISTINCT ?entity WHERE {{ {pattern} }} LIMIT {limit}")
    }

    async fn run(&self, query: &str) -> LookupResult<Vec<ItemId>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: SparqlResponse = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        // A binding we cannot read would silently shrink the result set, and
        // callers count results to accept or reject a match. Fail instead.
        let mut ids = Vec::with_capacity(body.results.bindings.len());
        for binding in body.results.bindings {
            let term = binding.get("entity").ok_or_else(|| {
                LookupError::Decode("binding without an ?entity variable".to_string())
            })?;
            let id = self
                .uri_parser
                .parse_item_uri(&term.value)
                .map_err(|error| LookupError::Decode(error.to_string()))?;
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Quotes a string as a SPARQL literal. JSON string escaping is a strict
/// subset of what SPARQL 1.1 accepts, including `\uXXXX` codepoints.
fn sparql_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

#[async_trait]
impl EntitySearch for SparqlSearchClient {
    async fn entity_ids(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
    ) -> LookupResult<Vec<ItemId>> {
        let query = Self::render_query(criteria, limit);
        with_retries(&self.config, "sparql", || self.run(&query)).await
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    #[serde(default)]
    results: SparqlResults,
}

#[derive(Debug, Default, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<BTreeMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}
