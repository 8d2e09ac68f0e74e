//! Item lookup through the MediaWiki Action API.

use crate::api::{check_status, map_reqwest_error, with_retries, ApiClientConfig};
use async_trait::async_trait;
use folio_core::{Item, ItemLookup, LookupError, LookupResult};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Fetches the item holding a given site link via `wbgetentities`.
pub struct WikibaseItemClient {
    client: Client,
    api_url: String,
    config: ApiClientConfig,
}

impl WikibaseItemClient {
    pub fn new(api_url: impl Into<String>, config: ApiClientConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            config,
        }
    }

    async fn fetch(&self, site: &str, title: &str) -> LookupResult<Option<Item>> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbgetentities"),
                ("sites", site),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: GetEntitiesResponse = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        if let Some(error) = body.error {
            return Err(LookupError::Decode(format!(
                "wbgetentities failed with {}: {}",
                error.code,
                error.info.unwrap_or_default()
            )));
        }
        let Some(entity) = body.entities.into_values().next() else {
            return Ok(None);
        };
        // The API reports a page without an item as a placeholder entity.
        if entity.get("missing").is_some() {
            debug!(site, title, "page has no linked item");
            return Ok(None);
        }
        serde_json::from_value(entity)
            .map(Some)
            .map_err(|error| LookupError::Decode(error.to_string()))
    }
}

#[async_trait]
impl ItemLookup for WikibaseItemClient {
    async fn item_for_page(&self, site: &str, title: &str) -> LookupResult<Option<Item>> {
        with_retries(&self.config, "wbgetentities", || self.fetch(site, title)).await
    }
}

#[derive(Debug, Deserialize)]
struct GetEntitiesResponse {
    #[serde(default)]
    entities: BTreeMap<String, serde_json::Value>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> ApiClientConfig {
        ApiClientConfig {
            timeout: Duration::from_secs(5),
            retries: 2,
            retry_delay: Duration::from_millis(1),
            user_agent: "folio-test".to_string(),
        }
    }

    fn api_url(server: &MockServer) -> String {
        format!("{}/w/api.php", server.uri())
    }

    #[tokio::test]
    async fn test_returns_linked_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("action", "wbgetentities"))
            .and(query_param("sites", "frwikisource"))
            .and(query_param("titles", "Les Misérables"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"entities": {"Q180736": {
                    "type": "item",
                    "id": "Q180736",
                    "labels": {"fr": {"language": "fr", "value": "Les Misérables"}},
                    "claims": {},
                    "sitelinks": {"frwikisource": {
                        "site": "frwikisource", "title": "Les Misérables", "badges": []
                    }}
                }}}"#,
            ))
            .mount(&server)
            .await;

        let client = WikibaseItemClient::new(api_url(&server), test_config());
        let item = client
            .item_for_page("frwikisource", "Les Misérables")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.id.as_ref().unwrap().as_str(), "Q180736");
        assert_eq!(item.label("fr"), Some("Les Misérables"));
    }

    #[tokio::test]
    async fn test_missing_page_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"entities": {"-1": {"site": "frwikisource", "title": "Nope", "missing": true}}}"#,
            ))
            .mount(&server)
            .await;

        let client = WikibaseItemClient::new(api_url(&server), test_config());
        let item = client.item_for_page("frwikisource", "Nope").await.unwrap();
        assert!(item.is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_not_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"error": {"code": "param-missing", "info": "A required parameter is missing"}}"#,
            ))
            .mount(&server)
            .await;

        let client = WikibaseItemClient::new(api_url(&server), test_config());
        let error = client
            .item_for_page("frwikisource", "Page")
            .await
            .unwrap_err();
        assert!(matches!(error, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"entities": {}}"#),
            )
            .mount(&server)
            .await;

        let client = WikibaseItemClient::new(api_url(&server), test_config());
        let item = client.item_for_page("frwikisource", "Page").await.unwrap();
        assert!(item.is_none());
    }
}
