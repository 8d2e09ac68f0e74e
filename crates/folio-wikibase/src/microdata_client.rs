//! Microdata extraction over an HTTP extractor service.
//!
//! The extractor takes a page URL and returns the W3C microdata JSON for
//! that page, `{"items": [...]}`. Any service speaking that shape works.

use crate::api::{check_status, map_reqwest_error, with_retries, ApiClientConfig};
use async_trait::async_trait;
use folio_core::util::wiki_urlencode;
use folio_core::{FragmentSource, LookupResult, MicrodataDocument, RawFragment};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::debug;

pub struct MicrodataEndpointSource {
    client: Client,
    endpoint: String,
    page_base_url: String,
    config: ApiClientConfig,
}

impl MicrodataEndpointSource {
    pub fn new(
        endpoint: impl Into<String>,
        page_base_url: impl Into<String>,
        config: ApiClientConfig,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            page_base_url: page_base_url.into(),
            config,
        }
    }

    async fn extract(&self, title: &str) -> LookupResult<Vec<RawFragment>> {
        let page_url = format!("{}{}", self.page_base_url, wiki_urlencode(title));
        debug!(%page_url, "extracting microdata");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", page_url.as_str())])
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let document: MicrodataDocument = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;
        Ok(document.items)
    }
}

#[async_trait]
impl FragmentSource for MicrodataEndpointSource {
    async fn fragments(&self, title: &str) -> LookupResult<Vec<RawFragment>> {
        with_retries(&self.config, "microdata", || self.extract(title)).await
    }
}
