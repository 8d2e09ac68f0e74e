//! File existence probe against a media wiki such as Commons.

use crate::api::{check_status, map_reqwest_error, with_retries, ApiClientConfig};
use async_trait::async_trait;
use folio_core::{LookupResult, MediaProbe};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;

pub struct CommonsMediaClient {
    client: Client,
    api_url: String,
    config: ApiClientConfig,
}

impl CommonsMediaClient {
    pub fn new(api_url: impl Into<String>, config: ApiClientConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            config,
        }
    }

    async fn probe(&self, file_name: &str) -> LookupResult<bool> {
        let title = format!("File:{file_name}");
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("titles", title.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: QueryResponse = check_status(response)?
            .json()
            .await
            .map_err(map_reqwest_error)?;

        let exists = body
            .query
            .map(|query| query.pages.iter().any(|page| !page.missing && !page.invalid))
            .unwrap_or(false);
        Ok(exists)
    }
}

#[async_trait]
impl MediaProbe for CommonsMediaClient {
    async fn file_exists(&self, file_name: &str) -> LookupResult<bool> {
        with_retries(&self.config, "media probe", || self.probe(file_name)).await
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<PageStatus>,
}

#[derive(Debug, Deserialize)]
struct PageStatus {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
}
