use anyhow::{Context, Result};
use folio_core::{EntityUriParser, FolioConfig};
use folio_enrich::Converter;
use folio_wikibase::{
    ApiClientConfig, CommonsMediaClient, SparqlSearchClient, WikibaseItemClient,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::sources;

pub async fn execute(
    config: FolioConfig,
    title: String,
    microdata: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let converter = build_converter(&config, microdata)?;
    let document = converter
        .convert(&title)
        .await
        .with_context(|| format!("Failed to convert \"{title}\""))?;

    let output = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{output}");
    Ok(())
}

/// Wires the HTTP clients into a converter. Fragment extraction may come
/// from a local file instead; everything else always goes over the network.
pub fn build_converter(config: &FolioConfig, microdata: Option<PathBuf>) -> Result<Converter> {
    let fragments = sources::fragment_source(config, microdata)?;
    let api = ApiClientConfig::from_network(&config.network);
    let lookup = Arc::new(WikibaseItemClient::new(&config.wikibase.api_url, api.clone()));
    let search = Arc::new(SparqlSearchClient::new(
        &config.wikibase.sparql_url,
        EntityUriParser::new(&config.wikibase.entity_base_uri),
        api.clone(),
    ));
    let media = Arc::new(CommonsMediaClient::new(&config.media.api_url, api));
    Ok(Converter::new(fragments, lookup, search, media, config))
}
