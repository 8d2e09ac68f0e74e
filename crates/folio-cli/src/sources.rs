//! Fragment sources: the configured extraction endpoint or a local file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use folio_core::{
    FolioConfig, FragmentSource, LookupError, LookupResult, MicrodataDocument, RawFragment,
};
use folio_wikibase::{ApiClientConfig, MicrodataEndpointSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Picks where fragments come from: a file passed on the command line, or
/// the extraction endpoint named in the configuration.
pub fn fragment_source(
    config: &FolioConfig,
    microdata: Option<PathBuf>,
) -> Result<Arc<dyn FragmentSource>> {
    if let Some(path) = microdata {
        return Ok(Arc::new(FileFragmentSource::new(path)));
    }
    let endpoint = config.source.microdata_endpoint.as_ref().context(
        "No microdata endpoint configured; set [source].microdata_endpoint or pass --microdata",
    )?;
    Ok(Arc::new(MicrodataEndpointSource::new(
        endpoint,
        &config.source.page_base_url,
        ApiClientConfig::from_network(&config.network),
    )))
}

/// Reads a W3C microdata JSON document from disk. Stands in for the
/// extraction endpoint when working offline or from a saved extraction.
pub struct FileFragmentSource {
    path: PathBuf,
}

impl FileFragmentSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FragmentSource for FileFragmentSource {
    async fn fragments(&self, _title: &str) -> LookupResult<Vec<RawFragment>> {
        debug!(path = %self.path.display(), "reading fragments from file");
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let document: MicrodataDocument =
            serde_json::from_str(&contents).map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(document.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_a_microdata_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"items": [{{"properties": {{"name": ["Les Misérables"]}}}}]}}"#
        )
        .unwrap();

        let source = FileFragmentSource::new(file.path().to_path_buf());
        let items = source.fragments("ignored").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].first_literal("name"), Some("Les Misérables"));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_transport_error() {
        let source = FileFragmentSource::new(PathBuf::from("/nonexistent/fragments.json"));
        assert!(matches!(
            source.fragments("ignored").await.unwrap_err(),
            LookupError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let source = FileFragmentSource::new(file.path().to_path_buf());
        assert!(matches!(
            source.fragments("ignored").await.unwrap_err(),
            LookupError::Decode(_)
        ));
    }
}
