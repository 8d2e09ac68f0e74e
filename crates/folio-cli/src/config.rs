use anyhow::{Context, Result};
use folio_core::FolioConfig;
use std::path::{Path, PathBuf};

/// Default config file location, `~/.config/folio/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
}

/// Loads configuration with precedence: defaults < file.
///
/// An explicitly passed path must be readable; the default location is used
/// only when it exists.
pub fn load(config_file: Option<PathBuf>) -> Result<FolioConfig> {
    match config_file {
        Some(path) => read(&path),
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => read(&path),
            None => Ok(FolioConfig::default()),
        },
    }
}

fn read(path: &Path) -> Result<FolioConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[source]
site = "dewikisource"
page_base_url = "https://de.wikisource.org/wiki/"

[wikibase]
language = "de"
"#
        )
        .unwrap();

        let config = load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.source.site, "dewikisource");
        assert_eq!(config.wikibase.language, "de");
        // Sections the file does not mention keep their defaults.
        assert_eq!(config.network.retries, 2);
        assert_eq!(config.enrich.imported_from.as_str(), "P143");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let error = load(Some(PathBuf::from("/nonexistent/folio.toml"))).unwrap_err();
        assert!(error.to_string().contains("read config file"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[source\nsite=").unwrap();
        let error = load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(error.to_string().contains("parse config file"));
    }
}
