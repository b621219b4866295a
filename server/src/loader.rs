//! Startup catalog load.

use std::path::Path;

use gallery_shared::{Catalog, CatalogError};
use tracing::{info, warn};

pub async fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Catalog::from_json(&json)
}

/// Read the catalog file. A missing or malformed file leaves the host
/// serving an empty catalog.
pub async fn load_catalog(path: &Path) -> Catalog {
    match read_catalog(path).await {
        Ok(catalog) => {
            info!(items = catalog.len(), path = %path.display(), "catalog loaded");
            catalog
        }
        Err(e) => {
            warn!("serving empty catalog: {e}");
            Catalog::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"inscriptionId": "aaai0", "traits": {{"outfit": "Suit"}}}}, {{"inscriptionId": "bbbi0"}}]"#
        )
        .unwrap();
        let catalog = load_catalog(file.path()).await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position_of("bbbi0"), Some(1));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(read_catalog(&path).await, Err(CatalogError::Io { .. })));
        assert!(load_catalog(&path).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"a list\"}}").unwrap();
        assert!(matches!(read_catalog(file.path()).await, Err(CatalogError::Parse(_))));
        assert!(load_catalog(file.path()).await.is_empty());
    }
}
