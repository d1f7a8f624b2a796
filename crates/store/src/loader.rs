use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use regimen_core::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Read a catalog file: a JSON array of products, the same shape the
/// storefront serves at `data/peptides.json`.
pub async fn load_catalog(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;

    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })
}

/// Load the catalog, degrading to an empty one on failure. The quiz then
/// simply yields zero recommendations instead of crashing.
pub async fn load_catalog_or_empty(path: &Path) -> Vec<Product> {
    match load_catalog(path).await {
        Ok(products) => products,
        Err(error) => {
            warn!(
                event_name = "catalog.load_failed",
                path = %path.display(),
                error = %error,
                "catalog unavailable, continuing with an empty catalog"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{load_catalog, load_catalog_or_empty, CatalogError};

    const CATALOG_JSON: &str = r#"[
        {
            "id": "bpc-157",
            "name": "BPC-157",
            "use_case": "Healing & Recovery",
            "injection_site": "Subcutaneous near injury site",
            "description": "Body protection compound.",
            "tags": ["healing", "recovery", "injury"],
            "price": "64.99",
            "dosage": "250-500mcg daily",
            "cycle_length": "4-8 weeks"
        }
    ]"#;

    #[tokio::test]
    async fn loads_a_catalog_file_and_fills_listing_defaults() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(CATALOG_JSON.as_bytes()).expect("write catalog");

        let products = load_catalog(file.path()).await.expect("load catalog");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.0, "bpc-157");
        // Fields absent from the storefront file fall back to listing defaults.
        assert_eq!(products[0].stock_quantity, 100);
        assert!(products[0].active);
        assert_eq!(products[0].image, None);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let error = load_catalog(std::path::Path::new("no/such/catalog.json"))
            .await
            .expect_err("missing file");
        assert!(matches!(error, CatalogError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not a catalog").expect("write garbage");

        let error = load_catalog(file.path()).await.expect_err("malformed file");
        assert!(matches!(error, CatalogError::Parse { .. }));
    }

    #[tokio::test]
    async fn degraded_load_returns_an_empty_catalog() {
        let products =
            load_catalog_or_empty(std::path::Path::new("no/such/catalog.json")).await;
        assert!(products.is_empty());
    }
}
