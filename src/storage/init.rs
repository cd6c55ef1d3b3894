//! Storage initialization
//!
//! Handles first-run setup: directories and empty collection files.

use std::path::PathBuf;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

use super::file_io::{read_json, write_json_atomic};

/// Initialize storage for a fresh installation
///
/// Creates any missing collection file. Existing collections are left
/// untouched, but a collection that exists and is not valid JSON stops
/// initialization.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    for (path, field) in collection_files(paths) {
        if !path.exists() {
            write_json_atomic(&path, &serde_json::json!({ field: [] }))?;
            tracing::info!(path = %path.display(), "created collection");
        } else {
            read_json::<serde_json::Value, _>(&path)?;
        }
    }

    Ok(())
}

fn collection_files(paths: &LedgerPaths) -> [(PathBuf, &'static str); 3] {
    [
        (paths.clients_file(), "clients"),
        (paths.categories_file(), "categories"),
        (paths.transactions_file(), "transactions"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::storage::categories::CategoryData;
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        assert!(paths.clients_file().exists());
        assert!(paths.categories_file().exists());
        assert!(paths.transactions_file().exists());

        // Empty collections load cleanly
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let custom_data = CategoryData {
            categories: vec![Category::new("Cash", "₸")],
        };
        write_json_atomic(paths.categories_file(), &custom_data).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Cash");
    }

    #[test]
    fn test_invalid_collection_stops_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.transactions_file(), "not json").unwrap();

        let err = initialize_storage(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
