//! Category repository for JSON storage
//!
//! Manages loading and saving the `categories` collection to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category collection
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
    /// Highest revision handed out so far
    last_revision: AtomicU64,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
            last_revision: AtomicU64::new(0),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();

        let mut max_revision = 0;
        for category in file_data.categories {
            max_revision = max_revision.max(category.revision);
            categories.insert(category.id, category);
        }
        self.last_revision.store(max_revision, Ordering::SeqCst);

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.created_at.cmp(&b.created_at)));

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Get all categories sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Current revision of a category, `None` if it doesn't exist
    pub fn revision_of(&self, id: CategoryId) -> Result<Option<u64>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).map(|c| c.revision))
    }

    /// Insert or update a category, assigning it a fresh revision
    pub fn upsert(&self, mut category: Category) -> Result<u64, LedgerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let revision = self.last_revision.fetch_add(1, Ordering::SeqCst) + 1;
        category.revision = revision;
        categories.insert(category.id, category);
        Ok(revision)
    }

    /// Delete a category
    pub fn delete(&self, id: CategoryId) -> Result<bool, LedgerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(categories.remove(&id).is_some())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }

    /// Copy of the in-memory collection, used to roll back a failed commit
    pub(crate) fn snapshot(&self) -> Result<HashMap<CategoryId, Category>, LedgerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.clone())
    }

    /// Replace the in-memory collection with a snapshot
    pub(crate) fn restore(
        &self,
        snapshot: HashMap<CategoryId, Category>,
    ) -> Result<(), LedgerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *categories = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_category_operations() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::new("Cash", "₸");
        let id = category.id;

        repo.upsert(category).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Cash");

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_revisions_increase_on_every_write() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::new("Cash", "₸");
        let id = category.id;

        let first = repo.upsert(category).unwrap();
        assert_eq!(repo.revision_of(id).unwrap(), Some(first));

        let mut stored = repo.get(id).unwrap().unwrap();
        stored.adjust_balance(Money::from_units(10)).unwrap();
        let second = repo.upsert(stored.clone()).unwrap();
        assert!(second > first);

        // Re-creating a deleted document never reuses an old revision
        repo.delete(id).unwrap();
        assert_eq!(repo.revision_of(id).unwrap(), None);
        let third = repo.upsert(stored).unwrap();
        assert!(third > second);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::with_balance("Main", Money::from_units(1000), "₸");
        let id = category.id;
        let revision = repo.upsert(category).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();

        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.formatted_balance(), "1000 ₸");
        assert_eq!(retrieved.revision, revision);

        // Counter resumes after the highest stored revision
        let next = repo2.upsert(retrieved).unwrap();
        assert!(next > revision);
    }

    #[test]
    fn test_get_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Category::new("Main Office", "₸")).unwrap();

        assert!(repo.get_by_name("main office").unwrap().is_some());
        assert!(repo.get_by_name("MAIN OFFICE").unwrap().is_some());
        assert!(repo.get_by_name("Site").unwrap().is_none());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category = Category::new("Cash", "₸");
        let id = category.id;
        repo.upsert(category).unwrap();

        let snapshot = repo.snapshot().unwrap();
        repo.delete(id).unwrap();
        assert_eq!(repo.count().unwrap(), 0);

        repo.restore(snapshot).unwrap();
        assert!(repo.get(id).unwrap().is_some());
    }
}
