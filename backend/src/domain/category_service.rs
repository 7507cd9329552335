//! Category resolution.
//!
//! Titles are unique at the store level. Both entry points insert with
//! "skip on conflict" and fall back to reading the stored row, so a competing
//! writer that created the same title first is reused instead of duplicated.

use sqlx::SqliteConnection;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::domain::error::{FinanceError, FinanceResult};
use crate::domain::models::Category;
use crate::storage::CategoryRepository;

/// Outcome of a bulk reconciliation
#[derive(Debug, Clone, Default)]
pub struct ReconciledCategories {
    /// Every requested title mapped to its stored category
    pub by_title: HashMap<String, Category>,
    /// How many categories this call created
    pub created: u64,
}

impl ReconciledCategories {
    pub fn get(&self, title: &str) -> Option<&Category> {
        self.by_title.get(title)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryService {
    category_repository: CategoryRepository,
}

impl CategoryService {
    pub fn new(category_repository: CategoryRepository) -> Self {
        Self { category_repository }
    }

    /// Return the category titled `title`, creating it if needed
    pub async fn resolve(&self, conn: &mut SqliteConnection, title: &str) -> FinanceResult<Category> {
        if let Some(existing) = self.category_repository.find_by_title(conn, title).await? {
            return Ok(existing);
        }

        let candidate = Category::new(title);
        if self.category_repository.insert_if_absent(conn, &candidate).await? {
            info!("Created category '{}' ({})", candidate.title, candidate.id);
            return Ok(candidate);
        }

        // Someone else inserted the title between our read and write
        self.category_repository
            .find_by_title(conn, title)
            .await?
            .ok_or_else(|| FinanceError::UnresolvedCategory(title.to_string()))
    }

    /// Resolve many titles at once: one lookup for the existing ones, one batch
    /// insert for the missing ones. `titles` must already be distinct.
    pub async fn reconcile(
        &self,
        conn: &mut SqliteConnection,
        titles: &[String],
    ) -> FinanceResult<ReconciledCategories> {
        if titles.is_empty() {
            return Ok(ReconciledCategories::default());
        }

        let existing = self.category_repository.find_by_titles(conn, titles).await?;
        let existing_titles: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();

        let new_categories: Vec<Category> = titles
            .iter()
            .filter(|title| !existing_titles.contains(title.as_str()))
            .map(|title| Category::new(title.as_str()))
            .collect();

        let created = self
            .category_repository
            .insert_many_if_absent(conn, &new_categories)
            .await?;

        let mut by_title: HashMap<String, Category> = HashMap::with_capacity(titles.len());
        if created == new_categories.len() as u64 {
            for category in new_categories.into_iter().chain(existing) {
                by_title.insert(category.title.clone(), category);
            }
        } else {
            // Some inserts were skipped; read back what actually got stored
            let missing: Vec<String> = new_categories.into_iter().map(|c| c.title).collect();
            let stored = self.category_repository.find_by_titles(conn, &missing).await?;
            for category in stored.into_iter().chain(existing) {
                by_title.insert(category.title.clone(), category);
            }
        }

        info!(
            "Reconciled {} category titles: {} existing, {} created",
            titles.len(),
            titles.len() as u64 - created,
            created
        );

        Ok(ReconciledCategories { by_title, created })
    }
}

/// Distinct values in first-seen order
pub fn distinct_titles<'a, I>(titles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .filter(|title| seen.insert(*title))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> (DbConnection, CategoryService) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (db, CategoryService::new(CategoryRepository::new()))
    }

    async fn category_count(db: &DbConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[test]
    fn test_distinct_titles_keeps_first_seen_order() {
        let titles = distinct_titles(["Job", "Housing", "Job", "Food", "Housing"]);
        assert_eq!(titles, vec!["Job", "Housing", "Food"]);
    }

    #[test]
    fn test_distinct_titles_is_case_sensitive() {
        let titles = distinct_titles(["food", "Food", "food"]);
        assert_eq!(titles, vec!["food", "Food"]);
    }

    #[tokio::test]
    async fn test_resolve_creates_then_reuses() {
        let (db, service) = setup_test().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let first = service.resolve(&mut conn, "Food").await.unwrap();
        let second = service.resolve(&mut conn, "Food").await.unwrap();

        assert_eq!(first.id, second.id);
        drop(conn);
        assert_eq!(category_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_reconcile_mixes_existing_and_new() {
        let (db, service) = setup_test().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let job = service.resolve(&mut conn, "Job").await.unwrap();

        let titles = vec!["Job".to_string(), "Housing".to_string(), "Food".to_string()];
        let reconciled = service.reconcile(&mut conn, &titles).await.unwrap();

        assert_eq!(reconciled.created, 2);
        assert_eq!(reconciled.by_title.len(), 3);
        assert_eq!(reconciled.get("Job").unwrap().id, job.id);
        assert!(reconciled.get("Housing").is_some());
        assert!(reconciled.get("Food").is_some());
        drop(conn);
        assert_eq!(category_count(&db).await, 3);
    }

    #[tokio::test]
    async fn test_reconcile_all_existing_creates_nothing() {
        let (db, service) = setup_test().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let titles = vec!["Job".to_string(), "Housing".to_string()];
        let first = service.reconcile(&mut conn, &titles).await.unwrap();
        let second = service.reconcile(&mut conn, &titles).await.unwrap();

        assert_eq!(first.created, 2);
        assert_eq!(second.created, 0);
        assert_eq!(first.get("Job").unwrap().id, second.get("Job").unwrap().id);
        drop(conn);
        assert_eq!(category_count(&db).await, 2);
    }

    #[tokio::test]
    async fn test_reconcile_empty() {
        let (db, service) = setup_test().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let reconciled = service.reconcile(&mut conn, &[]).await.unwrap();
        assert!(reconciled.by_title.is_empty());
        assert_eq!(reconciled.created, 0);
    }
}
