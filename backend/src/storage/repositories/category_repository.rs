use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::domain::models::Category;

/// Categories per INSERT statement; each row binds 4 values
const INSERT_CHUNK_SIZE: usize = 200;
/// Titles per SELECT .. IN (..) statement
const LOOKUP_CHUNK_SIZE: usize = 500;

/// Repository for category operations
#[derive(Debug, Clone, Default)]
pub struct CategoryRepository;

impl CategoryRepository {
    pub fn new() -> Self {
        Self
    }

    /// Find the category whose title matches exactly
    pub async fn find_by_title(
        &self,
        conn: &mut SqliteConnection,
        title: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, title, created_at, updated_at
            FROM categories
            WHERE title = ?
            "#,
        )
        .bind(title)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(category_from_row).transpose()
    }

    /// Find every category whose title is in `titles`
    pub async fn find_by_titles(
        &self,
        conn: &mut SqliteConnection,
        titles: &[String],
    ) -> Result<Vec<Category>, sqlx::Error> {
        let mut categories = Vec::with_capacity(titles.len());

        for chunk in titles.chunks(LOOKUP_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "SELECT id, title, created_at, updated_at FROM categories WHERE title IN (",
            );
            let mut separated = query.separated(", ");
            for title in chunk {
                separated.push_bind(title.clone());
            }
            separated.push_unseparated(")");

            let rows = query.build().fetch_all(&mut *conn).await?;
            for row in &rows {
                categories.push(category_from_row(row)?);
            }
        }

        Ok(categories)
    }

    /// Insert the category unless one with the same title exists.
    /// Returns true when a row was written.
    pub async fn insert_if_absent(
        &self,
        conn: &mut SqliteConnection,
        category: &Category,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, title, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(title) DO NOTHING
            "#,
        )
        .bind(category.id)
        .bind(&category.title)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Batch insert, skipping titles that already exist.
    /// Returns the number of rows written.
    pub async fn insert_many_if_absent(
        &self,
        conn: &mut SqliteConnection,
        categories: &[Category],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for chunk in categories.chunks(INSERT_CHUNK_SIZE) {
            let mut query =
                QueryBuilder::<Sqlite>::new("INSERT INTO categories (id, title, created_at, updated_at) ");
            query.push_values(chunk, |mut row, category| {
                row.push_bind(category.id)
                    .push_bind(category.title.clone())
                    .push_bind(category.created_at)
                    .push_bind(category.updated_at);
            });
            query.push(" ON CONFLICT(title) DO NOTHING");

            inserted += query.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }
}

fn category_from_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    #[tokio::test]
    async fn test_insert_and_find_by_title() {
        let db = setup_test().await;
        let repo = CategoryRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        let category = Category::new("Food");
        assert!(repo.insert_if_absent(&mut conn, &category).await.unwrap());

        let found = repo.find_by_title(&mut conn, "Food").await.unwrap().expect("category exists");
        assert_eq!(found.id, category.id);
        assert_eq!(found.title, "Food");

        assert!(repo.find_by_title(&mut conn, "food").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_title_is_skipped() {
        let db = setup_test().await;
        let repo = CategoryRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        let first = Category::new("Housing");
        let second = Category::new("Housing");
        assert!(repo.insert_if_absent(&mut conn, &first).await.unwrap());
        assert!(!repo.insert_if_absent(&mut conn, &second).await.unwrap());

        let found = repo.find_by_title(&mut conn, "Housing").await.unwrap().unwrap();
        assert_eq!(found.id, first.id, "The first writer wins");
    }

    #[tokio::test]
    async fn test_insert_many_and_find_by_titles() {
        let db = setup_test().await;
        let repo = CategoryRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        repo.insert_if_absent(&mut conn, &Category::new("Job")).await.unwrap();

        let batch = vec![Category::new("Job"), Category::new("Housing"), Category::new("Leisure")];
        let inserted = repo.insert_many_if_absent(&mut conn, &batch).await.unwrap();
        assert_eq!(inserted, 2);

        let titles = vec!["Job".to_string(), "Leisure".to_string(), "Unknown".to_string()];
        let mut found: Vec<String> = repo
            .find_by_titles(&mut conn, &titles)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        found.sort();
        assert_eq!(found, vec!["Job".to_string(), "Leisure".to_string()]);
    }

    #[tokio::test]
    async fn test_insert_many_spans_several_statements() {
        let db = setup_test().await;
        let repo = CategoryRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        let batch: Vec<Category> = (0..INSERT_CHUNK_SIZE * 2 + 7)
            .map(|i| Category::new(format!("category-{}", i)))
            .collect();
        let inserted = repo.insert_many_if_absent(&mut conn, &batch).await.unwrap();
        assert_eq!(inserted, batch.len() as u64);

        let titles: Vec<String> = batch.iter().map(|c| c.title.clone()).collect();
        let found = repo.find_by_titles(&mut conn, &titles).await.unwrap();
        assert_eq!(found.len(), batch.len());
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        let db = setup_test().await;
        let repo = CategoryRepository::new();
        let mut conn = db.pool().acquire().await.unwrap();

        assert!(repo.find_by_titles(&mut conn, &[]).await.unwrap().is_empty());
        assert_eq!(repo.insert_many_if_absent(&mut conn, &[]).await.unwrap(), 0);
    }
}
