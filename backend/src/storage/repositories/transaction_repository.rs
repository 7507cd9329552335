use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::domain::models::{Balance, Category, Transaction, TransactionType};

/// Transactions per INSERT statement; each row binds 7 values
const INSERT_CHUNK_SIZE: usize = 100;

/// Repository for transaction operations
#[derive(Debug, Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    /// Income and outcome totals over every stored transaction
    pub async fn get_balance(&self, conn: &mut SqliteConnection) -> Result<Balance, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN value ELSE 0 END), 0) AS income,
                COALESCE(SUM(CASE WHEN type = 'outcome' THEN value ELSE 0 END), 0) AS outcome
            FROM transactions
            "#,
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(Balance::new(row.try_get("income")?, row.try_get("outcome")?))
    }

    /// Store a single transaction
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        transaction: &Transaction,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, title, value, type, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id)
        .bind(&transaction.title)
        .bind(transaction.value)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.category_id())
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Batch insert. Returns the number of rows written.
    pub async fn insert_many(
        &self,
        conn: &mut SqliteConnection,
        transactions: &[Transaction],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for chunk in transactions.chunks(INSERT_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "INSERT INTO transactions (id, title, value, type, category_id, created_at, updated_at) ",
            );
            query.push_values(chunk, |mut row, transaction| {
                row.push_bind(transaction.id)
                    .push_bind(transaction.title.clone())
                    .push_bind(transaction.value)
                    .push_bind(transaction.transaction_type.as_str())
                    .push_bind(transaction.category_id())
                    .push_bind(transaction.created_at)
                    .push_bind(transaction.updated_at);
            });

            inserted += query.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(inserted)
    }

    /// Every transaction with its category, in insertion order.
    /// `created_at` is stored as text whose width varies with the fractional
    /// seconds, so it cannot be used for ordering.
    pub async fn list_with_categories(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id, t.title, t.value, t.type, t.created_at, t.updated_at,
                c.id AS category_id,
                c.title AS category_title,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM transactions t
            INNER JOIN categories c ON c.id = t.category_id
            ORDER BY t.ROWID ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, sqlx::Error> {
    let transaction_type = row
        .try_get::<String, _>("type")?
        .parse::<TransactionType>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Transaction {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        value: row.try_get("value")?,
        transaction_type,
        category: Category {
            id: row.try_get("category_id")?,
            title: row.try_get("category_title")?,
            created_at: row.try_get("category_created_at")?,
            updated_at: row.try_get("category_updated_at")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
