//! Domain model for an income or outcome transaction.
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

use super::category::Category;

/// Largest value a single transaction may carry. Keeps the stored sums well
/// inside `i64` for any realistic number of rows.
pub const MAX_TRANSACTION_VALUE: i64 = i32::MAX as i64;

/// Whether `value` is an acceptable transaction amount
pub fn is_valid_value(value: i64) -> bool {
    (1..=MAX_TRANSACTION_VALUE).contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Outcome,
}

impl TransactionType {
    /// Value stored in the `type` column and used in CSV files
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown transaction type '{0}', expected 'income' or 'outcome'")]
pub struct ParseTransactionTypeError(pub String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(ParseTransactionTypeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    /// Minor currency units
    pub value: i64,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Build a not-yet-persisted transaction filed under `category`
    pub fn new(
        title: impl Into<String>,
        value: i64,
        transaction_type: TransactionType,
        category: Category,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            value,
            transaction_type,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn category_id(&self) -> Uuid {
        self.category.id
    }

    /// Value with the sign it contributes to the balance
    pub fn signed_value(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Income => self.value,
            TransactionType::Outcome => -self.value,
        }
    }
}
