//! Derived income/outcome totals. Never persisted.
use super::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    pub income: i64,
    pub outcome: i64,
    pub total: i64,
}

impl Balance {
    pub fn new(income: i64, outcome: i64) -> Self {
        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }

    /// Sum every transaction by type. An empty slice yields all zeros.
    /// Returns `None` if either sum does not fit in an `i64`.
    pub fn from_transactions(transactions: &[Transaction]) -> Option<Self> {
        let (income, outcome) = transactions.iter().try_fold((0i64, 0i64), |(income, outcome), tx| {
            match tx.transaction_type {
                TransactionType::Income => Some((income.checked_add(tx.value)?, outcome)),
                TransactionType::Outcome => Some((income, outcome.checked_add(tx.value)?)),
            }
        })?;
        Some(Self::new(income, outcome))
    }

    /// Whether an outcome of `value` can be recorded without going negative
    pub fn covers(&self, value: i64) -> bool {
        value <= self.total
    }
}
