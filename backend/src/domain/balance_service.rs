//! Balance calculation and the balance guard for new outcomes.

use sqlx::SqliteConnection;
use tracing::info;

use crate::domain::error::{FinanceError, FinanceResult};
use crate::domain::models::{Balance, Transaction, TransactionType};
use crate::storage::TransactionRepository;

#[derive(Debug, Clone, Default)]
pub struct BalanceService {
    transaction_repository: TransactionRepository,
}

impl BalanceService {
    pub fn new(transaction_repository: TransactionRepository) -> Self {
        Self { transaction_repository }
    }

    /// Balance over every stored transaction, read on `conn`
    pub async fn current_balance(&self, conn: &mut SqliteConnection) -> FinanceResult<Balance> {
        let balance = self.transaction_repository.get_balance(conn).await?;
        info!(
            "Current balance: income={} outcome={} total={}",
            balance.income, balance.outcome, balance.total
        );
        Ok(balance)
    }

    /// Balance over an already loaded set of transactions
    pub fn summarize(&self, transactions: &[Transaction]) -> FinanceResult<Balance> {
        Balance::from_transactions(transactions).ok_or(FinanceError::BalanceOverflow)
    }

    /// Reject an outcome larger than the available total. Income always passes.
    pub fn ensure_covers(
        &self,
        balance: &Balance,
        transaction_type: TransactionType,
        value: i64,
    ) -> FinanceResult<()> {
        if transaction_type == TransactionType::Outcome && !balance.covers(value) {
            return Err(FinanceError::InsufficientBalance {
                requested: value,
                available: balance.total,
            });
        }
        Ok(())
    }
}
