//! Transaction service domain logic: creating a single transaction under the
//! balance rule, and listing every transaction with the derived balance.
use tracing::{info, warn};

use crate::domain::{
    balance_service::BalanceService,
    category_service::CategoryService,
    error::{FinanceError, FinanceResult},
    models::{is_valid_value, Balance, Transaction, TransactionType, MAX_TRANSACTION_VALUE},
};
use crate::storage::{DbConnection, TransactionRepository};

/// Attempts at the read-check-write sequence before a write conflict is reported
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionCommand {
    pub title: String,
    pub value: i64,
    pub transaction_type: TransactionType,
    /// Category title
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListing {
    pub transactions: Vec<Transaction>,
    pub balance: Balance,
}

#[derive(Clone)]
pub struct TransactionService {
    db: DbConnection,
    transaction_repository: TransactionRepository,
    category_service: CategoryService,
    balance_service: BalanceService,
}

impl TransactionService {
    pub fn new(
        db: DbConnection,
        transaction_repository: TransactionRepository,
        category_service: CategoryService,
        balance_service: BalanceService,
    ) -> Self {
        Self {
            db,
            transaction_repository,
            category_service,
            balance_service,
        }
    }

    /// Record one transaction. Outcomes larger than the current total are
    /// rejected with `InsufficientBalance` before anything is written.
    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> FinanceResult<Transaction> {
        let command = Self::validate(command)?;

        let mut attempt = 1;
        loop {
            match self.try_create(&command).await {
                Err(e) if e.is_write_conflict() && attempt < MAX_CREATE_ATTEMPTS => {
                    warn!(
                        "Write conflict creating '{}' (attempt {}/{}): {}",
                        command.title, attempt, MAX_CREATE_ATTEMPTS, e
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Every transaction with its category, plus the balance over them
    pub async fn list_transactions(&self) -> FinanceResult<TransactionListing> {
        let mut conn = self.db.pool().acquire().await?;
        let transactions = self.transaction_repository.list_with_categories(&mut conn).await?;
        let balance = self.balance_service.summarize(&transactions)?;

        info!("Listing {} transactions, total balance {}", transactions.len(), balance.total);
        Ok(TransactionListing { transactions, balance })
    }

    fn validate(command: CreateTransactionCommand) -> FinanceResult<CreateTransactionCommand> {
        let title = command.title.trim();
        let category = command.category.trim();

        if title.is_empty() {
            return Err(FinanceError::Validation("Title must not be empty".to_string()));
        }
        if !is_valid_value(command.value) {
            return Err(FinanceError::Validation(format!(
                "Value must be an integer between 1 and {}",
                MAX_TRANSACTION_VALUE
            )));
        }
        if category.is_empty() {
            return Err(FinanceError::Validation("Category must not be empty".to_string()));
        }

        Ok(CreateTransactionCommand {
            title: title.to_string(),
            value: command.value,
            transaction_type: command.transaction_type,
            category: category.to_string(),
        })
    }

    /// One attempt inside a single database transaction. Returning early drops
    /// the transaction, which rolls it back.
    async fn try_create(&self, command: &CreateTransactionCommand) -> FinanceResult<Transaction> {
        let mut tx = self.db.pool().begin().await?;

        let balance = self.balance_service.current_balance(&mut tx).await?;
        self.balance_service
            .ensure_covers(&balance, command.transaction_type, command.value)?;

        let category = self.category_service.resolve(&mut tx, &command.category).await?;
        let transaction = Transaction::new(
            command.title.clone(),
            command.value,
            command.transaction_type,
            category,
        );
        self.transaction_repository.insert(&mut tx, &transaction).await?;

        tx.commit().await?;

        info!(
            "Created {} transaction '{}' of {} in category '{}'",
            transaction.transaction_type, transaction.title, transaction.value, transaction.category.title
        );
        Ok(transaction)
    }
}
