//! Conversion between domain models and the DTOs in `shared`.

use crate::domain::models::{
    Balance as DomainBalance, Category as DomainCategory, Transaction as DomainTransaction,
    TransactionType as DomainTransactionType,
};
use crate::domain::CreateTransactionCommand;
use shared::{
    Balance as SharedBalance, Category as SharedCategory, CreateTransactionRequest,
    Transaction as SharedTransaction, TransactionType as SharedTransactionType,
};

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(transaction: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: transaction.id,
            title: transaction.title,
            value: transaction.value,
            transaction_type: Self::type_to_dto(transaction.transaction_type),
            category_id: transaction.category.id,
            category: Self::category_to_dto(transaction.category),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }

    pub fn category_to_dto(category: DomainCategory) -> SharedCategory {
        SharedCategory {
            id: category.id,
            title: category.title,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }

    pub fn balance_to_dto(balance: DomainBalance) -> SharedBalance {
        SharedBalance {
            income: balance.income,
            outcome: balance.outcome,
            total: balance.total,
        }
    }

    pub fn type_to_dto(transaction_type: DomainTransactionType) -> SharedTransactionType {
        match transaction_type {
            DomainTransactionType::Income => SharedTransactionType::Income,
            DomainTransactionType::Outcome => SharedTransactionType::Outcome,
        }
    }

    pub fn type_from_dto(transaction_type: SharedTransactionType) -> DomainTransactionType {
        match transaction_type {
            SharedTransactionType::Income => DomainTransactionType::Income,
            SharedTransactionType::Outcome => DomainTransactionType::Outcome,
        }
    }

    pub fn to_command(request: CreateTransactionRequest) -> CreateTransactionCommand {
        CreateTransactionCommand {
            title: request.title,
            value: request.value,
            transaction_type: Self::type_from_dto(request.transaction_type),
            category: request.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dto_embeds_category() {
        let category = DomainCategory::new("Job");
        let transaction = DomainTransaction::new("Salary", 5000, DomainTransactionType::Income, category.clone());
        let id = transaction.id;

        let dto = TransactionMapper::to_dto(transaction);

        assert_eq!(dto.id, id);
        assert_eq!(dto.transaction_type, SharedTransactionType::Income);
        assert_eq!(dto.category_id, category.id);
        assert_eq!(dto.category.title, "Job");
    }

    #[test]
    fn test_to_command() {
        let command = TransactionMapper::to_command(CreateTransactionRequest {
            title: "Rent".to_string(),
            value: 1200,
            transaction_type: SharedTransactionType::Outcome,
            category: "Housing".to_string(),
        });

        assert_eq!(command.transaction_type, DomainTransactionType::Outcome);
        assert_eq!(command.category, "Housing");
        assert_eq!(command.value, 1200);
    }
}
