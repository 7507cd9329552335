pub mod category_repository;
pub mod transaction_repository;

pub use category_repository::CategoryRepository;
pub use transaction_repository::TransactionRepository;
