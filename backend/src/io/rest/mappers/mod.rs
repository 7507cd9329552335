pub mod transaction_mapper;

pub use transaction_mapper::TransactionMapper;
