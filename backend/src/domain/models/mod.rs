pub mod balance;
pub mod category;
pub mod transaction;

pub use balance::Balance;
pub use category::Category;
pub use transaction::{is_valid_value, Transaction, TransactionType, MAX_TRANSACTION_VALUE};
