//! Transactions: the income and expense records the API manages.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;

pub use self::core::{
    Transaction, TransactionForm, TransactionId, create_transaction_table,
    map_row_to_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub(crate) use create_endpoint::create_transaction;
#[cfg(test)]
pub(crate) use get_endpoint::get_transaction;
