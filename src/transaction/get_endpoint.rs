//! Defines the endpoint for fetching a single transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionId, map_row_to_transaction},
};

/// The state needed to get a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the transaction for the ID in the path, or 404 if there is
/// no such transaction.
///
/// IDs that are not integers cannot match a row and are treated as not found.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Response {
    let Ok(Path(transaction_id)) = transaction_id else {
        return Error::NotFound.into_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_transaction(transaction_id, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get a transaction by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction, or [Error::SqlError] for any
/// other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .query_one(
            "SELECT id, type, category, amount, date, description FROM transactions WHERE id = ?1",
            params![id],
            map_row_to_transaction,
        )
        .map_err(Error::from)
}
