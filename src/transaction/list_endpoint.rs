//! Defines the endpoint for listing all transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{Transaction, map_row_to_transaction},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every stored transaction as a JSON array.
pub async fn list_transactions_endpoint(State(state): State<ListTransactionsState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_transactions(&connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get all transactions ordered by ID.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, category, amount, date, description FROM transactions ORDER BY id",
        )?
        .query_map([], map_row_to_transaction)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use crate::{
        test_utils::{must_create_test_connection, test_form},
        transaction::create_transaction,
    };

    use super::get_all_transactions;

    #[test]
    fn returns_empty_list_for_empty_table() {
        let connection = must_create_test_connection();

        assert_eq!(get_all_transactions(&connection), Ok(vec![]));
    }

    #[test]
    fn returns_all_transactions() {
        let connection = must_create_test_connection();
        let forms = [
            test_form("income", 100.0),
            test_form("expense", 40.0),
            test_form("expense", 10.0),
        ];
        let want: Vec<_> = forms
            .iter()
            .map(|form| {
                let id = create_transaction(form, &connection).unwrap();
                form.clone().into_transaction(id)
            })
            .collect();

        let got = get_all_transactions(&connection).unwrap();

        assert_eq!(got, want);
    }
}
