//! Defines the endpoint for replacing a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    transaction::{TransactionForm, TransactionId},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The confirmation sent after a successful update.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedTransaction {
    /// A human readable confirmation.
    pub message: String,
}

/// A route handler that replaces every field of a transaction.
///
/// Responds with 404 if the transaction does not exist, even when the body is malformed, and 400
/// if the body is malformed or the update is rejected by the database.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
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

    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!("Rejected transaction body: {rejection}");
            return match transaction_exists(transaction_id, &connection) {
                Ok(true) => Error::InvalidInput(rejection.body_text()).into_response(),
                Ok(false) => Error::NotFound.into_response(),
                Err(error) => error.into_client_error().into_response(),
            };
        }
    };

    match update_transaction(transaction_id, &form, &connection) {
        Ok(rows_affected) if rows_affected != 0 => Json(UpdatedTransaction {
            message: "Transaction updated".to_owned(),
        })
        .into_response(),
        Ok(_) => Error::NotFound.into_response(),
        Err(error) => {
            tracing::warn!("Could not update transaction {transaction_id}: {error}");
            error.into_client_error().into_response()
        }
    }
}

type RowsAffected = usize;

fn transaction_exists(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

fn update_transaction(
    id: TransactionId,
    form: &TransactionForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE transactions
        SET \
            type = ?1, \
            category = ?2, \
            amount = ?3, \
            date = ?4, \
            description = ?5 \
        WHERE id = ?6;",
            params![
                form.kind,
                form.category,
                form.amount,
                form.date,
                form.description,
                id,
            ],
        )
        .map_err(Error::from)
}
