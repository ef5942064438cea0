//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    transaction::{TransactionForm, TransactionId},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for a newly created transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedTransaction {
    /// The ID the database assigned to the transaction.
    pub id: TransactionId,
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created and the new ID, or 400 Bad Request if the body is
/// malformed or the insert is rejected by the database.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!("Rejected transaction body: {rejection}");
            return Error::InvalidInput(rejection.body_text()).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(&form, &connection) {
        Ok(id) => (
            StatusCode::CREATED,
            [(LOCATION, format_endpoint(endpoints::TRANSACTION, id))],
            Json(CreatedTransaction { id }),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not create transaction with {form:?}: {error}");
            error.into_client_error().into_response()
        }
    }
}

/// Insert a transaction and return its new ID.
pub fn create_transaction(
    form: &TransactionForm,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    connection.execute(
        "INSERT INTO transactions (type, category, amount, date, description) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            form.kind,
            form.category,
            form.amount,
            form.date,
            form.description
        ],
    )?;

    Ok(connection.last_insert_rowid())
}
