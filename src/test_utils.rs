#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router, initialize_db, transaction::TransactionForm};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize_db(&connection).expect("could not initialize test DB");

    connection
}

#[track_caller]
pub(crate) fn get_test_server() -> TestServer {
    get_test_server_with_state().0
}

/// A test server along with its state, so tests can reach the database connection directly.
#[track_caller]
pub(crate) fn get_test_server_with_state() -> (TestServer, AppState) {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    let state = AppState::new(connection).expect("could not create app state");
    let server =
        TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

    (server, state)
}

pub(crate) fn test_form(kind: &str, amount: f64) -> TransactionForm {
    TransactionForm {
        kind: kind.to_owned(),
        category: "misc".to_owned(),
        amount,
        date: "2024-01-15".to_owned(),
        description: None,
    }
}
