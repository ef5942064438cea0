//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    summary::get_summary_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        Summary, Transaction,
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, get_test_server_with_state, test_form},
        transaction::TransactionId,
    };

    #[derive(serde::Deserialize)]
    struct Created {
        id: TransactionId,
    }

    #[tokio::test]
    async fn get_after_post_returns_submitted_fields() {
        let server = get_test_server();
        let mut form = test_form("income", 250.0);
        form.description = Some("freelance".to_owned());

        let response = server.post(endpoints::TRANSACTIONS).json(&form).await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Created>().id;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), form.into_transaction(id));
    }

    #[tokio::test]
    async fn created_ids_are_strictly_increasing() {
        let server = get_test_server();
        let mut previous = 0;

        for amount in [1.0, 2.0, 3.0] {
            let id = server
                .post(endpoints::TRANSACTIONS)
                .json(&test_form("expense", amount))
                .await
                .json::<Created>()
                .id;

            assert!(id > previous, "want {id} > {previous}");
            previous = id;
        }
    }

    #[tokio::test]
    async fn list_returns_all_transactions() {
        let server = get_test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 1.0))
            .await;
        server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("expense", 2.0))
            .await;

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, "income");
        assert_eq!(transactions[1].kind, "expense");
    }

    #[tokio::test]
    async fn update_then_get_returns_new_values() {
        let server = get_test_server();
        let id = server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 10.0))
            .await
            .json::<Created>()
            .id;
        let path = format_endpoint(endpoints::TRANSACTION, id);
        let mut new_form = test_form("expense", 99.5);
        new_form.category = "travel".to_owned();

        let response = server.put(&path).json(&new_form).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Transaction updated" }));

        let got = server.get(&path).await.json::<Transaction>();
        assert_eq!(got, new_form.into_transaction(id));
    }

    #[tokio::test]
    async fn update_requires_every_field() {
        let server = get_test_server();
        let id = server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 10.0))
            .await
            .json::<Created>()
            .id;

        let response = server
            .put(&format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({ "amount": 20.0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleted_transaction_is_gone() {
        let server = get_test_server();
        let id = server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 10.0))
            .await
            .json::<Created>()
            .id;
        let path = format_endpoint(endpoints::TRANSACTION, id);

        let response = server.delete(&path).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());

        server.get(&path).await.assert_status_not_found();
        server
            .put(&path)
            .json(&test_form("income", 1.0))
            .await
            .assert_status_not_found();
        server.delete(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn missing_id_returns_404_with_error() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, 99999))
            .await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Transaction not found" }));
    }

    #[tokio::test]
    async fn non_integer_id_returns_404() {
        let server = get_test_server();

        server
            .get("/transactions/abc")
            .await
            .assert_status_not_found();
        server
            .delete("/transactions/abc")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn summary_is_additive() {
        let server = get_test_server();
        server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 100.0))
            .await;
        server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("expense", 40.0))
            .await;

        let response = server.get(endpoints::SUMMARY).await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Summary>(),
            Summary {
                total_income: 100.0,
                total_expenses: 40.0,
                balance: 60.0,
            }
        );

        server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("expense", 10.0))
            .await;

        let response = server.get(endpoints::SUMMARY).await;
        assert_eq!(
            response.json::<Summary>(),
            Summary {
                total_income: 100.0,
                total_expenses: 50.0,
                balance: 50.0,
            }
        );
    }

    #[tokio::test]
    async fn empty_summary_reports_zeroes() {
        let server = get_test_server();

        let body = server.get(endpoints::SUMMARY).await.json::<Value>();

        assert_eq!(body["totalIncome"], 0.0);
        assert_eq!(body["totalExpenses"], 0.0);
        assert_eq!(body["balance"], 0.0);
    }

    #[tokio::test]
    async fn summary_accepts_filters() {
        let server = get_test_server();
        let mut january = test_form("expense", 5.0);
        january.date = "2024-01-10".to_owned();
        let mut february = test_form("expense", 7.0);
        february.date = "2024-02-10".to_owned();
        server.post(endpoints::TRANSACTIONS).json(&january).await;
        server.post(endpoints::TRANSACTIONS).json(&february).await;

        let response = server
            .get(endpoints::SUMMARY)
            .add_query_param("from", "2024-02-01")
            .await;

        assert_eq!(response.json::<Summary>().total_expenses, 7.0);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        let response = server.get("/budgets").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn bad_summary_query_returns_json_error() {
        let server = get_test_server();

        let response = server.get("/summary?from=a&from=b").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(body["error"].is_string(), "want error message, got {body}");
    }

    #[tokio::test]
    async fn store_errors_forward_sql_message() {
        let (server, state) = get_test_server_with_state();
        let id = server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 1.0))
            .await
            .json::<Created>()
            .id;
        let path = format_endpoint(endpoints::TRANSACTION, id);
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE transactions", [])
            .unwrap();
        let want_body = json!({ "error": "no such table: transactions" });

        let response = server.get(endpoints::TRANSACTIONS).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&want_body);

        let response = server.get(&path).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&want_body);

        let response = server.delete(&path).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&want_body);

        let response = server.get(endpoints::SUMMARY).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&want_body);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&test_form("income", 1.0))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&want_body);

        let response = server.put(&path).json(&test_form("income", 2.0)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&want_body);
    }

    #[tokio::test]
    async fn poisoned_lock_returns_500() {
        let (server, state) = get_test_server_with_state();
        let connection = state.db_connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poisoning the database lock");
        })
        .join();
        assert!(state.db_connection.is_poisoned());
        let want_body = json!({ "error": "could not acquire the database lock" });
        let path = format_endpoint(endpoints::TRANSACTION, 1);

        let responses = [
            server.get(endpoints::TRANSACTIONS).await,
            server
                .post(endpoints::TRANSACTIONS)
                .json(&test_form("income", 1.0))
                .await,
            server.get(&path).await,
            server.put(&path).json(&test_form("income", 1.0)).await,
            server.delete(&path).await,
            server.get(endpoints::SUMMARY).await,
        ];

        for response in responses {
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_json(&want_body);
        }
    }
}
