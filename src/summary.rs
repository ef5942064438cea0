//! Totals of income and expenses across the stored transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, named_params};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The transaction type counted as income.
const INCOME: &str = "income";
/// The transaction type counted as an expense.
const EXPENSE: &str = "expense";

/// Total income, total expenses and the difference between them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of the amounts of `"income"` transactions.
    pub total_income: f64,
    /// Sum of the amounts of `"expense"` transactions.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
}

impl Summary {
    /// Build a summary from per-type totals.
    ///
    /// Types other than `"income"` and `"expense"` are ignored, and a missing
    /// type counts as zero.
    pub fn from_type_totals(totals: &[(String, f64)]) -> Self {
        let total_for = |kind: &str| {
            totals
                .iter()
                .find(|(total_kind, _)| total_kind == kind)
                .map_or(0.0, |(_, total)| *total)
        };

        let total_income = total_for(INCOME);
        let total_expenses = total_for(EXPENSE);

        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }
}

/// Optional restrictions on which transactions are summed.
///
/// `from` and `to` are inclusive and compared as text, which orders ISO 8601
/// dates correctly.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFilter {
    /// Only include transactions dated on or after this date.
    pub from: Option<String>,
    /// Only include transactions dated on or before this date.
    pub to: Option<String>,
    /// Only include transactions in this category.
    pub category: Option<String>,
}

/// The state needed to compute the summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the income/expense [Summary].
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    filter: Result<Query<SummaryFilter>, QueryRejection>,
) -> Response {
    let Query(filter) = match filter {
        Ok(filter) => filter,
        Err(rejection) => {
            tracing::debug!("Rejected summary query: {rejection}");
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

    match get_summary(&filter, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Sum the transaction amounts per type and summarise income against expenses.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_summary(filter: &SummaryFilter, connection: &Connection) -> Result<Summary, Error> {
    let totals = connection
        .prepare(
            "SELECT type, SUM(amount) FROM transactions \
            WHERE (:from IS NULL OR date >= :from) \
            AND (:to IS NULL OR date <= :to) \
            AND (:category IS NULL OR category = :category) \
            GROUP BY type",
        )?
        .query_map(
            named_params! {
                ":from": filter.from,
                ":to": filter.to,
                ":category": filter.category,
            },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?
        .collect::<Result<Vec<(String, f64)>, _>>()?;

    Ok(Summary::from_type_totals(&totals))
}
