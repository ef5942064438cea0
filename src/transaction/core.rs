use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// An income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by the database on insert.
    pub id: TransactionId,
    /// Whether this is `"income"` or an `"expense"`.
    ///
    /// Other values are stored as is, but do not count towards the summary.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free text category, e.g. "groceries".
    pub category: String,
    /// The amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: String,
    /// Optional notes about the transaction.
    pub description: Option<String>,
}

/// The JSON body for creating or replacing a transaction.
///
/// Every field except `description` must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether this is `"income"` or an `"expense"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free text category.
    pub category: String,
    /// The amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: String,
    /// Optional notes about the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionForm {
    /// Attach the database `id` to the form's fields.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

/// Create the transactions table if it does not exist yet.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Map a row with the columns `id, type, category, amount, date, description` to a
/// [Transaction].
pub fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let category = row.get(2)?;
    let amount = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        kind,
        category,
        amount,
        date,
        description,
    })
}
