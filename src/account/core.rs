use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{
    Connection, Row,
    types::{ToSql, ToSqlOutput},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AppState, Error, UserId,
    validation::{Constraint, Field, FieldKind, RequestSchema, Schema},
};

/// An opaque, server generated identifier for an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Generate a new, random account ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parse an account ID supplied by a client.
    ///
    /// IDs are opaque, so a non-blank `id` is kept exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingId] if `id` is empty or only whitespace.
    pub fn parse(id: &str) -> Result<Self, Error> {
        if id.trim().is_empty() {
            Err(Error::MissingId)
        } else {
            Ok(Self(id.to_owned()))
        }
    }

    /// The account ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for AccountId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// A validated, non-empty account name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyAccountName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create an account name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for AccountName {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// A bank account, credit card or other pot of money a user keeps track of.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The user that owns the account.
    pub user_id: UserId,
    /// The name of the account, e.g. "Checking".
    pub name: AccountName,
    /// Reserved for linking the account to a bank feed. Never set through the API.
    pub external_link_id: Option<String>,
}

/// The fields of an account shown in lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: AccountName,
}

/// The ID of an account that was deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedAccount {
    pub id: AccountId,
}

/// The request body for creating or renaming an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    pub name: String,
}

impl RequestSchema for AccountForm {
    const SCHEMA: Schema = Schema {
        fields: &[Field {
            name: "name",
            kind: FieldKind::String,
            required: true,
            constraint: Constraint::NonBlank,
        }],
    };
}

/// The state needed by the account route handlers.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            external_link_id TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_account_user_id ON account(user_id);",
    )?;

    Ok(())
}

/// The columns [map_row_to_account] expects, in order.
pub const ACCOUNT_COLUMNS: &str = "id, user_id, name, external_link_id";

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let external_link_id = row.get(3)?;

    Ok(Account {
        id: AccountId(id),
        user_id: UserId::new(&user_id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "user_id".to_owned(), rusqlite::types::Type::Text)
        })?,
        name: AccountName::new_unchecked(&name),
        external_link_id,
    })
}

pub fn map_row_to_summary(row: &Row) -> Result<AccountSummary, rusqlite::Error> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;

    Ok(AccountSummary {
        id: AccountId(id),
        name: AccountName::new_unchecked(&name),
    })
}

pub fn map_row_to_deleted(row: &Row) -> Result<DeletedAccount, rusqlite::Error> {
    let id: String = row.get(0)?;

    Ok(DeletedAccount { id: AccountId(id) })
}
