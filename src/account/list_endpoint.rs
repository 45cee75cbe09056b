//! Defines the endpoint for listing the accounts of the current user.

use axum::extract::State;
use rusqlite::{Connection, params_from_iter};

use crate::{
    Error, UserId,
    account::{
        AccountSummary,
        core::{AccountState, map_row_to_summary},
        scope::OwnerScope,
    },
    app_state::lock_connection,
    response::Data,
};

/// A route handler for listing the accounts owned by the current user.
pub async fn list_accounts_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
) -> Result<Data<Vec<AccountSummary>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_accounts(OwnerScope::new(&user_id), &connection).map(Data::new)
}

/// Get the ID and name of every account in `scope`, in insertion order.
pub fn list_accounts(
    scope: OwnerScope,
    connection: &Connection,
) -> Result<Vec<AccountSummary>, Error> {
    let filter = scope.filter();
    let query = format!(
        "SELECT id, name FROM account {} ORDER BY rowid ASC",
        filter.where_clause()
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(filter.params()), map_row_to_summary)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}
