//! Defines the endpoint for getting a single account.

use axum::extract::{Path, State};
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use crate::{
    Error, UserId,
    account::{
        AccountId, AccountSummary,
        core::{AccountState, map_row_to_summary},
        scope::OwnerScope,
    },
    app_state::lock_connection,
    response::Data,
};

/// A route handler for getting one of the current user's accounts.
pub async fn get_account_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
    Path(account_id): Path<String>,
) -> Result<Data<AccountSummary>, Error> {
    let account_id = AccountId::parse(&account_id)?;
    let connection = lock_connection(&state.db_connection)?;

    get_account(OwnerScope::new(&user_id), &account_id, &connection).map(Data::new)
}

/// Get the account with `id` in `scope`.
///
/// # Errors
///
/// Returns [Error::AccountNotFound] if there is no such account or it belongs to another user.
pub fn get_account(
    scope: OwnerScope,
    id: &AccountId,
    connection: &Connection,
) -> Result<AccountSummary, Error> {
    let filter = scope.filter().and_eq("id", id);
    let query = format!("SELECT id, name FROM account {}", filter.where_clause());

    connection
        .prepare(&query)?
        .query_row(params_from_iter(filter.params()), map_row_to_summary)
        .optional()?
        .ok_or(Error::AccountNotFound)
}
