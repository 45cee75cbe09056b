//! Defines the endpoint for deleting an account.

use axum::extract::{Path, State};
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use crate::{
    Error, UserId,
    account::{
        AccountId, DeletedAccount,
        core::{AccountState, map_row_to_deleted},
        scope::OwnerScope,
    },
    app_state::lock_connection,
    response::Data,
};

/// A route handler for deleting one of the current user's accounts, responds with the deleted ID.
pub async fn delete_account_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
    Path(account_id): Path<String>,
) -> Result<Data<DeletedAccount>, Error> {
    let account_id = AccountId::parse(&account_id)?;
    let connection = lock_connection(&state.db_connection)?;

    let deleted = delete_account(OwnerScope::new(&user_id), &account_id, &connection)?;
    tracing::info!("Deleted account {} for {user_id}", deleted.id);

    Ok(Data::new(deleted))
}

/// Delete the account with `id` in `scope`.
///
/// # Errors
///
/// Returns [Error::AccountNotFound] if there is no such account or it belongs to another user.
pub fn delete_account(
    scope: OwnerScope,
    id: &AccountId,
    connection: &Connection,
) -> Result<DeletedAccount, Error> {
    let filter = scope.filter().and_eq("id", id);
    let query = format!("DELETE FROM account {} RETURNING id", filter.where_clause());

    connection
        .prepare(&query)?
        .query_row(params_from_iter(filter.params()), map_row_to_deleted)
        .optional()?
        .ok_or(Error::AccountNotFound)
}
