//! Defines the endpoint for creating a new account.

use axum::extract::State;
use rusqlite::Connection;

use crate::{
    Error, UserId,
    account::{
        Account, AccountId, AccountName,
        core::{ACCOUNT_COLUMNS, AccountForm, AccountState, map_row_to_account},
        scope::OwnerScope,
    },
    app_state::lock_connection,
    response::Data,
    validation::ValidatedJson,
};

/// A route handler for creating a new account owned by the current user, responds with the created account.
pub async fn create_account_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
    ValidatedJson(form): ValidatedJson<AccountForm>,
) -> Result<Data<Account>, Error> {
    let name = AccountName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(OwnerScope::new(&user_id), name, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not create account with {form:?} for {user_id}: {error}")
        })?;

    tracing::info!("Created account {} for {user_id}", account.id);

    Ok(Data::new(account))
}

/// Insert a new account owned by the owner of `scope` and return the stored row.
///
/// The ID is generated here and the external link is always left unset.
pub fn create_account(
    scope: OwnerScope,
    name: AccountName,
    connection: &Connection,
) -> Result<Account, Error> {
    let id = AccountId::generate();

    connection
        .prepare(&format!(
            "INSERT INTO account (id, user_id, name, external_link_id)
             VALUES (?1, ?2, ?3, NULL)
             RETURNING {ACCOUNT_COLUMNS}"
        ))?
        .query_row((&id, scope.owner(), &name), map_row_to_account)
        .map_err(Error::from)
}
