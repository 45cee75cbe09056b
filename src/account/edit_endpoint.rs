//! Defines the endpoint for renaming an account.

use axum::extract::{Path, State};
use rusqlite::{Connection, OptionalExtension, params_from_iter, types::ToSql};

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

/// A route handler for renaming one of the current user's accounts, responds with the updated account.
pub async fn edit_account_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
    Path(account_id): Path<String>,
    ValidatedJson(form): ValidatedJson<AccountForm>,
) -> Result<Data<Account>, Error> {
    let account_id = AccountId::parse(&account_id)?;
    let name = AccountName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    update_account(OwnerScope::new(&user_id), &account_id, &name, &connection).map(Data::new)
}

/// Set the name of the account with `id` in `scope` and return the updated row.
///
/// # Errors
///
/// Returns [Error::AccountNotFound] if there is no such account or it belongs to another user.
pub fn update_account(
    scope: OwnerScope,
    id: &AccountId,
    name: &AccountName,
    connection: &Connection,
) -> Result<Account, Error> {
    let filter = scope.filter().and_eq("id", id);
    let query = format!(
        "UPDATE account SET name = ? {} RETURNING {ACCOUNT_COLUMNS}",
        filter.where_clause()
    );

    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(filter.params().len() + 1);
    params.push(name);
    params.extend(filter.params());

    connection
        .prepare(&query)?
        .query_row(params_from_iter(params), map_row_to_account)
        .optional()?
        .ok_or(Error::AccountNotFound)
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};

    use crate::{
        Error, UserId,
        account::{
            Account, AccountName,
            core::{AccountForm, AccountState},
            create_endpoint::create_account,
            edit_account_endpoint,
            get_endpoint::get_account,
            scope::OwnerScope,
        },
        test_utils::must_create_test_connection,
        validation::ValidatedJson,
    };

    fn state_with_account(owner: &UserId) -> (AccountState, Account) {
        let connection = must_create_test_connection();
        let account = create_account(
            OwnerScope::new(owner),
            AccountName::new_unchecked("Checking"),
            &connection,
        )
        .expect("could not create test account");

        (
            AccountState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            account,
        )
    }

    fn rename_to(name: &str) -> ValidatedJson<AccountForm> {
        ValidatedJson(AccountForm {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn can_rename_account() {
        let owner = UserId::new("alice").unwrap();
        let (state, account) = state_with_account(&owner);

        let got = edit_account_endpoint(
            owner.clone(),
            State(state.clone()),
            Path(account.id.as_str().to_owned()),
            rename_to("Savings"),
        )
        .await
        .expect("could not update account")
        .data;

        let want = Account {
            name: AccountName::new_unchecked("Savings"),
            ..account
        };
        assert_eq!(got, want);
        let stored = get_account(
            OwnerScope::new(&owner),
            &want.id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(stored.name, want.name);
    }

    #[tokio::test]
    async fn cannot_rename_account_of_other_user() {
        let owner = UserId::new("alice").unwrap();
        let (state, account) = state_with_account(&owner);

        let got = edit_account_endpoint(
            UserId::new("mallory").unwrap(),
            State(state.clone()),
            Path(account.id.as_str().to_owned()),
            rename_to("Pwned"),
        )
        .await;

        assert_eq!(got, Err(Error::AccountNotFound));
        let stored = get_account(
            OwnerScope::new(&owner),
            &account.id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(stored.name, account.name);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let owner = UserId::new("alice").unwrap();
        let (state, account) = state_with_account(&owner);

        let got = edit_account_endpoint(
            owner.clone(),
            State(state.clone()),
            Path(account.id.as_str().to_owned()),
            rename_to(" \t\n"),
        )
        .await;

        assert_eq!(got, Err(Error::EmptyAccountName));
        let stored = get_account(
            OwnerScope::new(&owner),
            &account.id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(stored.name, account.name);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let owner = UserId::new("alice").unwrap();
        let (state, _) = state_with_account(&owner);

        let got = edit_account_endpoint(
            owner,
            State(state),
            Path("nope".to_owned()),
            rename_to("Savings"),
        )
        .await;

        assert_eq!(got, Err(Error::AccountNotFound));
    }

    #[tokio::test]
    async fn blank_id_is_bad_request() {
        let owner = UserId::new("alice").unwrap();
        let (state, _) = state_with_account(&owner);

        let got =
            edit_account_endpoint(owner, State(state), Path(String::new()), rename_to("Savings"))
                .await;

        assert_eq!(got, Err(Error::MissingId));
    }
}
