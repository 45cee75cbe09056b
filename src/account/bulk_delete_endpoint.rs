//! Defines the endpoint for deleting several accounts at once.

use std::collections::HashSet;

use axum::extract::State;
use rusqlite::{Connection, params_from_iter};
use serde::Deserialize;

use crate::{
    Error, UserId,
    account::{
        AccountId, DeletedAccount,
        core::{AccountState, map_row_to_deleted},
        scope::OwnerScope,
    },
    app_state::lock_connection,
    response::Data,
    validation::{Constraint, Field, FieldKind, RequestSchema, Schema, ValidatedJson},
};

/// The request body for deleting several accounts.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteForm {
    pub ids: Vec<String>,
}

impl RequestSchema for BulkDeleteForm {
    const SCHEMA: Schema = Schema {
        fields: &[Field {
            name: "ids",
            kind: FieldKind::StringArray,
            required: true,
            constraint: Constraint::None,
        }],
    };
}

/// A route handler for deleting the current user's accounts among `ids`.
///
/// IDs that do not exist or belong to another user are skipped. Responds with
/// the IDs that were actually deleted.
pub async fn bulk_delete_accounts_endpoint(
    user_id: UserId,
    State(state): State<AccountState>,
    ValidatedJson(form): ValidatedJson<BulkDeleteForm>,
) -> Result<Data<Vec<DeletedAccount>>, Error> {
    // Blank IDs can never match an account.
    let mut seen = HashSet::new();
    let ids: Vec<AccountId> = form
        .ids
        .iter()
        .filter_map(|id| AccountId::parse(id).ok())
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if ids.is_empty() {
        return Ok(Data::new(Vec::new()));
    }

    let connection = lock_connection(&state.db_connection)?;
    let deleted = delete_accounts(OwnerScope::new(&user_id), &ids, &connection)?;
    tracing::info!(
        "Deleted {} of {} requested accounts for {user_id}",
        deleted.len(),
        ids.len()
    );

    Ok(Data::new(deleted))
}

/// The most IDs bound in a single DELETE statement.
///
/// SQLite limits the number of variables in one statement to 32766.
const DELETE_BATCH_SIZE: usize = 500;

/// Delete every account in `scope` whose ID is in `ids` and return their IDs.
///
/// Large `ids` are deleted in batches of [DELETE_BATCH_SIZE] within one
/// transaction, so either every batch is deleted or none are.
pub fn delete_accounts(
    scope: OwnerScope,
    ids: &[AccountId],
    connection: &Connection,
) -> Result<Vec<DeletedAccount>, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut deleted = Vec::new();

    for batch in ids.chunks(DELETE_BATCH_SIZE) {
        let filter = scope.filter().and_in("id", batch);
        let query = format!("DELETE FROM account {} RETURNING id", filter.where_clause());

        let mut statement = transaction.prepare(&query)?;
        let rows =
            statement.query_map(params_from_iter(filter.params()), map_row_to_deleted)?;
        for row in rows {
            deleted.push(row?);
        }
    }

    transaction.commit()?;

    Ok(deleted)
}
