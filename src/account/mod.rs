//! The accounts a user keeps track of and the route handlers for managing them.
//!
//! Every query in this module is built from an [OwnerScope](scope::OwnerScope)
//! so that it only ever touches the rows owned by the user making the request.

mod bulk_delete_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod scope;

pub use bulk_delete_endpoint::bulk_delete_accounts_endpoint;
pub use core::{
    Account, AccountId, AccountName, AccountSummary, DeletedAccount, create_account_table,
};
pub use create_endpoint::{create_account, create_account_endpoint};
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use get_endpoint::get_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
pub use scope::OwnerScope;
