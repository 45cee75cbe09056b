//! Database initialization.

use rusqlite::Connection;

use crate::{Error, account::create_account_table};

/// Create the application tables if they do not already exist.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_account_table(connection)?;

    Ok(())
}
