//! Builds WHERE clauses that always restrict a query to one user's accounts.
//!
//! A [Filter] can only be created from an [OwnerScope], and every filter
//! starts with the `user_id = ?` predicate, so a query built from a filter
//! cannot read or modify another user's rows whatever IDs the client sends.

use rusqlite::types::ToSql;

use crate::UserId;

/// The accounts owned by a single user.
#[derive(Debug, Clone, Copy)]
pub struct OwnerScope<'a> {
    owner: &'a UserId,
}

impl<'a> OwnerScope<'a> {
    /// Scope queries to the accounts owned by `owner`.
    pub fn new(owner: &'a UserId) -> Self {
        Self { owner }
    }

    /// The user new rows should be owned by.
    pub fn owner(&self) -> &'a UserId {
        self.owner
    }

    /// Start a filter that matches every row owned by the user.
    pub fn filter(&self) -> Filter<'a> {
        Filter {
            predicates: vec!["user_id = ?".to_owned()],
            params: vec![self.owner as &dyn ToSql],
        }
    }
}

/// A conjunction of predicates with positional parameters.
///
/// The first predicate is always the owner predicate.
pub struct Filter<'a> {
    predicates: Vec<String>,
    params: Vec<&'a dyn ToSql>,
}

impl<'a> Filter<'a> {
    /// Also require `column` to equal `value`.
    pub fn and_eq(mut self, column: &str, value: &'a dyn ToSql) -> Self {
        self.predicates.push(format!("{column} = ?"));
        self.params.push(value);
        self
    }

    /// Also require `column` to be one of `values`.
    ///
    /// An empty `values` matches nothing.
    pub fn and_in<T: ToSql>(mut self, column: &str, values: &'a [T]) -> Self {
        if values.is_empty() {
            self.predicates.push("0 = 1".to_owned());
            return self;
        }

        let placeholders = std::iter::repeat_n("?", values.len())
            .collect::<Vec<_>>()
            .join(", ");
        self.predicates.push(format!("{column} IN ({placeholders})"));
        self.params
            .extend(values.iter().map(|value| value as &dyn ToSql));
        self
    }

    /// The WHERE clause, e.g. `WHERE user_id = ? AND id = ?`.
    pub fn where_clause(&self) -> String {
        format!("WHERE {}", self.predicates.join(" AND "))
    }

    /// The parameters for the placeholders in [Filter::where_clause], in order.
    pub fn params(&self) -> &[&'a dyn ToSql] {
        &self.params
    }
}
