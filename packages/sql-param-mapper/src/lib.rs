//! `sql-param-mapper` works out which table column each ordinal bind parameter (`$1`, `$2`, ...) of a PostgreSQL
//! statement binds to, so that the type of the value supplied for the parameter can be checked against the column.
//!
//! Analysis is static and schema-free: it follows relation aliases, joins and correlated subqueries, and reports the
//! SQL shapes it does not understand as [`Warning`]s instead of failing.

mod analyzer;
mod diagnostics;
mod error;
mod log;
mod model;
mod operand;
mod param;
mod param_mapper;
mod parser;
mod placeholder_tracker;
mod predicate;
mod scope;
mod statement_impls;

#[cfg(test)]
mod test_helpers;

pub use analyzer::*;
pub use diagnostics::{Warning, WarningKind};
pub use error::*;
pub use model::*;
pub use param::*;
pub use param_mapper::ParameterMap;
pub use scope::AliasScope;
