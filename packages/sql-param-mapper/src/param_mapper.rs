use std::collections::BTreeMap;

use sqltk::parser::ast::Statement;
use tracing::debug;

use crate::{
    diagnostics::{Diagnostics, WarningKind},
    log::STATEMENT,
    Column, InvariantError, Param,
};

/// The columns that the ordinal parameters of a statement bind to.
///
/// When a parameter is discovered more than once, the binding discovered last wins.
pub type ParameterMap = BTreeMap<Param, Column>;

/// Walks a statement and builds its [`ParameterMap`].
///
/// The statement-specific parts live in `statement_impls` and the WHERE-clause walk in `predicate`. Every shape that
/// cannot be interpreted is reported to the [`Diagnostics`] and skipped; only violated AST invariants are errors.
#[derive(Debug)]
pub(crate) struct ParamMapper<'d> {
    pub(crate) diagnostics: &'d mut Diagnostics,
}

impl<'d> ParamMapper<'d> {
    pub(crate) fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub(crate) fn map_statement(
        &mut self,
        statement: &Statement,
    ) -> Result<ParameterMap, InvariantError> {
        match statement {
            Statement::Insert(insert) => self.map_insert(insert),

            Statement::Update {
                table,
                assignments,
                from,
                selection,
                ..
            } => self.map_update(table, assignments, from.as_ref(), selection.as_ref()),

            Statement::Query(query) => self.map_query(query, None),

            Statement::Delete(delete) => self.map_delete(delete),

            other => {
                debug!(target: STATEMENT, "statement kind is not analyzed");
                self.diagnostics.warn(WarningKind::Statement, other);
                Ok(ParameterMap::new())
            }
        }
    }
}
