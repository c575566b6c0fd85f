use sqltk::parser::ast::{Expr, Ident, Insert, Query, SetExpr, TableObject, Values};
use tracing::debug;

use crate::{
    diagnostics::WarningKind, log::STATEMENT, model::SqlIdent, operand::Operand,
    param_mapper::ParamMapper, Column, InvariantError, ParameterMap, Relation,
};

impl ParamMapper<'_> {
    /// Binds the placeholders of a single-row `INSERT INTO t (a, b, ...) VALUES (...)` to the listed columns by
    /// position.
    pub(crate) fn map_insert(&mut self, insert: &Insert) -> Result<ParameterMap, InvariantError> {
        let Insert {
            table,
            columns,
            source,
            ..
        } = insert;

        let relation = match table {
            TableObject::TableName(name) => Relation::try_from(name)?,
            TableObject::TableFunction(function) => {
                self.diagnostics.warn(WarningKind::Statement, function);
                return Ok(ParameterMap::new());
            }
        };

        debug!(target: STATEMENT, %relation, columns = columns.len(), "mapping INSERT");

        let Some(source) = source else {
            self.diagnostics.warn(WarningKind::SelectClause, &"DEFAULT VALUES");
            return Ok(ParameterMap::new());
        };

        match single_row(source) {
            Some(row) if !columns.is_empty() => Ok(self.map_values_row(&relation, columns, row)),
            _ => {
                self.diagnostics.warn(WarningKind::SelectClause, source);
                Ok(ParameterMap::new())
            }
        }
    }

    fn map_values_row(
        &mut self,
        relation: &Relation,
        columns: &[Ident],
        row: &[Expr],
    ) -> ParameterMap {
        let mut params = ParameterMap::new();

        for (position, cell) in row.iter().enumerate() {
            match Operand::of(cell) {
                Operand::Param(param) => match columns.get(position) {
                    Some(column) => {
                        params.insert(
                            param,
                            Column::new(relation.clone(), SqlIdent(column).canonical()),
                        );
                    }
                    None => self
                        .diagnostics
                        .warn(WarningKind::ColumnTypeInSelectClause, cell),
                },
                Operand::Placeholder(placeholder) => {
                    self.diagnostics.warn(WarningKind::Placeholder, &placeholder)
                }
                _ => {}
            }
        }

        params
    }
}

/// The row of a `VALUES` source that has exactly one row.
fn single_row(source: &Query) -> Option<&[Expr]> {
    match &*source.body {
        SetExpr::Values(Values { rows, .. }) => match rows.as_slice() {
            [row] => Some(row.as_slice()),
            _ => None,
        },
        _ => None,
    }
}
