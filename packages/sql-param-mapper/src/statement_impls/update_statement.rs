use std::slice;

use sqltk::parser::ast::{
    Assignment, AssignmentTarget, Expr, TableFactor, TableWithJoins, UpdateTableFromKind,
};
use tracing::debug;

use crate::{
    diagnostics::WarningKind,
    log::STATEMENT,
    model::{object_name_idents, SqlIdent},
    operand::Operand,
    param_mapper::ParamMapper,
    AliasScope, Column, InvariantError, ParameterMap, Relation,
};

impl ParamMapper<'_> {
    /// `SET column = $n` binds to the updated table. The WHERE clause is mapped against the updated table (and its
    /// joins) plus the relations of the `FROM` clause, and its bindings win over those of the SET clause.
    pub(crate) fn map_update(
        &mut self,
        table: &TableWithJoins,
        assignments: &[Assignment],
        from: Option<&UpdateTableFromKind>,
        selection: Option<&Expr>,
    ) -> Result<ParameterMap, InvariantError> {
        let TableFactor::Table { name, .. } = &table.relation else {
            self.diagnostics.warn(WarningKind::Statement, table);
            return Ok(ParameterMap::new());
        };

        let relation = Relation::try_from(name)?;
        debug!(target: STATEMENT, %relation, assignments = assignments.len(), "mapping UPDATE");

        let mut params = ParameterMap::new();

        for Assignment { target, value } in assignments {
            let column = match target {
                AssignmentTarget::ColumnName(column) => column,
                AssignmentTarget::Tuple(_) => {
                    self.diagnostics.warn(WarningKind::AssignmentTarget, target);
                    continue;
                }
            };

            match Operand::of(value) {
                Operand::Param(param) => {
                    let column = object_name_idents(column)
                        .last()
                        .ok_or_else(|| InvariantError::EmptyObjectName(column.to_string()))?;

                    params.insert(
                        param,
                        Column::new(relation.clone(), SqlIdent(column).canonical()),
                    );
                }
                Operand::Placeholder(placeholder) => {
                    self.diagnostics.warn(WarningKind::Placeholder, &placeholder)
                }
                _ => {}
            }
        }

        if let Some(selection) = selection {
            let mut scope = AliasScope::from_tables(slice::from_ref(table))?;

            if let Some(UpdateTableFromKind::BeforeSet(tables) | UpdateTableFromKind::AfterSet(tables)) =
                from
            {
                scope.merge(AliasScope::from_tables(tables)?);
            }

            params.extend(self.map_predicate(selection, &scope)?);
        }

        Ok(params)
    }
}
