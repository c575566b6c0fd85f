use sqltk::parser::ast::{Delete, FromTable};
use tracing::debug;

use crate::{
    log::STATEMENT, param_mapper::ParamMapper, AliasScope, InvariantError, ParameterMap,
};

impl ParamMapper<'_> {
    /// The WHERE clause of a DELETE is mapped against the deleted-from table only; `USING` relations are not in scope.
    pub(crate) fn map_delete(&mut self, delete: &Delete) -> Result<ParameterMap, InvariantError> {
        let Delete {
            from, selection, ..
        } = delete;

        let tables = match from {
            FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
        };

        let scope = match tables.first() {
            Some(table) => AliasScope::from_table_factor(&table.relation)?,
            None => AliasScope::new(),
        };

        debug!(target: STATEMENT, relations = scope.len(), "mapping DELETE");

        match selection {
            Some(selection) => self.map_predicate(selection, &scope),
            None => Ok(ParameterMap::new()),
        }
    }
}
