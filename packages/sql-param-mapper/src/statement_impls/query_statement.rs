use sqltk::parser::ast::{Query, Select, SetExpr};
use tracing::debug;

use crate::{
    diagnostics::WarningKind, log::STATEMENT, param_mapper::ParamMapper, AliasScope,
    InvariantError, ParameterMap,
};

impl ParamMapper<'_> {
    /// Maps a query, either top-level or nested in a predicate.
    ///
    /// Only the WHERE clause of a plain SELECT is inspected. `parent` is the scope of the enclosing statement when the
    /// query is a correlated subquery.
    pub(crate) fn map_query(
        &mut self,
        query: &Query,
        parent: Option<&AliasScope>,
    ) -> Result<ParameterMap, InvariantError> {
        match &*query.body {
            SetExpr::Select(select) => self.map_select(select, parent),
            SetExpr::Query(inner) => self.map_query(inner, parent),
            body => {
                self.diagnostics.warn(WarningKind::SelectBody, body);
                Ok(ParameterMap::new())
            }
        }
    }

    fn map_select(
        &mut self,
        select: &Select,
        parent: Option<&AliasScope>,
    ) -> Result<ParameterMap, InvariantError> {
        let scope = AliasScope::nested(parent, &select.from)?;

        debug!(
            target: STATEMENT,
            relations = scope.len(),
            correlated = parent.is_some(),
            "mapping SELECT"
        );

        match &select.selection {
            Some(selection) => self.map_predicate(selection, &scope),
            None => Ok(ParameterMap::new()),
        }
    }
}
