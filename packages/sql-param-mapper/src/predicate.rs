//! Extraction of parameter bindings from WHERE-clause predicates.
use sqltk::parser::ast::{BinaryOperator, Expr, UnaryOperator};
use tracing::trace;

use crate::{
    diagnostics::WarningKind, log::PREDICATE, operand::Operand, param_mapper::ParamMapper,
    AliasScope, InvariantError, ParameterMap,
};

impl ParamMapper<'_> {
    /// Collects the parameters that `expr` compares directly against a column.
    ///
    /// Recognised shapes are `column <op> $n` (including `ANY`/`ALL`), `column IN (..., $n, ...)`, comparisons against
    /// a scalar subquery (which is mapped with `scope` as its parent scope), boolean combinations of those and null
    /// tests. Comparisons between two columns are silently skipped. Everything else is reported as a
    /// [`WarningKind::WhereClause`] warning.
    pub(crate) fn map_predicate(
        &mut self,
        expr: &Expr,
        scope: &AliasScope,
    ) -> Result<ParameterMap, InvariantError> {
        let mut params = ParameterMap::new();

        match expr {
            Expr::Nested(inner) => return self.map_predicate(inner, scope),

            Expr::BinaryOp {
                left,
                op: BinaryOperator::And | BinaryOperator::Or,
                right,
            } => {
                params.extend(self.map_predicate(left, scope)?);
                params.extend(self.map_predicate(right, scope)?);
            }

            Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr: operand,
            } => params.extend(self.map_predicate(operand, scope)?),

            Expr::BinaryOp { left, right, .. }
            | Expr::AnyOp { left, right, .. }
            | Expr::AllOp { left, right, .. } => {
                params.extend(self.map_comparison(expr, left, right, scope)?)
            }

            Expr::InList {
                expr: needle, list, ..
            } => params.extend(self.map_in_list(expr, needle, list, scope)?),

            Expr::IsNull(_) | Expr::IsNotNull(_) => {}

            _ => self.diagnostics.warn(WarningKind::WhereClause, expr),
        }

        Ok(params)
    }

    fn map_comparison(
        &mut self,
        comparison: &Expr,
        left: &Expr,
        right: &Expr,
        scope: &AliasScope,
    ) -> Result<ParameterMap, InvariantError> {
        let mut params = ParameterMap::new();

        match (Operand::of(left), Operand::of(right)) {
            (Operand::Column(column), Operand::Param(param)) => {
                params.insert(param, scope.resolve(column, self.diagnostics)?);
            }

            (Operand::JsonAccess(column, accessor), Operand::Param(param)) => {
                let column = scope
                    .resolve(column, self.diagnostics)?
                    .with_json_accessor(accessor);
                params.insert(param, column);
            }

            (_, Operand::Subquery(query)) => {
                trace!(target: PREDICATE, "mapping correlated subquery");
                params.extend(self.map_query(query, Some(scope))?);
            }

            // A join predicate.
            (_, Operand::Column(_)) => {}

            (_, Operand::Placeholder(placeholder)) => {
                self.diagnostics.warn(WarningKind::Placeholder, &placeholder)
            }

            _ => self.diagnostics.warn(WarningKind::WhereClause, comparison),
        }

        Ok(params)
    }

    fn map_in_list(
        &mut self,
        in_list: &Expr,
        needle: &Expr,
        list: &[Expr],
        scope: &AliasScope,
    ) -> Result<ParameterMap, InvariantError> {
        let mut params = ParameterMap::new();

        let Operand::Column(column) = Operand::of(needle) else {
            self.diagnostics.warn(WarningKind::WhereClause, in_list);
            return Ok(params);
        };

        let column = scope.resolve(column, self.diagnostics)?;

        for item in list {
            match Operand::of(item) {
                Operand::Param(param) => {
                    params.insert(param, column.clone());
                }
                Operand::Placeholder(placeholder) => {
                    self.diagnostics.warn(WarningKind::Placeholder, &placeholder)
                }
                _ => {}
            }
        }

        Ok(params)
    }
}
