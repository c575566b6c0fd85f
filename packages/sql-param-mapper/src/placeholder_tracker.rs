use std::{collections::BTreeSet, convert::Infallible, ops::ControlFlow};

use sqltk::parser::ast::{Expr, Statement, Value, ValueWithSpan};
use sqltk::{Break, Visitable, Visitor};

use crate::Param;

/// [`Visitor`] implementation that records every ordinal placeholder (`$1`, `$2`, ...) found anywhere in a statement,
/// including the clauses that parameter mapping never looks at (projection, ORDER BY, LIMIT, ...).
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTracker {
    placeholders: BTreeSet<Param>,
}

impl PlaceholderTracker {
    pub(crate) fn track(statement: &Statement) -> BTreeSet<Param> {
        let mut tracker = Self::default();
        // The visitor's error type is `Infallible` and it never breaks, so the traversal always runs to completion.
        let _ = statement.accept(&mut tracker);
        tracker.placeholders
    }
}

impl<'ast> Visitor<'ast> for PlaceholderTracker {
    type Error = Infallible;

    fn enter<N: Visitable>(&mut self, node: &'ast N) -> ControlFlow<Break<Self::Error>> {
        if let Some(Expr::Value(ValueWithSpan {
            value: Value::Placeholder(text),
            ..
        })) = node.downcast_ref::<Expr>()
        {
            // Non-ordinal placeholders are reported by the mapper where it encounters them.
            if let Ok(param) = Param::try_from(text) {
                self.placeholders.insert(param);
            }
        }

        ControlFlow::Continue(())
    }
}
