use std::slice;

use sqltk::parser::ast::{BinaryOperator, Expr, Ident, Query, Value, ValueWithSpan};

use crate::{JsonAccessor, Param};

/// The shapes of expression operands that parameter mapping cares about.
///
/// Parentheses (`Expr::Nested`) are looked through.
#[derive(Debug)]
pub(crate) enum Operand<'ast> {
    /// A column reference: `x`, `t.x`, ...
    Column(&'ast [Ident]),

    /// An ordinal placeholder: `$1`, `$2`, ...
    Param(Param),

    /// A placeholder that is not an ordinal: `?`, `$name`, `:name`, ...
    Placeholder(&'ast str),

    /// A JSON field extraction on a column: `details -> 'key'`, `details ->> 'key'`.
    JsonAccess(&'ast [Ident], JsonAccessor),

    /// A scalar subquery: `(SELECT ...)`.
    Subquery(&'ast Query),

    Other,
}

impl<'ast> Operand<'ast> {
    pub(crate) fn of(expr: &'ast Expr) -> Self {
        match expr {
            Expr::Nested(inner) => Self::of(inner),

            Expr::Identifier(ident) => Self::Column(slice::from_ref(ident)),

            Expr::CompoundIdentifier(idents) => Self::Column(idents.as_slice()),

            Expr::Value(ValueWithSpan {
                value: Value::Placeholder(text),
                ..
            }) => match Param::try_from(text) {
                Ok(param) => Self::Param(param),
                Err(_) => Self::Placeholder(text.as_str()),
            },

            Expr::Subquery(query) => Self::Subquery(query.as_ref()),

            Expr::BinaryOp { .. } => match json_access(expr) {
                Some((column, path, is_text)) => Self::JsonAccess(
                    column,
                    JsonAccessor {
                        path: path.join("."),
                        is_text,
                    },
                ),
                None => Self::Other,
            },

            _ => Self::Other,
        }
    }
}

/// Unpicks `column -> 'a' -> 'b' ->> 'c'` into the column, the path segments and whether the outermost operator
/// yields text.
fn json_access(expr: &Expr) -> Option<(&[Ident], Vec<String>, bool)> {
    let Expr::BinaryOp { left, op, right } = expr else {
        return None;
    };

    let is_text = match op {
        BinaryOperator::Arrow => false,
        BinaryOperator::LongArrow => true,
        _ => return None,
    };

    let key = json_key(right)?;

    match Operand::of(left) {
        Operand::Column(column) => Some((column, vec![key], is_text)),
        Operand::JsonAccess(column, JsonAccessor { path, .. }) => {
            Some((column, vec![path, key], is_text))
        }
        _ => None,
    }
}

fn json_key(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Nested(inner) => json_key(inner),
        Expr::Value(ValueWithSpan {
            value: Value::SingleQuotedString(key),
            ..
        }) => Some(key.clone()),
        Expr::Value(ValueWithSpan {
            value: Value::Number(index, _),
            ..
        }) => Some(index.to_string()),
        _ => None,
    }
}
