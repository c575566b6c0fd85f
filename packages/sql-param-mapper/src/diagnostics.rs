//! Non-fatal diagnostics recorded while mapping parameters.
use std::fmt;

use derive_more::Display;
use serde::Serialize;
use tracing::debug;

use crate::log::ANALYZER;

/// The kind of SQL shape that could not be (fully) interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A statement other than INSERT, UPDATE, SELECT or DELETE.
    #[display("statement")]
    Statement,

    /// A WHERE-clause predicate shape that is not recognised.
    #[display("where clause")]
    WhereClause,

    /// An INSERT source other than a single-row `VALUES` list with an explicit column list.
    #[display("select clause")]
    SelectClause,

    /// A `VALUES` cell with no matching entry in the INSERT column list.
    #[display("column type in select clause")]
    ColumnTypeInSelectClause,

    /// A column reference with more than two name parts.
    #[display("column reference")]
    ColumnReference,

    /// An UPDATE assignment target that is not a plain column name.
    #[display("assignment target")]
    AssignmentTarget,

    /// A placeholder that is not an ordinal (`$1`, `$2`, ...).
    #[display("placeholder")]
    Placeholder,

    /// A query body that is not a plain SELECT (`UNION`, `VALUES`, ...).
    #[display("select body")]
    SelectBody,
}

/// A recognised but unsupported (or structurally odd) piece of SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[display("{kind} not supported: {node}")]
pub struct Warning {
    pub kind: WarningKind,

    /// The offending AST node, rendered as SQL.
    pub node: String,
}

/// Collects the [`Warning`]s of a single analysis.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn warn(&mut self, kind: WarningKind, node: &impl fmt::Display) {
        let node = node.to_string();
        debug!(target: ANALYZER, %kind, node = %node, "not supported");
        self.warnings.push(Warning { kind, node });
    }

    pub(crate) fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
