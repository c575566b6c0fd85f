use std::fmt::{self, Display};

use serde::Serialize;
use sqltk::parser::ast::{Ident, ObjectName};

use crate::InvariantError;

use super::{object_name_idents, SqlIdent};

/// A named, optionally schema-qualified table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    pub schema: Option<String>,
    pub table: String,
}

impl Relation {
    /// Table name used when an unqualified column cannot be attributed to any relation in scope.
    pub const NOT_FOUND: &'static str = "<NOT FOUND>";

    pub fn new(schema: Option<&str>, table: &str) -> Self {
        Self {
            schema: schema.map(String::from),
            table: table.to_string(),
        }
    }

    pub(crate) fn not_found() -> Self {
        Self::new(None, Self::NOT_FOUND)
    }

    /// A relation named by a column qualifier that is not an alias in scope.
    pub(crate) fn from_qualifier(qualifier: &Ident) -> Self {
        Self {
            schema: None,
            table: SqlIdent(qualifier).canonical(),
        }
    }
}

/// The table is the last part of the name and the schema (if any) is the part before it.
impl TryFrom<&ObjectName> for Relation {
    type Error = InvariantError;

    fn try_from(name: &ObjectName) -> Result<Self, Self::Error> {
        let mut idents = object_name_idents(name).rev();

        match (idents.next(), idents.next()) {
            (Some(table), schema) => Ok(Self {
                schema: schema.map(|schema| SqlIdent(schema).canonical()),
                table: SqlIdent(table).canonical(),
            }),
            (None, _) => Err(InvariantError::EmptyObjectName(name.to_string())),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        f.write_str(&self.table)
    }
}

/// A JSON field extraction (`->` or `->>`) applied on top of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JsonAccessor {
    /// The extracted keys (or array indices), joined by `.` when the operators are chained.
    pub path: String,

    /// `true` for `->>` (the result is `text`), `false` for `->` (the result is `json`/`jsonb`).
    pub is_text: bool,
}

/// The column that a bind parameter binds to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_accessor: Option<JsonAccessor>,
}

impl Column {
    pub fn new(relation: Relation, column: impl Into<String>) -> Self {
        let Relation { schema, table } = relation;

        Self {
            schema,
            table,
            column: column.into(),
            json_accessor: None,
        }
    }

    pub fn with_json_accessor(self, json_accessor: JsonAccessor) -> Self {
        Self {
            json_accessor: Some(json_accessor),
            ..self
        }
    }

    pub fn relation(&self) -> Relation {
        Relation {
            schema: self.schema.clone(),
            table: self.table.clone(),
        }
    }
}

/// Renders as `schema.table.column.path`, skipping the parts that are absent.
impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation(), self.column)?;
        if let Some(JsonAccessor { path, .. }) = &self.json_accessor {
            write!(f, ".{path}")?;
        }
        Ok(())
    }
}
