//! Relation scoping and column-reference resolution.
use indexmap::IndexMap;
use sqltk::parser::ast::{Ident, TableFactor, TableWithJoins};
use tracing::trace;

use crate::{
    diagnostics::{Diagnostics, WarningKind},
    log::SCOPE,
    model::{Column, Relation, SqlIdent},
    InvariantError,
};

/// Maps the names visible in a FROM clause to the relations they denote.
///
/// The key is the alias of a relation, or `""` for a relation that was brought into scope without an alias. Entries
/// keep their insertion order. Inserting a key that is already present replaces the relation but keeps the original
/// position, so "later wins" for lookups while the order of first appearance is preserved.
///
/// A scope is built once per SELECT/UPDATE/DELETE and never modified afterwards; nested SELECTs get a fresh scope that
/// starts from a copy of their parent's (see [`AliasScope::nested`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasScope {
    relations: IndexMap<String, Relation>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scope from the items of a FROM clause.
    pub fn from_tables(tables: &[TableWithJoins]) -> Result<Self, InvariantError> {
        let mut scope = Self::new();
        for table in tables {
            scope.add_table_with_joins(table)?;
        }
        Ok(scope)
    }

    /// Builds a scope containing a single FROM item, ignoring any joins attached to it.
    pub fn from_table_factor(table_factor: &TableFactor) -> Result<Self, InvariantError> {
        let mut scope = Self::new();
        scope.add_table_factor(table_factor)?;
        Ok(scope)
    }

    /// Builds the scope of a nested SELECT: the parent scope with the SELECT's own FROM items merged on top.
    pub fn nested(parent: Option<&AliasScope>, tables: &[TableWithJoins]) -> Result<Self, InvariantError> {
        let mut scope = parent.cloned().unwrap_or_default();
        scope.merge(Self::from_tables(tables)?);
        Ok(scope)
    }

    /// Copies every entry of `other` into `self`; entries of `other` win on collision.
    pub fn merge(&mut self, other: AliasScope) {
        self.relations.extend(other.relations);
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations
            .iter()
            .map(|(alias, relation)| (alias.as_str(), relation))
    }

    fn add_table_with_joins(&mut self, table: &TableWithJoins) -> Result<(), InvariantError> {
        let TableWithJoins { relation, joins } = table;

        self.add_table_factor(relation)?;
        for join in joins {
            self.add_table_factor(&join.relation)?;
        }

        Ok(())
    }

    fn add_table_factor(&mut self, table_factor: &TableFactor) -> Result<(), InvariantError> {
        match table_factor {
            TableFactor::Table { name, alias, .. } => {
                let relation = Relation::try_from(name)?;
                let key = alias
                    .as_ref()
                    .map(|alias| SqlIdent(&alias.name).canonical())
                    .unwrap_or_default();

                trace!(target: SCOPE, alias = %key, %relation, "bringing relation into scope");
                self.relations.insert(key, relation);
            }

            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.add_table_with_joins(table_with_joins)?,

            // Derived tables, table functions, UNNEST etc. contribute no names. Columns that come from them can only
            // resolve through the unqualified fallback.
            other => {
                trace!(target: SCOPE, from_item = %other, "FROM item contributes no relation");
            }
        }

        Ok(())
    }

    /// Resolves a column reference (the name parts of an identifier such as `a.x` or `x`) to a [`Column`].
    ///
    /// - `x` binds to the only relation in scope, or else to the unaliased relation, or else to a relation named
    ///   [`Relation::NOT_FOUND`].
    /// - `a.x` binds to the relation aliased `a`, or else to a table literally named `a`.
    ///
    /// References with more than two parts are resolved using their first two parts and a warning is recorded. An
    /// empty reference is an [`InvariantError`]; otherwise resolution always succeeds.
    pub(crate) fn resolve(
        &self,
        parts: &[Ident],
        diagnostics: &mut Diagnostics,
    ) -> Result<Column, InvariantError> {
        match parts {
            [] => Err(InvariantError::EmptyColumnRef),

            [column] => Ok(Column::new(
                self.resolve_unqualified(),
                SqlIdent(column).canonical(),
            )),

            [qualifier, column, rest @ ..] => {
                if !rest.is_empty() {
                    diagnostics.warn(WarningKind::ColumnReference, &render_column_ref(parts));
                }

                let relation = self
                    .relations
                    .get(&SqlIdent(qualifier).canonical())
                    .cloned()
                    .unwrap_or_else(|| Relation::from_qualifier(qualifier));

                Ok(Column::new(relation, SqlIdent(column).canonical()))
            }
        }
    }

    fn resolve_unqualified(&self) -> Relation {
        if self.relations.len() == 1 {
            if let Some((_, relation)) = self.relations.first() {
                return relation.clone();
            }
        }

        self.relations
            .get("")
            .cloned()
            .unwrap_or_else(Relation::not_found)
    }
}

fn render_column_ref(parts: &[Ident]) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use sqltk::parser::ast::{Ident, SetExpr, Statement, TableWithJoins};

    use crate::{
        diagnostics::{Diagnostics, WarningKind},
        model::{Column, Relation},
        test_helpers::parse,
        InvariantError,
    };

    use super::AliasScope;

    fn from_clause(sql: &'static str) -> Vec<TableWithJoins> {
        let Statement::Query(query) = parse(sql) else {
            panic!("not a query: {sql}");
        };
        let SetExpr::Select(select) = &*query.body else {
            panic!("not a select: {sql}");
        };
        select.from.clone()
    }

    fn scope_of(sql: &'static str) -> AliasScope {
        AliasScope::from_tables(&from_clause(sql)).unwrap()
    }

    fn entries(scope: &AliasScope) -> Vec<(String, String)> {
        scope
            .iter()
            .map(|(alias, relation)| (alias.to_string(), relation.to_string()))
            .collect()
    }

    fn idents(parts: &[&str]) -> Vec<Ident> {
        parts.iter().map(|part| Ident::new(*part)).collect()
    }

    fn resolve(scope: &AliasScope, parts: &[&str]) -> Column {
        scope
            .resolve(&idents(parts), &mut Diagnostics::new())
            .unwrap()
    }

    #[test]
    fn unaliased_table_is_registered_under_empty_key() {
        let scope = scope_of("SELECT * FROM users");

        assert_eq!(entries(&scope), vec![("".into(), "users".into())]);
    }

    #[test]
    fn join_tree_is_flattened_left_to_right() {
        let scope = scope_of(
            "SELECT * FROM payments p LEFT JOIN users u ON p.user_id = u.user_id JOIN app.accounts AS a ON a.id = u.account_id",
        );

        assert_eq!(
            entries(&scope),
            vec![
                ("p".into(), "payments".into()),
                ("u".into(), "users".into()),
                ("a".into(), "app.accounts".into()),
            ]
        );
    }

    #[test]
    fn nested_joins_are_flattened() {
        let scope = scope_of("SELECT * FROM (a AS x JOIN b AS y ON x.id = y.id) JOIN c AS z ON z.id = x.id");

        assert_eq!(
            entries(&scope),
            vec![
                ("x".into(), "a".into()),
                ("y".into(), "b".into()),
                ("z".into(), "c".into()),
            ]
        );
    }

    #[test]
    fn later_entries_win_on_alias_collision() {
        let scope = scope_of("SELECT * FROM a, b");

        assert_eq!(entries(&scope), vec![("".into(), "b".into())]);
    }

    #[test]
    fn derived_tables_contribute_nothing() {
        let scope = scope_of("SELECT * FROM users u, (SELECT 1 AS one) AS d");

        assert_eq!(entries(&scope), vec![("u".into(), "users".into())]);
    }

    #[test]
    fn child_scope_shadows_parent() {
        let parent = scope_of("SELECT * FROM t AS a, s");
        let child =
            AliasScope::nested(Some(&parent), &from_clause("SELECT * FROM u AS a")).unwrap();

        assert_eq!(
            entries(&child),
            vec![("a".into(), "u".into()), ("".into(), "s".into())]
        );
    }

    #[test]
    fn unqualified_column_uses_the_only_relation() {
        let scope = scope_of("SELECT * FROM users AS u");

        assert_eq!(
            resolve(&scope, &["email"]),
            Column::new(Relation::new(None, "users"), "email")
        );
    }

    #[test]
    fn unqualified_column_falls_back_to_unaliased_relation() {
        let scope = scope_of("SELECT * FROM users, accounts AS a");

        assert_eq!(
            resolve(&scope, &["email"]),
            Column::new(Relation::new(None, "users"), "email")
        );
    }

    #[test]
    fn unqualified_column_falls_back_to_sentinel() {
        let scope = scope_of("SELECT * FROM users AS u, accounts AS a");

        assert_eq!(
            resolve(&scope, &["email"]),
            Column::new(Relation::new(None, Relation::NOT_FOUND), "email")
        );
    }

    #[test]
    fn qualified_column_uses_alias() {
        let scope = scope_of("SELECT * FROM users AS u, accounts AS a");

        assert_eq!(
            resolve(&scope, &["a", "id"]),
            Column::new(Relation::new(None, "accounts"), "id")
        );
    }

    #[test]
    fn unknown_qualifier_is_taken_as_table_name() {
        let scope = scope_of("SELECT * FROM users AS u");

        assert_eq!(
            resolve(&scope, &["Orders", "id"]),
            Column::new(Relation::new(None, "orders"), "id")
        );
    }

    #[test]
    fn long_column_reference_uses_first_two_parts_and_warns() {
        let scope = scope_of("SELECT * FROM users AS u");
        let mut diagnostics = Diagnostics::new();

        let column = scope
            .resolve(&idents(&["u", "details", "extra"]), &mut diagnostics)
            .unwrap();

        assert_eq!(column, Column::new(Relation::new(None, "users"), "details"));

        let warnings = diagnostics.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ColumnReference);
        assert_eq!(warnings[0].node, "u.details.extra");
    }

    #[test]
    fn empty_column_reference_is_an_invariant_failure() {
        let scope = scope_of("SELECT * FROM users");

        assert_eq!(
            scope.resolve(&[], &mut Diagnostics::new()),
            Err(InvariantError::EmptyColumnRef)
        );
    }
}
