use derive_more::Display;
use sqltk::parser::ast::{Ident, ObjectName, ObjectNamePart};

/// The `SqlIdent` type wraps an [`Ident`] and produces the name PostgreSQL would use for it: unquoted identifiers are
/// folded to lower case, quoted identifiers are taken verbatim.
///
/// All names recorded in an [`crate::AliasScope`] or a [`crate::Column`] are canonical, so `Users.ID`, `users.id` and
/// `"users"."id"` resolve to the same column.
///
/// For an "official" explanation of how SQL identifiers work (at least with respect to Postgres), see
/// [<https://www.postgresql.org/docs/14/sql-syntax-lexical.html#SQL-SYNTAX-IDENTIFIERS>].
#[derive(Debug, Clone, Copy, Display)]
#[display("{}", _0)]
pub(crate) struct SqlIdent<'a>(pub &'a Ident);

impl SqlIdent<'_> {
    pub(crate) fn canonical(&self) -> String {
        match self.0.quote_style {
            None => self.0.value.to_lowercase(),
            Some(_) => self.0.value.clone(),
        }
    }
}

/// The identifiers of `name`, in order.
pub(crate) fn object_name_idents(name: &ObjectName) -> impl DoubleEndedIterator<Item = &Ident> {
    name.0
        .iter()
        .map(|ObjectNamePart::Identifier(ident)| ident)
}

#[cfg(test)]
mod test {
    use sqltk::parser::ast::Ident;

    use super::SqlIdent;

    #[test]
    fn unquoted_identifiers_are_folded() {
        assert_eq!(SqlIdent(&Ident::new("Users")).canonical(), "users");
    }

    #[test]
    fn quoted_identifiers_are_verbatim() {
        assert_eq!(SqlIdent(&Ident::with_quote('"', "Users")).canonical(), "Users");
    }
}
