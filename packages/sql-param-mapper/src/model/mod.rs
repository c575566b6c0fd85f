mod relation;
mod sql_ident;

pub use relation::*;

pub(crate) use sql_ident::*;
