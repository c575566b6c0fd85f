//! Per-statement drivers of [`crate::param_mapper::ParamMapper`].
//!
//! UPDATE has no AST struct of its own, so `update_statement` takes the fields of `Statement::Update` directly.

mod delete_statement;
mod insert_statement;
mod query_statement;
mod update_statement;
