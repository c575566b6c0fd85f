use std::sync::LazyLock;

use regex::Regex;
use sqltk::parser::ast::Statement;
use sqltk::parser::dialect::PostgreSqlDialect;
use sqltk::parser::parser::{Parser, ParserError};
use tracing::debug;

use crate::{log::PARSER, ParseError};

const DIALECT: PostgreSqlDialect = PostgreSqlDialect {};

/// Parses SQL text into statements, converting parser failures into a [`ParseError`] that points into `sql`.
pub(crate) fn parse_statements(
    sql: &str,
    recursion_limit: usize,
) -> Result<Vec<Statement>, ParseError> {
    Parser::new(&DIALECT)
        .with_recursion_limit(recursion_limit)
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_statements())
        .map_err(|err| to_parse_error(sql, err))
}

fn to_parse_error(sql: &str, err: ParserError) -> ParseError {
    let message = err.to_string();
    let cursor_position = cursor_position(sql, &message);

    debug!(target: PARSER, cursor_position, error = %message, "parse failed");

    ParseError {
        message,
        cursor_position,
    }
}

/// 1-based character offset of the parser's `Line: l, Column: c` location within `sql`.
///
/// Messages without a location (unexpected end of input, exceeded recursion limit) point one past the last character.
fn cursor_position(sql: &str, message: &str) -> usize {
    match extract_location(message) {
        Some((line, column)) if line > 0 => {
            let preceding: usize = sql
                .split('\n')
                .take(line - 1)
                .map(|line| line.chars().count() + 1)
                .sum();

            preceding + column
        }
        _ => sql.chars().count() + 1,
    }
}

/// Extracts `(line, column)` from the location suffix of a parser message.
///
/// The message can echo the offending token, so only the trailing location is considered.
fn extract_location(message: &str) -> Option<(usize, usize)> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"at Line: (\d+), Column: (\d+)$").unwrap());

    let captures = RE.captures(message)?;
    let line = captures.get(1)?.as_str().parse::<usize>().ok()?;
    let column = captures.get(2)?.as_str().parse::<usize>().ok()?;

    Some((line, column))
}
