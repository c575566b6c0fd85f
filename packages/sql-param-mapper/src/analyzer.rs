use std::collections::BTreeSet;

use serde::Serialize;
use sqltk::parser::ast::Statement;
use tracing::debug;

use crate::{
    diagnostics::{Diagnostics, Warning},
    log::ANALYZER,
    param_mapper::ParamMapper,
    parser::parse_statements,
    placeholder_tracker::PlaceholderTracker,
    AnalyzeError, InvariantError, Param, ParameterMap,
};

/// Maps the ordinal parameters of the first statement in `sql` to the columns they bind to, using the default
/// [`AnalyzerConfig`].
///
/// See [`Analyzer::analyze`].
pub fn analyze(sql: &str) -> Result<Analysis, AnalyzeError> {
    Analyzer::default().analyze(sql)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Maximum nesting depth the parser accepts before giving up.
    pub recursion_limit: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 50,
        }
    }
}

/// Entry point for parameter analysis.
///
/// An `Analyzer` holds configuration only; every call builds its own state, so a single instance can be shared
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Parses `sql` and analyzes its first statement.
    ///
    /// Unparseable SQL is the only input-related error: SQL that parses but cannot be (fully) interpreted yields a
    /// partial [`Analysis`] with [`Warning`]s.
    pub fn analyze(&self, sql: &str) -> Result<Analysis, AnalyzeError> {
        let statements = parse_statements(sql, self.config.recursion_limit)?;

        if statements.len() > 1 {
            debug!(target: ANALYZER, statements = statements.len(), "only the first statement is analyzed");
        }

        let statement = statements.first().ok_or(InvariantError::NoStatement)?;

        Ok(self.analyze_statement(statement)?)
    }

    /// Analyzes an already parsed statement.
    pub fn analyze_statement(&self, statement: &Statement) -> Result<Analysis, InvariantError> {
        debug!(target: ANALYZER, statement = %statement, "analyzing");

        let mut diagnostics = Diagnostics::new();
        let params = ParamMapper::new(&mut diagnostics).map_statement(statement)?;
        let warnings = diagnostics.into_warnings();
        let placeholders = PlaceholderTracker::track(statement);

        debug!(
            target: ANALYZER,
            params = params.len(),
            warnings = warnings.len(),
            placeholders = placeholders.len(),
            "analyzed"
        );

        Ok(Analysis {
            params,
            warnings,
            placeholders,
        })
    }
}

/// The outcome of analyzing one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// The column each mapped parameter binds to.
    pub params: ParameterMap,

    /// The SQL shapes that were skipped, in the order they were encountered.
    pub warnings: Vec<Warning>,

    /// Every ordinal placeholder in the statement, whether mapped or not.
    pub placeholders: BTreeSet<Param>,
}

impl Analysis {
    /// Placeholders that appear in the statement but were not mapped to a column.
    pub fn unbound_placeholders(&self) -> BTreeSet<Param> {
        self.placeholders
            .iter()
            .filter(|param| !self.params.contains_key(*param))
            .copied()
            .collect()
    }
}
