use std::io;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use sqltk::parser::{ast::Statement, dialect::PostgreSqlDialect, parser::Parser};
use tracing_subscriber::{fmt::MakeWriter, EnvFilter, FmtSubscriber};

use crate::{
    diagnostics::{Diagnostics, Warning},
    param_mapper::ParamMapper,
    ParameterMap,
};

pub(crate) fn parse(statement: &'static str) -> Statement {
    Parser::parse_sql(&PostgreSqlDialect {}, statement).unwrap()[0].clone()
}

/// Parses `statement` and maps its parameters, returning the map and the recorded warnings.
pub(crate) fn map(statement: &'static str) -> (ParameterMap, Vec<Warning>) {
    let mut diagnostics = Diagnostics::new();
    let params = ParamMapper::new(&mut diagnostics)
        .map_statement(&parse(statement))
        .unwrap();

    (params, diagnostics.into_warnings())
}

/// Installs a global subscriber honouring `RUST_LOG`. Safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Runs `f` with a subscriber that records events matching `filter` and returns what was logged.
pub(crate) fn capture_logs<R>(filter: &str, f: impl FnOnce() -> R) -> (R, String) {
    let make_writer = MockMakeWriter::default();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(make_writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    (result, make_writer.get_string())
}

/// Builds an expected [`crate::Column`]: `col!(table.column)` or `col!(schema.table.column)`.
#[macro_export]
macro_rules! col {
    ($schema:ident . $table:ident . $column:ident) => {
        $crate::Column::new(
            $crate::Relation::new(Some(stringify!($schema)), stringify!($table)),
            stringify!($column),
        )
    };

    ($table:ident . $column:ident) => {
        $crate::Column::new(
            $crate::Relation::new(None, stringify!($table)),
            stringify!($column),
        )
    };
}

/// Builds an expected [`crate::ParameterMap`]: `params! { 1 => users.email, 2 => app.users.id }`.
#[macro_export]
macro_rules! params {
    { $($param:literal => $($part:ident).+),* $(,)? } => {{
        #[allow(unused_mut)]
        let mut params = $crate::ParameterMap::new();
        $(params.insert($crate::Param($param), $crate::col!($($part).+));)*
        params
    }};
}

// Mock Writer for capturing log output, adapted from tracing_subscriber's internal test code.
pub(crate) struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockWriter {
    fn buf(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.buf.try_lock().map_err(|err| match err {
            TryLockError::WouldBlock => io::Error::from(io::ErrorKind::WouldBlock),
            TryLockError::Poisoned(_) => io::Error::from(io::ErrorKind::Other),
        })
    }
}

impl io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf()?.flush()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockMakeWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockMakeWriter {
    pub(crate) fn get_string(&self) -> String {
        let mut buf = self.buf.lock().expect("lock shouldn't be poisoned");
        let string = std::str::from_utf8(&buf[..])
            .expect("formatter should not have produced invalid utf-8")
            .to_owned();
        buf.clear();
        string
    }
}

impl<'a> MakeWriter<'a> for MockMakeWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MockWriter {
            buf: self.buf.clone(),
        }
    }
}
