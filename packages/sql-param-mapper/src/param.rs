use derive_more::Display;
use serde::Serialize;

/// An ordinal bind parameter such as `$1`.
///
/// Ordinals are 1-based, as in PostgreSQL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[display("${}", _0)]
#[serde(transparent)]
pub struct Param(pub u16);

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ParamError {
    #[error("Invalid param format '{}'; expected '$1' for example", _0)]
    InvalidParamFormat(String),
}

impl TryFrom<&str> for Param {
    type Error = ParamError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.strip_prefix('$').map(str::parse::<u16>) {
            Some(Ok(n)) if n > 0 => Ok(Self(n)),
            _ => Err(ParamError::InvalidParamFormat(value.to_string())),
        }
    }
}

impl TryFrom<&String> for Param {
    type Error = ParamError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Param::try_from(value.as_str())
    }
}
