//! Argument and option types passed across the driver boundary.

/// A single column or argument value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

/// An argument with its 1-based position and optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: Option<String>,
    pub ordinal: usize,
    pub value: Value,
}

impl NamedValue {
    /// Positional argument.
    pub fn positional(ordinal: usize, value: impl Into<Value>) -> Self {
        Self {
            name: None,
            ordinal,
            value: value.into(),
        }
    }

    /// Named argument.
    pub fn named(name: impl Into<String>, ordinal: usize, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            ordinal,
            value: value.into(),
        }
    }

    /// Build positional arguments (ordinals starting at 1) from plain values.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Self::positional(i + 1, v))
            .collect()
    }
}

/// Transaction isolation level requested at begin time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Whatever the driver uses by default.
    #[default]
    Default,
    ReadUncommitted,
    ReadCommitted,
    WriteCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
    Linearizable,
}

/// Options for a transaction started through [`crate::ConnBeginTx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOptions {
    pub isolation: IsolationLevel,
    pub read_only: bool,
}
