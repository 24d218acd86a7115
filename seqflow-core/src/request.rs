//! Request identifiers and the value marker trait.

use std::fmt;

/// An opaque identifier naming one unit of simulated work.
///
/// Identifiers are either numeric or named. Two identifiers are equal only if
/// they have the same variant and payload, so `Number(1)` and `Name("1")` are
/// distinct requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestId {
    /// A numeric identifier.
    Number(u64),
    /// A named identifier.
    Name(String),
}

impl RequestId {
    /// Build a list of numeric identifiers, preserving order.
    ///
    /// ```rust
    /// use seqflow_core::RequestId;
    ///
    /// let ids = RequestId::numbered([1, 2, 3]);
    /// assert_eq!(ids[2], RequestId::Number(3));
    /// ```
    pub fn numbered(ids: impl IntoIterator<Item = u64>) -> Vec<Self> {
        ids.into_iter().map(Self::Number).collect()
    }

    /// Returns the numeric payload, if any.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "#{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// A marker trait for values produced by a fetch.
///
/// Values are cloned when they move from one stage of a chain to the next, and
/// must be thread-safe so runs can be driven from any tokio runtime flavor.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid fetch Value",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Fetched values are shared across stages and must be cloneable and thread-safe."
)]
pub trait Value: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Value for T {}
