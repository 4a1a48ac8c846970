//! Cut evaluation engine.
//!
//! Cuts are the science-team acceptance criteria of one program. They are
//! read from the program configuration into a [`CutCollection`], grouped
//! into common cuts (built-in resolvers) and custom cuts (plugin-backed),
//! and re-evaluated against every matching alert. A broken cut fails
//! closed; it never aborts the evaluation of its siblings.

pub mod collection;
pub mod cut;
pub mod resolvers;
pub mod value;

pub use collection::CutCollection;
pub use cut::{Comparator, Cut, CutDefinition, CutKind, CutState};
pub use resolvers::{CommonResolver, ResolveError};
pub use value::{Dimension, Value};

/// Error raised while building a cut collection from configuration.
///
/// All cut lookups (resolver names, plugin names, comparator symbols)
/// happen at configuration load, so these never surface during alert
/// processing.
#[derive(Debug, thiserror::Error)]
pub enum CutConfigError {
    #[error("unknown common cut '{0}'")]
    UnknownResolver(String),
    #[error("unknown custom cut plugin '{0}'")]
    UnknownPlugin(String),
    #[error("unknown comparator '{0}'")]
    UnknownComparator(String),
    #[error("malformed cut entry '{0}': {1}")]
    MalformedEntry(String, String),
}
