use thiserror::Error;

/// Returned by the strict accessors of [`AvlTreeMap`](crate::AvlTreeMap) when
/// the requested key is not stored in the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("key not found")]
pub struct KeyError;
