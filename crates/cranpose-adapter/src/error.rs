//! Errors surfaced by the adapter.

/// Configuration errors raised while resolving or producing cells.
///
/// These indicate an integration mistake (a reuse identifier that was never
/// registered, or an item with nothing to resolve) and are propagated to the
/// caller rather than recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    UnregisteredIdentifier { identifier: String, index: usize },
    EmptyIdentifier { component: usize, index: usize },
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::UnregisteredIdentifier { identifier, index } => {
                write!(
                    f,
                    "no cell registered for identifier `{identifier}` (item {index})"
                )
            }
            AdapterError::EmptyIdentifier { component, index } => {
                write!(
                    f,
                    "item {index} of component {component} resolves to an empty identifier"
                )
            }
        }
    }
}

impl std::error::Error for AdapterError {}
