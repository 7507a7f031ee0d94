//! Error types for the windowed scroller.

use crate::scroller::Edge;
use thiserror::Error;

/// Rejection reported by a [`DataSource`](crate::scroller::DataSource) page request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    /// Creates a fetch error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied by the data source.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by [`WindowedListController`](crate::scroller::WindowedListController).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrollerError {
    /// The data source rejected a page request. The edge has already been
    /// returned to idle and its placeholder removed.
    #[error("failed to load items {edge}: {source}")]
    Fetch {
        /// Edge the failed request was issued for.
        edge: Edge,
        /// The rejection from the data source.
        #[source]
        source: FetchError,
    },

    /// `init` was called on a controller that is already running.
    #[error("controller is already initialized")]
    AlreadyInitialized,
}

/// Result type for scroller operations
pub type Result<T> = std::result::Result<T, ScrollerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = ScrollerError::Fetch {
            edge: Edge::After,
            source: FetchError::new("timeout"),
        };
        assert_eq!(err.to_string(), "failed to load items after: timeout");
    }

    #[test]
    fn test_fetch_error_source_chain() {
        use std::error::Error as _;

        let err = ScrollerError::Fetch {
            edge: Edge::Before,
            source: FetchError::new("offline"),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("offline"));
    }
}
