//! Error taxonomy for network store operations
//!
//! Every variant is recoverable: the caller reports the message and
//! carries on. The only genuinely external failure is `Io`, raised when
//! a table cannot be written; the in-memory state is kept regardless.

use thiserror::Error;

/// Errors reported by [`NetworkStore`](super::NetworkStore) operations
/// and by the storage layer.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("city '{0}' does not exist")]
    CityNotFound(String),

    #[error("no road exists between {0} and {1}")]
    RoadNotFound(String, String),

    #[error("city '{0}' already exists")]
    CityAlreadyExists(String),

    #[error("road already exists between {0} and {1}")]
    RoadAlreadyExists(String, String),

    #[error(
        "city name '{0}' is invalid: it must be 2+ characters, contain at least one letter, \
         and only include alphanumeric, space, or hyphen"
    )]
    InvalidCityName(String),

    #[error("budget must be greater than 0 and at most 1000, got {0}")]
    BudgetOutOfRange(f64),

    #[error("city count must be between 1 and {0}")]
    CityCountOutOfRange(usize),

    #[error("the city limit of {0} cities has been reached")]
    CityLimitReached(usize),

    #[error("index must be between 1 and {0}")]
    IndexOutOfRange(usize),

    #[error("cannot add a road from a city to itself")]
    SelfReference,

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}
