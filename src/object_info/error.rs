use thiserror::Error;

/// Boxed error raised by a host framework's persistence layer.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ObjectInfoError {
    /// A caller supplied an unusable argument (e.g. a missing user id).
    #[error("{0}")]
    Argument(String),

    /// The raising save path of the host framework failed.
    ///
    /// The host's own error is kept as the source so callers can downcast it.
    #[error("Persistence error: {0}")]
    Persistence(#[source] HostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Record error: {0}")]
    Record(String),
}

impl ObjectInfoError {
    /// Wrap a host persistence failure without altering it.
    pub fn persistence<E>(err: E) -> Self
    where
        E: Into<HostError>,
    {
        ObjectInfoError::Persistence(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ObjectInfoError>;
