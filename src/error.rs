use thiserror::Error;

/// Errors returned by the clustering and reassignment engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Vectors (embeddings, weights, seeds) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// No ordinary node carries this id.
    #[error("unknown node {0}")]
    UnknownNode(u64),

    /// No cluster carries this id.
    #[error("unknown cluster {0}")]
    UnknownCluster(usize),

    /// Two input records share an id.
    #[error("duplicate node id {0}")]
    DuplicateNode(u64),

    /// A drag-end arrived while a previous reassignment was still pending.
    #[error("a reassignment is already in progress")]
    ReassignmentInProgress,

    /// Malformed JSON in node records or configuration.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading records or configuration.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that every vector has the same, non-zero length and return it.
pub(crate) fn check_dimensions(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for v in data.iter().skip(1) {
        if v.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: v.len(),
            });
        }
    }
    Ok(d)
}
