use std::path::PathBuf;

use thiserror::Error;

/// The broad category of a [`TensorError`].
///
/// The categories are mutually exclusive and map to different recovery strategies: an I/O
/// failure may be retried with another path, while the structural and positional errors point
/// at a bug in the calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A file could not be opened, created or recognized.
    UnableToOpenFile,
    /// Shapes, element counts, permutations or index lengths do not line up.
    ShapeMismatch,
    /// The operation would change the rank of a fixed-rank tensor.
    RankMismatch,
    /// An individual index or axis component is outside its valid range.
    OutOfRange,
}

/// Error type for tensor operations.
///
/// Every fallible operation of the crate returns this type. Use [`TensorError::kind`] to
/// branch on the category of the failure.
#[derive(Error, Debug)]
pub enum TensorError {
    /// The file could not be opened for reading or created for writing.
    ///
    /// # Recommended Actions
    /// - Check that the path exists and is readable (or that its directory is writable)
    #[error("Unable to open file {}: {source}", .path.display())]
    UnableToOpenFile {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not select a format for the requested element type.
    #[error("File does not have a valid extension for this element type: {}", .0.display())]
    InvalidFileExtension(PathBuf),

    /// Shapes, element counts or index lengths are incompatible.
    ///
    /// # Examples
    /// - More indices than the tensor has axes
    /// - Element-wise arithmetic between tensors with different element counts
    /// - A transpose order that is not a permutation of `0..rank`
    /// - Contracted axes with different extents
    /// - A file whose declared element count does not match its data
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The operation would change the rank of a fixed-rank tensor.
    #[error("Rank mismatch: expected rank {expected}, got rank {actual}")]
    RankMismatch {
        /// The fixed rank of the destination.
        expected: usize,
        /// The rank the operation tried to impose.
        actual: usize,
    },

    /// An index component exceeds the extent of its axis.
    #[error("Index {index} out of range for axis {axis} of size {size}")]
    IndexOutOfRange {
        /// The axis being indexed.
        axis: usize,
        /// The invalid index.
        index: usize,
        /// The extent of the axis.
        size: usize,
    },

    /// An axis number exceeds the rank of the tensor.
    #[error("Axis {axis} out of range for tensor of rank {rank}")]
    AxisOutOfRange {
        /// The invalid axis.
        axis: usize,
        /// The rank of the tensor.
        rank: usize,
    },
}

impl TensorError {
    /// Creates a ShapeMismatch error from a message.
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch(message.into())
    }

    /// Creates a ShapeMismatch error for two differing element counts.
    pub fn numel_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch(format!(
            "expected {expected} elements, but got {actual} elements"
        ))
    }

    /// Creates a ShapeMismatch error for an index longer than the rank.
    pub fn too_many_indices(given: usize, rank: usize) -> Self {
        Self::ShapeMismatch(format!(
            "too many indices: got {given} for a tensor of rank {rank}"
        ))
    }

    /// Creates an IndexOutOfRange error.
    pub fn index_out_of_range(axis: usize, index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { axis, index, size }
    }

    /// Creates an UnableToOpenFile error.
    pub fn unable_to_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnableToOpenFile {
            path: path.into(),
            source,
        }
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnableToOpenFile { .. } | Self::InvalidFileExtension(_) => {
                ErrorKind::UnableToOpenFile
            }
            Self::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            Self::RankMismatch { .. } => ErrorKind::RankMismatch,
            Self::IndexOutOfRange { .. } | Self::AxisOutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// Returns true if this error indicates a programming error rather than an I/O failure.
    pub fn is_programming_error(&self) -> bool {
        self.kind() != ErrorKind::UnableToOpenFile
    }
}
