//! Error module for the lattice SNN library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SNNError {
    /// Error for invalid parameters, e.g., a negative number of connections per target.
    InvalidParameter(String),
    /// More sources were requested per target than the source population holds.
    InsufficientSources {
        requested: usize,
        available: usize,
    },
    /// Error for non-finite positions or distances.
    InvalidGeometry(String),
    /// Error for out of bounds access, e.g., neuron not found.
    OutOfBounds(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SNNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SNNError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SNNError::InsufficientSources {
                requested,
                available,
            } => write!(
                f,
                "Insufficient sources: {} requested per target but only {} available",
                requested, available
            ),
            SNNError::InvalidGeometry(e) => write!(f, "Invalid geometry: {}", e),
            SNNError::OutOfBounds(e) => {
                write!(f, "Index out of bounds: {}", e)
            }
            SNNError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SNNError {}

impl From<std::io::Error> for SNNError {
    fn from(e: std::io::Error) -> Self {
        SNNError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SNNError {
    fn from(e: serde_json::Error) -> Self {
        SNNError::IOError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_insufficient_sources() {
        let e = SNNError::InsufficientSources {
            requested: 5,
            available: 3,
        };
        assert_eq!(
            e.to_string(),
            "Insufficient sources: 5 requested per target but only 3 available"
        );
    }

    #[test]
    fn test_from_io_error() {
        let e: SNNError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(e, SNNError::IOError("missing".to_string()));
    }
}
