use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing an interaction matrix file
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid radii: inner {inner} / outer {outer} (need 0 < inner < outer)")]
    InvalidRadii { inner: f32, outer: f32 },
}

impl MatrixError {
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            MatrixError::NotFound(path.to_path_buf())
        } else {
            MatrixError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Failures while reading or writing a JSON settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_not_found_is_classified() {
        let err = MatrixError::from_io(
            Path::new("missing.csv"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, MatrixError::NotFound(_)));
        assert_eq!(err.to_string(), "no such file: missing.csv");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = MatrixError::from_io(
            Path::new("locked.csv"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, MatrixError::Io { .. }));
        assert!(err.to_string().contains("locked.csv"));
    }

    #[test]
    fn test_invalid_radii_message() {
        let err = MatrixError::InvalidRadii {
            inner: 50.0,
            outer: 40.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid radii: inner 50 / outer 40 (need 0 < inner < outer)"
        );
    }
}
