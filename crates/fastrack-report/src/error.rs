//! Error types for report writing.

use std::fmt;
use std::io;

/// Errors that can occur while writing a report.
#[derive(Debug)]
pub enum ReportError {
    /// The destination rejected a write.
    Io(io::Error),
    /// The scan holds no completed entries.
    EmptyReport,
    /// Combined curves were requested but the scan had no auxiliary
    /// detectors.
    MissingAuxiliary,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::EmptyReport => write!(f, "scan has no completed samples to report"),
            Self::MissingAuxiliary => write!(
                f,
                "combined report requested but no auxiliary detector is configured"
            ),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn io_error_is_the_source() {
        let err = ReportError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(err.to_string().contains("closed"));
        assert!(err.source().is_some());
        assert!(ReportError::EmptyReport.source().is_none());
    }
}
