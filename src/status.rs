//! libarchive status codes

use std::fmt;

/// Status code returned by libarchive calls and by the custom I/O callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operation succeeded
    Ok,
    /// No more entries (or no more data) to read
    Eof,
    /// Retrying the operation may succeed
    Retry,
    /// Operation succeeded with a warning
    Warn,
    /// Operation failed but the archive is still usable
    Failed,
    /// The archive handle is no longer usable
    Fatal,
}

impl Status {
    /// Interpret a raw libarchive return code
    ///
    /// Positive codes other than `ARCHIVE_EOF` are treated as success, and
    /// unknown negative codes as fatal.
    pub fn from_code(code: i32) -> Self {
        match code {
            c if c == libarchive_io_sys::ARCHIVE_OK as i32 => Status::Ok,
            c if c == libarchive_io_sys::ARCHIVE_EOF as i32 => Status::Eof,
            libarchive_io_sys::ARCHIVE_RETRY => Status::Retry,
            libarchive_io_sys::ARCHIVE_WARN => Status::Warn,
            libarchive_io_sys::ARCHIVE_FAILED => Status::Failed,
            c if c < 0 => Status::Fatal,
            _ => Status::Ok,
        }
    }

    /// The raw libarchive code for this status
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => libarchive_io_sys::ARCHIVE_OK as i32,
            Status::Eof => libarchive_io_sys::ARCHIVE_EOF as i32,
            Status::Retry => libarchive_io_sys::ARCHIVE_RETRY,
            Status::Warn => libarchive_io_sys::ARCHIVE_WARN,
            Status::Failed => libarchive_io_sys::ARCHIVE_FAILED,
            Status::Fatal => libarchive_io_sys::ARCHIVE_FATAL,
        }
    }

    /// Whether the status reports an error the caller has to handle
    pub fn is_error(self) -> bool {
        matches!(self, Status::Retry | Status::Failed | Status::Fatal)
    }

    fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Eof => "EOF",
            Status::Retry => "RETRY",
            Status::Warn => "WARN",
            Status::Failed => "FAILED",
            Status::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Status::from_code(0), Status::Ok);
        assert_eq!(Status::from_code(1), Status::Eof);
        assert_eq!(Status::from_code(-10), Status::Retry);
        assert_eq!(Status::from_code(-20), Status::Warn);
        assert_eq!(Status::from_code(-25), Status::Failed);
        assert_eq!(Status::from_code(-30), Status::Fatal);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(Status::from_code(-1), Status::Fatal);
        assert_eq!(Status::from_code(-99), Status::Fatal);
        assert_eq!(Status::from_code(7), Status::Ok);
    }

    #[test]
    fn test_code_matches_from_code() {
        for status in [
            Status::Ok,
            Status::Eof,
            Status::Retry,
            Status::Warn,
            Status::Failed,
            Status::Fatal,
        ] {
            assert_eq!(Status::from_code(status.code()), status);
        }
    }

    #[test]
    fn test_is_error() {
        assert!(!Status::Ok.is_error());
        assert!(!Status::Eof.is_error());
        assert!(!Status::Warn.is_error());
        assert!(Status::Retry.is_error());
        assert!(Status::Failed.is_error());
        assert!(Status::Fatal.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Fatal.to_string(), "FATAL");
        assert_eq!(Status::Warn.to_string(), "WARN");
    }
}
