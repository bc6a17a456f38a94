//! Error types for archive reading

use crate::status::Status;
use std::ffi::CStr;
use std::fmt;
use std::io;

/// Result type for archive reading operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for archive reading operations
#[derive(Debug)]
pub enum Error {
    /// Error reported by libarchive
    Archive {
        /// Status returned by the failing call
        status: Status,
        /// `archive_errno` at the time of the failure
        code: i32,
        /// `archive_error_string` at the time of the failure
        message: String,
    },
    /// I/O error raised by the source inside one of the custom I/O callbacks
    Io(io::Error),
    /// Null pointer error
    NullPointer,
    /// Invalid argument
    InvalidArgument(String),
}

impl Error {
    /// Read `archive_errno` and `archive_error_string` from a handle
    pub(crate) unsafe fn last_error(archive: *mut libarchive_io_sys::archive) -> (i32, String) {
        // SAFETY: Caller must ensure archive is a valid pointer
        unsafe {
            let code = libarchive_io_sys::archive_errno(archive);
            let msg_ptr = libarchive_io_sys::archive_error_string(archive);
            let message = if msg_ptr.is_null() {
                format!("Unknown error (code: {})", code)
            } else {
                CStr::from_ptr(msg_ptr).to_string_lossy().into_owned()
            };
            (code, message)
        }
    }

    /// Create an error from a libarchive archive pointer
    pub(crate) unsafe fn from_archive(status: Status, archive: *mut libarchive_io_sys::archive) -> Self {
        // SAFETY: Caller must ensure archive is a valid pointer
        let (code, message) = unsafe { Self::last_error(archive) };
        Error::Archive {
            status,
            code,
            message,
        }
    }

    /// Check a return code from libarchive and convert to Result
    ///
    /// `ARCHIVE_WARN` is not an error: the call completed and the warning is
    /// logged.
    pub(crate) unsafe fn from_return_code(
        ret: i32,
        archive: *mut libarchive_io_sys::archive,
    ) -> Result<Status> {
        let status = Status::from_code(ret);
        if status.is_error() {
            // SAFETY: Caller must ensure archive is a valid pointer
            return Err(unsafe { Self::from_archive(status, archive) });
        }
        if status == Status::Warn {
            // SAFETY: Caller must ensure archive is a valid pointer
            let (_, message) = unsafe { Self::last_error(archive) };
            log::warn!("libarchive warning: {}", message);
        }
        Ok(status)
    }

    /// The libarchive status behind this error, if it came from libarchive
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Archive { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Archive {
                status,
                code,
                message,
            } => {
                write!(f, "libarchive {} (code {}): {}", status, code, message)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NullPointer => write!(f, "Null pointer error"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            Error::InvalidArgument(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
            other => io::Error::other(other),
        }
    }
}
