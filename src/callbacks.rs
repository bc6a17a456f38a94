//! Custom I/O callback trampolines
//!
//! libarchive drives a reader through plain C function pointers that receive
//! an opaque client-data pointer. The functions in this module recover the
//! [`CallbackState`] behind that pointer and forward to the
//! [`ArchiveSource`] / [`ArchiveSeek`] implementation it holds. Status codes
//! are passed back unchanged; host errors become `ARCHIVE_FATAL` and are kept
//! in the state so the reader can report the original `io::Error`.

use crate::source::{ArchiveSeek, ArchiveSource};
use std::ffi::c_void;
use std::io::{self, SeekFrom};
use std::os::raw::c_int;
use std::ptr::NonNull;

/// State reached through the client-data pointer
pub(crate) struct CallbackState<S> {
    pub(crate) source: S,
    last_error: Option<io::Error>,
}

impl<S> CallbackState<S> {
    fn new(source: S) -> Self {
        CallbackState {
            source,
            last_error: None,
        }
    }

    /// Record a source error, keeping the first one until it is taken
    pub(crate) fn fail(&mut self, err: io::Error) {
        if self.last_error.is_some() {
            log::debug!("archive source failed again: {}", err);
            return;
        }
        log::debug!("archive source failed: {}", err);
        self.last_error = Some(err);
    }

    /// Take the error recorded by the last failing callback
    pub(crate) fn take_error(&mut self) -> Option<io::Error> {
        self.last_error.take()
    }
}

/// Leak the state into a pointer that can be handed to libarchive
///
/// The pointer must be released with [`free_state`] once libarchive no
/// longer references it.
pub(crate) fn into_raw_state<S>(source: S) -> NonNull<CallbackState<S>> {
    let boxed = Box::new(CallbackState::new(source));
    // SAFETY: Box::into_raw never returns null
    unsafe { NonNull::new_unchecked(Box::into_raw(boxed)) }
}

/// Reclaim a state created by [`into_raw_state`]
///
/// # Safety
/// `state` must come from `into_raw_state` and must not be used afterwards,
/// neither by Rust nor by the archive it was registered with.
pub(crate) unsafe fn free_state<S>(state: NonNull<CallbackState<S>>) -> S {
    // SAFETY: state was created by Box::into_raw in into_raw_state
    let boxed = unsafe { Box::from_raw(state.as_ptr()) };
    boxed.source
}

/// Recover the callback state from a client-data pointer
///
/// # Safety
/// `client_data` must be null or a pointer created by [`into_raw_state`] for
/// the same `S`, with no other live reference to the state.
unsafe fn state_mut<'a, S>(client_data: *mut c_void) -> Option<&'a mut CallbackState<S>> {
    // SAFETY: guaranteed by the caller
    unsafe { (client_data as *mut CallbackState<S>).as_mut() }
}

fn status_of(result: io::Result<()>, state: &mut CallbackState<impl Sized>) -> c_int {
    match result {
        Ok(()) => libarchive_io_sys::ARCHIVE_OK as c_int,
        Err(e) => {
            state.fail(e);
            libarchive_io_sys::ARCHIVE_FATAL
        }
    }
}

/// Map a libarchive seek request onto `SeekFrom`
///
/// `whence` follows the C `SEEK_SET` / `SEEK_CUR` / `SEEK_END` values.
pub(crate) fn seek_from(offset: i64, whence: c_int) -> io::Result<SeekFrom> {
    match whence {
        libc::SEEK_SET => u64::try_from(offset).map(SeekFrom::Start).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("negative absolute seek position {}", offset),
            )
        }),
        libc::SEEK_CUR => Ok(SeekFrom::Current(offset)),
        libc::SEEK_END => Ok(SeekFrom::End(offset)),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid whence {}", whence),
        )),
    }
}

/// C callback function for opening the source
///
/// # Safety
/// Called by libarchive from C. `client_data` must be the pointer registered
/// through [`read_open`] for the same `S`.
unsafe extern "C" fn open_trampoline<S: ArchiveSource>(
    _archive: *mut libarchive_io_sys::archive,
    client_data: *mut c_void,
) -> c_int {
    // SAFETY: client_data was registered by read_open and outlives the archive
    let Some(state) = (unsafe { state_mut::<S>(client_data) }) else {
        return libarchive_io_sys::ARCHIVE_FATAL;
    };

    log::trace!("open callback");
    let result = state.source.open();
    status_of(result, state)
}

/// C callback function for reading the next block
///
/// # Safety
/// Called by libarchive from C. `client_data` must be the pointer registered
/// through [`read_open`] for the same `S`; `block` must be valid for a write.
unsafe extern "C" fn read_trampoline<S: ArchiveSource>(
    _archive: *mut libarchive_io_sys::archive,
    client_data: *mut c_void,
    block: *mut *const c_void,
) -> libarchive_io_sys::la_ssize_t {
    if block.is_null() {
        return libarchive_io_sys::ARCHIVE_FATAL as libarchive_io_sys::la_ssize_t;
    }
    // SAFETY: client_data was registered by read_open and outlives the archive
    let Some(state) = (unsafe { state_mut::<S>(client_data) }) else {
        return libarchive_io_sys::ARCHIVE_FATAL as libarchive_io_sys::la_ssize_t;
    };

    match state.source.read() {
        Ok(data) => {
            log::trace!("read callback returned {} bytes", data.len());
            // The slice stays valid until the next read on this source, which
            // is exactly how long libarchive keeps the block.
            // SAFETY: block is non-null and points to libarchive's out slot
            unsafe {
                *block = data.as_ptr() as *const c_void;
            }
            data.len() as libarchive_io_sys::la_ssize_t
        }
        Err(e) => {
            state.fail(e);
            libarchive_io_sys::ARCHIVE_FATAL as libarchive_io_sys::la_ssize_t
        }
    }
}

/// C callback function for seeking the source
///
/// # Safety
/// Called by libarchive from C. `client_data` must be the pointer registered
/// through [`read_open`] for the same `S`.
unsafe extern "C" fn seek_trampoline<S: ArchiveSeek>(
    _archive: *mut libarchive_io_sys::archive,
    client_data: *mut c_void,
    offset: libarchive_io_sys::la_int64_t,
    whence: c_int,
) -> libarchive_io_sys::la_int64_t {
    // SAFETY: client_data was registered by read_open and outlives the archive
    let Some(state) = (unsafe { state_mut::<S>(client_data) }) else {
        return libarchive_io_sys::ARCHIVE_FATAL as libarchive_io_sys::la_int64_t;
    };

    let result = seek_from(offset, whence).and_then(|pos| state.source.seek(pos));
    match result.and_then(|pos| {
        i64::try_from(pos)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "seek position overflows i64"))
    }) {
        Ok(pos) => {
            log::trace!("seek callback ({}, whence {}) -> {}", offset, whence, pos);
            pos
        }
        Err(e) => {
            state.fail(e);
            libarchive_io_sys::ARCHIVE_FATAL as libarchive_io_sys::la_int64_t
        }
    }
}

/// C callback function for closing the source
///
/// # Safety
/// Called by libarchive from C. `client_data` must be the pointer registered
/// through [`read_open`] for the same `S`.
unsafe extern "C" fn close_trampoline<S: ArchiveSource>(
    _archive: *mut libarchive_io_sys::archive,
    client_data: *mut c_void,
) -> c_int {
    // SAFETY: client_data was registered by read_open and outlives the archive
    let Some(state) = (unsafe { state_mut::<S>(client_data) }) else {
        return libarchive_io_sys::ARCHIVE_FATAL;
    };

    log::trace!("close callback");
    let result = state.source.close();
    status_of(result, state)
}

/// Register the seek trampoline for `S`
///
/// Must be called before [`read_open`]. Returns libarchive's status code.
///
/// # Safety
/// `archive` must be a valid handle from `archive_read_new`.
pub(crate) unsafe fn set_seek_callback<S: ArchiveSeek>(
    archive: *mut libarchive_io_sys::archive,
) -> c_int {
    // SAFETY: guaranteed by the caller
    unsafe {
        libarchive_io_sys::archive_read_set_seek_callback(archive, Some(seek_trampoline::<S>))
    }
}

/// Open `archive` with the open/read/close trampolines for `S`
///
/// This is the forwarding entry point: it hands `state` to libarchive as
/// client data and returns whatever `archive_read_open` returns.
///
/// # Safety
/// `archive` must be a valid, not yet opened handle, and `state` must stay
/// alive until `archive_read_free` has returned for it.
pub(crate) unsafe fn read_open<S: ArchiveSource>(
    archive: *mut libarchive_io_sys::archive,
    state: NonNull<CallbackState<S>>,
) -> c_int {
    // SAFETY: guaranteed by the caller
    unsafe {
        libarchive_io_sys::archive_read_open(
            archive,
            state.as_ptr() as *mut c_void,
            Some(open_trampoline::<S>),
            Some(read_trampoline::<S>),
            Some(close_trampoline::<S>),
        )
    }
}
