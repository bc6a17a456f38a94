//! Archive reading through the custom I/O callbacks

use crate::callbacks::{self, CallbackState};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::format::{CompressionFormat, ReadFormat};
use crate::source::{ArchiveSeek, ArchiveSource, DEFAULT_BUFFER_SIZE, ReaderSource};
use crate::status::Status;
use std::ffi::CStr;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::mem::ManuallyDrop;
use std::os::raw::c_int;
use std::path::Path;
use std::ptr::{self, NonNull};

type SeekRegistration = unsafe fn(*mut libarchive_io_sys::archive) -> c_int;

/// Builder for [`ArchiveReader`]
///
/// By default every format and every compression filter libarchive knows is
/// enabled and sources read in 64KB blocks.
#[derive(Debug, Clone)]
pub struct ReaderBuilder {
    formats: Vec<ReadFormat>,
    filters: Vec<CompressionFormat>,
    buffer_size: usize,
}

impl ReaderBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        ReaderBuilder {
            formats: Vec::new(),
            filters: Vec::new(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Enable an archive format
    ///
    /// Can be called repeatedly. Without any call all formats are enabled.
    pub fn format(mut self, format: ReadFormat) -> Self {
        self.formats.push(format);
        self
    }

    /// Enable a compression filter
    ///
    /// Can be called repeatedly. Without any call all filters are enabled.
    pub fn filter(mut self, filter: CompressionFormat) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the block size used when adapting `Read` values
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Open an archive from a seekable reader
    ///
    /// The seek callback is registered, so formats with a seekable reader
    /// (zip, 7z, ...) can jump around instead of streaming.
    pub fn open<R: Read + Seek>(self, reader: R) -> Result<ArchiveReader<ReaderSource<R>>> {
        let source = self.reader_source(reader)?;
        self.open_seekable_source(source)
    }

    /// Open an archive from a forward-only reader
    pub fn open_stream<R: Read>(self, reader: R) -> Result<ArchiveReader<ReaderSource<R>>> {
        let source = self.reader_source(reader)?;
        self.open_source(source)
    }

    /// Open an archive file through the callback interface
    pub fn open_file<P: AsRef<Path>>(self, path: P) -> Result<ArchiveReader<ReaderSource<File>>> {
        let file = File::open(path)?;
        self.open(file)
    }

    /// Open an archive from a custom source without seek support
    pub fn open_source<S: ArchiveSource>(self, source: S) -> Result<ArchiveReader<S>> {
        self.open_with(source, None)
    }

    /// Open an archive from a custom source and register its seek callback
    pub fn open_seekable_source<S: ArchiveSeek>(self, source: S) -> Result<ArchiveReader<S>> {
        self.open_with(source, Some(callbacks::set_seek_callback::<S>))
    }

    fn reader_source<R: Read>(&self, reader: R) -> Result<ReaderSource<R>> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidArgument(
                "Buffer size must be greater than zero".to_string(),
            ));
        }
        Ok(ReaderSource::with_capacity(self.buffer_size, reader))
    }

    fn open_with<S: ArchiveSource>(
        self,
        source: S,
        seek: Option<SeekRegistration>,
    ) -> Result<ArchiveReader<S>> {
        let archive = unsafe { libarchive_io_sys::archive_read_new() };
        if archive.is_null() {
            return Err(Error::NullPointer);
        }

        // From here on Drop releases both the handle and the state
        let mut reader = ArchiveReader {
            archive,
            state: callbacks::into_raw_state(source),
            finished: false,
        };

        reader.enable_filters(&self.filters)?;
        reader.enable_formats(&self.formats)?;

        unsafe {
            if let Some(register) = seek {
                reader.check(register(archive))?;
            }
            reader.check(callbacks::read_open(archive, reader.state))?;
        }

        log::debug!(
            "opened archive stream (seekable: {}, filters: {})",
            seek.is_some(),
            reader.filter_names().join(", ")
        );

        Ok(reader)
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Archive reader fed by an [`ArchiveSource`]
///
/// Owns the libarchive handle and the callback state behind the client-data
/// pointer; both are released on [`close`](ArchiveReader::close) or drop.
pub struct ArchiveReader<S: ArchiveSource> {
    archive: *mut libarchive_io_sys::archive,
    state: NonNull<CallbackState<S>>,
    // libarchive rejects next_header once it reported EOF
    finished: bool,
}

// SAFETY: the handle and the state are only reached through &mut self, and
// libarchive does not tie a handle to the thread that created it.
unsafe impl<S: ArchiveSource + Send> Send for ArchiveReader<S> {}

impl<R: Read + Seek> ArchiveReader<ReaderSource<R>> {
    /// Open an archive from a seekable reader with all formats and filters
    pub fn new(reader: R) -> Result<Self> {
        ReaderBuilder::new().open(reader)
    }
}

impl<R: Read> ArchiveReader<ReaderSource<R>> {
    /// Open an archive from a forward-only reader with all formats and filters
    pub fn from_reader(reader: R) -> Result<Self> {
        ReaderBuilder::new().open_stream(reader)
    }
}

impl<S: ArchiveSource> ArchiveReader<S> {
    fn enable_filters(&mut self, filters: &[CompressionFormat]) -> Result<()> {
        unsafe {
            if filters.is_empty() {
                self.check(libarchive_io_sys::archive_read_support_filter_all(
                    self.archive,
                ))?;
            }
            for filter in filters {
                self.check(filter.enable(self.archive))?;
            }
        }
        Ok(())
    }

    fn enable_formats(&mut self, formats: &[ReadFormat]) -> Result<()> {
        unsafe {
            if formats.is_empty() {
                self.check(ReadFormat::All.enable(self.archive))?;
            }
            for format in formats {
                self.check(format.enable(self.archive))?;
            }
        }
        Ok(())
    }

    fn take_source_error(&mut self) -> Option<io::Error> {
        // SAFETY: no libarchive call is in flight, so nothing else holds the state
        unsafe { self.state.as_mut().take_error() }
    }

    /// Build the error for a failed call, preferring the source's own error
    fn error(&mut self, status: Status) -> Error {
        match self.take_source_error() {
            Some(e) => Error::Io(e),
            // SAFETY: self.archive is a live handle
            None => unsafe { Error::from_archive(status, self.archive) },
        }
    }

    /// Drop a source error libarchive recovered from
    fn discard_source_error(&mut self) {
        if let Some(e) = self.take_source_error() {
            log::debug!("discarding recovered source error: {}", e);
        }
    }

    fn check(&mut self, ret: c_int) -> Result<Status> {
        let status = Status::from_code(ret);
        if status.is_error() {
            return Err(self.error(status));
        }
        self.discard_source_error();
        // SAFETY: self.archive is a live handle
        unsafe { Error::from_return_code(ret, self.archive) }
    }

    /// Read the next entry header
    ///
    /// Returns `None` when there are no more entries, and keeps returning
    /// `None` on later calls.
    pub fn next_entry(&mut self) -> Result<Option<Entry<'_>>> {
        if self.finished {
            return Ok(None);
        }

        let mut entry: *mut libarchive_io_sys::archive_entry = ptr::null_mut();
        let ret = unsafe { libarchive_io_sys::archive_read_next_header(self.archive, &mut entry) };

        if Status::from_code(ret) == Status::Eof {
            self.discard_source_error();
            self.finished = true;
            return Ok(None);
        }

        self.check(ret)?;
        if entry.is_null() {
            return Err(Error::NullPointer);
        }

        Ok(Some(Entry {
            entry,
            _marker: std::marker::PhantomData,
        }))
    }

    /// Read data from the current entry
    ///
    /// Returns 0 at the end of the entry.
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        let ret = unsafe {
            libarchive_io_sys::archive_read_data(
                self.archive,
                buf.as_mut_ptr() as *mut std::os::raw::c_void,
                buf.len(),
            )
        };

        if ret < 0 {
            let status = Status::from_code(ret as i32);
            Err(self.error(status))
        } else {
            self.discard_source_error();
            Ok(ret as usize)
        }
    }

    /// Read all data from the current entry into a vector
    pub fn read_data_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut buf = vec![0u8; 8192];

        loop {
            let n = self.read_data(&mut buf)?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }

        Ok(data)
    }

    /// Skip the data for the current entry
    pub fn skip_data(&mut self) -> Result<()> {
        let ret = unsafe { libarchive_io_sys::archive_read_data_skip(self.archive) };
        self.check(ret)?;
        Ok(())
    }

    /// Move within the data of the current entry
    ///
    /// Only formats that support random access to entry data (for example
    /// stored zip members) can do this; others report an error.
    pub fn seek_data(&mut self, pos: SeekFrom) -> Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|_| {
                    Error::InvalidArgument(format!("Seek offset {} is too large", n))
                })?,
                libc::SEEK_SET,
            ),
            SeekFrom::Current(n) => (n, libc::SEEK_CUR),
            SeekFrom::End(n) => (n, libc::SEEK_END),
        };

        let ret = unsafe { libarchive_io_sys::archive_seek_data(self.archive, offset, whence) };
        if ret < 0 {
            let code = i32::try_from(ret).unwrap_or(libarchive_io_sys::ARCHIVE_FATAL);
            Err(self.error(Status::from_code(code)))
        } else {
            self.discard_source_error();
            Ok(ret as u64)
        }
    }

    /// Number of bytes that went through a filter so far
    ///
    /// Index 0 is the decompressed stream seen by the format reader, -1 the
    /// raw bytes pulled from the source.
    pub fn filter_bytes(&self, index: i32) -> i64 {
        unsafe { libarchive_io_sys::archive_filter_bytes(self.archive, index) }
    }

    /// Number of filters in the read pipeline, including the source itself
    pub fn filter_count(&self) -> i32 {
        unsafe { libarchive_io_sys::archive_filter_count(self.archive) }
    }

    /// Name of the filter at `index`
    pub fn filter_name(&self, index: i32) -> Option<String> {
        unsafe {
            let ptr = libarchive_io_sys::archive_filter_name(self.archive, index);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
            }
        }
    }

    fn filter_names(&self) -> Vec<String> {
        (0..self.filter_count())
            .filter_map(|i| self.filter_name(i))
            .collect()
    }

    /// Name of the detected archive format
    pub fn format_name(&self) -> Option<String> {
        unsafe {
            let ptr = libarchive_io_sys::archive_format_name(self.archive);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
            }
        }
    }

    /// Number of headers read so far
    pub fn file_count(&self) -> i32 {
        unsafe { libarchive_io_sys::archive_file_count(self.archive) }
    }

    /// Get a reference to the source
    pub fn get_ref(&self) -> &S {
        // SAFETY: the state lives until release(), and libarchive only touches
        // it during calls that need &mut self
        unsafe { &self.state.as_ref().source }
    }

    /// Close the archive and release the handle
    ///
    /// Reports failures that `Drop` would only log, including an error
    /// returned by the source's `close`.
    pub fn close(self) -> Result<()> {
        let mut this = ManuallyDrop::new(self);
        this.release()
    }

    /// Close, free, and reclaim the callback state. Must run exactly once.
    fn release(&mut self) -> Result<()> {
        let closed = unsafe { libarchive_io_sys::archive_read_close(self.archive) };
        let status = Status::from_code(closed);
        let result = match self.take_source_error() {
            Some(e) => Err(Error::Io(e)),
            None if status.is_error() => {
                // SAFETY: the handle is still allocated
                Err(unsafe { Error::from_archive(status, self.archive) })
            }
            None => Ok(()),
        };

        let freed = unsafe { libarchive_io_sys::archive_read_free(self.archive) };
        self.archive = ptr::null_mut();

        // SAFETY: archive_read_free returned, libarchive holds no pointer to the state
        unsafe {
            callbacks::free_state(self.state);
        }

        log::debug!("closed archive stream");

        if result.is_ok() && Status::from_code(freed) == Status::Fatal {
            return Err(Error::Archive {
                status: Status::Fatal,
                code: freed,
                message: "archive_read_free failed".to_string(),
            });
        }
        result
    }
}

impl<S: ArchiveSource> Read for ArchiveReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_data(buf).map_err(io::Error::from)
    }
}

impl<S: ArchiveSource> Seek for ArchiveReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_data(pos).map_err(io::Error::from)
    }
}

impl<S: ArchiveSource> Drop for ArchiveReader<S> {
    fn drop(&mut self) {
        if self.archive.is_null() {
            return;
        }
        if let Err(e) = self.release() {
            log::warn!("failed to close archive: {}", e);
        }
    }
}
