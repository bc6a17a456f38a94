//! Byte sources that feed libarchive through the custom I/O callbacks
//!
//! libarchive pulls its input through four callbacks: open, read, seek and
//! close. [`ArchiveSource`] and [`ArchiveSeek`] are the Rust side of that
//! contract; [`ReaderSource`] implements them for any [`Read`] (and
//! [`Seek`]) value.

use std::io::{self, Read, Seek, SeekFrom};

/// Default size of the block buffer handed to libarchive (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Input side of libarchive's custom I/O interface
///
/// Every method is called synchronously from inside a libarchive call on the
/// thread that drives the reader.
pub trait ArchiveSource {
    /// Called once when the archive is opened
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Produce the next block of input
    ///
    /// An empty slice signals the end of the stream. The returned bytes are
    /// handed to libarchive by pointer and must stay untouched until the next
    /// call to `read`, which the borrow on `self` guarantees.
    fn read(&mut self) -> io::Result<&[u8]>;

    /// Called once when the archive is closed
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Random access on top of [`ArchiveSource`]
///
/// Registering a seek callback lets libarchive use the seekable readers of
/// formats such as zip and 7z, which jump to the central directory instead of
/// streaming through the whole input.
pub trait ArchiveSeek: ArchiveSource {
    /// Move the read position and return the new absolute offset
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;
}

/// Adapter from [`Read`] / [`Seek`] to the archive source traits
pub struct ReaderSource<R> {
    inner: R,
    buffer: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader with the default block buffer
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Wrap a reader with a block buffer of `capacity` bytes
    ///
    /// A zero capacity is bumped to one byte, since an empty block would read
    /// as the end of the stream.
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        ReaderSource {
            inner,
            buffer: vec![0u8; capacity.max(1)],
        }
    }

    /// Get a reference to the wrapped reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Size of the block buffer
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<R: Read> ArchiveSource for ReaderSource<R> {
    fn read(&mut self) -> io::Result<&[u8]> {
        let n = loop {
            match self.inner.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        Ok(&self.buffer[..n])
    }
}

impl<R: Read + Seek> ArchiveSeek for ReaderSource<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
