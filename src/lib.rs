//! Read archives through libarchive from any Rust byte source
//!
//! libarchive normally reads from a file name, a file descriptor or a memory
//! buffer. Its custom I/O interface instead pulls bytes through open, read,
//! seek and close callbacks. This crate implements those callbacks on top of
//! the [`ArchiveSource`] and [`ArchiveSeek`] traits, so archives can be read
//! from anything that implements [`std::io::Read`] (and [`std::io::Seek`]),
//! or from a custom source.
//!
//! All format decoding and decompression happens inside libarchive.
//!
//! # Examples
//!
//! ## Reading from a seekable reader
//!
//! ```no_run
//! use libarchive_io::ArchiveReader;
//! use std::fs::File;
//!
//! let mut archive = ArchiveReader::new(File::open("archive.tar.gz")?)?;
//!
//! while let Some(entry) = archive.next_entry()? {
//!     println!("File: {}", entry.pathname().unwrap_or(""));
//!     let data = archive.read_data_to_vec()?;
//!     println!("  {} bytes", data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Implementing a custom source
//!
//! ```no_run
//! use libarchive_io::{ArchiveSource, ReaderBuilder};
//! use std::io;
//!
//! struct Chunks {
//!     chunks: Vec<Vec<u8>>,
//!     current: Vec<u8>,
//! }
//!
//! impl ArchiveSource for Chunks {
//!     fn read(&mut self) -> io::Result<&[u8]> {
//!         self.current = self.chunks.pop().unwrap_or_default();
//!         Ok(&self.current)
//!     }
//! }
//!
//! let source = Chunks { chunks: vec![], current: vec![] };
//! let mut archive = ReaderBuilder::new().open_source(source)?;
//! while let Some(entry) = archive.next_entry()? {
//!     println!("{:?}", entry.pathname());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

mod callbacks;
mod entry;
mod error;
mod format;
mod reader;
mod source;
mod status;

pub use entry::{Entry, EntryInfo, FileType};
pub use error::{Error, Result};
pub use format::{ArchiveFormat, CompressionFormat, ReadFormat};
pub use reader::{ArchiveReader, ReaderBuilder};
pub use source::{ArchiveSeek, ArchiveSource, DEFAULT_BUFFER_SIZE, ReaderSource};
pub use status::Status;

/// Returns the version string of the underlying libarchive library
pub fn version() -> String {
    unsafe {
        let ptr = libarchive_io_sys::archive_version_string();
        std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Returns the version number of the underlying libarchive library
pub fn version_number() -> i32 {
    unsafe { libarchive_io_sys::archive_version_number() }
}

/// Returns detailed version information including linked libraries
pub fn version_details() -> String {
    unsafe {
        let ptr = libarchive_io_sys::archive_version_details();
        std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}
