//! Archive and compression formats a reader can be restricted to

use std::os::raw::c_int;

/// Archive formats libarchive can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// TAR format (ustar, pax, GNU and v7 variants)
    Tar,
    /// ZIP format
    Zip,
    /// 7-Zip format
    SevenZip,
    /// AR (Unix archive) format
    Ar,
    /// CPIO format
    Cpio,
    /// ISO 9660 CD-ROM format
    Iso9660,
    /// XAR format
    Xar,
    /// MTREE format
    Mtree,
    /// Microsoft CAB format
    Cab,
    /// LHA/LZH format
    Lha,
    /// RAR format
    Rar,
    /// WARC web archive format
    Warc,
    /// RAW format (the whole stream is a single entry named `data`)
    Raw,
    /// Empty input (zero entries)
    Empty,
}

/// Compression filters libarchive can undo while reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// No compression
    None,
    /// Gzip compression
    Gzip,
    /// Bzip2 compression
    Bzip2,
    /// XZ compression
    Xz,
    /// Legacy LZMA (`.lzma`) compression
    Lzma,
    /// Zstd compression
    Zstd,
    /// LZ4 compression
    Lz4,
    /// Compress (LZW) compression
    Compress,
    /// UUEncode
    UuEncode,
    /// LZIP compression
    Lzip,
    /// LRZIP compression
    Lrzip,
    /// LZOP compression
    Lzop,
    /// GRZIP compression
    Grzip,
}

/// Format specifier for reading archives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFormat {
    /// Auto-detect the format
    All,
    /// Specific format
    Format(ArchiveFormat),
}

impl ArchiveFormat {
    /// Enable reading support for this format on a handle
    pub(crate) unsafe fn enable(self, archive: *mut libarchive_io_sys::archive) -> c_int {
        // SAFETY: Caller must ensure archive is a valid read handle
        unsafe {
            match self {
                ArchiveFormat::Tar => libarchive_io_sys::archive_read_support_format_tar(archive),
                ArchiveFormat::Zip => libarchive_io_sys::archive_read_support_format_zip(archive),
                ArchiveFormat::SevenZip => {
                    libarchive_io_sys::archive_read_support_format_7zip(archive)
                }
                ArchiveFormat::Ar => libarchive_io_sys::archive_read_support_format_ar(archive),
                ArchiveFormat::Cpio => libarchive_io_sys::archive_read_support_format_cpio(archive),
                ArchiveFormat::Iso9660 => {
                    libarchive_io_sys::archive_read_support_format_iso9660(archive)
                }
                ArchiveFormat::Xar => libarchive_io_sys::archive_read_support_format_xar(archive),
                ArchiveFormat::Mtree => {
                    libarchive_io_sys::archive_read_support_format_mtree(archive)
                }
                ArchiveFormat::Cab => libarchive_io_sys::archive_read_support_format_cab(archive),
                ArchiveFormat::Lha => libarchive_io_sys::archive_read_support_format_lha(archive),
                ArchiveFormat::Rar => libarchive_io_sys::archive_read_support_format_rar(archive),
                ArchiveFormat::Warc => libarchive_io_sys::archive_read_support_format_warc(archive),
                ArchiveFormat::Raw => libarchive_io_sys::archive_read_support_format_raw(archive),
                ArchiveFormat::Empty => {
                    libarchive_io_sys::archive_read_support_format_empty(archive)
                }
            }
        }
    }
}

impl ReadFormat {
    pub(crate) unsafe fn enable(self, archive: *mut libarchive_io_sys::archive) -> c_int {
        // SAFETY: Caller must ensure archive is a valid read handle
        unsafe {
            match self {
                ReadFormat::All => libarchive_io_sys::archive_read_support_format_all(archive),
                ReadFormat::Format(format) => format.enable(archive),
            }
        }
    }
}

impl CompressionFormat {
    /// Enable reading support for this filter on a handle
    pub(crate) unsafe fn enable(self, archive: *mut libarchive_io_sys::archive) -> c_int {
        // SAFETY: Caller must ensure archive is a valid read handle
        unsafe {
            match self {
                CompressionFormat::None => {
                    libarchive_io_sys::archive_read_support_filter_none(archive)
                }
                CompressionFormat::Gzip => {
                    libarchive_io_sys::archive_read_support_filter_gzip(archive)
                }
                CompressionFormat::Bzip2 => {
                    libarchive_io_sys::archive_read_support_filter_bzip2(archive)
                }
                CompressionFormat::Xz => libarchive_io_sys::archive_read_support_filter_xz(archive),
                CompressionFormat::Lzma => {
                    libarchive_io_sys::archive_read_support_filter_lzma(archive)
                }
                CompressionFormat::Zstd => {
                    libarchive_io_sys::archive_read_support_filter_zstd(archive)
                }
                CompressionFormat::Lz4 => {
                    libarchive_io_sys::archive_read_support_filter_lz4(archive)
                }
                CompressionFormat::Compress => {
                    libarchive_io_sys::archive_read_support_filter_compress(archive)
                }
                CompressionFormat::UuEncode => {
                    libarchive_io_sys::archive_read_support_filter_uu(archive)
                }
                CompressionFormat::Lzip => {
                    libarchive_io_sys::archive_read_support_filter_lzip(archive)
                }
                CompressionFormat::Lrzip => {
                    libarchive_io_sys::archive_read_support_filter_lrzip(archive)
                }
                CompressionFormat::Lzop => {
                    libarchive_io_sys::archive_read_support_filter_lzop(archive)
                }
                CompressionFormat::Grzip => {
                    libarchive_io_sys::archive_read_support_filter_grzip(archive)
                }
            }
        }
    }
}
