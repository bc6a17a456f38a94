//! Declarations for the subset of libarchive used by the custom I/O reader.
//!
//! Names, types and constant widths follow what bindgen emits for
//! `archive.h` / `archive_entry.h`, so the `bindgen` feature is a drop-in
//! replacement for this module. bindgen cannot evaluate the `AE_IF*` macros;
//! `build.rs` appends them to the generated file.

use std::os::raw::{c_char, c_int, c_long, c_void};

pub type la_int64_t = i64;
pub type la_ssize_t = isize;

#[cfg(unix)]
pub type la_mode_t = libc::mode_t;
#[cfg(windows)]
pub type la_mode_t = u16;

#[cfg(unix)]
pub type time_t = libc::time_t;
#[cfg(windows)]
pub type time_t = i64;

pub const ARCHIVE_EOF: u32 = 1;
pub const ARCHIVE_OK: u32 = 0;
pub const ARCHIVE_RETRY: i32 = -10;
pub const ARCHIVE_WARN: i32 = -20;
pub const ARCHIVE_FAILED: i32 = -25;
pub const ARCHIVE_FATAL: i32 = -30;

pub const AE_IFMT: u32 = 0o170000;
pub const AE_IFREG: u32 = 0o100000;
pub const AE_IFLNK: u32 = 0o120000;
pub const AE_IFSOCK: u32 = 0o140000;
pub const AE_IFCHR: u32 = 0o020000;
pub const AE_IFBLK: u32 = 0o060000;
pub const AE_IFDIR: u32 = 0o040000;
pub const AE_IFIFO: u32 = 0o010000;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct archive {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct archive_entry {
    _unused: [u8; 0],
}

pub type archive_read_callback = Option<
    unsafe extern "C" fn(
        arg1: *mut archive,
        _client_data: *mut c_void,
        _buffer: *mut *const c_void,
    ) -> la_ssize_t,
>;
pub type archive_seek_callback = Option<
    unsafe extern "C" fn(
        arg1: *mut archive,
        _client_data: *mut c_void,
        offset: la_int64_t,
        whence: c_int,
    ) -> la_int64_t,
>;
pub type archive_open_callback =
    Option<unsafe extern "C" fn(arg1: *mut archive, _client_data: *mut c_void) -> c_int>;
pub type archive_close_callback =
    Option<unsafe extern "C" fn(arg1: *mut archive, _client_data: *mut c_void) -> c_int>;

unsafe extern "C" {
    pub fn archive_version_number() -> c_int;
    pub fn archive_version_string() -> *const c_char;
    pub fn archive_version_details() -> *const c_char;

    pub fn archive_read_new() -> *mut archive;

    pub fn archive_read_support_filter_all(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_bzip2(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_compress(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_grzip(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_gzip(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_lrzip(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_lz4(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_lzip(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_lzma(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_lzop(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_none(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_uu(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_xz(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_filter_zstd(arg1: *mut archive) -> c_int;

    pub fn archive_read_support_format_all(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_7zip(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_ar(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_cab(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_cpio(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_empty(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_iso9660(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_lha(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_mtree(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_rar(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_raw(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_tar(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_warc(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_xar(arg1: *mut archive) -> c_int;
    pub fn archive_read_support_format_zip(arg1: *mut archive) -> c_int;

    pub fn archive_read_set_seek_callback(
        arg1: *mut archive,
        arg2: archive_seek_callback,
    ) -> c_int;

    pub fn archive_read_open(
        arg1: *mut archive,
        _client_data: *mut c_void,
        arg2: archive_open_callback,
        arg3: archive_read_callback,
        arg4: archive_close_callback,
    ) -> c_int;

    pub fn archive_read_next_header(arg1: *mut archive, arg2: *mut *mut archive_entry) -> c_int;
    pub fn archive_read_data(arg1: *mut archive, arg2: *mut c_void, arg3: usize) -> la_ssize_t;
    pub fn archive_seek_data(arg1: *mut archive, arg2: la_int64_t, arg3: c_int) -> la_int64_t;
    pub fn archive_read_data_skip(arg1: *mut archive) -> c_int;
    pub fn archive_read_close(arg1: *mut archive) -> c_int;
    pub fn archive_read_free(arg1: *mut archive) -> c_int;

    pub fn archive_filter_bytes(arg1: *mut archive, arg2: c_int) -> la_int64_t;
    pub fn archive_filter_count(arg1: *mut archive) -> c_int;
    pub fn archive_filter_name(arg1: *mut archive, arg2: c_int) -> *const c_char;
    pub fn archive_format_name(arg1: *mut archive) -> *const c_char;
    pub fn archive_file_count(arg1: *mut archive) -> c_int;

    pub fn archive_errno(arg1: *mut archive) -> c_int;
    pub fn archive_error_string(arg1: *mut archive) -> *const c_char;

    pub fn archive_entry_pathname(arg1: *mut archive_entry) -> *const c_char;
    pub fn archive_entry_pathname_utf8(arg1: *mut archive_entry) -> *const c_char;
    pub fn archive_entry_size(arg1: *mut archive_entry) -> la_int64_t;
    pub fn archive_entry_size_is_set(arg1: *mut archive_entry) -> c_int;
    pub fn archive_entry_filetype(arg1: *mut archive_entry) -> la_mode_t;
    pub fn archive_entry_mode(arg1: *mut archive_entry) -> la_mode_t;
    pub fn archive_entry_perm(arg1: *mut archive_entry) -> la_mode_t;
    pub fn archive_entry_mtime(arg1: *mut archive_entry) -> time_t;
    pub fn archive_entry_mtime_nsec(arg1: *mut archive_entry) -> c_long;
    pub fn archive_entry_mtime_is_set(arg1: *mut archive_entry) -> c_int;
    pub fn archive_entry_uid(arg1: *mut archive_entry) -> la_int64_t;
    pub fn archive_entry_gid(arg1: *mut archive_entry) -> la_int64_t;
    pub fn archive_entry_uname_utf8(arg1: *mut archive_entry) -> *const c_char;
    pub fn archive_entry_gname_utf8(arg1: *mut archive_entry) -> *const c_char;
    pub fn archive_entry_symlink_utf8(arg1: *mut archive_entry) -> *const c_char;
    pub fn archive_entry_hardlink_utf8(arg1: *mut archive_entry) -> *const c_char;
}
