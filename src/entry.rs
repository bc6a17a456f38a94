//! Archive entry types

use std::ffi::CStr;
use std::os::raw::c_char;
use std::time::{Duration, SystemTime};

/// File type of an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file
    RegularFile,
    /// Directory
    Directory,
    /// Symbolic link
    SymbolicLink,
    /// Block device
    BlockDevice,
    /// Character device
    CharacterDevice,
    /// FIFO/named pipe
    Fifo,
    /// Socket
    Socket,
    /// Unknown type
    Unknown,
}

impl FileType {
    /// Decode the file type bits of a `st_mode` style value
    pub fn from_mode(mode: u32) -> Self {
        match mode & libarchive_io_sys::AE_IFMT {
            libarchive_io_sys::AE_IFREG => FileType::RegularFile,
            libarchive_io_sys::AE_IFDIR => FileType::Directory,
            libarchive_io_sys::AE_IFLNK => FileType::SymbolicLink,
            libarchive_io_sys::AE_IFBLK => FileType::BlockDevice,
            libarchive_io_sys::AE_IFCHR => FileType::CharacterDevice,
            libarchive_io_sys::AE_IFIFO => FileType::Fifo,
            libarchive_io_sys::AE_IFSOCK => FileType::Socket,
            _ => FileType::Unknown,
        }
    }
}

/// Owned snapshot of an entry's stat fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Last component of the entry path
    pub name: String,
    /// Size in bytes, 0 when the archive does not record one
    pub size: i64,
    /// File type and permission bits
    pub mode: u32,
    /// File type decoded from `mode`
    pub file_type: FileType,
    /// Modification time, if recorded
    pub mtime: Option<SystemTime>,
}

impl EntryInfo {
    /// Whether the entry is a directory
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// Header of the entry the reader is positioned on
///
/// The underlying `archive_entry` belongs to libarchive and is reused for the
/// next header, hence the borrow of the reader.
pub struct Entry<'a> {
    pub(crate) entry: *mut libarchive_io_sys::archive_entry,
    pub(crate) _marker: std::marker::PhantomData<&'a mut ()>,
}

/// Seconds and nanoseconds since the epoch, as libarchive splits them
fn epoch_time(sec: i64, nsec: u32) -> Option<SystemTime> {
    let nsec = Duration::from_nanos(u64::from(nsec));
    if sec >= 0 {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(sec as u64) + nsec)
    } else {
        SystemTime::UNIX_EPOCH
            .checked_sub(Duration::from_secs(sec.unsigned_abs()))?
            .checked_add(nsec)
    }
}

unsafe fn str_from<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: libarchive returns NUL-terminated strings owned by the entry
        unsafe { CStr::from_ptr(ptr).to_str().ok() }
    }
}

impl<'a> Entry<'a> {
    /// Get the pathname of the entry
    ///
    /// Returns `None` when the name is missing or cannot be represented as
    /// UTF-8.
    pub fn pathname(&self) -> Option<&str> {
        unsafe {
            str_from(libarchive_io_sys::archive_entry_pathname_utf8(self.entry))
                .or_else(|| str_from(libarchive_io_sys::archive_entry_pathname(self.entry)))
        }
    }

    /// Get the last component of the pathname
    ///
    /// Trailing slashes (as used for directory entries) are ignored.
    pub fn file_name(&self) -> Option<&str> {
        let path = self.pathname()?.trim_end_matches('/');
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file type
    pub fn file_type(&self) -> FileType {
        unsafe {
            let mode = libarchive_io_sys::archive_entry_filetype(self.entry);
            FileType::from_mode(mode as u32)
        }
    }

    /// Whether the entry is a directory
    pub fn is_dir(&self) -> bool {
        self.file_type() == FileType::Directory
    }

    /// Get the file size in bytes, if the archive records one
    pub fn size(&self) -> Option<i64> {
        unsafe {
            if libarchive_io_sys::archive_entry_size_is_set(self.entry) != 0 {
                Some(libarchive_io_sys::archive_entry_size(self.entry))
            } else {
                None
            }
        }
    }

    /// Get the file type and permission bits
    pub fn mode(&self) -> u32 {
        unsafe { libarchive_io_sys::archive_entry_mode(self.entry) as u32 }
    }

    /// Get the file permissions
    pub fn perm(&self) -> u32 {
        unsafe { libarchive_io_sys::archive_entry_perm(self.entry) as u32 }
    }

    /// Get the modification time
    pub fn mtime(&self) -> Option<SystemTime> {
        unsafe {
            if libarchive_io_sys::archive_entry_mtime_is_set(self.entry) == 0 {
                return None;
            }
            let sec = libarchive_io_sys::archive_entry_mtime(self.entry) as i64;
            let nsec = libarchive_io_sys::archive_entry_mtime_nsec(self.entry) as u32;
            epoch_time(sec, nsec)
        }
    }

    /// Get the user ID
    pub fn uid(&self) -> i64 {
        unsafe { libarchive_io_sys::archive_entry_uid(self.entry) }
    }

    /// Get the group ID
    pub fn gid(&self) -> i64 {
        unsafe { libarchive_io_sys::archive_entry_gid(self.entry) }
    }

    /// Get the user name
    pub fn uname(&self) -> Option<&str> {
        unsafe { str_from(libarchive_io_sys::archive_entry_uname_utf8(self.entry)) }
    }

    /// Get the group name
    pub fn gname(&self) -> Option<&str> {
        unsafe { str_from(libarchive_io_sys::archive_entry_gname_utf8(self.entry)) }
    }

    /// Get the symlink target (for symbolic links)
    pub fn symlink(&self) -> Option<&str> {
        unsafe { str_from(libarchive_io_sys::archive_entry_symlink_utf8(self.entry)) }
    }

    /// Get the hardlink target
    pub fn hardlink(&self) -> Option<&str> {
        unsafe { str_from(libarchive_io_sys::archive_entry_hardlink_utf8(self.entry)) }
    }

    /// Take an owned snapshot of the stat fields
    pub fn info(&self) -> EntryInfo {
        let mode = self.mode();
        EntryInfo {
            name: self.file_name().unwrap_or_default().to_string(),
            size: self.size().unwrap_or(0),
            mode,
            file_type: FileType::from_mode(mode),
            mtime: self.mtime(),
        }
    }
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("pathname", &self.pathname())
            .field("file_type", &self.file_type())
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_mode() {
        assert_eq!(FileType::from_mode(0o100644), FileType::RegularFile);
        assert_eq!(FileType::from_mode(0o040755), FileType::Directory);
        assert_eq!(FileType::from_mode(0o120777), FileType::SymbolicLink);
        assert_eq!(FileType::from_mode(0o060660), FileType::BlockDevice);
        assert_eq!(FileType::from_mode(0o020620), FileType::CharacterDevice);
        assert_eq!(FileType::from_mode(0o010644), FileType::Fifo);
        assert_eq!(FileType::from_mode(0o140755), FileType::Socket);
        assert_eq!(FileType::from_mode(0o644), FileType::Unknown);
    }

    #[test]
    fn test_epoch_time_keeps_nanoseconds() {
        let epoch = SystemTime::UNIX_EPOCH;
        assert_eq!(
            epoch_time(2, 500_000_000),
            Some(epoch + Duration::from_millis(2_500))
        );
        assert_eq!(
            epoch_time(-2, 500_000_000),
            epoch.checked_sub(Duration::from_millis(1_500))
        );
        assert_eq!(epoch_time(-1, 0), epoch.checked_sub(Duration::from_secs(1)));
        assert_eq!(epoch_time(0, 0), Some(epoch));
    }

    #[test]
    fn test_entry_info_is_dir() {
        let info = EntryInfo {
            name: "docs".to_string(),
            size: 0,
            mode: 0o040755,
            file_type: FileType::Directory,
            mtime: None,
        };
        assert!(info.is_dir());
    }
}
