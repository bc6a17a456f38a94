mod common;

use std::io::{Cursor, Read};
use std::time::{Duration, SystemTime};

use common::{Counting, MTIME};
use libarchive_io::{
    ArchiveFormat, ArchiveReader, CompressionFormat, Error, FileType, ReadFormat, ReaderBuilder,
};

#[test]
fn test_read_tar_from_seekable_reader() {
    common::init_logging();
    let data = common::tar_bytes(&[("a", b"Sha lalal lal\n")]);

    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();
    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("a"));

    let mut buf = [0u8; 512];
    let size = archive.read_data(&mut buf).unwrap();
    assert_eq!(size, 14);
    assert_eq!(&buf[..size], b"Sha lalal lal\n");

    assert!(archive.next_entry().unwrap().is_none());
    archive.close().unwrap();
}

#[test]
fn test_read_tar_from_forward_only_reader() {
    let data = common::tar_bytes(&[("one.txt", b"first"), ("two.txt", b"second")]);

    let mut archive = ReaderBuilder::new()
        .open_stream(Counting::new(data))
        .unwrap();

    let mut entries = Vec::new();
    while let Some(entry) = archive.next_entry().unwrap() {
        let name = entry.pathname().unwrap().to_string();
        let content = archive.read_data_to_vec().unwrap();
        entries.push((name, content));
    }

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("one.txt".to_string(), b"first".to_vec()));
    assert_eq!(entries[1], ("two.txt".to_string(), b"second".to_vec()));

    // No seek callback was registered, so the source was never asked to seek
    let counting = archive.get_ref().get_ref();
    assert!(counting.reads > 0);
    assert_eq!(counting.seeks, 0);
}

#[test]
fn test_from_reader_accepts_plain_read() {
    let data = common::tar_bytes(&[("plain.txt", b"no seek needed")]);
    // &[u8] implements Read but not Seek
    let mut archive = ArchiveReader::from_reader(&data[..]).unwrap();

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("plain.txt"));
    assert_eq!(archive.read_data_to_vec().unwrap(), b"no seek needed");
}

#[test]
fn test_io_read_reports_end_of_entry() {
    let data = common::tar_bytes(&[("hello.txt", b"Hello from io::Read!")]);
    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();
    archive.next_entry().unwrap().unwrap();

    let mut contents = Vec::new();
    archive.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"Hello from io::Read!");

    let mut buf = [0u8; 16];
    assert_eq!(archive.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_skip_data_moves_to_next_entry() {
    let big = vec![7u8; 200_000];
    let data = common::tar_bytes(&[("big.bin", &big), ("small.txt", b"tail")]);
    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.size(), Some(200_000));
    archive.skip_data().unwrap();

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("small.txt"));
    assert_eq!(archive.read_data_to_vec().unwrap(), b"tail");
}

#[test]
fn test_entry_metadata() {
    let mut archive = ArchiveReader::new(Cursor::new(common::tar_with_metadata())).unwrap();

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("a"));
    assert_eq!(entry.file_name(), Some("a"));
    assert_eq!(entry.file_type(), FileType::RegularFile);
    assert!(!entry.is_dir());
    assert_eq!(entry.size(), Some(14));
    assert_eq!(entry.perm(), 0o644);
    assert_eq!(entry.mode(), 0o100644);
    assert_eq!(entry.uid(), 1000);
    assert_eq!(entry.gid(), 100);
    assert_eq!(entry.uname(), Some("alice"));
    assert_eq!(entry.gname(), Some("staff"));
    assert_eq!(
        entry.mtime(),
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(MTIME))
    );

    let info = entry.info();
    assert_eq!(info.name, "a");
    assert_eq!(info.size, 14);
    assert_eq!(info.file_type, FileType::RegularFile);
    assert!(!info.is_dir());

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname().map(|p| p.trim_end_matches('/')), Some("docs"));
    assert_eq!(entry.file_name(), Some("docs"));
    assert_eq!(entry.file_type(), FileType::Directory);
    assert!(entry.is_dir());
    assert_eq!(entry.perm(), 0o755);
    assert!(entry.info().is_dir());

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("docs/link"));
    assert_eq!(entry.file_name(), Some("link"));
    assert_eq!(entry.file_type(), FileType::SymbolicLink);
    assert_eq!(entry.symlink(), Some("a"));
    assert_eq!(entry.hardlink(), None);

    assert!(archive.next_entry().unwrap().is_none());
    assert_eq!(archive.file_count(), 3);
}

#[test]
fn test_gzip_filter() {
    let tar = common::tar_bytes(&[("compressed.txt", b"squeezed through gzip")]);
    let data = common::gzip(&tar);
    let raw_len = data.len() as i64;

    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();
    let has_gzip = (0..archive.filter_count())
        .any(|i| archive.filter_name(i).as_deref() == Some("gzip"));
    assert!(has_gzip);

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("compressed.txt"));
    assert_eq!(archive.read_data_to_vec().unwrap(), b"squeezed through gzip");
    assert!(archive.next_entry().unwrap().is_none());

    let format = archive.format_name().unwrap().to_lowercase();
    assert!(format.contains("tar"), "unexpected format name {}", format);

    let consumed = archive.filter_bytes(-1);
    assert!(consumed > 0 && consumed <= raw_len);
    assert!(archive.filter_bytes(0) >= tar.len() as i64 / 2);
}

#[test]
fn test_xz_filter() {
    let tar = common::tar_bytes(&[("x.txt", b"packed with xz")]);
    let mut archive = ArchiveReader::new(Cursor::new(common::xz(&tar))).unwrap();

    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("x.txt"));
    assert_eq!(archive.read_data_to_vec().unwrap(), b"packed with xz");
}

#[test]
fn test_tiny_block_size() {
    let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let data = common::tar_bytes(&[("pattern.bin", &content)]);

    let mut archive = ReaderBuilder::new()
        .buffer_size(7)
        .open_stream(Cursor::new(data))
        .unwrap();
    assert_eq!(archive.get_ref().capacity(), 7);

    archive.next_entry().unwrap().unwrap();
    assert_eq!(archive.read_data_to_vec().unwrap(), content);
}

#[test]
fn test_zero_buffer_size_is_rejected() {
    let result = ReaderBuilder::new()
        .buffer_size(0)
        .open(Cursor::new(Vec::new()));
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_empty_input_has_no_entries() {
    let mut archive = ArchiveReader::new(Cursor::new(Vec::new())).unwrap();
    assert!(archive.next_entry().unwrap().is_none());
    assert!(archive.next_entry().unwrap().is_none());
}

#[test]
fn test_next_entry_after_last_entry() {
    let data = common::tar_bytes(&[("a", b"Sha lalal lal\n")]);
    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();

    assert!(archive.next_entry().unwrap().is_some());
    assert!(archive.next_entry().unwrap().is_none());
    assert!(archive.next_entry().unwrap().is_none());
    assert_eq!(archive.file_count(), 1);
    archive.close().unwrap();
}

#[test]
fn test_unrecognized_input_fails_to_open() {
    let garbage = b"definitely not an archive\n".repeat(200);
    match ArchiveReader::new(Cursor::new(garbage)) {
        Err(Error::Archive { status, .. }) => assert!(status.is_error()),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("garbage opened as an archive"),
    }
}

#[test]
fn test_restricted_formats() {
    let tar = common::tar_bytes(&[("only.txt", b"tar only")]);

    let result = ReaderBuilder::new()
        .format(ReadFormat::Format(ArchiveFormat::Zip))
        .open(Cursor::new(tar.clone()));
    assert!(result.is_err());

    let mut archive = ReaderBuilder::new()
        .format(ReadFormat::Format(ArchiveFormat::Tar))
        .filter(CompressionFormat::None)
        .open(Cursor::new(tar))
        .unwrap();
    assert_eq!(archive.next_entry().unwrap().unwrap().pathname(), Some("only.txt"));
}

#[test]
fn test_restricted_filters_reject_gzip() {
    let data = common::gzip(&common::tar_bytes(&[("gz.txt", b"zipped")]));
    let result = ReaderBuilder::new()
        .format(ReadFormat::Format(ArchiveFormat::Tar))
        .filter(CompressionFormat::None)
        .open(Cursor::new(data));
    assert!(result.is_err());
}

#[test]
fn test_two_readers_are_independent() {
    let first = common::tar_bytes(&[("a", b"from the first archive")]);
    let second = common::tar_bytes(&[("b", b"from the second archive")]);

    let mut reader1 = ArchiveReader::new(Cursor::new(first)).unwrap();
    let mut reader2 = ArchiveReader::new(Cursor::new(second)).unwrap();

    let name2 = reader2.next_entry().unwrap().unwrap().pathname().map(str::to_owned);
    let name1 = reader1.next_entry().unwrap().unwrap().pathname().map(str::to_owned);
    assert_eq!(name1.as_deref(), Some("a"));
    assert_eq!(name2.as_deref(), Some("b"));

    assert_eq!(reader1.read_data_to_vec().unwrap(), b"from the first archive");
    assert_eq!(reader2.read_data_to_vec().unwrap(), b"from the second archive");

    drop(reader1);
    assert!(reader2.next_entry().unwrap().is_none());
}

#[test]
fn test_reader_moves_to_another_thread() {
    let data = common::tar_bytes(&[("threaded.txt", b"sent across threads")]);
    let mut archive = ArchiveReader::new(Cursor::new(data)).unwrap();

    let handle = std::thread::spawn(move || {
        archive.next_entry().unwrap().unwrap();
        archive.read_data_to_vec().unwrap()
    });
    assert_eq!(handle.join().unwrap(), b"sent across threads");
}

#[test]
fn test_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.tar");
    std::fs::write(&path, common::tar_bytes(&[("on_disk.txt", b"read via File")])).unwrap();

    let mut archive = ReaderBuilder::new().open_file(&path).unwrap();
    let entry = archive.next_entry().unwrap().unwrap();
    assert_eq!(entry.pathname(), Some("on_disk.txt"));
    assert_eq!(archive.read_data_to_vec().unwrap(), b"read via File");
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReaderBuilder::new().open_file(dir.path().join("missing.tar"));
    match result {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        _ => panic!("expected a NotFound I/O error"),
    }
}

#[test]
fn test_version() {
    assert!(libarchive_io::version().starts_with("libarchive"));
    assert!(libarchive_io::version_number() >= 3_002_000);
    assert!(!libarchive_io::version_details().is_empty());
}
