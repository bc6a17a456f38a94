#![allow(dead_code)]

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

pub const MTIME: u64 = 1_600_000_000;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn file_header(size: u64) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_mtime(MTIME);
    header
}

/// Build an uncompressed tar archive holding regular files
pub fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in files {
        let mut header = file_header(data.len() as u64);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Tar archive with a file, a directory and a symlink, with ownership set
pub fn tar_with_metadata() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let data = b"Sha lalal lal\n";
    let mut header = file_header(data.len() as u64);
    header.set_uid(1000);
    header.set_gid(100);
    header.set_username("alice").unwrap();
    header.set_groupname("staff").unwrap();
    builder.append_data(&mut header, "a", &data[..]).unwrap();

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_mtime(MTIME);
    builder.append_data(&mut header, "docs/", io::empty()).unwrap();

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    header.set_mtime(MTIME);
    header.set_link_name("a").unwrap();
    builder.append_data(&mut header, "docs/link", io::empty()).unwrap();

    builder.into_inner().unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn xz(data: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    lzma_rs::xz_compress(&mut Cursor::new(data), &mut compressed).unwrap();
    compressed
}

pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Cursor that counts the calls libarchive makes on it
pub struct Counting {
    inner: Cursor<Vec<u8>>,
    pub reads: usize,
    pub seeks: usize,
}

impl Counting {
    pub fn new(data: Vec<u8>) -> Self {
        Counting {
            inner: Cursor::new(data),
            reads: 0,
            seeks: 0,
        }
    }
}

impl Read for Counting {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        self.inner.read(buf)
    }
}

impl Seek for Counting {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seeks += 1;
        self.inner.seek(pos)
    }
}
