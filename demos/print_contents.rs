//! Example: Print the name and contents of every entry in one or more archives

use libarchive_io::{FileType, ReaderBuilder};

fn print_contents(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("file {}", path);

    let mut archive = ReaderBuilder::new().open_file(path)?;

    while let Some(entry) = archive.next_entry()? {
        let pathname = entry.pathname().unwrap_or("<unknown>").to_string();
        let is_file = entry.file_type() == FileType::RegularFile;
        println!("Name {}", pathname);

        if is_file {
            let data = archive.read_data_to_vec()?;
            if !data.is_empty() {
                println!("Contents:\n***************");
                println!("{}", String::from_utf8_lossy(&data));
                println!("***************");
            }
        }
    }

    archive.close()?;
    Ok(())
}

fn main() {
    env_logger::init();

    for path in std::env::args().skip(1) {
        if let Err(e) = print_contents(&path) {
            eprintln!("Error reading {}: {}", path, e);
        }
    }
}
