use std::env;
use std::path::PathBuf;

// Oldest release that ships every symbol declared in src/ffi.rs.
const MIN_VERSION: &str = "3.2.0";

fn main() {
    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-env-changed=LIBARCHIVE_LIB_DIR");
    println!("cargo:rerun-if-env-changed=LIBARCHIVE_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=LIBARCHIVE_STATIC");

    // Locate the system libarchive
    let include_paths = link_libarchive();

    for path in &include_paths {
        println!("cargo:include={}", path.display());
    }

    // Generate Rust bindings
    #[cfg(feature = "bindgen")]
    generate_bindings(&include_paths);
}

fn link_static() -> bool {
    env::var_os("LIBARCHIVE_STATIC").is_some_and(|v| v != "0")
}

/// Emits the link directives for libarchive and returns the header search
/// paths that were discovered.
fn link_libarchive() -> Vec<PathBuf> {
    // An explicit location wins over pkg-config
    if let Ok(lib_dir) = env::var("LIBARCHIVE_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", lib_dir);
        let kind = if link_static() { "static" } else { "dylib" };
        println!("cargo:rustc-link-lib={}=archive", kind);

        return env::var("LIBARCHIVE_INCLUDE_DIR")
            .map(|dir| vec![PathBuf::from(dir)])
            .unwrap_or_default();
    }

    match pkg_config::Config::new()
        .atleast_version(MIN_VERSION)
        .statik(link_static())
        .probe("libarchive")
    {
        Ok(library) => library.include_paths,
        Err(err) => {
            // Fall back to the default linker search path plus the Homebrew
            // keg locations on macOS
            println!(
                "cargo:warning=pkg-config could not find libarchive >= {}: {}",
                MIN_VERSION, err
            );
            let target = env::var("TARGET").unwrap();
            if target.contains("apple-darwin") {
                println!("cargo:rustc-link-search=native=/opt/homebrew/opt/libarchive/lib");
                println!("cargo:rustc-link-search=native=/usr/local/opt/libarchive/lib");
            }
            println!("cargo:rustc-link-lib=archive");
            Vec::new()
        }
    }
}

#[cfg(feature = "bindgen")]
const AE_IF_CONSTS: &str = "\
pub const AE_IFMT: u32 = 0o170000;
pub const AE_IFREG: u32 = 0o100000;
pub const AE_IFLNK: u32 = 0o120000;
pub const AE_IFSOCK: u32 = 0o140000;
pub const AE_IFCHR: u32 = 0o020000;
pub const AE_IFBLK: u32 = 0o060000;
pub const AE_IFDIR: u32 = 0o040000;
pub const AE_IFIFO: u32 = 0o010000;";

#[cfg(feature = "bindgen")]
fn generate_bindings(include_paths: &[PathBuf]) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut builder = bindgen::Builder::default()
        .header("wrapper.h")
        // Types to generate
        .allowlist_type("archive.*")
        .allowlist_type("la_.*")
        // Functions to generate
        .allowlist_function("archive_read_new")
        .allowlist_function("archive_read_support_.*")
        .allowlist_function("archive_read_set_seek_callback")
        .allowlist_function("archive_read_open")
        .allowlist_function("archive_read_next_header")
        .allowlist_function("archive_read_data")
        .allowlist_function("archive_read_data_skip")
        .allowlist_function("archive_read_close")
        .allowlist_function("archive_read_free")
        .allowlist_function("archive_seek_data")
        .allowlist_function("archive_filter_bytes")
        .allowlist_function("archive_filter_count")
        .allowlist_function("archive_filter_name")
        .allowlist_function("archive_format_name")
        .allowlist_function("archive_file_count")
        .allowlist_function("archive_errno")
        .allowlist_function("archive_error_string")
        .allowlist_function("archive_version_.*")
        .allowlist_function("archive_entry_.*")
        // Variables to generate
        .allowlist_var("ARCHIVE_.*")
        // The callback signatures in the safe crate use isize
        .blocklist_type("la_ssize_t")
        .raw_line("pub type la_ssize_t = isize;")
        // archive_entry.h defines AE_IF* as cast expressions, which bindgen
        // skips
        .raw_line(AE_IF_CONSTS)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        // Formatting
        .derive_debug(true)
        .derive_default(true)
        .size_t_is_usize(true)
        .layout_tests(false);

    for path in include_paths {
        builder = builder.clang_arg(format!("-I{}", path.display()));
    }

    let bindings = builder.generate().expect("Unable to generate bindings");

    bindings
        .write_to_file(out_dir.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}
