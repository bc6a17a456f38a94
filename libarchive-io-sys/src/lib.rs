//! Raw FFI declarations for libarchive's custom I/O read interface.
//!
//! By default the declarations in `ffi.rs` are used. Enable the `bindgen`
//! feature to generate them from the headers of the libarchive found at
//! build time instead.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]

#[cfg(feature = "bindgen")]
include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

#[cfg(not(feature = "bindgen"))]
mod ffi;
#[cfg(not(feature = "bindgen"))]
pub use ffi::*;
